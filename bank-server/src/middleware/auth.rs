use bank_common::token::auth_token::{AuthToken, AuthTokenClaims, AuthTokenType};
use bank_common::token::{DecodedToken, Token, TokenError};

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use futures::future;
use std::marker::PhantomData;

use crate::env;
use crate::handlers::error::HttpErrorResponse;
use crate::middleware::{get_header, into_actix_error_res};

pub trait RequestAuthTokenType {
    fn token_name() -> &'static str;
    fn token_type() -> AuthTokenType;
}

#[derive(Debug)]
pub struct Access {}

impl RequestAuthTokenType for Access {
    fn token_name() -> &'static str {
        "AccessToken"
    }
    fn token_type() -> AuthTokenType {
        AuthTokenType::Access
    }
}

type AuthDecodedToken = DecodedToken<<AuthToken as Token>::Claims, <AuthToken as Token>::Verifier>;

#[derive(Debug)]
pub struct VerifiedToken<T: RequestAuthTokenType> {
    pub claims: AuthTokenClaims,
    _marker: PhantomData<T>,
}

impl<T> FromRequest for VerifiedToken<T>
where
    T: RequestAuthTokenType,
{
    type Error = HttpErrorResponse;
    type Future = future::Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match into_actix_error_res(get_and_verify_token::<T>(req)) {
            Ok(claims) => future::ok(VerifiedToken {
                claims,
                _marker: PhantomData,
            }),
            Err(e) => future::err(e),
        }
    }
}

/// An access token whose bearer holds the admin flag. Rejects everyone else with 403.
#[derive(Debug)]
pub struct AdminToken {
    pub claims: AuthTokenClaims,
}

impl FromRequest for AdminToken {
    type Error = HttpErrorResponse;
    type Future = future::Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let claims = match into_actix_error_res(get_and_verify_token::<Access>(req)) {
            Ok(c) => c,
            Err(e) => return future::err(e),
        };

        if !claims.is_admin {
            return future::err(HttpErrorResponse::UserDisallowed(String::from(
                "Only administrators may modify this resource",
            )));
        }

        future::ok(AdminToken { claims })
    }
}

#[inline]
fn get_and_verify_token<T>(req: &HttpRequest) -> Result<AuthTokenClaims, TokenError>
where
    T: RequestAuthTokenType,
{
    let token = get_header(req, T::token_name()).ok_or(TokenError::TokenMissing)?;
    let decoded_token = AuthToken::decode(token)?;

    verify_token(&decoded_token, T::token_type())
}

#[inline]
fn verify_token(
    decoded_token: &AuthDecodedToken,
    expected_type: AuthTokenType,
) -> Result<AuthTokenClaims, TokenError> {
    // Checks the signature before the expiration
    let claims = decoded_token.verify(&env::CONF.token_signing_key)?;

    if claims.token_type != expected_type {
        return Err(TokenError::WrongTokenType);
    }

    Ok(claims.clone())
}
