pub mod auth_token;

use base64::engine::general_purpose::URL_SAFE as b64_urlsafe;
use base64::Engine;
use hmac::{Hmac, Mac};
use serde::de::DeserializeOwned;
use sha2::Sha256;
use std::fmt::Debug;
use std::marker::PhantomData;
use std::time::{SystemTime, UNIX_EPOCH};

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug)]
pub enum TokenError {
    TokenInvalid,
    TokenExpired,
    TokenMissing,
    WrongTokenType,
}

impl std::error::Error for TokenError {}

impl std::fmt::Display for TokenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenError::TokenInvalid => write!(f, "TokenInvalid"),
            TokenError::TokenExpired => write!(f, "TokenExpired"),
            TokenError::TokenMissing => write!(f, "TokenMissing"),
            TokenError::WrongTokenType => write!(f, "WrongTokenType"),
        }
    }
}

pub trait Expiring {
    fn expiration(&self) -> u64;
}

pub trait TokenSignatureVerifier {
    fn signature_length() -> usize;
    fn verify(json: &[u8], signature: &[u8], key: &[u8]) -> bool;
}

#[derive(Debug)]
pub struct DecodedToken<C, V>
where
    C: Expiring + DeserializeOwned,
    V: TokenSignatureVerifier,
{
    pub json: Vec<u8>,
    pub signature: Vec<u8>,
    pub claims: C,
    phantom: PhantomData<V>,
}

impl<C, V> DecodedToken<C, V>
where
    C: Expiring + DeserializeOwned,
    V: TokenSignatureVerifier,
{
    pub fn verify(&self, key: &[u8]) -> Result<&C, TokenError> {
        if !V::verify(&self.json, &self.signature, key) {
            return Err(TokenError::TokenInvalid);
        }

        let Ok(now) = SystemTime::now().duration_since(UNIX_EPOCH) else {
            return Err(TokenError::TokenInvalid);
        };

        if self.claims.expiration() <= now.as_secs() {
            return Err(TokenError::TokenExpired);
        }

        Ok(&self.claims)
    }
}

pub trait Token {
    type Claims: Expiring + DeserializeOwned;
    type Verifier: TokenSignatureVerifier;

    fn decode(token: &str) -> Result<DecodedToken<Self::Claims, Self::Verifier>, TokenError> {
        const MAX_TOKEN_LENGTH: usize = 8192;

        if token.len() > MAX_TOKEN_LENGTH {
            return Err(TokenError::TokenInvalid);
        }

        let decoded_token = b64_urlsafe
            .decode(token)
            .map_err(|_| TokenError::TokenInvalid)?;

        if decoded_token.len() <= Self::Verifier::signature_length() {
            return Err(TokenError::TokenInvalid);
        }

        let json_len = decoded_token.len() - Self::Verifier::signature_length();
        let json = &decoded_token[..json_len];

        let signature = Vec::from(&decoded_token[json_len..]);
        let claims: Self::Claims =
            serde_json::from_slice(json).map_err(|_| TokenError::TokenInvalid)?;

        Ok(DecodedToken {
            json: Vec::from(json),
            signature,
            claims,
            phantom: PhantomData,
        })
    }
}

#[derive(Debug)]
pub struct HmacSha256Verifier {}

impl TokenSignatureVerifier for HmacSha256Verifier {
    fn signature_length() -> usize {
        32
    }

    fn verify(json: &[u8], signature: &[u8], key: &[u8]) -> bool {
        let Ok(mut mac) = HmacSha256::new_from_slice(key) else {
            return false;
        };

        mac.update(json);

        // verify_slice compares in constant time
        mac.verify_slice(signature).is_ok()
    }
}
