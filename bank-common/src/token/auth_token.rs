use crate::token::{Expiring, HmacSha256Verifier, Token};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum AuthTokenType {
    Access,
    Refresh,
}

/// Claims minted by the auth service. This crate only verifies them outside of tests.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuthTokenClaims {
    #[serde(rename = "uid")]
    pub user_id: Uuid,
    #[serde(rename = "unm")]
    pub username: String,
    #[serde(rename = "adm", default)]
    pub is_admin: bool,
    #[serde(rename = "exp")]
    pub expiration: u64,
    #[serde(rename = "typ")]
    pub token_type: AuthTokenType,
}

#[cfg(any(test, feature = "test-utils"))]
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewAuthTokenClaims<'a> {
    #[serde(rename = "uid")]
    pub user_id: Uuid,
    #[serde(rename = "unm")]
    pub username: &'a str,
    #[serde(rename = "adm")]
    pub is_admin: bool,
    #[serde(rename = "exp")]
    pub expiration: u64,
    #[serde(rename = "typ")]
    pub token_type: AuthTokenType,
}

impl Expiring for AuthTokenClaims {
    fn expiration(&self) -> u64 {
        self.expiration
    }
}

pub struct AuthToken {}

#[cfg(any(test, feature = "test-utils"))]
impl AuthToken {
    /// Stands in for the auth service when tests need a valid token.
    pub fn sign_new(claims: NewAuthTokenClaims, signing_key: &[u8]) -> String {
        use base64::engine::general_purpose::URL_SAFE as b64_urlsafe;
        use base64::Engine;
        use hmac::Mac;

        let mut token_unencoded =
            serde_json::to_vec(&claims).expect("Failed to transform claims into JSON");

        let mut mac = super::HmacSha256::new_from_slice(signing_key)
            .expect("HMAC key should not fail");
        mac.update(&token_unencoded);
        let signature = mac.finalize();
        token_unencoded.extend_from_slice(&signature.into_bytes());

        b64_urlsafe.encode(&token_unencoded)
    }
}

impl Token for AuthToken {
    type Claims = AuthTokenClaims;
    type Verifier = HmacSha256Verifier;
}
