//! Token issue and validation.
//!
//! Identity travels as a stateless signed JWT carrying the user's id,
//! name, and email plus an absolute `expiryEpochTime` in epoch
//! milliseconds, set to 24 hours from issue. There is no server-side
//! revocation: a token dies at expiry or when the client discards it.
//! Expiry lives in the custom claim rather than the standard `exp`, so
//! standard-claim validation is disabled and the check is done by hand.

pub mod middleware;

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::models::User;

/// Token lifetime from issue.
const TOKEN_TTL_MS: i64 = 24 * 60 * 60 * 1000;

/// Claims embedded in every issued token.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub id: i64,
    pub user_name: String,
    pub email: String,
    /// Absolute expiry, epoch milliseconds.
    pub expiry_epoch_time: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("token signature is invalid")]
    InvalidSignature,
    #[error("token has expired")]
    Expired,
    #[error("token could not be signed")]
    Signing,
}

/// Issues and validates identity tokens with a process-wide secret.
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenCodec {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Sign a token for `user` expiring 24 hours from now.
    pub fn issue(&self, user: &User) -> Result<String, TokenError> {
        let claims = Claims {
            id: user.id,
            user_name: user.user_name.clone(),
            email: user.email.clone(),
            expiry_epoch_time: Utc::now().timestamp_millis() + TOKEN_TTL_MS,
        };

        encode(&Header::default(), &claims, &self.encoding).map_err(|_| TokenError::Signing)
    }

    /// Verify the signature, then the embedded expiry. Returns the claims
    /// only when both hold.
    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is carried in the custom claim, not `exp`.
        validation.validate_exp = false;
        validation.required_spec_claims = Default::default();

        let data = decode::<Claims>(token, &self.decoding, &validation)
            .map_err(|_| TokenError::InvalidSignature)?;

        if Utc::now().timestamp_millis() >= data.claims.expiry_epoch_time {
            return Err(TokenError::Expired);
        }

        Ok(data.claims)
    }
}
