//! JWT access tokens (HS256)

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Secrets shorter than this are refused at startup
pub const MIN_SECRET_LEN: usize = 32;

#[derive(Debug, Error, PartialEq)]
pub enum TokenError {
    #[error("invalid key size: must be at least {MIN_SECRET_LEN} characters")]
    SecretTooShort,

    #[error("token has expired")]
    Expired,

    #[error("token is invalid")]
    Invalid,
}

/// JWT claims carried by every access token
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Username of the authenticated principal
    pub sub: String,
    /// Expiration time (UTC timestamp, seconds)
    pub exp: usize,
    /// Issued at (UTC timestamp, seconds)
    pub iat: usize,
}

/// Creates and verifies access tokens with a shared HMAC secret
#[derive(Debug)]
pub struct TokenMaker {
    secret: String,
}

impl TokenMaker {
    pub fn new(secret: impl Into<String>) -> Result<Self, TokenError> {
        let secret = secret.into();
        if secret.len() < MIN_SECRET_LEN {
            return Err(TokenError::SecretTooShort);
        }
        Ok(Self { secret })
    }

    /// Issue a token for `username`, valid for `duration` from now
    pub fn create_token(&self, username: &str, duration: Duration) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            sub: username.to_string(),
            exp: (now + duration).timestamp() as usize,
            iat: now.timestamp() as usize,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|_| TokenError::Invalid)
    }

    /// Verify a token and return its claims
    pub fn verify_token(&self, token: &str) -> Result<Claims, TokenError> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Invalid,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &str = "0123456789abcdef0123456789abcdef";

    #[test]
    fn test_secret_too_short_rejected() {
        let err = TokenMaker::new("short").unwrap_err();
        assert_eq!(err, TokenError::SecretTooShort);
    }

    #[test]
    fn test_token_round_trip() {
        let maker = TokenMaker::new(TEST_SECRET).unwrap();
        let token = maker.create_token("alice", Duration::minutes(15)).unwrap();

        let claims = maker.verify_token(&token).unwrap();
        assert_eq!(claims.sub, "alice");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_expired_token_rejected() {
        let maker = TokenMaker::new(TEST_SECRET).unwrap();
        // Issued already expired, past the verifier's leeway
        let token = maker.create_token("alice", Duration::minutes(-2)).unwrap();

        let err = maker.verify_token(&token).unwrap_err();
        assert_eq!(err, TokenError::Expired);
    }

    #[test]
    fn test_token_from_other_secret_rejected() {
        let maker = TokenMaker::new(TEST_SECRET).unwrap();
        let other = TokenMaker::new("ffffffffffffffffffffffffffffffff").unwrap();
        let token = other.create_token("alice", Duration::minutes(15)).unwrap();

        let err = maker.verify_token(&token).unwrap_err();
        assert_eq!(err, TokenError::Invalid);
    }

    #[test]
    fn test_tampered_token_rejected() {
        let maker = TokenMaker::new(TEST_SECRET).unwrap();
        let mut token = maker.create_token("alice", Duration::minutes(15)).unwrap();
        token.push('x');

        assert_eq!(maker.verify_token(&token).unwrap_err(), TokenError::Invalid);
    }
}
