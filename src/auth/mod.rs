pub mod password;
pub mod policy;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub use password::PasswordHasher;
pub use policy::{authorize, Access};

/// Errors raised while authenticating a caller
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Authorization header is missing")]
    MissingHeader,

    #[error("Authorization header is malformed")]
    MalformedHeader,

    #[error("Token has expired")]
    Expired,

    #[error("Invalid token: {0}")]
    Invalid(String),

    #[error("Invalid user ID format in token claims")]
    InvalidSubject,

    #[error("Failed to sign token: {0}")]
    Signing(String),

    #[error("Failed to hash password: {0}")]
    Hashing(String),
}

/// Claims carried by every issued token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub id: i64,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(user_id: i64, email: impl Into<String>, issued_at: DateTime<Utc>, expires_at: DateTime<Utc>) -> Self {
        Self {
            id: user_id,
            email: email.into(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        }
    }
}

/// Claims as read back from a token, before the subject is checked.
#[derive(Debug, Deserialize)]
struct UncheckedClaims {
    id: Value,
    exp: i64,
}

/// Issues and verifies HMAC-signed bearer tokens. One secret serves both directions.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    has_secret: bool,
    ttl_hours: i64,
}

impl TokenService {
    pub const HMAC_ALGORITHMS: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

    pub fn new(secret: &str, ttl_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            has_secret: !secret.is_empty(),
            ttl_hours,
        }
    }

    pub fn issue(&self, user_id: i64, email: &str) -> Result<String, AuthError> {
        self.issue_at(user_id, email, Utc::now())
    }

    pub fn issue_at(&self, user_id: i64, email: &str, now: DateTime<Utc>) -> Result<String, AuthError> {
        if !self.has_secret {
            return Err(AuthError::Signing("signing secret is not configured".to_string()));
        }

        let expires_at = Duration::try_hours(self.ttl_hours)
            .filter(|ttl| *ttl > Duration::zero())
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or_else(|| AuthError::Signing(format!("token lifetime of {} hours is out of range", self.ttl_hours)))?;

        let claims = Claims::new(user_id, email, now, expires_at);
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Signing(e.to_string()))
    }

    /// Verify a token and return the subject user id.
    pub fn verify(&self, token: &str) -> Result<i64, AuthError> {
        self.verify_at(token, Utc::now())
    }

    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<i64, AuthError> {
        let data = decode::<UncheckedClaims>(token, &self.decoding_key, &Self::validation())
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidAlgorithm => AuthError::Invalid("unexpected signing method".to_string()),
                _ => AuthError::Invalid(e.to_string()),
            })?;

        // Expiry is checked here against the supplied clock, not by the decoder
        if now.timestamp() >= data.claims.exp {
            return Err(AuthError::Expired);
        }

        data.claims
            .id
            .as_i64()
            .filter(|id| *id > 0)
            .ok_or(AuthError::InvalidSubject)
    }

    fn validation() -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = Self::HMAC_ALGORITHMS.to_vec();
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp"]);
        validation
    }
}

/// Pull the token out of an `Authorization: <scheme> <token>` header value.
/// The scheme itself is not checked.
pub fn bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    let header = header.ok_or(AuthError::MissingHeader)?;
    header
        .split_whitespace()
        .nth(1)
        .ok_or(AuthError::MalformedHeader)
}
