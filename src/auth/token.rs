//! Bearer token issue and validation (JWT, HS256).

use crate::error::{AppError, AppResult};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // username
    pub exp: i64,
    pub iat: i64,
}

/// Issues and validates signed, time-bound bearer tokens. Stateless: validity
/// is purely a function of signature and expiry at check time.
#[derive(Clone)]
pub struct TokenService {
    secret: String,
    ttl_hours: i64,
}

impl TokenService {
    pub fn new(secret: String, ttl_hours: i64) -> Self {
        Self { secret, ttl_hours }
    }

    /// Issue a token for the given subject, valid from now for the
    /// configured window. Fails only if encoding fails, which indicates a
    /// broken signing setup rather than a runtime condition.
    pub fn issue(&self, subject: &str) -> AppResult<String> {
        let now = Utc::now();
        let exp = (now + Duration::hours(self.ttl_hours)).timestamp();
        let claims = Claims {
            sub: subject.to_string(),
            exp,
            iat: now.timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AppError::Jwt(e.to_string()))?;
        Ok(token)
    }

    /// True iff the token's signature verifies and it has not expired.
    /// Total over all string inputs; never panics.
    pub fn validate(&self, token: &str) -> bool {
        self.decode(token).is_ok()
    }

    /// Decode and verify a token, returning its claims.
    pub fn decode(&self, token: &str) -> AppResult<Claims> {
        let mut validation = Validation::default();
        validation.validate_exp = true;
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|e| AppError::Jwt(e.to_string()))?;
        Ok(data.claims)
    }
}
