use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::constants::{MESSAGE_INVALID_TOKEN, TOKEN_TTL_DAYS};
use crate::error::AppError;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user id
    pub iat: i64,
    pub exp: i64, // expiry as timestamp
}

/// Signs and checks bearer tokens. Built once at startup from the configured
/// secret and shared read-only between workers.
pub struct Jwt {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl Jwt {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::days(TOKEN_TTL_DAYS),
        }
    }

    pub fn issue(&self, user_id: &str) -> Result<String, AppError> {
        self.issue_at(user_id, Utc::now())
    }

    fn issue_at(&self, user_id: &str, now: DateTime<Utc>) -> Result<String, AppError> {
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AppError::Storage(anyhow::anyhow!("signing token: {}", e)))
    }

    /// Returns the user id carried by a valid, unexpired token.
    pub fn verify(&self, token: &str) -> Result<String, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims.sub)
            .map_err(|e| {
                log::debug!("## Token rejected: {}", e);
                AppError::auth(MESSAGE_INVALID_TOKEN)
            })
    }
}
