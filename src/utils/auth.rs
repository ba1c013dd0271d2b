use anyhow::{bail, Context, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::constants;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub username: String,
    pub exp: i64,
    pub iat: i64,
}

/// HS256 token issuing and verification. Every API caller presents a bearer
/// token; the claims carry the actor recorded on ledger movements.
#[derive(Clone)]
pub struct AuthService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    duration_hours: i64,
}

impl AuthService {
    /// Build from the `JWT_SECRET` environment variable.
    pub fn new() -> Result<Self> {
        let secret = std::env::var("JWT_SECRET")
            .context("Missing environment variable: JWT_SECRET")?;
        Self::from_secret(&secret)
    }

    pub fn from_secret(secret: &str) -> Result<Self> {
        if secret.len() < constants::MIN_JWT_SECRET_LENGTH {
            bail!(
                "JWT_SECRET must be at least {} characters",
                constants::MIN_JWT_SECRET_LENGTH
            );
        }

        let duration_hours = std::env::var("JWT_DURATION_HOURS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(constants::DEFAULT_JWT_DURATION_HOURS);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            duration_hours,
        })
    }

    pub fn generate_token(&self, user_id: &str, username: &str) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            username: username.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(self.duration_hours)).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding_key)
            .context("Failed to encode JWT token")
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        let data = decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .context("Invalid or expired token")?;
        Ok(data.claims)
    }
}
