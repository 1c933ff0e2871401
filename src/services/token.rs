//! Bearer token service
//!
//! Issues and decodes HS256-signed bearer tokens. Tokens carry the user's
//! email and row id and expire 7 days after issuance. Decoding collapses
//! every failure cause (bad signature, expiry, garbage input) into the same
//! `None` so callers cannot distinguish them.

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Default token lifetime.
const DEFAULT_TOKEN_EXPIRY_DAYS: i64 = 7;

/// Claims carried by a bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Holder's email
    pub email: String,
    /// Holder's user id
    pub user_id: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
}

/// Token issuance and validation with a symmetric secret.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry: Duration,
}

impl TokenService {
    /// Create a token service with the default 7-day expiry.
    pub fn new(secret: &str) -> Self {
        Self::with_expiry_days(secret, DEFAULT_TOKEN_EXPIRY_DAYS)
    }

    /// Create a token service with a custom expiry, in days.
    pub fn with_expiry_days(secret: &str, days: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expiry: Duration::days(days),
        }
    }

    /// Issue a signed token for the given user.
    pub fn issue_token(&self, email: &str, user_id: i64) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            email: email.to_string(),
            user_id,
            exp: (now + self.expiry).timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .context("Failed to sign bearer token")
    }

    /// Decode and validate a token.
    ///
    /// Returns `None` when the signature does not check out or the token has
    /// expired; the two causes are deliberately not distinguished.
    pub fn decode_token(&self, token: &str) -> Option<Claims> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .ok()
    }
}
