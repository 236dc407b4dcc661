//! Session token codec
//!
//! A token is the base64 form of `authenticated:<issued_at_millis>.<signature>`, where the
//! signature is a hex HMAC-SHA256 over everything before the dot. Anything that decodes to
//! a marker-prefixed text still has to carry a valid signature and be younger than the
//! configured max age.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Utc};
use cinematic_shared::constants::SESSION_MARKER;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Accepted clock difference for tokens issued "in the future".
const MAX_CLOCK_SKEW_MS: i64 = 60_000;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Invalid token format")]
    InvalidTokenFormat,
    #[error("Invalid token signature")]
    InvalidSignature,
    #[error("Token expired")]
    Expired,
    #[error("Invalid session key: {0}")]
    InvalidKey(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionClaims {
    pub issued_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct SessionCodec {
    mac: HmacSha256,
    max_age_ms: i64,
}

impl SessionCodec {
    pub fn new(secret: &[u8], max_age_seconds: i64) -> Result<Self, TokenError> {
        let mac = HmacSha256::new_from_slice(secret)
            .map_err(|e| TokenError::InvalidKey(e.to_string()))?;
        Ok(Self {
            mac,
            max_age_ms: max_age_seconds.saturating_mul(1000),
        })
    }

    /// Codec with a key that only lives as long as this process.
    pub fn with_random_key(max_age_seconds: i64) -> Result<Self, TokenError> {
        let key: [u8; 32] = rand::random();
        Self::new(&key, max_age_seconds)
    }

    pub fn issue(&self) -> String {
        self.issue_at(Utc::now())
    }

    pub fn issue_at(&self, now: DateTime<Utc>) -> String {
        let payload = format!("{}{}", SESSION_MARKER, now.timestamp_millis());
        let signature = self.sign(&payload);
        STANDARD.encode(format!("{}.{}", payload, signature))
    }

    pub fn decode(&self, token: &str) -> Result<SessionClaims, TokenError> {
        self.decode_at(token, Utc::now())
    }

    pub fn decode_at(&self, token: &str, now: DateTime<Utc>) -> Result<SessionClaims, TokenError> {
        let bytes = STANDARD
            .decode(token.trim())
            .map_err(|_| TokenError::InvalidTokenFormat)?;
        let text = String::from_utf8(bytes).map_err(|_| TokenError::InvalidTokenFormat)?;

        let rest = text
            .strip_prefix(SESSION_MARKER)
            .ok_or(TokenError::InvalidTokenFormat)?;
        let (issued, signature) = rest.rsplit_once('.').ok_or(TokenError::InvalidTokenFormat)?;
        let issued_ms: i64 = issued.parse().map_err(|_| TokenError::InvalidTokenFormat)?;
        let signature = hex::decode(signature).map_err(|_| TokenError::InvalidTokenFormat)?;

        let payload_len = SESSION_MARKER.len() + issued.len();
        let mut mac = self.mac.clone();
        mac.update(text[..payload_len].as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| TokenError::InvalidSignature)?;

        let now_ms = now.timestamp_millis();
        if issued_ms.saturating_sub(now_ms) > MAX_CLOCK_SKEW_MS {
            return Err(TokenError::InvalidTokenFormat);
        }
        if now_ms.saturating_sub(issued_ms) > self.max_age_ms {
            return Err(TokenError::Expired);
        }

        let issued_at =
            DateTime::from_timestamp_millis(issued_ms).ok_or(TokenError::InvalidTokenFormat)?;
        Ok(SessionClaims { issued_at })
    }

    fn sign(&self, payload: &str) -> String {
        let mut mac = self.mac.clone();
        mac.update(payload.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }
}

impl std::fmt::Debug for SessionCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCodec")
            .field("max_age_ms", &self.max_age_ms)
            .finish_non_exhaustive()
    }
}
