use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config;

/// Longest lifetime a portal link can be issued with (ten years)
pub const MAX_EXPIRY_HOURS: u64 = 24 * 365 * 10;

/// Claims carried by a portal link token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortalClaims {
    pub contact_id: Uuid,
    pub job_id: Uuid,
    pub exp: i64,
    pub iat: i64,
}

impl PortalClaims {
    /// Expiry is clamped to [`MAX_EXPIRY_HOURS`]
    pub fn new(contact_id: Uuid, job_id: Uuid, expiry_hours: u64) -> Self {
        let now = Utc::now();
        let hours = expiry_hours.min(MAX_EXPIRY_HOURS) as i64;
        let exp = (now + Duration::hours(hours)).timestamp();

        Self {
            contact_id,
            job_id,
            exp,
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TokenError {
    #[error("portal token secret is not configured")]
    MissingSecret,

    #[error("portal token has expired")]
    Expired,

    #[error("invalid portal token: {0}")]
    Invalid(String),

    #[error("could not sign portal token: {0}")]
    Signing(String),
}

pub fn issue_portal_token(claims: &PortalClaims, secret: &str) -> Result<String, TokenError> {
    if secret.is_empty() {
        return Err(TokenError::MissingSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), claims, &encoding_key).map_err(|e| TokenError::Signing(e.to_string()))
}

pub fn verify_portal_token(token: &str, secret: &str) -> Result<PortalClaims, TokenError> {
    if secret.is_empty() {
        return Err(TokenError::MissingSecret);
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let mut validation = Validation::default();
    validation.leeway = 0;

    decode::<PortalClaims>(token, &decoding_key, &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Invalid(e.to_string()),
        })
}

/// Mint a token with the configured secret and expiry
pub fn issue_configured_token(contact_id: Uuid, job_id: Uuid) -> Result<String, TokenError> {
    let security = &config::config().security;
    let claims = PortalClaims::new(contact_id, job_id, security.portal_token_expiry_hours);
    issue_portal_token(&claims, &security.portal_token_secret)
}
