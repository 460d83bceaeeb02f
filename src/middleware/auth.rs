use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
};
use uuid::Uuid;

use crate::auth::{verify_portal_token, PortalClaims};
use crate::error::ApiError;
use crate::server::AppState;

/// Portal visitor extracted from a `Bearer` portal token
#[derive(Clone, Debug, PartialEq)]
pub struct PortalVisitor {
    pub contact_id: Uuid,
    pub job_id: Uuid,
}

impl From<PortalClaims> for PortalVisitor {
    fn from(claims: PortalClaims) -> Self {
        Self {
            contact_id: claims.contact_id,
            job_id: claims.job_id,
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for PortalVisitor {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(&parts.headers).map_err(ApiError::unauthorized)?;
        let claims = verify_portal_token(&token, &state.security.portal_token_secret).map_err(|e| {
            tracing::warn!("portal bearer rejected: {}", e);
            ApiError::from(e)
        })?;
        Ok(claims.into())
    }
}

/// Extract the token from an `Authorization: Bearer` header
fn extract_bearer_token(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
        Some(_) => Err("Empty portal token".to_string()),
        None => Err("Authorization header must use Bearer token format".to_string()),
    }
}
