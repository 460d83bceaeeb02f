use axum::extract::{Path, State};

use crate::auth::verify_portal_token;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, PortalVisitor};
use crate::models::Contact;
use crate::portal::{PortalJobSummary, PortalPayload};
use crate::server::AppState;

/// GET /api/portal/verify/:token - verify a portal link and return its payload
///
/// Expected Output:
/// ```json
/// {
///   "success": true,
///   "data": {
///     "contact": {...}, "job": {...}, "files": [...],
///     "invoices": [...], "contract": null, "quote": {...}
///   }
/// }
/// ```
pub async fn verify(State(state): State<AppState>, Path(token): Path<String>) -> ApiResult<PortalPayload> {
    let claims = verify_portal_token(&token, &state.security.portal_token_secret).map_err(|e| {
        tracing::warn!("portal verification failed: {}", e);
        ApiError::from(e)
    })?;

    let payload = state.store.portal_payload(claims.contact_id, claims.job_id).await;
    if payload.contact.is_none() {
        // Signed for a contact that no longer exists
        return Err(ApiError::InvalidPortalToken("Portal link is no longer valid".to_string()));
    }
    Ok(ApiResponse::success(payload))
}

/// GET /api/portal/me - contact behind the bearer portal token
pub async fn me(State(state): State<AppState>, visitor: PortalVisitor) -> ApiResult<Contact> {
    let contact = state
        .store
        .contact(visitor.contact_id)
        .await
        .map_err(|_| ApiError::InvalidPortalToken("Portal link is no longer valid".to_string()))?;
    Ok(ApiResponse::success(contact))
}

/// GET /api/portal/jobs - the visitor's jobs with stage progress
pub async fn jobs(State(state): State<AppState>, visitor: PortalVisitor) -> ApiResult<Vec<PortalJobSummary>> {
    let jobs = state.store.jobs_for_contact(visitor.contact_id).await;
    Ok(ApiResponse::success(jobs.into_iter().map(PortalJobSummary::from).collect()))
}
