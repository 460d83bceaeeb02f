use axum::extract::{Path, State};
use uuid::Uuid;

use crate::middleware::{ApiResponse, ApiResult};
use crate::models::Contact;
use crate::server::AppState;

/// GET /api/contacts/:id
pub async fn get(State(state): State<AppState>, Path(contact_id): Path<Uuid>) -> ApiResult<Contact> {
    Ok(ApiResponse::success(state.store.contact(contact_id).await?))
}
