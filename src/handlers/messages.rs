use axum::extract::{Path, State};
use axum::Json;
use uuid::Uuid;

use crate::middleware::{ApiResponse, ApiResult};
use crate::models::{Message, NewMessage};
use crate::server::AppState;

/// GET /api/messages - every message, newest first
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Message>> {
    Ok(ApiResponse::success(state.store.messages().await))
}

/// GET /api/contacts/:id/messages
pub async fn list_for_contact(State(state): State<AppState>, Path(contact_id): Path<Uuid>) -> ApiResult<Vec<Message>> {
    Ok(ApiResponse::success(state.store.messages_for_contact(contact_id).await?))
}

/// POST /api/messages - send a message or email to a contact
///
/// Emails need a subject and a contact with an email address on file.
pub async fn create(State(state): State<AppState>, Json(new_message): Json<NewMessage>) -> ApiResult<Message> {
    let message = state.store.create_message(new_message).await?;
    tracing::info!("{:?} {:?} logged for contact {}", message.direction, message.kind, message.contact_id);
    Ok(ApiResponse::created(message))
}
