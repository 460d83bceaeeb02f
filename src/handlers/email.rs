use axum::extract::State;
use axum::Json;

use crate::middleware::{ApiResponse, ApiResult};
use crate::models::{TestEmailReceipt, TestEmailRequest};
use crate::server::AppState;

/// POST /api/test-email - record a test email in the outbox
pub async fn test_email(State(state): State<AppState>, Json(request): Json<TestEmailRequest>) -> ApiResult<TestEmailReceipt> {
    let receipt = state.store.record_test_email(&request.to).await?;
    tracing::info!("test email queued for {}", receipt.to);
    Ok(ApiResponse::success(receipt))
}
