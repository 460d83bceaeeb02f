use axum::extract::{Path, State};
use axum::Json;
use uuid::Uuid;

use crate::middleware::{ApiResponse, ApiResult};
use crate::models::{ApproveQuote, Quote, QuoteApproval, QuoteItem, UpdateQuote};
use crate::server::AppState;

/// GET /api/quotes/:id
pub async fn get(State(state): State<AppState>, Path(quote_id): Path<Uuid>) -> ApiResult<Quote> {
    Ok(ApiResponse::success(state.store.quote(quote_id).await?))
}

/// POST /api/quotes/:id - edit a draft quote's title or line items
pub async fn update(
    State(state): State<AppState>,
    Path(quote_id): Path<Uuid>,
    Json(update): Json<UpdateQuote>,
) -> ApiResult<Quote> {
    Ok(ApiResponse::success(state.store.update_quote(quote_id, update).await?))
}

/// GET /api/quotes/:id/items
pub async fn items(State(state): State<AppState>, Path(quote_id): Path<Uuid>) -> ApiResult<Vec<QuoteItem>> {
    Ok(ApiResponse::success(state.store.quote_items(quote_id).await?))
}

/// POST /api/quotes/:id/send - draft → sent
pub async fn send(State(state): State<AppState>, Path(quote_id): Path<Uuid>) -> ApiResult<Quote> {
    let quote = state.store.send_quote(quote_id).await?;
    tracing::info!("quote {} sent", quote.id);
    Ok(ApiResponse::success(quote))
}

/// POST /api/quotes/:id/approve - sent → approved, creating the contract
pub async fn approve(
    State(state): State<AppState>,
    Path(quote_id): Path<Uuid>,
    Json(body): Json<ApproveQuote>,
) -> ApiResult<QuoteApproval> {
    let approval = state.store.approve_quote(quote_id, &body.signer).await?;
    tracing::info!("quote {} approved, contract {} created", quote_id, approval.contract.id);
    Ok(ApiResponse::created(approval))
}
