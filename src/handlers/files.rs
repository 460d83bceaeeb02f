use axum::extract::{Path, State};
use axum::Json;
use uuid::Uuid;

use crate::middleware::{ApiResponse, ApiResult};
use crate::models::{JobFile, NewFile};
use crate::server::AppState;

/// GET /api/jobs/:id/files - files attached to a job, newest first
pub async fn list_for_job(State(state): State<AppState>, Path(job_id): Path<Uuid>) -> ApiResult<Vec<JobFile>> {
    let files = state.store.files_for_job(job_id).await?;
    Ok(ApiResponse::success(files))
}

/// POST /api/files - record an uploaded file against a job
pub async fn create(State(state): State<AppState>, Json(new_file): Json<NewFile>) -> ApiResult<JobFile> {
    let file = state.store.create_file(new_file).await?;
    tracing::info!("file {} attached to job {}", file.id, file.job_id);
    Ok(ApiResponse::created(file))
}

/// DELETE /api/files/:id
pub async fn delete(State(state): State<AppState>, Path(file_id): Path<Uuid>) -> ApiResult<JobFile> {
    let file = state.store.delete_file(file_id).await?;
    tracing::info!("file {} removed from job {}", file.id, file.job_id);
    Ok(ApiResponse::success(file))
}
