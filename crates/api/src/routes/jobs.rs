use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use jobs::JobStatus;
use types::OptimizationResult;

#[utoipa::path(
    get,
    path = "/v1/jobs/{id}",
    params(("id" = String, Path, description = "Job ID")),
    responses(
        (status = 200, description = "Job status", body = JobStatus),
        (status = 404, description = "Unknown job")
    )
)]
pub async fn status(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<JobStatus>, ApiError> {
    state.jobs.get(&id).map(Json).ok_or(ApiError::NotFound(id))
}

#[utoipa::path(
    get,
    path = "/v1/jobs/{id}/result",
    params(("id" = String, Path, description = "Job ID")),
    responses(
        (status = 200, description = "Optimization result", body = OptimizationResult),
        (status = 404, description = "Unknown job"),
        (status = 409, description = "Job still queued or running")
    )
)]
pub async fn result(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<OptimizationResult>, ApiError> {
    match state.jobs.get(&id) {
        Some(JobStatus::Done { result }) => Ok(Json(result)),
        Some(JobStatus::Failed { message }) => Err(ApiError::JobFailed(id, message)),
        Some(_) => Err(ApiError::NotReady(id)),
        None => Err(ApiError::NotFound(id)),
    }
}
