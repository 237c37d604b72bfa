use axum::{http::StatusCode, Json};
use sched_core::validate;
use serde::Serialize;
use types::OptimizationConfig;

#[derive(Serialize, utoipa::ToSchema)]
pub struct ValidationReport {
    pub ok: bool,
    #[serde(default)]
    pub errors: Vec<String>,
}

#[utoipa::path(
    post,
    path = "/v1/validate",
    request_body = OptimizationConfig,
    responses(
    (status = 200, description = "Validation result", body = ValidationReport)
    )
)]
pub async fn validate_handler(
    Json(cfg): Json<OptimizationConfig>,
) -> (StatusCode, Json<ValidationReport>) {
    match validate(&cfg) {
        Ok(()) => (StatusCode::OK, Json(ValidationReport { ok: true, errors: vec![] })),
        Err(e) => (
            StatusCode::OK,
            Json(ValidationReport { ok: false, errors: e.into_problems() }),
        ),
    }
}
