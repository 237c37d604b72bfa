use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use sched_core::detect_conflicts;
use sched_core::scoring::{
    breakdown_from_conflicts, COVERAGE_WEIGHT, CRITICAL_PENALTY, ERROR_PENALTY, FAIRNESS_WEIGHT,
    WARNING_PENALTY,
};
use types::{Conflict, GeneratedShift, OptimizationConfig};

#[derive(Deserialize, ToSchema)]
pub struct ExplainIn {
    pub config: OptimizationConfig,
    pub shifts: Vec<GeneratedShift>,
}

#[derive(Serialize, ToSchema)]
pub struct ExplainOut {
    pub score: f64,
    pub fairness: f64,
    pub coverage: f64,
    pub weights: Weights,
    pub counts: Counts,
    pub conflicts: Vec<Conflict>,
}

#[derive(Serialize, ToSchema)]
pub struct Weights {
    pub critical: f64,
    pub error: f64,
    pub warning: f64,
    pub fairness: f64,
    pub coverage: f64,
}

#[derive(Serialize, ToSchema)]
pub struct Counts {
    pub critical: usize,
    pub error: usize,
    pub warning: usize,
    pub info: usize,
}

#[utoipa::path(
    post,
    path = "/v1/explain",
    request_body = ExplainIn,
    responses(
    (status = 200, description = "Conflicts and score breakdown for the given shifts", body = ExplainOut)
    )
)]
pub async fn explain(Json(input): Json<ExplainIn>) -> Json<ExplainOut> {
    let conflicts = detect_conflicts(&input.config, &input.shifts);
    let b = breakdown_from_conflicts(&input.config, &input.shifts, &conflicts);
    Json(ExplainOut {
        score: b.total,
        fairness: b.fairness,
        coverage: b.coverage,
        weights: Weights {
            critical: CRITICAL_PENALTY,
            error: ERROR_PENALTY,
            warning: WARNING_PENALTY,
            fairness: FAIRNESS_WEIGHT,
            coverage: COVERAGE_WEIGHT,
        },
        counts: Counts {
            critical: b.critical,
            error: b.errors,
            warning: b.warnings,
            info: b.infos,
        },
        conflicts,
    })
}
