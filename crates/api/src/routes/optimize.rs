use crate::error::ApiError;
use crate::state::AppState;
use axum::{extract::State, Json};
use chrono::NaiveDate;
use sched_core::calendar::week_of;
use sched_core::{validate, validate_params, ValidationError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::info;
use types::{
    Employee, EmployeeId, GeneratedShift, OptimizationConfig, OptimizeEnvelope, OptimizeParams,
    ShiftType,
};
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobCreated {
    pub job_id: String,
    pub status: &'static str,
}

/// Everything needed to plan one Monday..Sunday week around `weekOf`.
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WeekRequest {
    pub week_of: NaiveDate,
    pub employees: Vec<Employee>,
    pub shift_types: Vec<ShiftType>,
    #[serde(default)]
    pub time_off_dates: HashMap<EmployeeId, Vec<NaiveDate>>,
    #[serde(default)]
    pub existing_shifts: Vec<GeneratedShift>,
    #[serde(default)]
    pub min_staff_per_shift: Option<u32>,
    #[serde(default)]
    pub max_staff_per_shift: Option<u32>,
    #[serde(default)]
    pub params: OptimizeParams,
}

impl WeekRequest {
    pub fn into_envelope(self) -> OptimizeEnvelope {
        let (start_date, end_date) = week_of(self.week_of);
        OptimizeEnvelope {
            config: OptimizationConfig {
                employees: self.employees,
                shift_types: self.shift_types,
                start_date,
                end_date,
                time_off_dates: self.time_off_dates,
                existing_shifts: self.existing_shifts,
                min_staff_per_shift: self.min_staff_per_shift.unwrap_or(1),
                max_staff_per_shift: self.max_staff_per_shift,
            },
            params: self.params,
        }
    }
}

fn rejected(e: ValidationError) -> ApiError {
    ApiError::BadRequest(e.into_problems().join("; "))
}

/// Any config is accepted here; only the search parameters are bounded.
#[utoipa::path(
    post,
    path = "/v1/optimize",
    request_body = OptimizeEnvelope,
    responses(
        (status = 200, description = "Optimization job enqueued", body = JobCreated),
        (status = 400, description = "Annealing parameters out of range")
    )
)]
pub async fn optimize(
    State(state): State<AppState>,
    Json(env): Json<OptimizeEnvelope>,
) -> Result<Json<JobCreated>, ApiError> {
    validate_params(&env.params.annealing).map_err(rejected)?;
    let id = state.jobs.enqueue(env);
    info!(job = %id.0, "optimization queued");
    Ok(Json(JobCreated {
        job_id: id.0,
        status: "queued",
    }))
}

#[utoipa::path(
    post,
    path = "/v1/optimize/week",
    request_body = WeekRequest,
    responses(
        (status = 200, description = "Week planning job enqueued", body = JobCreated),
        (status = 400, description = "Roster, catalog or annealing parameters are unusable")
    )
)]
pub async fn optimize_week(
    State(state): State<AppState>,
    Json(req): Json<WeekRequest>,
) -> Result<Json<JobCreated>, ApiError> {
    let env = req.into_envelope();
    validate(&env.config).map_err(rejected)?;
    validate_params(&env.params.annealing).map_err(rejected)?;
    let (from, to) = (env.config.start_date, env.config.end_date);
    let id = state.jobs.enqueue(env);
    info!(job = %id.0, %from, %to, "week planning queued");
    Ok(Json(JobCreated {
        job_id: id.0,
        status: "queued",
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn week_request_expands_to_monday_through_sunday() {
        let req: WeekRequest = serde_json::from_value(serde_json::json!({
            "weekOf": "2024-01-03",
            "employees": [{"id": "e1", "maxWeeklyHours": 40.0, "minRestHours": 11.0}],
            "shiftTypes": [{
                "id": "1", "name": "1", "startTime": "09:00", "endTime": "18:00",
                "durationHours": 9.0
            }],
            "params": {"seed": 3}
        }))
        .unwrap();
        let env = req.into_envelope();
        assert_eq!(env.config.start_date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(env.config.end_date, NaiveDate::from_ymd_opt(2024, 1, 7).unwrap());
        assert_eq!(env.config.min_staff_per_shift, 1);
        assert_eq!(env.params.seed, Some(3));
    }
}
