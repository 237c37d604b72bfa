pub mod calendar;
pub mod conflicts;
pub mod scoring;

use async_trait::async_trait;
use thiserror::Error;

pub use conflicts::detect_conflicts;
pub use scoring::{calculate_score, coverage_score, fairness_score, ScoreBreakdown};
pub use types::{
    AnnealingParams, Conflict, Employee, GeneratedShift, OptimizationConfig, OptimizationResult,
    OptimizeEnvelope, OptimizeParams, Severity, ShiftType, Solution, Statistics,
};

/// Upper bound on `maxIterations` accepted from callers. A run cannot be
/// cancelled once started.
pub const MAX_ITERATIONS: u32 = 100_000;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("invalid input: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

impl ValidationError {
    pub fn problems(&self) -> &[String] {
        match self {
            ValidationError::Invalid(p) => p,
        }
    }

    pub fn into_problems(self) -> Vec<String> {
        match self {
            ValidationError::Invalid(p) => p,
        }
    }
}

fn collected(errors: Vec<String>) -> Result<(), ValidationError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::Invalid(errors))
    }
}

/// Structural checks on a config. The optimizer itself tolerates all of
/// these; this is for callers that want to reject bad input up front.
pub fn validate(cfg: &OptimizationConfig) -> Result<(), ValidationError> {
    let mut errors: Vec<String> = Vec::new();

    if cfg.employees.is_empty() {
        errors.push("employees is empty".into());
    }
    if cfg.shift_types.is_empty() {
        errors.push("shiftTypes is empty".into());
    }
    if cfg.start_date > cfg.end_date {
        errors.push(format!(
            "startDate {} is after endDate {}",
            cfg.start_date, cfg.end_date
        ));
    }

    fn chk_unique<I: ToString>(name: &str, ids: impl Iterator<Item = I>, errors: &mut Vec<String>) {
        use std::collections::HashSet;
        let mut seen = HashSet::new();
        for id in ids {
            let s = id.to_string();
            if !seen.insert(s.clone()) {
                errors.push(format!("duplicate {name} id: {s}"));
            }
        }
    }
    chk_unique("employee", cfg.employees.iter().map(|x| &x.id.0), &mut errors);
    chk_unique("shift type", cfg.shift_types.iter().map(|x| &x.id.0), &mut errors);

    for e in &cfg.employees {
        if e.max_weekly_hours < 0.0 {
            errors.push(format!("employee {} has negative maxWeeklyHours", e.id));
        }
        if e.min_rest_hours < 0.0 {
            errors.push(format!("employee {} has negative minRestHours", e.id));
        }
    }

    for t in &cfg.shift_types {
        for (field, value) in [("startTime", &t.start_time), ("endTime", &t.end_time)] {
            if calendar::parse_wall_clock(value).is_none() {
                errors.push(format!("shift type {} has invalid {field} {value:?}", t.id));
            }
        }
        if !(t.duration_hours > 0.0) {
            errors.push(format!(
                "shift type {} has invalid durationHours {}",
                t.id, t.duration_hours
            ));
        }
    }

    for id in cfg.time_off_dates.keys() {
        if cfg.employee(id).is_none() {
            errors.push(format!("time off references missing employee {id}"));
        }
    }

    if let Some(max) = cfg.max_staff_per_shift {
        if max < cfg.required_staff() {
            errors.push(format!(
                "maxStaffPerShift {max} is below minStaffPerShift {}",
                cfg.required_staff()
            ));
        }
    }

    collected(errors)
}

/// Bounds on caller-supplied annealing parameters.
pub fn validate_params(params: &AnnealingParams) -> Result<(), ValidationError> {
    let mut errors: Vec<String> = Vec::new();

    if params.max_iterations == 0 || params.max_iterations > MAX_ITERATIONS {
        errors.push(format!(
            "maxIterations {} is outside 1..={MAX_ITERATIONS}",
            params.max_iterations
        ));
    }
    if !(params.initial_temperature.is_finite() && params.initial_temperature > 0.0) {
        errors.push(format!(
            "initialTemperature {} must be positive",
            params.initial_temperature
        ));
    }
    if !(params.cooling_rate > 0.0 && params.cooling_rate <= 1.0) {
        errors.push(format!(
            "coolingRate {} is outside (0, 1]",
            params.cooling_rate
        ));
    }

    collected(errors)
}

#[async_trait]
pub trait Optimizer: Send + Sync + 'static {
    async fn optimize(&self, env: OptimizeEnvelope) -> anyhow::Result<OptimizationResult>;
}
