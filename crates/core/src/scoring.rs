use crate::calendar::date_range;
use crate::conflicts::detect_conflicts;
use serde::Serialize;
use std::collections::HashMap;
use types::{Conflict, EmployeeId, GeneratedShift, OptimizationConfig, Severity};

pub const CRITICAL_PENALTY: f64 = 20.0;
pub const ERROR_PENALTY: f64 = 10.0;
pub const WARNING_PENALTY: f64 = 5.0;
pub const FAIRNESS_WEIGHT: f64 = 0.3;
pub const COVERAGE_WEIGHT: f64 = 0.2;

#[derive(Clone, Debug, Default, Serialize, PartialEq)]
pub struct ScoreBreakdown {
    pub critical: usize,
    pub errors: usize,
    pub warnings: usize,
    pub infos: usize,
    pub fairness: f64,
    pub coverage: f64,
    pub total: f64,
}

/// Score in `[0, 100]`; higher is better.
pub fn calculate_score(cfg: &OptimizationConfig, solution: &[GeneratedShift]) -> f64 {
    score_breakdown(cfg, solution).total
}

pub fn score_breakdown(cfg: &OptimizationConfig, solution: &[GeneratedShift]) -> ScoreBreakdown {
    let conflicts = detect_conflicts(cfg, solution);
    breakdown_from_conflicts(cfg, solution, &conflicts)
}

/// Same as [`score_breakdown`] for callers that already hold the conflicts
/// of `solution`.
pub fn breakdown_from_conflicts(
    cfg: &OptimizationConfig,
    solution: &[GeneratedShift],
    conflicts: &[Conflict],
) -> ScoreBreakdown {
    let mut b = ScoreBreakdown::default();
    for c in conflicts {
        match c.severity {
            Severity::Critical => b.critical += 1,
            Severity::Error => b.errors += 1,
            Severity::Warning => b.warnings += 1,
            Severity::Info => b.infos += 1,
        }
    }
    b.fairness = fairness_score(solution);
    b.coverage = coverage_score(cfg, solution);

    let raw = 100.0 - CRITICAL_PENALTY * b.critical as f64 - ERROR_PENALTY * b.errors as f64
        - WARNING_PENALTY * b.warnings as f64
        + FAIRNESS_WEIGHT * b.fairness
        + COVERAGE_WEIGHT * b.coverage;
    b.total = raw.clamp(0.0, 100.0);
    b
}

/// `100 - 10σ` over per-employee shift counts, floored at 0. Employees
/// without shifts do not take part; an empty solution scores 0.
pub fn fairness_score(solution: &[GeneratedShift]) -> f64 {
    let mut counts: HashMap<&EmployeeId, usize> = HashMap::new();
    for s in solution {
        *counts.entry(&s.employee_id).or_default() += 1;
    }
    if counts.is_empty() {
        return 0.0;
    }

    let n = counts.len() as f64;
    let mean = counts.values().map(|&c| c as f64).sum::<f64>() / n;
    let variance = counts
        .values()
        .map(|&c| (c as f64 - mean).powi(2))
        .sum::<f64>()
        / n;

    (100.0 - variance.sqrt() * 10.0).max(0.0)
}

/// Assigned shifts as a percentage of `days × shift types × staff`.
/// Not capped at 100; zero when nothing is required.
pub fn coverage_score(cfg: &OptimizationConfig, solution: &[GeneratedShift]) -> f64 {
    let required = date_range(cfg.start_date, cfg.end_date).len()
        * cfg.shift_types.len()
        * cfg.required_staff() as usize;
    if required == 0 {
        return 0.0;
    }
    solution.len() as f64 / required as f64 * 100.0
}
