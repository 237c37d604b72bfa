pub mod anneal;
pub mod construct;
pub mod neighbor;

use async_trait::async_trait;
use rand::Rng;
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sched_core::calendar::date_range;
use sched_core::scoring::{breakdown_from_conflicts, fairness_score};
use sched_core::{detect_conflicts, OptimizationResult, OptimizeEnvelope, Optimizer, Statistics};
use tracing::info;
use types::{AnnealingParams, GeneratedShift, OptimizationConfig};

pub use anneal::{anneal, Annealed};
pub use construct::build_initial;
pub use neighbor::neighbor;

#[derive(Clone, Copy, Debug, Default)]
pub struct HeurOptimizer;

impl HeurOptimizer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Optimizer for HeurOptimizer {
    async fn optimize(&self, env: OptimizeEnvelope) -> anyhow::Result<OptimizationResult> {
        let result = tokio::task::spawn_blocking(move || {
            let mut rng = match env.params.seed {
                Some(seed) => ChaCha8Rng::seed_from_u64(seed),
                None => ChaCha8Rng::from_entropy(),
            };
            optimize_with(&env.config, &env.params.annealing, &mut rng)
        })
        .await?;
        Ok(result)
    }
}

/// Greedy construction, annealing, then a final conflict and score pass.
pub fn optimize_with<R: Rng + ?Sized>(
    cfg: &OptimizationConfig,
    params: &AnnealingParams,
    rng: &mut R,
) -> OptimizationResult {
    info!(
        employees = cfg.employees.len(),
        shift_types = cfg.shift_types.len(),
        days = date_range(cfg.start_date, cfg.end_date).len(),
        existing = cfg.existing_shifts.len(),
        "starting shift optimization"
    );

    let initial = build_initial(cfg);
    info!(shifts = initial.len(), "initial solution built");

    let annealed = anneal(cfg, initial, params, rng);
    let solution = annealed.best;

    let conflicts = detect_conflicts(cfg, &solution);
    let breakdown = breakdown_from_conflicts(cfg, &solution, &conflicts);
    let success = breakdown.critical == 0;
    info!(
        score = breakdown.total,
        conflicts = conflicts.len(),
        critical = breakdown.critical,
        success,
        "shift optimization finished"
    );

    OptimizationResult {
        success,
        score: breakdown.total,
        statistics: statistics(cfg, &solution),
        shifts: solution,
        conflicts,
    }
}

pub fn statistics(cfg: &OptimizationConfig, solution: &[GeneratedShift]) -> Statistics {
    let employee_utilization = if cfg.employees.is_empty() {
        0.0
    } else {
        solution.len() as f64 / cfg.employees.len() as f64 * 100.0
    };
    Statistics {
        total_shifts: solution.len(),
        employee_utilization,
        fairness_score: fairness_score(solution),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use types::{ConflictKind, Employee, OptimizeParams, Severity, ShiftType};

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn employee(id: &str) -> Employee {
        Employee {
            id: id.into(),
            max_weekly_hours: 40.0,
            min_rest_hours: 11.0,
            skills: vec![],
            preferences: None,
        }
    }

    fn day_shift() -> ShiftType {
        ShiftType {
            id: "1".into(),
            name: "1".into(),
            start_time: "09:00".into(),
            end_time: "18:00".into(),
            duration_hours: 9.0,
            required_skills: vec![],
        }
    }

    fn cfg(employees: Vec<Employee>, days: i64) -> OptimizationConfig {
        OptimizationConfig {
            employees,
            shift_types: vec![day_shift()],
            start_date: monday(),
            end_date: monday() + chrono::Duration::days(days - 1),
            time_off_dates: Default::default(),
            existing_shifts: vec![],
            min_staff_per_shift: 1,
            max_staff_per_shift: None,
        }
    }

    #[test]
    fn two_employees_one_monday() {
        let cfg = cfg(vec![employee("e1"), employee("e2")], 1);
        let mut rng = ChaCha8Rng::seed_from_u64(17);
        let res = optimize_with(&cfg, &AnnealingParams::default(), &mut rng);

        assert!(res.success);
        assert_eq!(res.shifts.len(), 1);
        assert_eq!(res.shifts[0].date, monday());
        assert!(res.conflicts.iter().all(|c| c.severity < Severity::Error));
        assert_eq!(res.score, 100.0);
        assert_eq!(res.statistics.total_shifts, 1);
        assert_eq!(res.statistics.employee_utilization, 50.0);
        assert_eq!(res.statistics.fairness_score, 100.0);
    }

    #[test]
    fn only_employee_on_time_off() {
        let mut cfg = cfg(vec![employee("e1")], 1);
        cfg.time_off_dates.insert("e1".into(), vec![monday()]);
        let mut rng = ChaCha8Rng::seed_from_u64(17);
        let res = optimize_with(&cfg, &AnnealingParams::default(), &mut rng);

        assert!(res.shifts.is_empty());
        assert!(!res
            .conflicts
            .iter()
            .any(|c| c.r#type == ConflictKind::ConflictsWithTimeOff));
        assert!(res.success);
        assert_eq!(res.statistics.fairness_score, 0.0);
    }

    #[test]
    fn empty_roster_yields_zeroes() {
        let cfg = cfg(vec![], 7);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let res = optimize_with(&cfg, &AnnealingParams::default(), &mut rng);
        assert!(res.shifts.is_empty());
        assert_eq!(res.statistics.employee_utilization, 0.0);
        assert_eq!(res.statistics.fairness_score, 0.0);
        assert!((0.0..=100.0).contains(&res.score));
    }

    #[test]
    fn week_for_a_small_team_stays_in_range() {
        let mut cfg = cfg(
            vec![employee("e1"), employee("e2"), employee("e3")],
            7,
        );
        cfg.shift_types.push(ShiftType {
            id: "2".into(),
            name: "2".into(),
            start_time: "14:00".into(),
            end_time: "22:00".into(),
            duration_hours: 8.0,
            required_skills: vec![],
        });
        cfg.time_off_dates.insert("e2".into(), vec![monday()]);
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let res = optimize_with(&cfg, &AnnealingParams::default(), &mut rng);

        assert!((0.0..=100.0).contains(&res.score));
        assert_eq!(res.statistics.total_shifts, res.shifts.len());
        let critical = res
            .conflicts
            .iter()
            .filter(|c| c.severity == Severity::Critical)
            .count();
        assert_eq!(res.success, critical == 0);
    }

    #[tokio::test]
    async fn seeded_runs_are_reproducible() {
        let env = OptimizeEnvelope {
            config: cfg(vec![employee("e1"), employee("e2"), employee("e3")], 7),
            params: OptimizeParams {
                seed: Some(7),
                annealing: AnnealingParams {
                    max_iterations: 300,
                    ..AnnealingParams::default()
                },
            },
        };
        let opt = HeurOptimizer::new();
        let a = opt.optimize(env.clone()).await.unwrap();
        let b = opt.optimize(env).await.unwrap();
        assert_eq!(a.shifts, b.shifts);
        assert_eq!(a.score, b.score);
        assert_eq!(a.conflicts, b.conflicts);
    }

    #[tokio::test]
    async fn unseeded_run_completes() {
        let env = OptimizeEnvelope {
            config: cfg(vec![employee("e1"), employee("e2")], 3),
            params: OptimizeParams::default(),
        };
        let res = HeurOptimizer::new().optimize(env).await.unwrap();
        assert!((0.0..=100.0).contains(&res.score));
    }
}
