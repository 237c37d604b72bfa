use crate::neighbor::neighbor;
use rand::Rng;
use sched_core::scoring::calculate_score;
use tracing::debug;
use types::{AnnealingParams, OptimizationConfig, Solution};

/// Outcome of one annealing run.
#[derive(Clone, Debug)]
pub struct Annealed {
    pub best: Solution,
    pub best_score: f64,
    /// Temperature after the last iteration.
    pub temperature: f64,
    pub accepted: u32,
    pub improved: u32,
}

/// Simulated annealing from `initial`. Always runs `max_iterations` steps
/// with geometric cooling and returns the best solution seen.
pub fn anneal<R: Rng + ?Sized>(
    cfg: &OptimizationConfig,
    initial: Solution,
    params: &AnnealingParams,
    rng: &mut R,
) -> Annealed {
    let mut current_score = calculate_score(cfg, &initial);
    let mut current = initial;
    let mut best = current.clone();
    let mut best_score = current_score;
    let mut temperature = params.initial_temperature;
    let mut accepted = 0u32;
    let mut improved = 0u32;

    for _ in 0..params.max_iterations {
        let candidate = neighbor(cfg, &current, rng);
        let candidate_score = calculate_score(cfg, &candidate);
        let delta = candidate_score - current_score;

        if accepts(delta, temperature, rng) {
            current = candidate;
            current_score = candidate_score;
            accepted += 1;

            if current_score > best_score {
                best = current.clone();
                best_score = current_score;
                improved += 1;
            }
        }

        temperature *= params.cooling_rate;
    }

    debug!(
        iterations = params.max_iterations,
        accepted, improved, best_score, temperature, "annealing finished"
    );

    Annealed {
        best,
        best_score,
        temperature,
        accepted,
        improved,
    }
}

/// Metropolis criterion. Improvements pass without drawing; once the
/// temperature is no longer positive only improvements pass.
fn accepts<R: Rng + ?Sized>(delta: f64, temperature: f64, rng: &mut R) -> bool {
    if delta > 0.0 {
        return true;
    }
    if temperature <= 0.0 {
        return false;
    }
    rng.gen::<f64>() < (delta / temperature).exp()
}
