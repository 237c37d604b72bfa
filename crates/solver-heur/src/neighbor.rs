use rand::seq::SliceRandom;
use rand::Rng;
use types::{Employee, GeneratedShift, OptimizationConfig, Solution};

const SWAP_PROBABILITY: f64 = 0.5;

/// A copy of `solution` with one random move applied: either two shifts
/// trade employees, or one shift goes to a random employee who is not on
/// time off that day. Double bookings and skills are left to the scorer.
pub fn neighbor<R: Rng + ?Sized>(
    cfg: &OptimizationConfig,
    solution: &[GeneratedShift],
    rng: &mut R,
) -> Solution {
    let mut next = solution.to_vec();

    if rng.gen::<f64>() < SWAP_PROBABILITY && next.len() >= 2 {
        let i = rng.gen_range(0..next.len());
        let j = rng.gen_range(0..next.len());
        let tmp = next[i].employee_id.clone();
        next[i].employee_id = next[j].employee_id.clone();
        next[j].employee_id = tmp;
    } else if !next.is_empty() {
        let i = rng.gen_range(0..next.len());
        let date = next[i].date;
        let available: Vec<&Employee> = cfg
            .employees
            .iter()
            .filter(|e| !cfg.is_on_time_off(&e.id, date))
            .collect();
        if let Some(e) = available.choose(rng) {
            next[i].employee_id = e.id.clone();
        }
    }

    next
}
