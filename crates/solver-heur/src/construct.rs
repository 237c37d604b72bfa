use chrono::NaiveDate;
use sched_core::calendar::date_range;
use types::{Employee, GeneratedShift, OptimizationConfig, ShiftType, Solution};

const BASE_RANK: f64 = 100.0;
const LOAD_PENALTY: f64 = 2.0;
const SKILL_BONUS: f64 = 20.0;

/// Greedy first plan: walks every (date, shift type) slot in order and
/// fills it with the best-ranked employees still free that day.
pub fn build_initial(cfg: &OptimizationConfig) -> Solution {
    let mut shifts: Solution = Vec::new();
    let staff = cfg.required_staff() as usize;

    for date in date_range(cfg.start_date, cfg.end_date) {
        for shift_type in &cfg.shift_types {
            let available = available_employees(cfg, date, &shifts);
            let ranked = rank_employees(&available, shift_type, &shifts);

            for (employee, score) in ranked.into_iter().take(staff) {
                shifts.push(GeneratedShift {
                    employee_id: employee.id.clone(),
                    shift_type_id: shift_type.id.clone(),
                    date,
                    start_time: shift_type.start_time.clone(),
                    end_time: shift_type.end_time.clone(),
                    score,
                });
            }
        }
    }

    shifts
}

/// Employees not on time off and not yet working on `date`.
fn available_employees<'a>(
    cfg: &'a OptimizationConfig,
    date: NaiveDate,
    shifts: &[GeneratedShift],
) -> Vec<&'a Employee> {
    cfg.employees
        .iter()
        .filter(|e| !cfg.is_on_time_off(&e.id, date))
        .filter(|e| !shifts.iter().any(|s| s.employee_id == e.id && s.date == date))
        .collect()
}

/// Best first. Equal scores keep roster order.
fn rank_employees<'a>(
    employees: &[&'a Employee],
    shift_type: &ShiftType,
    shifts: &[GeneratedShift],
) -> Vec<(&'a Employee, f64)> {
    let mut ranked: Vec<(&Employee, f64)> = employees
        .iter()
        .map(|&e| {
            let load = shifts.iter().filter(|s| s.employee_id == e.id).count();
            let mut score = BASE_RANK - LOAD_PENALTY * load as f64;
            if !shift_type.required_skills.is_empty() {
                let matching = shift_type
                    .required_skills
                    .iter()
                    .filter(|skill| e.skills.contains(skill))
                    .count();
                score += matching as f64 / shift_type.required_skills.len() as f64 * SKILL_BONUS;
            }
            (e, score)
        })
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked
}
