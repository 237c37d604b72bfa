use crate::calendar::{parse_wall_clock, week_of};
use chrono::NaiveDate;
use types::{
    Conflict, ConflictKind, EmployeeId, GeneratedShift, OptimizationConfig, Severity, ShiftRef,
};

/// Every rule violation in `solution`.
///
/// Each shift is checked on its own, so a pair of clashing shifts yields one
/// conflict per shift involved.
pub fn detect_conflicts(cfg: &OptimizationConfig, solution: &[GeneratedShift]) -> Vec<Conflict> {
    let mut conflicts = Vec::new();

    for (i, shift) in solution.iter().enumerate() {
        let at = || ShiftRef {
            index: i,
            employee_id: shift.employee_id.clone(),
            shift_type_id: shift.shift_type_id.clone(),
            date: shift.date,
        };

        let same_day = solution
            .iter()
            .enumerate()
            .filter(|&(j, s)| j != i && s.employee_id == shift.employee_id && s.date == shift.date)
            .count();
        if same_day > 0 {
            conflicts.push(Conflict {
                r#type: ConflictKind::DoubleBooking,
                severity: Severity::Critical,
                description: format!(
                    "employee {} has {} shifts on {}",
                    shift.employee_id,
                    same_day + 1,
                    shift.date
                ),
                shift: Some(at()),
            });
        }

        if cfg.is_on_time_off(&shift.employee_id, shift.date) {
            conflicts.push(Conflict {
                r#type: ConflictKind::ConflictsWithTimeOff,
                severity: Severity::Critical,
                description: format!(
                    "employee {} is on time off on {}",
                    shift.employee_id, shift.date
                ),
                shift: Some(at()),
            });
        }

        let Some(employee) = cfg.employee(&shift.employee_id) else {
            continue;
        };

        if let Some(prev) = previous_shift(solution, &shift.employee_id, shift.date) {
            if let Some(rest) = rest_hours(prev, shift) {
                if rest < employee.min_rest_hours {
                    conflicts.push(Conflict {
                        r#type: ConflictKind::InsufficientRest,
                        severity: Severity::Error,
                        description: format!(
                            "insufficient rest for employee {}: {:.1} hours (minimum {} hours)",
                            shift.employee_id, rest, employee.min_rest_hours
                        ),
                        shift: Some(at()),
                    });
                }
            }
        }

        let weekly = weekly_hours(cfg, solution, &shift.employee_id, shift.date);
        if weekly > employee.max_weekly_hours {
            conflicts.push(Conflict {
                r#type: ConflictKind::ExcessiveHours,
                severity: Severity::Warning,
                description: format!(
                    "weekly hours exceeded for employee {}: {:.1} hours (max {})",
                    shift.employee_id, weekly, employee.max_weekly_hours
                ),
                shift: Some(at()),
            });
        }
    }

    conflicts
}

/// Latest shift of `employee` on a day strictly before `date`. Several
/// shifts on that day resolve to the last one in solution order.
fn previous_shift<'a>(
    solution: &'a [GeneratedShift],
    employee: &EmployeeId,
    date: NaiveDate,
) -> Option<&'a GeneratedShift> {
    solution
        .iter()
        .filter(|s| &s.employee_id == employee && s.date < date)
        .max_by_key(|s| s.date)
}

/// Whole hours between the end of `prev` and the start of `next`, truncated
/// toward zero.
fn rest_hours(prev: &GeneratedShift, next: &GeneratedShift) -> Option<f64> {
    let prev_end = prev.date.and_time(parse_wall_clock(&prev.end_time)?);
    let next_start = next.date.and_time(parse_wall_clock(&next.start_time)?);
    Some((next_start - prev_end).num_hours() as f64)
}

/// Hours `employee` works in the Monday-start week containing `date`.
/// Shifts whose type is not in the catalog count as zero.
pub fn weekly_hours(
    cfg: &OptimizationConfig,
    solution: &[GeneratedShift],
    employee: &EmployeeId,
    date: NaiveDate,
) -> f64 {
    let (from, to) = week_of(date);
    solution
        .iter()
        .filter(|s| &s.employee_id == employee && s.date >= from && s.date <= to)
        .map(|s| cfg.shift_type(&s.shift_type_id).map_or(0.0, |t| t.duration_hours))
        .sum()
}
