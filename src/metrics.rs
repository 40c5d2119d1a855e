use crate::clock::{week_start, HOURS_EPSILON};
use crate::generator::GeneratedSchedule;
use crate::model::{Assignment, Employee, EmployeeId, Shift};
use crate::validate::Violation;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// Comptes agrégés exposés au classifieur d'état externe (seuils et
/// classification hors de ce dépôt).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleMetrics {
    pub coverage_deficits: usize,
    pub pattern_errors: usize,
    pub overtime_violations: usize,
    pub generation_ms: u64,
}

/// Assemble les comptes d'une passe de génération et de sa validation.
pub fn summarize(
    schedule: &GeneratedSchedule,
    violations: &[Violation],
    employees: &[Employee],
    shifts: &[Shift],
    default_weekly_cap: f64,
) -> ScheduleMetrics {
    ScheduleMetrics {
        coverage_deficits: schedule.shortfalls.len(),
        pattern_errors: violations.len(),
        overtime_violations: overtime_violations(
            &schedule.assignments,
            employees,
            shifts,
            default_weekly_cap,
        ),
        generation_ms: schedule.elapsed_ms,
    }
}

/// Nombre de couples (employé, semaine) dont les heures affectées dépassent
/// le plafond effectif.
pub fn overtime_violations(
    assignments: &[Assignment],
    employees: &[Employee],
    shifts: &[Shift],
    default_weekly_cap: f64,
) -> usize {
    let mut tally: BTreeMap<(&EmployeeId, NaiveDate), f64> = BTreeMap::new();
    for assignment in assignments {
        let Some(shift) = shifts.iter().find(|s| s.id == assignment.shift_id) else {
            continue;
        };
        *tally
            .entry((&assignment.employee_id, week_start(assignment.date)))
            .or_insert(0.0) += shift.duration_hours;
    }

    tally
        .iter()
        .filter(|((employee_id, _), hours)| {
            employees
                .iter()
                .find(|e| &&e.id == employee_id)
                .is_some_and(|e| **hours > e.weekly_cap(default_weekly_cap) + HOURS_EPSILON)
        })
        .count()
}
