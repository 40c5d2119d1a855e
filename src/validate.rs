use crate::clock::minutes_of;
use crate::model::{
    Assignment, Employee, EmployeeId, PatternToken, Shift, ShiftPattern, ShiftTypeId,
};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::collections::BTreeMap;

/// Seuils de validation.
#[derive(Debug, Clone, Copy)]
pub struct ValidateOptions {
    pub min_rest_hours: u32,
    /// Plafond de jours consécutifs quand aucun motif autorisé n'en fixe un.
    pub fallback_max_consecutive: u32,
}

impl Default for ValidateOptions {
    fn default() -> Self {
        Self {
            min_rest_hours: 8,
            fallback_max_consecutive: 6,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViolationKind {
    ConsecutiveDays { run: u32, limit: u32 },
    ForbiddenPattern { pattern: String },
    InsufficientRest { rest_hours: f64, required_hours: u32 },
    InvalidInput { reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    pub employee: EmployeeId,
    pub date: NaiveDate,
    pub kind: ViolationKind,
}

/// Valide un ensemble d'affectations, employé par employé.
///
/// Pur : aucune E/S, tout est fourni en entrée. Les lignes malformées
/// (quart inconnu, durée non positive, employé inconnu) sont écartées et
/// signalées comme `InvalidInput` au lieu d'interrompre la passe. Les erreurs
/// ne sont pas dédupliquées entre vérifications ; les employés ne se
/// contaminent jamais entre eux.
pub fn validate_assignments(
    assignments: &[Assignment],
    patterns: &[ShiftPattern],
    employees: &[Employee],
    shifts: &[Shift],
    opts: &ValidateOptions,
) -> Vec<Violation> {
    let mut out = Vec::new();

    let mut by_employee: BTreeMap<&EmployeeId, Vec<&Assignment>> = BTreeMap::new();
    for assignment in assignments {
        by_employee
            .entry(&assignment.employee_id)
            .or_default()
            .push(assignment);
    }

    for (employee_id, rows) in by_employee {
        validate_employee(employee_id, &rows, patterns, employees, shifts, opts, &mut out);
    }

    out
}

fn validate_employee(
    employee_id: &EmployeeId,
    rows: &[&Assignment],
    patterns: &[ShiftPattern],
    employees: &[Employee],
    shifts: &[Shift],
    opts: &ValidateOptions,
    out: &mut Vec<Violation>,
) {
    if !employees.iter().any(|e| &e.id == employee_id) {
        out.push(Violation {
            employee: employee_id.clone(),
            date: rows[0].date,
            kind: ViolationKind::InvalidInput {
                reason: format!("unknown employee: {}", employee_id.as_str()),
            },
        });
    }

    // résolution des quarts ; lignes invalides écartées et signalées
    let mut resolved: Vec<(&Assignment, &Shift)> = Vec::new();
    for row in rows {
        match shifts.iter().find(|s| s.id == row.shift_id) {
            Some(shift) if shift.duration_hours > 0.0 => resolved.push((row, shift)),
            Some(shift) => out.push(Violation {
                employee: employee_id.clone(),
                date: row.date,
                kind: ViolationKind::InvalidInput {
                    reason: format!("shift {} has non-positive duration", shift.id.as_str()),
                },
            }),
            None => out.push(Violation {
                employee: employee_id.clone(),
                date: row.date,
                kind: ViolationKind::InvalidInput {
                    reason: format!("unknown shift: {}", row.shift_id.as_str()),
                },
            }),
        }
    }
    resolved.sort_by_key(|(a, s)| (a.date, minutes_of(s.start_time)));

    check_consecutive_days(employee_id, &resolved, patterns, opts, out);
    check_forbidden_patterns(employee_id, &resolved, patterns, out);
    check_rest_periods(employee_id, &resolved, opts, out);
}

/// Plafond de jours consécutifs : le plus long `days_on` des motifs
/// autorisés, sinon le plafond de repli des options.
fn consecutive_limit(patterns: &[ShiftPattern], opts: &ValidateOptions) -> u32 {
    patterns
        .iter()
        .filter(|p| !p.is_forbidden)
        .map(|p| p.days_on)
        .max()
        .unwrap_or(opts.fallback_max_consecutive)
}

fn check_consecutive_days(
    employee_id: &EmployeeId,
    resolved: &[(&Assignment, &Shift)],
    patterns: &[ShiftPattern],
    opts: &ValidateOptions,
    out: &mut Vec<Violation>,
) {
    let limit = consecutive_limit(patterns, opts);

    let mut dates: Vec<NaiveDate> = resolved.iter().map(|(a, _)| a.date).collect();
    dates.dedup();

    // une erreur par série trop longue, datée de son premier jour
    let mut run_start = 0usize;
    for i in 1..=dates.len() {
        let run_broken =
            i == dates.len() || dates[i] != dates[i - 1] + Duration::days(1);
        if !run_broken {
            continue;
        }
        let run = (i - run_start) as u32;
        if run > limit {
            out.push(Violation {
                employee: employee_id.clone(),
                date: dates[run_start],
                kind: ViolationKind::ConsecutiveDays { run, limit },
            });
        }
        run_start = i;
    }
}

fn check_forbidden_patterns(
    employee_id: &EmployeeId,
    resolved: &[(&Assignment, &Shift)],
    patterns: &[ShiftPattern],
    out: &mut Vec<Violation>,
) {
    let Some((first, _)) = resolved.first() else {
        return;
    };
    let Some((last, _)) = resolved.last() else {
        return;
    };

    let worked: BTreeMap<NaiveDate, &ShiftTypeId> = resolved
        .iter()
        .map(|(a, s)| (a.date, &s.shift_type))
        .collect();

    // grille jour par jour : jour travaillé → Work(type), trou → Off,
    // pour que les séquences interdites n'attrapent que des jours adjacents
    let mut grid: Vec<PatternToken> = Vec::new();
    let mut date = first.date;
    while date <= last.date {
        grid.push(match worked.get(&date) {
            Some(t) => PatternToken::Work((*t).clone()),
            None => PatternToken::Off,
        });
        date += Duration::days(1);
    }

    for pattern in patterns.iter().filter(|p| p.is_forbidden) {
        if pattern.sequence.is_empty() || pattern.sequence.len() > grid.len() {
            continue;
        }
        for (offset, chunk) in grid.windows(pattern.sequence.len()).enumerate() {
            if chunk == pattern.sequence.as_slice() {
                out.push(Violation {
                    employee: employee_id.clone(),
                    date: first.date + Duration::days(offset as i64),
                    kind: ViolationKind::ForbiddenPattern {
                        pattern: pattern.name.clone(),
                    },
                });
            }
        }
    }
}

fn check_rest_periods(
    employee_id: &EmployeeId,
    resolved: &[(&Assignment, &Shift)],
    opts: &ValidateOptions,
    out: &mut Vec<Violation>,
) {
    for pair in resolved.windows(2) {
        let [(a, shift_a), (b, shift_b)] = pair else {
            continue;
        };
        // fin réelle au mur : le quart qui passe minuit finit le lendemain
        // de sa date nominale
        let end_a = wall_clock_end(a.date, shift_a);
        let start_b = b.date.and_time(shift_b.start_time);
        let gap_minutes = (start_b - end_a).num_minutes();
        let required = i64::from(opts.min_rest_hours) * 60;
        if gap_minutes < required {
            out.push(Violation {
                employee: employee_id.clone(),
                date: b.date,
                kind: ViolationKind::InsufficientRest {
                    rest_hours: gap_minutes as f64 / 60.0,
                    required_hours: opts.min_rest_hours,
                },
            });
        }
    }
}

fn wall_clock_end(date: NaiveDate, shift: &Shift) -> NaiveDateTime {
    let end_date = if shift.window().crosses_midnight() {
        date + Duration::days(1)
    } else {
        date
    };
    end_date.and_time(shift.end_time)
}
