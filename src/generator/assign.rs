use super::ranking::{Candidate, RankingStrategy};
use super::types::{DateRange, GeneratedSchedule, GenerateOptions, GenerationError, Shortfall};
use crate::clock::{minutes_of, week_start, HOURS_EPSILON};
use crate::coverage::compute_coverage;
use crate::model::{Assignment, Employee, EmployeeId, Shift, ShiftPattern, StaffingRequirement};
use crate::validate::{validate_assignments, ValidateOptions};
use chrono::{Duration, NaiveDate};
use std::collections::HashMap;
use std::sync::atomic::Ordering;

/// Période encore insatisfaite pour une date : comptes courants attachés.
struct Outstanding<'a> {
    requirement: &'a StaffingRequirement,
    actual: u32,
    supervisors: u32,
}

impl Outstanding<'_> {
    fn headcount_short(&self) -> bool {
        self.actual < self.requirement.minimum_employees
    }
    fn supervisor_short(&self) -> bool {
        self.requirement.supervisor_required && self.supervisors == 0
    }
}

/// Cœur pur du générateur : construit un planning pour l'intervalle, une
/// affectation à la fois, sur des entrées entièrement chargées.
///
/// Chaque affectation tentée est segmentée, comptée en couverture et soumise
/// aux vérifications repos/consécutifs/motifs du seul candidat avant d'être
/// retenue. Une période impossible à couvrir est consignée en `Shortfall` et
/// la génération continue. L'état (cumuls hebdo, accumulateur) est propre à
/// la passe : aucun global partagé entre exécutions concurrentes.
pub(super) fn generate_assignments(
    employees: &[Employee],
    shifts: &[Shift],
    patterns: &[ShiftPattern],
    requirements: &[StaffingRequirement],
    range: DateRange,
    opts: &GenerateOptions,
    ranking: &dyn RankingStrategy,
) -> Result<GeneratedSchedule, GenerationError> {
    if range.end < range.start {
        return Err(GenerationError::InvalidRange);
    }

    let constraints = opts.constraints;
    let validate_opts = ValidateOptions {
        min_rest_hours: constraints.min_rest_hours,
        fallback_max_consecutive: constraints.max_consecutive_days,
    };

    let mut ordered_shifts: Vec<&Shift> = shifts.iter().collect();
    ordered_shifts.sort_by_key(|s| (minutes_of(s.start_time), s.id.clone()));

    let mut committed: Vec<Assignment> = Vec::new();

    // cumuls hebdo : la première semaine part des heures déjà planifiées
    // ailleurs, les suivantes repartent de zéro
    let mut week_anchor = week_start(range.start);
    let mut week_hours: HashMap<EmployeeId, f64> = employees
        .iter()
        .map(|e| (e.id.clone(), e.weekly_hours_scheduled))
        .collect();

    let mut date = range.start;
    loop {
        if let Some(flag) = &opts.cancel {
            if flag.load(Ordering::Relaxed) {
                return Err(GenerationError::Cancelled);
            }
        }

        let anchor = week_start(date);
        if anchor != week_anchor {
            week_anchor = anchor;
            week_hours.clear();
        }

        for shift in &ordered_shifts {
            let window = shift.window();
            let periods: Vec<&StaffingRequirement> = requirements
                .iter()
                .filter(|r| r.window().overlaps(&window))
                .collect();
            if periods.is_empty() {
                continue;
            }

            loop {
                let unmet =
                    outstanding_periods(&periods, &committed, shifts, requirements, employees, date);
                if unmet.is_empty() {
                    break;
                }
                let headcount_short = unmet.iter().any(Outstanding::headcount_short);
                let supervisor_short = unmet.iter().any(Outstanding::supervisor_short);

                let mut candidates: Vec<Candidate<'_>> = employees
                    .iter()
                    .filter(|e| {
                        !committed
                            .iter()
                            .any(|a| a.employee_id == e.id && a.date == date)
                    })
                    .filter(|e| {
                        let hours = week_hours.get(&e.id).copied().unwrap_or(0.0);
                        hours + shift.duration_hours
                            <= e.weekly_cap(constraints.default_weekly_cap) + HOURS_EPSILON
                    })
                    // s'il ne manque qu'un superviseur, seul l'encadrement
                    // est éligible ; sinon tout le monde l'est
                    .filter(|e| headcount_short || e.role.is_supervisor_equivalent())
                    .map(|e| Candidate {
                        employee: e,
                        week_hours: week_hours.get(&e.id).copied().unwrap_or(0.0),
                        preference: opts
                            .preferences
                            .as_ref()
                            .map_or(0, |p| p.level(&e.id, &shift.shift_type)),
                    })
                    .collect();

                ranking.order(shift, &mut candidates);
                if supervisor_short {
                    // tri stable : l'encadrement en tête tant que le créneau
                    // superviseur est vacant
                    candidates.sort_by_key(|c| !c.employee.role.is_supervisor_equivalent());
                }

                let mut committed_one = false;
                for candidate in &candidates {
                    let tentative =
                        Assignment::new(candidate.employee.id.clone(), shift.id.clone(), date);
                    let mut history: Vec<Assignment> = committed
                        .iter()
                        .filter(|a| a.employee_id == candidate.employee.id)
                        .cloned()
                        .collect();
                    history.push(tentative.clone());

                    // revalidation du seul candidat ; son historique engagé
                    // était propre, toute violation est donc nouvelle
                    let violations =
                        validate_assignments(&history, patterns, employees, shifts, &validate_opts);
                    if !violations.is_empty() {
                        continue;
                    }

                    *week_hours.entry(candidate.employee.id.clone()).or_insert(0.0) +=
                        shift.duration_hours;
                    committed.push(tentative);
                    committed_one = true;
                    break;
                }

                if !committed_one {
                    #[cfg(feature = "logging")]
                    tracing::debug!(
                        date = %date,
                        shift = shift.id.as_str(),
                        "no eligible candidate, leaving period under-covered"
                    );
                    break;
                }
            }
        }

        if date == range.end {
            break;
        }
        date += Duration::days(1);
    }

    let shortfalls = collect_shortfalls(&committed, shifts, requirements, employees, range);

    Ok(GeneratedSchedule {
        assignments: committed,
        shortfalls,
        elapsed_ms: 0,
    })
}

/// Comptes courants des périodes de `periods` pour `date`, restreints aux
/// affectations déjà retenues dans la passe ; seules les périodes encore
/// insatisfaites sont renvoyées.
fn outstanding_periods<'a>(
    periods: &[&'a StaffingRequirement],
    committed: &[Assignment],
    shifts: &[Shift],
    requirements: &[StaffingRequirement],
    employees: &[Employee],
    date: NaiveDate,
) -> Vec<Outstanding<'a>> {
    let reports = compute_coverage(committed, shifts, requirements, employees);
    let day = reports.get(&date);

    periods
        .iter()
        .map(|&requirement| {
            let label = requirement.window().label();
            let (actual, supervisors) = day
                .and_then(|r| r.periods.get(&label))
                .map_or((0, 0), |p| (p.actual, p.supervisors));
            Outstanding {
                requirement,
                actual,
                supervisors,
            }
        })
        .filter(|o| o.headcount_short() || o.supervisor_short())
        .collect()
}

/// Balayage final : une entrée par période insatisfaite de l'intervalle,
/// y compris les périodes qu'aucune fenêtre de quart ne recouvre.
fn collect_shortfalls(
    committed: &[Assignment],
    shifts: &[Shift],
    requirements: &[StaffingRequirement],
    employees: &[Employee],
    range: DateRange,
) -> Vec<Shortfall> {
    let reports = compute_coverage(committed, shifts, requirements, employees);
    let mut out = Vec::new();

    let mut date = range.start;
    loop {
        let day = reports.get(&date);
        for requirement in requirements {
            let label = requirement.window().label();
            let (actual, supervisors) = day
                .and_then(|r| r.periods.get(&label))
                .map_or((0, 0), |p| (p.actual, p.supervisors));
            let missing_supervisor = requirement.supervisor_required && supervisors == 0;
            if actual < requirement.minimum_employees || missing_supervisor {
                out.push(Shortfall {
                    date,
                    period: requirement.period_name.clone(),
                    window: label,
                    required: requirement.minimum_employees,
                    actual,
                    missing_supervisor,
                });
            }
        }
        if date == range.end {
            break;
        }
        date += Duration::days(1);
    }

    out
}
