use crate::model::{
    Assignment, CoverageReport, Employee, PeriodCoverage, Shift, StaffingRequirement,
};
use crate::segment::segment_shift;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Agrège un ensemble d'affectations en rapports de couverture par date.
///
/// Chaque affectation est segmentée par jour calendaire ; chaque segment
/// incrémente les périodes dont la fenêtre chevauche la fenêtre *du quart*
/// (la fenêtre d'origine, pas les heures du segment — les segments ne servent
/// qu'à imputer l'occurrence à la bonne date). Les encadrants incrémentent
/// aussi le compte superviseurs. Un quart qui ne chevauche aucune période
/// n'apparaît dans aucun rapport. La couverture est additive : deux
/// affectations au même quart comptent deux fois.
pub fn compute_coverage(
    assignments: &[Assignment],
    shifts: &[Shift],
    requirements: &[StaffingRequirement],
    employees: &[Employee],
) -> BTreeMap<NaiveDate, CoverageReport> {
    let mut reports: BTreeMap<NaiveDate, CoverageReport> = BTreeMap::new();

    for assignment in assignments {
        let Some(shift) = shifts.iter().find(|s| s.id == assignment.shift_id) else {
            continue;
        };
        let supervisor = employees
            .iter()
            .find(|e| e.id == assignment.employee_id)
            .is_some_and(|e| e.role.is_supervisor_equivalent());
        let window = shift.window();

        for segment in segment_shift(shift, assignment.date) {
            for requirement in requirements {
                if !window.overlaps(&requirement.window()) {
                    continue;
                }
                let report = reports
                    .entry(segment.date)
                    .or_insert_with(|| CoverageReport::empty(segment.date));
                let slot = report
                    .periods
                    .entry(requirement.window().label())
                    .or_insert_with(|| PeriodCoverage {
                        period: requirement.period_name.clone(),
                        required: requirement.minimum_employees,
                        actual: 0,
                        supervisors: 0,
                    });
                slot.actual += 1;
                if supervisor {
                    slot.supervisors += 1;
                }
            }
        }
    }

    reports
}
