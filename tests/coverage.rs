#![forbid(unsafe_code)]
use chrono::{NaiveDate, NaiveTime};
use quart::{
    compute_coverage, Assignment, Catalog, Employee, Planner, Role, Shift, ShiftPattern,
    StaffingRequirement,
};

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

#[test]
fn night_shift_counts_on_both_dates() {
    let night = Shift::new("night", t(20, 0), t(4, 0));
    let requirement = StaffingRequirement::new("nuit", t(20, 0), t(4, 0), 2, false);
    let alice = Employee::new("alice", Role::Staff);
    let bob = Employee::new("bob", Role::Supervisor);
    let date = d(2025, 10, 1);

    let assignments = vec![
        Assignment::new(alice.id.clone(), night.id.clone(), date),
        Assignment::new(bob.id.clone(), night.id.clone(), date),
    ];
    let reports = compute_coverage(
        &assignments,
        &[night.clone()],
        &[requirement],
        &[alice, bob],
    );

    for day in [date, d(2025, 10, 2)] {
        let slot = &reports[&day].periods["20:00-04:00"];
        assert_eq!(slot.actual, 2);
        assert_eq!(slot.supervisors, 1);
        assert_eq!(slot.required, 2);
        assert_eq!(slot.period, "nuit");
    }
}

#[test]
fn unmatched_shift_is_silently_uncounted() {
    let afternoon = Shift::new("afternoon", t(14, 0), t(18, 0));
    let requirement = StaffingRequirement::new("matin", t(8, 0), t(12, 0), 1, false);
    let alice = Employee::new("alice", Role::Staff);

    let assignments = vec![Assignment::new(
        alice.id.clone(),
        afternoon.id.clone(),
        d(2025, 10, 1),
    )];
    let reports = compute_coverage(&assignments, &[afternoon], &[requirement], &[alice]);
    assert!(reports.is_empty());
}

#[test]
fn coverage_is_idempotent() {
    let day = Shift::new("day", t(8, 0), t(16, 0));
    let requirement = StaffingRequirement::new("jour", t(8, 0), t(16, 0), 2, false);
    let alice = Employee::new("alice", Role::Staff);
    let bob = Employee::new("bob", Role::Staff);

    let assignments = vec![
        Assignment::new(alice.id.clone(), day.id.clone(), d(2025, 10, 1)),
        Assignment::new(bob.id.clone(), day.id.clone(), d(2025, 10, 1)),
        Assignment::new(alice.id.clone(), day.id.clone(), d(2025, 10, 3)),
    ];
    let shifts = [day];
    let requirements = [requirement];
    let employees = [alice, bob];

    let first = compute_coverage(&assignments, &shifts, &requirements, &employees);
    let second = compute_coverage(&assignments, &shifts, &requirements, &employees);
    assert_eq!(first, second);
}

#[test]
fn management_counts_as_supervisor() {
    let day = Shift::new("day", t(8, 0), t(16, 0));
    let requirement = StaffingRequirement::new("jour", t(8, 0), t(16, 0), 1, true);
    let chief = Employee::new("chief", Role::Management);

    let assignments = vec![Assignment::new(
        chief.id.clone(),
        day.id.clone(),
        d(2025, 10, 1),
    )];
    let reports = compute_coverage(&assignments, &[day], &[requirement], &[chief]);
    let slot = &reports[&d(2025, 10, 1)].periods["08:00-16:00"];
    assert_eq!(slot.actual, 1);
    assert_eq!(slot.supervisors, 1);
}

#[test]
fn period_key_is_the_window_label() {
    let requirement = StaffingRequirement::new("nuit", t(20, 0), t(4, 0), 1, false);
    insta::assert_snapshot!(requirement.window().label(), @"20:00-04:00");
}

struct FailingCatalog;

impl Catalog for FailingCatalog {
    fn employees(&self) -> anyhow::Result<Vec<Employee>> {
        anyhow::bail!("backend down")
    }
    fn shifts(&self) -> anyhow::Result<Vec<Shift>> {
        anyhow::bail!("backend down")
    }
    fn requirements(&self) -> anyhow::Result<Vec<StaffingRequirement>> {
        anyhow::bail!("backend down")
    }
    fn patterns(&self) -> anyhow::Result<Vec<ShiftPattern>> {
        anyhow::bail!("backend down")
    }
}

#[test]
fn catalog_failure_aborts_whole_computation() {
    let planner = Planner::new(FailingCatalog);
    let err = planner.compute_coverage(&[]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Failed to fetch shifts or staffing requirements"
    );
}
