#![forbid(unsafe_code)]
use chrono::{Duration, NaiveDate, NaiveTime};
use quart::{
    validate_assignments, Assignment, Employee, PatternToken, Role, Shift, ShiftId, ShiftPattern,
    ValidateOptions, ViolationKind,
};

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn daily_assignments(employee: &Employee, shift: &Shift, from: NaiveDate, days: u32) -> Vec<Assignment> {
    (0..days)
        .map(|i| {
            Assignment::new(
                employee.id.clone(),
                shift.id.clone(),
                from + Duration::days(i64::from(i)),
            )
        })
        .collect()
}

#[test]
fn seven_consecutive_days_yield_one_error() {
    let day = Shift::new("day", t(8, 0), t(16, 0));
    let bob = Employee::new("bob", Role::Staff);
    let assignments = daily_assignments(&bob, &day, d(2025, 10, 1), 7);

    let violations = validate_assignments(
        &assignments,
        &[],
        &[bob.clone()],
        &[day],
        &ValidateOptions::default(),
    );
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].employee, bob.id);
    assert_eq!(violations[0].date, d(2025, 10, 1));
    assert_eq!(
        violations[0].kind,
        ViolationKind::ConsecutiveDays { run: 7, limit: 6 }
    );
}

#[test]
fn six_consecutive_days_pass() {
    let day = Shift::new("day", t(8, 0), t(16, 0));
    let bob = Employee::new("bob", Role::Staff);
    let assignments = daily_assignments(&bob, &day, d(2025, 10, 1), 6);

    let violations = validate_assignments(
        &assignments,
        &[],
        &[bob.clone()],
        &[day],
        &ValidateOptions::default(),
    );
    assert!(violations.is_empty());
}

#[test]
fn allowed_pattern_raises_the_ceiling() {
    let day = Shift::new("day", t(8, 0), t(16, 0));
    let bob = Employee::new("bob", Role::Staff);
    let assignments = daily_assignments(&bob, &day, d(2025, 10, 1), 7);
    let seven_on = ShiftPattern {
        name: "7 on / 7 off".into(),
        sequence: Vec::new(),
        is_forbidden: false,
        days_on: 7,
        days_off: 7,
        length: 14,
    };

    let violations = validate_assignments(
        &assignments,
        &[seven_on],
        &[bob.clone()],
        &[day],
        &ValidateOptions::default(),
    );
    assert!(violations.is_empty());
}

#[test]
fn night_then_morning_is_insufficient_rest() {
    let night = Shift::new("night", t(20, 0), t(4, 0));
    let day = Shift::new("day", t(8, 0), t(16, 0));
    let bob = Employee::new("bob", Role::Staff);

    // la nuit du 1er finit le 2 à 04:00 ; reprise le 2 à 08:00 → 4 h de repos
    let assignments = vec![
        Assignment::new(bob.id.clone(), night.id.clone(), d(2025, 10, 1)),
        Assignment::new(bob.id.clone(), day.id.clone(), d(2025, 10, 2)),
    ];

    let violations = validate_assignments(
        &assignments,
        &[],
        &[bob.clone()],
        &[night, day],
        &ValidateOptions::default(),
    );
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].employee, bob.id);
    assert_eq!(violations[0].date, d(2025, 10, 2));
    match &violations[0].kind {
        ViolationKind::InsufficientRest {
            rest_hours,
            required_hours,
        } => {
            assert!((rest_hours - 4.0).abs() < 1e-6);
            assert_eq!(*required_hours, 8);
        }
        other => panic!("unexpected kind: {other:?}"),
    }
}

#[test]
fn errors_never_cross_employees() {
    let night = Shift::new("night", t(20, 0), t(4, 0));
    let day = Shift::new("day", t(8, 0), t(16, 0));
    let alice = Employee::new("alice", Role::Staff);
    let bob = Employee::new("bob", Role::Staff);

    let assignments = vec![
        // alice : deux jours espacés, conforme
        Assignment::new(alice.id.clone(), day.id.clone(), d(2025, 10, 1)),
        Assignment::new(alice.id.clone(), day.id.clone(), d(2025, 10, 3)),
        // bob : nuit puis matin, repos insuffisant
        Assignment::new(bob.id.clone(), night.id.clone(), d(2025, 10, 1)),
        Assignment::new(bob.id.clone(), day.id.clone(), d(2025, 10, 2)),
    ];

    let violations = validate_assignments(
        &assignments,
        &[],
        &[alice, bob.clone()],
        &[night, day],
        &ValidateOptions::default(),
    );
    assert!(!violations.is_empty());
    assert!(violations.iter().all(|v| v.employee == bob.id));
}

#[test]
fn forbidden_sequence_matches_adjacent_days_only() {
    let night = Shift::new("night", t(20, 0), t(4, 0));
    let day = Shift::new("day", t(8, 0), t(16, 0));
    let bob = Employee::new("bob", Role::Staff);
    let carol = Employee::new("carol", Role::Staff);
    let night_then_day = ShiftPattern {
        name: "nuit puis jour".into(),
        sequence: vec![
            PatternToken::Work(night.shift_type.clone()),
            PatternToken::Work(day.shift_type.clone()),
        ],
        is_forbidden: true,
        days_on: 2,
        days_off: 0,
        length: 2,
    };

    let assignments = vec![
        // bob : nuit le 1er, jour le 2 → séquence interdite
        Assignment::new(bob.id.clone(), night.id.clone(), d(2025, 10, 1)),
        Assignment::new(bob.id.clone(), day.id.clone(), d(2025, 10, 2)),
        // carol : nuit le 1er, jour le 3 → un jour off entre les deux
        Assignment::new(carol.id.clone(), night.id.clone(), d(2025, 10, 1)),
        Assignment::new(carol.id.clone(), day.id.clone(), d(2025, 10, 3)),
    ];

    let violations = validate_assignments(
        &assignments,
        &[night_then_day],
        &[bob.clone(), carol.clone()],
        &[night, day],
        &ValidateOptions::default(),
    );

    let pattern_hits: Vec<_> = violations
        .iter()
        .filter(|v| matches!(v.kind, ViolationKind::ForbiddenPattern { .. }))
        .collect();
    assert_eq!(pattern_hits.len(), 1);
    assert_eq!(pattern_hits[0].employee, bob.id);
    assert_eq!(pattern_hits[0].date, d(2025, 10, 1));
}

#[test]
fn malformed_rows_surface_without_aborting() {
    let night = Shift::new("night", t(20, 0), t(4, 0));
    let day = Shift::new("day", t(8, 0), t(16, 0));
    let bob = Employee::new("bob", Role::Staff);

    let assignments = vec![
        Assignment::new(bob.id.clone(), ShiftId::new("missing"), d(2025, 10, 1)),
        Assignment::new(bob.id.clone(), night.id.clone(), d(2025, 10, 2)),
        Assignment::new(bob.id.clone(), day.id.clone(), d(2025, 10, 3)),
    ];

    let violations = validate_assignments(
        &assignments,
        &[],
        &[bob.clone()],
        &[night, day],
        &ValidateOptions::default(),
    );

    // la ligne invalide est signalée, les autres restent vérifiées
    assert!(violations
        .iter()
        .any(|v| matches!(v.kind, ViolationKind::InvalidInput { .. })));
    assert!(violations
        .iter()
        .any(|v| matches!(v.kind, ViolationKind::InsufficientRest { .. })));
}
