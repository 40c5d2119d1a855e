use crate::clock::TimeWindow;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Plafond hebdomadaire par défaut (heures), sans heures supplémentaires.
pub const DEFAULT_WEEKLY_CAP: f64 = 40.0;

/// Identifiant fort pour Employee
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EmployeeId(String);

impl EmployeeId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identifiant fort pour Shift
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShiftId(String);

impl ShiftId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Type de quart (jeton des séquences de motifs)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShiftTypeId(String);

impl ShiftTypeId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identifiant fort pour Assignment
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssignmentId(String);

impl AssignmentId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Rôle d'un membre du personnel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Staff,
    Supervisor,
    Management,
}

impl Role {
    /// Supervisor et Management comptent tous deux comme encadrement.
    pub fn is_supervisor_equivalent(&self) -> bool {
        matches!(self, Role::Supervisor | Role::Management)
    }
}

/// Membre du personnel (entrée en lecture seule du cœur).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub role: Role,
    #[serde(default)]
    pub weekly_hours_scheduled: f64,
    #[serde(default)]
    pub allow_overtime: bool,
    #[serde(default = "default_weekly_cap")]
    pub max_weekly_hours: f64,
}

fn default_weekly_cap() -> f64 {
    DEFAULT_WEEKLY_CAP
}

impl Employee {
    pub fn new<S: AsRef<str>>(id: S, role: Role) -> Self {
        Self {
            id: EmployeeId::new(id),
            role,
            weekly_hours_scheduled: 0.0,
            allow_overtime: false,
            max_weekly_hours: DEFAULT_WEEKLY_CAP,
        }
    }

    /// Plafond hebdomadaire effectif : `max_weekly_hours` si les heures
    /// supplémentaires sont autorisées, sinon le plafond par défaut.
    pub fn weekly_cap(&self, default_cap: f64) -> f64 {
        if self.allow_overtime {
            self.max_weekly_hours
        } else {
            default_cap
        }
    }
}

/// Gabarit de quart récurrent, en heure du mur.
///
/// `end_time <= start_time` signifie que le quart passe minuit ;
/// `duration_hours` vaut alors `24 − start + end`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shift {
    pub id: ShiftId,
    pub shift_type: ShiftTypeId,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub duration_hours: f64,
}

impl Shift {
    /// Crée un gabarit ; la durée est calculée depuis la fenêtre horaire.
    pub fn new<S: AsRef<str>>(shift_type: S, start_time: NaiveTime, end_time: NaiveTime) -> Self {
        let duration_hours = TimeWindow::new(start_time, end_time).duration_hours();
        Self {
            id: ShiftId::random(),
            shift_type: ShiftTypeId::new(shift_type),
            start_time,
            end_time,
            duration_hours,
        }
    }

    pub fn window(&self) -> TimeWindow {
        TimeWindow::new(self.start_time, self.end_time)
    }
}

/// Statut de cycle de vie d'une affectation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssignmentStatus {
    Draft,
    Published,
}

/// Affectation d'un employé à un quart pour une date donnée.
/// Un employé tient au plus une affectation par date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: AssignmentId,
    pub employee_id: EmployeeId,
    pub shift_id: ShiftId,
    pub date: NaiveDate,
    pub status: AssignmentStatus,
}

impl Assignment {
    pub fn new(employee_id: EmployeeId, shift_id: ShiftId, date: NaiveDate) -> Self {
        Self {
            id: AssignmentId::random(),
            employee_id,
            shift_id,
            date,
            status: AssignmentStatus::Draft,
        }
    }
}

/// Exigence de permanence : fenêtre récurrente évaluée chaque jour calendaire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffingRequirement {
    pub period_name: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub minimum_employees: u32,
    #[serde(default)]
    pub supervisor_required: bool,
}

impl StaffingRequirement {
    pub fn new<S: Into<String>>(
        period_name: S,
        start_time: NaiveTime,
        end_time: NaiveTime,
        minimum_employees: u32,
        supervisor_required: bool,
    ) -> Self {
        Self {
            period_name: period_name.into(),
            start_time,
            end_time,
            minimum_employees,
            supervisor_required,
        }
    }

    pub fn window(&self) -> TimeWindow {
        TimeWindow::new(self.start_time, self.end_time)
    }
}

/// Jeton d'une séquence de motif : un type de quart travaillé, ou un jour off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatternToken {
    Work(ShiftTypeId),
    Off,
}

/// Motif de rythme de travail, autorisé ou interdit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftPattern {
    pub name: String,
    #[serde(default)]
    pub sequence: Vec<PatternToken>,
    #[serde(default)]
    pub is_forbidden: bool,
    pub days_on: u32,
    pub days_off: u32,
    pub length: u32,
}

/// Portion d'une occurrence de quart tombant sur une seule date.
/// Dérivé, jamais persisté.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub date: NaiveDate,
    pub hours: f64,
}

/// Comptes d'une période de permanence pour une date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodCoverage {
    pub period: String,
    pub required: u32,
    pub actual: u32,
    pub supervisors: u32,
}

/// Rapport de couverture d'une date, périodes indexées par fenêtre
/// (`"HH:MM-HH:MM"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageReport {
    pub date: NaiveDate,
    pub periods: BTreeMap<String, PeriodCoverage>,
}

impl CoverageReport {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            periods: BTreeMap::new(),
        }
    }
}
