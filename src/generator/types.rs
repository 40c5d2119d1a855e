use super::ranking::PreferenceTable;
use crate::catalog::DataFetchError;
use crate::model::Assignment;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use thiserror::Error;

/// Intervalle de dates inclusif.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }
}

/// Options de génération.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    pub constraints: Constraints,
    /// Niveaux de préférence optionnels consultés par le classement.
    pub preferences: Option<PreferenceTable>,
    /// Point d'annulation consulté une fois par date.
    pub cancel: Option<Arc<AtomicBool>>,
}

/// Seuils appliqués par le générateur.
#[derive(Debug, Clone, Copy)]
pub struct Constraints {
    pub min_rest_hours: u32,
    pub max_consecutive_days: u32,
    pub default_weekly_cap: f64,
}

impl Default for Constraints {
    fn default() -> Self {
        Self {
            min_rest_hours: 8,
            max_consecutive_days: 6,
            default_weekly_cap: 40.0,
        }
    }
}

/// Période restée sous-couverte : consignée, jamais levée en erreur.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shortfall {
    pub date: NaiveDate,
    pub period: String,
    pub window: String,
    pub required: u32,
    pub actual: u32,
    pub missing_supervisor: bool,
}

/// Résultat d'une génération : affectations en brouillon, sous-couvertures
/// consignées, latence de la passe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedSchedule {
    pub assignments: Vec<Assignment>,
    pub shortfalls: Vec<Shortfall>,
    pub elapsed_ms: u64,
}

#[derive(Error, Debug)]
pub enum GenerationError {
    /// Échec de lecture catalogue ; la cause d'origine est attachée.
    #[error("Schedule generation failed")]
    DataFetch(#[from] DataFetchError),
    #[error("invalid date range: end before start")]
    InvalidRange,
    #[error("generation cancelled")]
    Cancelled,
}
