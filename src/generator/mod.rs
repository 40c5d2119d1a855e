mod assign;
mod ranking;
mod types;

pub use ranking::{Candidate, DefaultRanking, PreferenceTable, RankingStrategy};
pub use types::{
    Constraints, DateRange, GeneratedSchedule, GenerateOptions, GenerationError, Shortfall,
};

use crate::catalog::{Catalog, DataFetchError};
use crate::coverage;
use crate::model::{Assignment, CoverageReport};
use crate::validate::{validate_assignments, ValidateOptions, Violation};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::time::Instant;

/// Planificateur : fait le pont entre les catalogues injectés et le cœur de
/// calcul pur. Les lectures ont lieu avant le calcul, jamais entrelacées ;
/// tout échec de lecture est fatal à l'opération entière.
pub struct Planner<C> {
    catalog: C,
}

impl<C: Catalog> Planner<C> {
    pub fn new(catalog: C) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Couverture par date d'un ensemble d'affectations (déjà publiées ou
    /// non). Échec de lecture catalogue → `DataFetchError`, aucun rapport
    /// partiel.
    pub fn compute_coverage(
        &self,
        assignments: &[Assignment],
    ) -> Result<BTreeMap<NaiveDate, CoverageReport>, DataFetchError> {
        let shifts = self.catalog.shifts().map_err(DataFetchError::from)?;
        let requirements = self.catalog.requirements().map_err(DataFetchError::from)?;
        let employees = self.catalog.employees().map_err(DataFetchError::from)?;
        Ok(coverage::compute_coverage(
            assignments,
            &shifts,
            &requirements,
            &employees,
        ))
    }

    /// Valide un ensemble d'affectations contre les catalogues chargés.
    pub fn validate(
        &self,
        assignments: &[Assignment],
        opts: &ValidateOptions,
    ) -> Result<Vec<Violation>, DataFetchError> {
        let shifts = self.catalog.shifts().map_err(DataFetchError::from)?;
        let patterns = self.catalog.patterns().map_err(DataFetchError::from)?;
        let employees = self.catalog.employees().map_err(DataFetchError::from)?;
        Ok(validate_assignments(
            assignments,
            &patterns,
            &employees,
            &shifts,
            opts,
        ))
    }

    /// Génère un planning brouillon pour l'intervalle avec le classement par
    /// défaut (préférence, charge hebdo, identifiant).
    pub fn generate(
        &self,
        range: DateRange,
        opts: &GenerateOptions,
    ) -> Result<GeneratedSchedule, GenerationError> {
        self.generate_with(range, opts, &DefaultRanking)
    }

    /// Variante avec stratégie de classement fournie par l'appelant.
    pub fn generate_with(
        &self,
        range: DateRange,
        opts: &GenerateOptions,
        ranking: &dyn RankingStrategy,
    ) -> Result<GeneratedSchedule, GenerationError> {
        let started = Instant::now();

        let employees = self.catalog.employees().map_err(DataFetchError::from)?;
        let shifts = self.catalog.shifts().map_err(DataFetchError::from)?;
        let patterns = self.catalog.patterns().map_err(DataFetchError::from)?;
        let requirements = self.catalog.requirements().map_err(DataFetchError::from)?;

        let mut schedule = assign::generate_assignments(
            &employees,
            &shifts,
            &patterns,
            &requirements,
            range,
            opts,
            ranking,
        )?;
        schedule.elapsed_ms = started.elapsed().as_millis() as u64;

        #[cfg(feature = "logging")]
        tracing::info!(
            assignments = schedule.assignments.len(),
            shortfalls = schedule.shortfalls.len(),
            elapsed_ms = schedule.elapsed_ms,
            "schedule generation finished"
        );

        Ok(schedule)
    }
}
