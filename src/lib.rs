#![forbid(unsafe_code)]
//! Quart — cœur de planification de quarts 24/7, local (sans BD).
//!
//! - Découpage des quarts passant minuit en segments par jour calendaire.
//! - Agrégation de couverture par date et par période de permanence.
//! - Validation : jours consécutifs, motifs interdits, repos minimal.
//! - Génération constructive et déterministe (brouillons), plafonds hebdo
//!   et exigences superviseur respectés.
//! - Stockage fichiers (JSON/CSV) ; collaborateurs catalogue injectés.

pub mod catalog;
pub mod clock;
pub mod coverage;
pub mod generator;
pub mod io;
pub mod metrics;
pub mod model;
pub mod segment;
pub mod validate;

pub use catalog::{Catalog, CatalogData, DataFetchError, JsonAssignmentStore, JsonCatalog};
pub use clock::TimeWindow;
pub use coverage::compute_coverage;
pub use generator::{
    Constraints, DateRange, DefaultRanking, GeneratedSchedule, GenerateOptions, GenerationError,
    Planner, PreferenceTable, RankingStrategy, Shortfall,
};
pub use metrics::{summarize, ScheduleMetrics};
pub use model::{
    Assignment, AssignmentId, AssignmentStatus, CoverageReport, Employee, EmployeeId,
    PatternToken, PeriodCoverage, Role, Segment, Shift, ShiftId, ShiftPattern, ShiftTypeId,
    StaffingRequirement,
};
pub use segment::segment_shift;
pub use validate::{validate_assignments, ValidateOptions, Violation, ViolationKind};
