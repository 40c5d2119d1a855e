use crate::model::{Assignment, AssignmentStatus, Employee, Shift, ShiftPattern, StaffingRequirement};
use anyhow::Context;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

/// Échec de lecture d'un catalogue amont. Fatal : le calcul entier est
/// abandonné, jamais de résultat partiel.
#[derive(Error, Debug)]
#[error("Failed to fetch shifts or staffing requirements")]
pub struct DataFetchError {
    #[from]
    source: anyhow::Error,
}

/// Sources catalogue injectées dans le cœur (roster, quarts, permanences,
/// motifs). Lecture seule ; l'administration de ces données est externe.
pub trait Catalog {
    fn employees(&self) -> anyhow::Result<Vec<Employee>>;
    fn shifts(&self) -> anyhow::Result<Vec<Shift>>;
    fn requirements(&self) -> anyhow::Result<Vec<StaffingRequirement>>;
    fn patterns(&self) -> anyhow::Result<Vec<ShiftPattern>>;
}

/// Catalogue en mémoire ; sert aussi de schéma au fichier JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogData {
    #[serde(default)]
    pub employees: Vec<Employee>,
    #[serde(default)]
    pub shifts: Vec<Shift>,
    #[serde(default)]
    pub requirements: Vec<StaffingRequirement>,
    #[serde(default)]
    pub patterns: Vec<ShiftPattern>,
}

impl Catalog for CatalogData {
    fn employees(&self) -> anyhow::Result<Vec<Employee>> {
        Ok(self.employees.clone())
    }
    fn shifts(&self) -> anyhow::Result<Vec<Shift>> {
        Ok(self.shifts.clone())
    }
    fn requirements(&self) -> anyhow::Result<Vec<StaffingRequirement>> {
        Ok(self.requirements.clone())
    }
    fn patterns(&self) -> anyhow::Result<Vec<ShiftPattern>> {
        Ok(self.patterns.clone())
    }
}

/// Catalogue persisté dans un fichier JSON unique.
pub struct JsonCatalog {
    path: PathBuf,
}

impl JsonCatalog {
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self) -> anyhow::Result<CatalogData> {
        let data =
            fs::read(&self.path).with_context(|| format!("reading {}", self.path.display()))?;
        let catalog: CatalogData =
            serde_json::from_slice(&data).with_context(|| "parsing catalog.json")?;
        Ok(catalog)
    }

    /// Sauvegarde de manière atomique.
    pub fn save(&self, catalog: &CatalogData) -> anyhow::Result<()> {
        write_atomic(&self.path, &serde_json::to_vec_pretty(catalog)?)
    }
}

/// Dépôt d'affectations générées. L'upsert est idempotent sur
/// `(employee_id, date)` : une génération rejouée ne double-réserve jamais.
pub struct JsonAssignmentStore {
    path: PathBuf,
}

impl JsonAssignmentStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Fichier absent → liste vide.
    pub fn load(&self) -> anyhow::Result<Vec<Assignment>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let data =
            fs::read(&self.path).with_context(|| format!("reading {}", self.path.display()))?;
        let rows: Vec<Assignment> =
            serde_json::from_slice(&data).with_context(|| "parsing assignments.json")?;
        Ok(rows)
    }

    pub fn upsert(&self, rows: &[Assignment]) -> anyhow::Result<()> {
        let mut existing = self.load()?;
        existing.retain(|old| {
            !rows
                .iter()
                .any(|new| new.employee_id == old.employee_id && new.date == old.date)
        });
        existing.extend_from_slice(rows);
        existing.sort_by(|a, b| (a.date, &a.employee_id).cmp(&(b.date, &b.employee_id)));
        write_atomic(&self.path, &serde_json::to_vec_pretty(&existing)?)
    }

    /// Passe en `Published` les brouillons de l'intervalle ; renvoie le
    /// nombre de lignes touchées.
    pub fn publish(&self, from: NaiveDate, to: NaiveDate) -> anyhow::Result<usize> {
        let mut rows = self.load()?;
        let mut touched = 0usize;
        for row in rows.iter_mut() {
            if row.date >= from && row.date <= to && row.status == AssignmentStatus::Draft {
                row.status = AssignmentStatus::Published;
                touched += 1;
            }
        }
        if touched > 0 {
            write_atomic(&self.path, &serde_json::to_vec_pretty(&rows)?)?;
        }
        Ok(touched)
    }
}

fn write_atomic(path: &Path, json: &[u8]) -> anyhow::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).with_context(|| "creating temp file")?;
    tmp.write_all(json)?;
    tmp.flush()?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).with_context(|| "atomic rename")?;
    Ok(())
}
