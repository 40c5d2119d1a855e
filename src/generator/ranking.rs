use crate::model::{Employee, EmployeeId, Shift, ShiftTypeId};
use std::collections::HashMap;

/// Niveaux de préférence par `(employé, type de quart)` ; absent = 0,
/// plus haut = plus souhaité.
#[derive(Debug, Clone, Default)]
pub struct PreferenceTable {
    levels: HashMap<(EmployeeId, ShiftTypeId), u8>,
}

impl PreferenceTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, employee: EmployeeId, shift_type: ShiftTypeId, level: u8) {
        self.levels.insert((employee, shift_type), level);
    }

    pub fn level(&self, employee: &EmployeeId, shift_type: &ShiftTypeId) -> u8 {
        self.levels
            .get(&(employee.clone(), shift_type.clone()))
            .copied()
            .unwrap_or(0)
    }
}

/// Candidat éligible pour un quart, vu par la stratégie de classement.
#[derive(Debug)]
pub struct Candidate<'a> {
    pub employee: &'a Employee,
    /// Heures déjà engagées cette semaine dans la passe en cours.
    pub week_hours: f64,
    pub preference: u8,
}

/// Stratégie d'ordonnancement des candidats (meilleur en tête), branchable
/// pour être testée indépendamment de la boucle d'affectation.
pub trait RankingStrategy {
    fn order(&self, shift: &Shift, candidates: &mut [Candidate<'_>]);
}

/// Politique par défaut : préférence décroissante, puis moindre charge
/// hebdomadaire, puis plus petit identifiant (départage déterministe).
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultRanking;

impl RankingStrategy for DefaultRanking {
    fn order(&self, _shift: &Shift, candidates: &mut [Candidate<'_>]) {
        candidates.sort_by(|a, b| {
            b.preference
                .cmp(&a.preference)
                .then_with(|| a.week_hours.total_cmp(&b.week_hours))
                .then_with(|| a.employee.id.cmp(&b.employee.id))
        });
    }
}
