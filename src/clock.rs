use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Timelike};
use thiserror::Error;

pub const MINUTES_PER_DAY: u32 = 1_440;

/// Tolérance sur les sommes d'heures (segments, plafonds hebdo).
pub const HOURS_EPSILON: f64 = 1e-6;

#[derive(Error, Debug)]
pub enum TimeParseError {
    #[error("invalid time of day: {0}")]
    Invalid(String),
}

/// Parse `HH:MM[:SS]`.
pub fn parse_time(raw: &str) -> Result<NaiveTime, TimeParseError> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map_err(|_| TimeParseError::Invalid(raw.to_string()))
}

/// Parse `HH:MM[:SS]` en minutes depuis minuit.
pub fn to_minutes(raw: &str) -> Result<u32, TimeParseError> {
    Ok(minutes_of(parse_time(raw)?))
}

pub fn minutes_of(t: NaiveTime) -> u32 {
    t.num_seconds_from_midnight() / 60
}

/// Lundi de la semaine contenant `date` (borne de remise à zéro hebdo).
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// Fenêtre horaire récurrente `[start, end)` en heure du mur.
///
/// `end <= start` signifie que la fenêtre passe minuit. Toute l'arithmétique
/// minuit du dépôt (chevauchement, durée, repos) passe par ce type unique.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    start: NaiveTime,
    end: NaiveTime,
}

impl TimeWindow {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }

    pub fn crosses_midnight(&self) -> bool {
        minutes_of(self.end) <= minutes_of(self.start)
    }

    pub fn duration_minutes(&self) -> u32 {
        let s = minutes_of(self.start);
        let e = minutes_of(self.end);
        if e <= s {
            MINUTES_PER_DAY - s + e
        } else {
            e - s
        }
    }

    pub fn duration_hours(&self) -> f64 {
        f64::from(self.duration_minutes()) / 60.0
    }

    /// Chevauchement conscient de minuit.
    ///
    /// Deux fenêtres passant minuit partagent toujours l'instant 00:00 et se
    /// chevauchent donc par définition. Si une seule passe minuit, elle est
    /// scindée en `[start, 24:00)` et `[00:00, end)` et chaque moitié est
    /// testée contre l'autre fenêtre.
    pub fn overlaps(&self, other: &TimeWindow) -> bool {
        let (s1, e1) = (minutes_of(self.start), minutes_of(self.end));
        let (s2, e2) = (minutes_of(other.start), minutes_of(other.end));
        match (self.crosses_midnight(), other.crosses_midnight()) {
            (true, true) => true,
            (false, false) => ranges_overlap(s1, e1, s2, e2),
            (true, false) => {
                ranges_overlap(s1, MINUTES_PER_DAY, s2, e2) || ranges_overlap(0, e1, s2, e2)
            }
            (false, true) => other.overlaps(self),
        }
    }

    /// Clé d'affichage `"HH:MM-HH:MM"` (clé des rapports de couverture).
    pub fn label(&self) -> String {
        format!("{}-{}", self.start.format("%H:%M"), self.end.format("%H:%M"))
    }
}

fn ranges_overlap(s1: u32, e1: u32, s2: u32, e2: u32) -> bool {
    s1 < e2 && s2 < e1
}
