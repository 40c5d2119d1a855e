use crate::clock::{minutes_of, MINUTES_PER_DAY};
use crate::model::{Segment, Shift};
use chrono::{Duration, NaiveDate};

/// Découpe une occurrence de quart en segments par jour calendaire.
///
/// Un quart qui ne passe pas minuit tient sur un seul segment. Un quart qui
/// passe minuit est scindé à 00:00 : la première part reste sur `date`, la
/// seconde tombe sur le lendemain. Un quart démarrant exactement à 00:00 ne
/// passe pas minuit et n'est jamais scindé. La somme des heures des segments
/// vaut `shift.duration_hours`.
pub fn segment_shift(shift: &Shift, date: NaiveDate) -> Vec<Segment> {
    if !shift.window().crosses_midnight() {
        return vec![Segment {
            date,
            hours: shift.duration_hours,
        }];
    }

    let before = f64::from(MINUTES_PER_DAY - minutes_of(shift.start_time)) / 60.0;
    let after = f64::from(minutes_of(shift.end_time)) / 60.0;
    vec![
        Segment {
            date,
            hours: before,
        },
        Segment {
            date: date + Duration::days(1),
            hours: after,
        },
    ]
}
