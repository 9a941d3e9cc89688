//! Exact-equality clustering of daily patterns.

use super::calendar::{DayKind, day_kind};
use super::types::{AnnualSeries, DAYS_PER_YEAR, DayPattern, SynthError};

/// Daily patterns grouped by calendar classification.
///
/// Within each group, two days share a pattern iff their 24 hourly values are
/// exactly equal; there is no tolerance and no merging across groups. Every
/// day of the year lands in exactly one pattern of exactly one group.
/// Patterns are ordered by first-encountered day of year.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DayClusters {
    /// Patterns occurring Monday through Friday.
    pub weekday: Vec<DayPattern>,
    /// Patterns occurring on Saturdays.
    pub saturday: Vec<DayPattern>,
    /// Patterns occurring on Sundays.
    pub sunday: Vec<DayPattern>,
}

impl DayClusters {
    /// Total number of distinct patterns across all three groups.
    pub fn pattern_count(&self) -> usize {
        self.weekday.len() + self.saturday.len() + self.sunday.len()
    }
}

/// Partitions the year's daily 24-hour vectors into Weekday/Saturday/Sunday
/// pattern groups.
///
/// # Errors
///
/// Returns [`SynthError::InvalidDate`] if the reference year cannot classify
/// a day of year (never happens for a real calendar year).
pub fn cluster_days(series: &AnnualSeries, year: i32) -> Result<DayClusters, SynthError> {
    let mut clusters = DayClusters::default();
    for day_of_year in 1..=DAYS_PER_YEAR {
        let group = match day_kind(year, day_of_year)? {
            DayKind::Weekday => &mut clusters.weekday,
            DayKind::Saturday => &mut clusters.saturday,
            DayKind::Sunday => &mut clusters.sunday,
        };
        let values = series.day(day_of_year);
        match group.iter_mut().find(|pattern| pattern.values == values) {
            Some(pattern) => pattern.days.push(day_of_year),
            None => group.push(DayPattern {
                values: values.to_vec(),
                days: vec![day_of_year],
            }),
        }
    }
    Ok(clusters)
}
