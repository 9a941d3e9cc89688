//! Reference-year calendar classification.

use time::{Date, Weekday};

use super::types::SynthError;

/// Calendar grouping used when clustering daily patterns.
///
/// Monday through Friday share one group; Saturday and Sunday each get their
/// own so synthesized rules can differ per weekend day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayKind {
    /// Monday through Friday.
    Weekday,
    Saturday,
    Sunday,
}

fn ordinal_date(year: i32, day_of_year: u16) -> Result<Date, SynthError> {
    Date::from_ordinal_date(year, day_of_year).map_err(|_| SynthError::InvalidDate {
        year,
        day: day_of_year,
    })
}

/// Classifies a day of the reference year as Weekday, Saturday, or Sunday.
///
/// # Errors
///
/// Returns [`SynthError::InvalidDate`] if `day_of_year` does not exist in
/// `year`.
pub fn day_kind(year: i32, day_of_year: u16) -> Result<DayKind, SynthError> {
    let kind = match ordinal_date(year, day_of_year)?.weekday() {
        Weekday::Saturday => DayKind::Saturday,
        Weekday::Sunday => DayKind::Sunday,
        _ => DayKind::Weekday,
    };
    Ok(kind)
}

/// Day-of-week index for a day of the reference year (0 = Monday .. 6 = Sunday).
///
/// # Errors
///
/// Returns [`SynthError::InvalidDate`] if `day_of_year` does not exist in
/// `year`.
pub fn weekday_index(year: i32, day_of_year: u16) -> Result<u8, SynthError> {
    Ok(ordinal_date(year, day_of_year)?
        .weekday()
        .number_days_from_monday())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_known_dates() {
        // 2009-01-01 was a Thursday, so Jan 3 is Saturday and Jan 4 Sunday
        assert_eq!(day_kind(2009, 1).ok(), Some(DayKind::Weekday));
        assert_eq!(day_kind(2009, 3).ok(), Some(DayKind::Saturday));
        assert_eq!(day_kind(2009, 4).ok(), Some(DayKind::Sunday));
    }

    #[test]
    fn weekday_index_matches_kind() {
        for day in 1..=365 {
            let idx = weekday_index(2009, day).expect("valid ordinal day");
            let kind = day_kind(2009, day).expect("valid ordinal day");
            match kind {
                DayKind::Saturday => assert_eq!(idx, 5),
                DayKind::Sunday => assert_eq!(idx, 6),
                DayKind::Weekday => assert!(idx < 5),
            }
        }
    }

    #[test]
    fn invalid_ordinal_day_is_an_error() {
        assert!(matches!(
            day_kind(2009, 366),
            Err(SynthError::InvalidDate { year: 2009, day: 366 })
        ));
        assert!(day_kind(2009, 0).is_err());
    }
}
