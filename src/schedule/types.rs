//! Core data model: annual series, schedule references, day patterns, errors.

use std::fmt;

use thiserror::Error;

/// Hours in one calendar day.
pub const HOURS_PER_DAY: usize = 24;
/// Days in the reference year. The leap day is never generated or consumed.
pub const DAYS_PER_YEAR: u16 = 365;
/// Hours in the reference year (`365 * 24`).
pub const HOURS_PER_YEAR: usize = DAYS_PER_YEAR as usize * HOURS_PER_DAY;

/// Errors surfaced to callers of the synthesis library.
///
/// Indeterminate day profiles are deliberately *not* represented here; they
/// are a normal outcome reported as `None` at the component boundary.
#[derive(Debug, Error)]
pub enum SynthError {
    /// An empty space list was passed where at least one space is required.
    #[error("no spaces provided")]
    NoSpaces,
    /// A schedule reference did not resolve in the store.
    #[error("schedule \"{0}\" not found in store")]
    UnknownSchedule(String),
    /// Day profile breakpoints were not strictly increasing up to hour 24.
    #[error("day profile breakpoints must be strictly increasing and end at hour 24")]
    InvalidDayProfile,
    /// An annual series had the wrong number of values.
    #[error("annual series must contain {HOURS_PER_YEAR} values, got {0}")]
    SeriesLength(usize),
    /// A day-of-year index was not valid for the reference year.
    #[error("day {day} is not a valid ordinal date in year {year}")]
    InvalidDate {
        /// Reference calendar year.
        year: i32,
        /// 1-based day-of-year index.
        day: u16,
    },
    /// The reference year produced no weekday cluster to pick a default from.
    #[error("no weekday pattern available to select a default from")]
    NoWeekdayPattern,
}

/// Reference to an occupancy schedule, resolved by a
/// [`ScheduleStore`](crate::store::ScheduleStore).
///
/// Constant schedules are a distinct variant so the core never dispatches on
/// the shape of an external schedule object.
#[derive(Debug, Clone, PartialEq)]
pub enum ScheduleRef {
    /// A named rule-based calendar schedule.
    Ruleset(String),
    /// A schedule with the same value every hour of the year.
    Constant(f64),
}

impl fmt::Display for ScheduleRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleRef::Ruleset(name) => write!(f, "{name}"),
            ScheduleRef::Constant(value) => write!(f, "constant({value})"),
        }
    }
}

/// Identifier of one rule within a rule-based schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleId {
    /// The schedule's fallback profile, active when no explicit rule applies.
    Default,
    /// An explicit rule, indexed by its position in the schedule's rule list.
    Rule(usize),
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleId::Default => write!(f, "default"),
            RuleId::Rule(index) => write!(f, "rule {index}"),
        }
    }
}

/// A fixed 8760-entry hourly time series over the reference year.
///
/// Indexed by 1-based day-of-year and 0-based hour-of-day. Immutable once
/// built; every pipeline stage returns a fresh series.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnualSeries {
    values: Vec<f64>,
}

impl AnnualSeries {
    /// An all-zero series.
    pub fn zeros() -> Self {
        Self::constant(0.0)
    }

    /// A series holding `value` for every hour of the year.
    pub fn constant(value: f64) -> Self {
        Self {
            values: vec![value; HOURS_PER_YEAR],
        }
    }

    /// Wraps a raw value vector.
    ///
    /// # Errors
    ///
    /// Returns [`SynthError::SeriesLength`] unless exactly 8760 values are
    /// supplied.
    pub fn from_values(values: Vec<f64>) -> Result<Self, SynthError> {
        if values.len() != HOURS_PER_YEAR {
            return Err(SynthError::SeriesLength(values.len()));
        }
        Ok(Self { values })
    }

    /// Internal constructor for vectors whose length is guaranteed by
    /// construction.
    pub(crate) fn from_vec(values: Vec<f64>) -> Self {
        debug_assert_eq!(values.len(), HOURS_PER_YEAR);
        Self { values }
    }

    /// All 8760 hourly values in year order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// The 24 hourly values for one day.
    ///
    /// # Panics
    ///
    /// Panics if `day_of_year` is not in `1..=365`.
    pub fn day(&self, day_of_year: u16) -> &[f64] {
        assert!(
            (1..=DAYS_PER_YEAR).contains(&day_of_year),
            "day_of_year must be in 1..=365"
        );
        let start = (day_of_year as usize - 1) * HOURS_PER_DAY;
        &self.values[start..start + HOURS_PER_DAY]
    }
}

/// Rule used to convert fractional occupancy into a binary occupied flag.
#[derive(Debug, Clone, PartialEq)]
pub enum ThresholdPolicy {
    /// Pass the fractional series through unchanged.
    None,
    /// Occupied when the fraction is at least the fixed threshold.
    Value(f64),
    /// Threshold normalized to each day's min/max range, with a nonzero guard.
    NormalizedDailyRange(f64),
    /// Threshold normalized to the annual min/max range, without the guard.
    NormalizedAnnualRange(f64),
}

/// A 24-hour value vector shared by one or more calendar days.
#[derive(Debug, Clone, PartialEq)]
pub struct DayPattern {
    /// Hourly values (fractional or binary, 24 entries).
    pub values: Vec<f64>,
    /// Sorted 1-based day-of-year indices with exactly these values.
    pub days: Vec<u16>,
}

/// One people-load instance: an occupancy schedule weighted by its design
/// occupant count.
#[derive(Debug, Clone)]
pub struct PeopleLoad {
    /// The load's number-of-people schedule.
    pub schedule: ScheduleRef,
    /// Design occupant count used as the aggregation weight.
    pub occupants: f64,
}

/// Read-only view of one space supplied by the load/people collaborator.
#[derive(Debug, Clone)]
pub struct Space {
    /// Space name, used in diagnostics only.
    pub name: String,
    /// Hours-of-operation schedule assigned to the space, if any.
    pub hours_of_operation: Option<ScheduleRef>,
    /// People loads from both the space type and the space itself.
    pub people: Vec<PeopleLoad>,
}
