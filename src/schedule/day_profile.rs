//! Step-function day profiles and occupied-window extraction.

use super::types::SynthError;

/// A step function over one 24-hour day.
///
/// Stored as ordered `(until_hour, value)` pairs where each value applies to
/// the half-open interval ending at its breakpoint. Breakpoints are strictly
/// increasing and the final breakpoint is hour 24, so the profile covers the
/// whole day. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct DayProfile {
    breakpoints: Vec<(f64, f64)>,
}

/// The occupied window extracted from an hours-of-operation day profile.
///
/// `end < start` means the window wraps past midnight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OperatingWindow {
    /// Hour the occupied window opens.
    pub start: f64,
    /// Hour the occupied window closes.
    pub end: f64,
    /// Occupied hours per day, in `[0, 24]`.
    pub duration: f64,
}

impl DayProfile {
    /// Builds a profile from `(until_hour, value)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`SynthError::InvalidDayProfile`] if the pairs are empty, the
    /// hours are not strictly increasing within `(0, 24]`, or the final
    /// breakpoint is not hour 24.
    pub fn new(breakpoints: Vec<(f64, f64)>) -> Result<Self, SynthError> {
        let mut prev = 0.0;
        for &(until, _) in &breakpoints {
            if until <= prev || until > 24.0 {
                return Err(SynthError::InvalidDayProfile);
            }
            prev = until;
        }
        if prev != 24.0 {
            return Err(SynthError::InvalidDayProfile);
        }
        Ok(Self { breakpoints })
    }

    /// A profile holding `value` for the whole day.
    pub fn constant(value: f64) -> Self {
        Self {
            breakpoints: vec![(24.0, value)],
        }
    }

    /// The ordered `(until_hour, value)` pairs.
    pub fn breakpoints(&self) -> &[(f64, f64)] {
        &self.breakpoints
    }

    /// The profile value at time-of-day `t` in `(0, 24]`.
    pub fn value_at(&self, t: f64) -> f64 {
        for &(until, value) in &self.breakpoints {
            if t <= until {
                return value;
            }
        }
        // t > 24 cannot occur for a valid profile; fall back to the last segment
        self.breakpoints[self.breakpoints.len() - 1].1
    }

    /// Whether every segment of the profile holds exactly `value`.
    pub fn is_always(&self, value: f64) -> bool {
        self.breakpoints.iter().all(|&(_, v)| v == value)
    }

    /// Extracts the occupied window from an hours-of-operation profile.
    ///
    /// Scanning breakpoints in order, the first 0-valued segment boundary
    /// becomes `start` and the first 1-valued segment boundary becomes `end`.
    /// If only one side is found the other side copies it; equal endpoints
    /// mean always occupied (duration 24) when the profile is constant 1,
    /// never occupied otherwise. `end < start` wraps past midnight.
    ///
    /// Returns `None` (indeterminate) for more than 3 breakpoints, any value
    /// outside `{0, 1}`, or when neither boundary is found. Indeterminate is
    /// a normal outcome for profiles that were never meant to encode hours of
    /// operation, not an error.
    pub fn operating_window(&self) -> Option<OperatingWindow> {
        if self.breakpoints.len() > 3 {
            return None;
        }

        let mut start = None;
        let mut end = None;
        for &(until, value) in &self.breakpoints {
            if value == 0.0 && start.is_none() {
                start = Some(until);
            } else if value == 1.0 && end.is_none() {
                end = Some(until);
            } else if value != 0.0 && value != 1.0 {
                return None;
            }
        }

        // A constant profile finds only one boundary; the other side copies it
        let (start, end) = match (start, end) {
            (Some(s), Some(e)) => (s, e),
            (Some(s), None) => (s, s),
            (None, Some(e)) => (e, e),
            (None, None) => return None,
        };

        let duration = if start == end {
            if self.is_always(1.0) { 24.0 } else { 0.0 }
        } else if end > start {
            end - start
        } else {
            end + 24.0 - start
        };

        Some(OperatingWindow {
            start,
            end,
            duration,
        })
    }
}
