//! Calendar-rule compilation from day patterns.
//!
//! The synthesis core hands each [`DayPattern`] and its exact occurrence days
//! to a [`RuleCompiler`]; producing a compact calendar-rule representation is
//! the compiler's concern, not the core's.

use super::types::DayPattern;

/// A compiled calendar rule: a 24-hour profile plus the inclusive
/// day-of-year spans it applies to.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarRule {
    /// Hourly values of the rule's day profile.
    pub values: Vec<f64>,
    /// Inclusive `(start_day, end_day)` spans reproducing the occurrence set.
    pub date_spans: Vec<(u16, u16)>,
}

/// Compiles a day pattern and its occurrence days into a calendar rule
/// object.
pub trait RuleCompiler {
    /// Produces a rule reproducing exactly the pattern's occurrence days.
    fn compile(&self, pattern: &DayPattern) -> CalendarRule;
}

/// Compiler that collapses sorted occurrence days into contiguous date spans.
#[derive(Debug, Default, Clone, Copy)]
pub struct DateSpanCompiler;

impl RuleCompiler for DateSpanCompiler {
    fn compile(&self, pattern: &DayPattern) -> CalendarRule {
        let mut date_spans: Vec<(u16, u16)> = Vec::new();
        for &day in &pattern.days {
            match date_spans.last_mut() {
                Some((_, end)) if *end + 1 == day => *end = day,
                _ => date_spans.push((day, day)),
            }
        }
        CalendarRule {
            values: pattern.values.clone(),
            date_spans,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(days: &[u16]) -> DayPattern {
        DayPattern {
            values: vec![1.0; 24],
            days: days.to_vec(),
        }
    }

    #[test]
    fn contiguous_days_collapse_into_one_span() {
        let rule = DateSpanCompiler.compile(&pattern(&[5, 6, 7, 8]));
        assert_eq!(rule.date_spans, vec![(5, 8)]);
    }

    #[test]
    fn gaps_start_new_spans() {
        let rule = DateSpanCompiler.compile(&pattern(&[1, 2, 3, 10, 11, 20]));
        assert_eq!(rule.date_spans, vec![(1, 3), (10, 11), (20, 20)]);
    }

    #[test]
    fn spans_cover_exactly_the_occurrence_set() {
        let days = [3, 4, 9, 17, 18, 19, 300];
        let rule = DateSpanCompiler.compile(&pattern(&days));
        let mut covered = Vec::new();
        for (start, end) in rule.date_spans {
            covered.extend(start..=end);
        }
        assert_eq!(covered, days);
    }
}
