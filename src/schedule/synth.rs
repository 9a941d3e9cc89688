//! Pipeline orchestration and default/rule selection.

use std::fmt;

use tracing::debug;

use crate::store::ScheduleStore;

use super::aggregate::aggregate_occupancy;
use super::cluster::cluster_days;
use super::threshold::apply_threshold;
use super::types::{DayPattern, HOURS_PER_DAY, Space, SynthError, ThresholdPolicy};

/// Caller-chosen synthesis parameters.
#[derive(Debug, Clone)]
pub struct SynthesisOptions {
    /// Reference calendar year used for weekday classification.
    pub year: i32,
    /// Discretization applied to the aggregated fractional series.
    pub policy: ThresholdPolicy,
}

impl SynthesisOptions {
    /// Options for the given reference year and threshold policy.
    pub fn new(year: i32, policy: ThresholdPolicy) -> Self {
        Self { year, policy }
    }
}

/// A synthesized occupancy schedule for a group of spaces.
///
/// The default pattern covers the majority of weekdays; every other pattern
/// carries the exact days it must apply to, ready for an external
/// [`RuleCompiler`](super::compile::RuleCompiler). The two design-day
/// profiles are always fully occupied, independent of the computed clusters.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesizedSchedule {
    /// Majority weekday pattern.
    pub default_pattern: DayPattern,
    /// Non-default weekday patterns.
    pub weekday_rules: Vec<DayPattern>,
    /// Saturday patterns.
    pub saturday_rules: Vec<DayPattern>,
    /// Sunday patterns.
    pub sunday_rules: Vec<DayPattern>,
    /// Winter design-day profile (constant 1).
    pub winter_design_day: Vec<f64>,
    /// Summer design-day profile (constant 1).
    pub summer_design_day: Vec<f64>,
    /// Sum of design occupant counts that weighted the aggregation.
    pub total_design_occupancy: f64,
    /// Number of spaces the schedule was synthesized from.
    pub space_count: usize,
}

impl SynthesizedSchedule {
    /// Number of non-default rules across all groups.
    pub fn rule_count(&self) -> usize {
        self.weekday_rules.len() + self.saturday_rules.len() + self.sunday_rules.len()
    }
}

impl fmt::Display for SynthesizedSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Synthesized Occupancy Schedule ---")?;
        writeln!(
            f,
            "Default weekday pattern: {} days",
            self.default_pattern.days.len()
        )?;
        writeln!(
            f,
            "Rules: {} weekday, {} Saturday, {} Sunday",
            self.weekday_rules.len(),
            self.saturday_rules.len(),
            self.sunday_rules.len()
        )?;
        write!(
            f,
            "Provenance: {:.1} design occupants across {} space(s)",
            self.total_design_occupancy, self.space_count
        )
    }
}

/// Splits the weekday group into the majority pattern and the remaining
/// rules.
///
/// Ties keep the first-encountered pattern, which is the one owning the
/// earliest day of year.
fn split_default(mut group: Vec<DayPattern>) -> Option<(DayPattern, Vec<DayPattern>)> {
    if group.is_empty() {
        return None;
    }
    let mut best = 0;
    for (index, pattern) in group.iter().enumerate().skip(1) {
        if pattern.days.len() > group[best].days.len() {
            best = index;
        }
    }
    let default = group.remove(best);
    Some((default, group))
}

/// Synthesizes one occupancy schedule for a group of spaces.
///
/// Aggregates every people load into a fractional occupancy series,
/// discretizes it under the configured threshold policy, clusters the daily
/// patterns by calendar group, and selects the majority weekday pattern as
/// the default. Output is deterministic for identical inputs.
///
/// # Errors
///
/// Returns [`SynthError::NoSpaces`] for an empty space list and propagates
/// store failures. [`SynthError::NoWeekdayPattern`] cannot occur for a real
/// reference year.
pub fn synthesize(
    spaces: &[Space],
    store: &impl ScheduleStore,
    options: &SynthesisOptions,
) -> Result<SynthesizedSchedule, SynthError> {
    if spaces.is_empty() {
        return Err(SynthError::NoSpaces);
    }

    // 1. Weighted aggregation into one fractional series
    let aggregate = aggregate_occupancy(spaces, store, options.year)?;

    // 2. Threshold discretization
    let discrete = apply_threshold(&aggregate.series, &options.policy);

    // 3. Calendar-grouped clustering of daily patterns
    let clusters = cluster_days(&discrete, options.year)?;
    debug!(
        patterns = clusters.pattern_count(),
        "clustered daily occupancy patterns"
    );

    // 4. Default selection: the majority weekday pattern
    let (default_pattern, weekday_rules) =
        split_default(clusters.weekday).ok_or(SynthError::NoWeekdayPattern)?;

    Ok(SynthesizedSchedule {
        default_pattern,
        weekday_rules,
        saturday_rules: clusters.saturday,
        sunday_rules: clusters.sunday,
        winter_design_day: vec![1.0; HOURS_PER_DAY],
        summer_design_day: vec![1.0; HOURS_PER_DAY],
        total_design_occupancy: aggregate.total_design_occupancy,
        space_count: spaces.len(),
    })
}
