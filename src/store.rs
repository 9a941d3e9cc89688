//! Schedule store contract and in-memory reference implementation.
//!
//! The synthesis core only consumes the [`ScheduleStore`] trait; it never
//! inspects schedule objects directly. [`MemoryStore`] is the concrete store
//! used by the demo binary and the test suites.

use std::collections::BTreeMap;

use crate::schedule::calendar::weekday_index;
use crate::schedule::day_profile::DayProfile;
use crate::schedule::types::{
    AnnualSeries, DAYS_PER_YEAR, HOURS_PER_DAY, HOURS_PER_YEAR, RuleId, ScheduleRef, SynthError,
};

/// Expands sparse rule-based schedules into dense per-year data.
///
/// All three views must agree: `expand` samples the profile that
/// `active_rule_map` names for each day, and `rule_profiles` lists that
/// profile under the same [`RuleId`].
pub trait ScheduleStore {
    /// Dense hourly values for the whole reference year.
    fn expand(&self, schedule: &ScheduleRef, year: i32) -> Result<AnnualSeries, SynthError>;

    /// The rule governing each day of the reference year, indexed by
    /// `day_of_year - 1`.
    fn active_rule_map(&self, schedule: &ScheduleRef, year: i32)
    -> Result<Vec<RuleId>, SynthError>;

    /// Day profiles per rule: the default profile first, then every explicit
    /// rule most-recently-defined first (override priority order).
    fn rule_profiles(&self, schedule: &ScheduleRef) -> Result<Vec<(RuleId, DayProfile)>, SynthError>;
}

/// One explicit rule of a [`RulesetSchedule`].
#[derive(Debug, Clone)]
pub struct ScheduleRule {
    /// Day profile applied on days this rule governs.
    pub profile: DayProfile,
    /// Days of week the rule applies to, Monday first.
    pub days_of_week: [bool; 7],
    /// First day of year the rule applies to (1-based, inclusive).
    pub start_day: u16,
    /// Last day of year the rule applies to (1-based, inclusive).
    pub end_day: u16,
}

impl ScheduleRule {
    /// Applies on every day of the week.
    pub const ALL_DAYS: [bool; 7] = [true; 7];
    /// Applies Monday through Friday.
    pub const WEEKDAYS: [bool; 7] = [true, true, true, true, true, false, false];
    /// Applies on Saturday only.
    pub const SATURDAY: [bool; 7] = [false, false, false, false, false, true, false];
    /// Applies on Sunday only.
    pub const SUNDAY: [bool; 7] = [false, false, false, false, false, false, true];

    /// A rule covering the whole year on the given days of week.
    pub fn new(profile: DayProfile, days_of_week: [bool; 7]) -> Self {
        Self {
            profile,
            days_of_week,
            start_day: 1,
            end_day: DAYS_PER_YEAR,
        }
    }

    /// Restricts the rule to an inclusive day-of-year range.
    pub fn with_date_range(mut self, start_day: u16, end_day: u16) -> Self {
        self.start_day = start_day;
        self.end_day = end_day;
        self
    }

    fn applies(&self, weekday: u8, day_of_year: u16) -> bool {
        self.days_of_week[weekday as usize]
            && day_of_year >= self.start_day
            && day_of_year <= self.end_day
    }
}

/// A rule-based calendar schedule: a default day profile plus explicit rules.
///
/// Rules added later override rules added earlier, matching the override
/// priority of the modeling SDKs this mirrors.
#[derive(Debug, Clone)]
pub struct RulesetSchedule {
    /// Profile used on days no explicit rule governs.
    pub default_profile: DayProfile,
    /// Explicit rules in definition order (last entry has highest priority).
    pub rules: Vec<ScheduleRule>,
}

impl RulesetSchedule {
    /// A schedule with only a default profile.
    pub fn new(default_profile: DayProfile) -> Self {
        Self {
            default_profile,
            rules: Vec::new(),
        }
    }

    /// Appends a rule. The newest rule wins when several apply to a day.
    pub fn add_rule(&mut self, rule: ScheduleRule) {
        self.rules.push(rule);
    }

    fn active_rule(&self, weekday: u8, day_of_year: u16) -> RuleId {
        for (index, rule) in self.rules.iter().enumerate().rev() {
            if rule.applies(weekday, day_of_year) {
                return RuleId::Rule(index);
            }
        }
        RuleId::Default
    }

    fn profile_for(&self, rule: RuleId) -> &DayProfile {
        match rule {
            RuleId::Default => &self.default_profile,
            RuleId::Rule(index) => &self.rules[index].profile,
        }
    }
}

/// In-memory [`ScheduleStore`] keyed by schedule name.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    schedules: BTreeMap<String, RulesetSchedule>,
}

impl MemoryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a named schedule.
    pub fn insert(&mut self, name: impl Into<String>, schedule: RulesetSchedule) {
        self.schedules.insert(name.into(), schedule);
    }

    fn ruleset(&self, name: &str) -> Result<&RulesetSchedule, SynthError> {
        self.schedules
            .get(name)
            .ok_or_else(|| SynthError::UnknownSchedule(name.to_string()))
    }
}

impl ScheduleStore for MemoryStore {
    fn expand(&self, schedule: &ScheduleRef, year: i32) -> Result<AnnualSeries, SynthError> {
        let name = match schedule {
            ScheduleRef::Constant(value) => return Ok(AnnualSeries::constant(*value)),
            ScheduleRef::Ruleset(name) => name,
        };
        let ruleset = self.ruleset(name)?;
        let mut values = Vec::with_capacity(HOURS_PER_YEAR);
        for day_of_year in 1..=DAYS_PER_YEAR {
            let weekday = weekday_index(year, day_of_year)?;
            let profile = ruleset.profile_for(ruleset.active_rule(weekday, day_of_year));
            for hour in 0..HOURS_PER_DAY {
                // Sample at the end of the hour so the value of the segment
                // ending at a breakpoint covers the hour before it
                values.push(profile.value_at(hour as f64 + 1.0));
            }
        }
        AnnualSeries::from_values(values)
    }

    fn active_rule_map(
        &self,
        schedule: &ScheduleRef,
        year: i32,
    ) -> Result<Vec<RuleId>, SynthError> {
        let name = match schedule {
            ScheduleRef::Constant(_) => {
                return Ok(vec![RuleId::Default; DAYS_PER_YEAR as usize]);
            }
            ScheduleRef::Ruleset(name) => name,
        };
        let ruleset = self.ruleset(name)?;
        let mut map = Vec::with_capacity(DAYS_PER_YEAR as usize);
        for day_of_year in 1..=DAYS_PER_YEAR {
            let weekday = weekday_index(year, day_of_year)?;
            map.push(ruleset.active_rule(weekday, day_of_year));
        }
        Ok(map)
    }

    fn rule_profiles(&self, schedule: &ScheduleRef) -> Result<Vec<(RuleId, DayProfile)>, SynthError> {
        let name = match schedule {
            ScheduleRef::Constant(value) => {
                return Ok(vec![(RuleId::Default, DayProfile::constant(*value))]);
            }
            ScheduleRef::Ruleset(name) => name,
        };
        let ruleset = self.ruleset(name)?;
        let mut profiles = Vec::with_capacity(ruleset.rules.len() + 1);
        profiles.push((RuleId::Default, ruleset.default_profile.clone()));
        for (index, rule) in ruleset.rules.iter().enumerate().rev() {
            profiles.push((RuleId::Rule(index), rule.profile.clone()));
        }
        Ok(profiles)
    }
}
