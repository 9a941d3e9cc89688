//! Per-space hours-of-operation resolution and modal multi-space reduction.

use std::fmt;

use tracing::warn;

use crate::store::ScheduleStore;

use super::types::{RuleId, ScheduleRef, Space, SynthError};

/// Occupied window and active days for one rule of an hours-of-operation
/// schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct HoursOfOperationEntry {
    /// Rule this entry was extracted from.
    pub rule: RuleId,
    /// Hour the occupied window opens.
    pub start: f64,
    /// Hour the occupied window closes (before `start` when wrapping midnight).
    pub end: f64,
    /// Occupied hours per day.
    pub duration: f64,
    /// Sorted 1-based days of year this rule governs.
    pub days: Vec<u16>,
}

/// One space's operating pattern: an entry per schedule rule, default first,
/// then explicit rules most-recently-defined first.
///
/// Structural equality over all entries drives the modal reduction across
/// spaces.
#[derive(Debug, Clone, PartialEq)]
pub struct HoursOfOperationTable {
    /// Entries in override priority order.
    pub entries: Vec<HoursOfOperationEntry>,
}

impl fmt::Display for HoursOfOperationTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.entries.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(
                f,
                "{:>8}: start {:>5.1}  end {:>5.1}  hours {:>4.1}  days {}",
                e.rule.to_string(),
                e.start,
                e.end,
                e.duration,
                e.days.len()
            )?;
        }
        Ok(())
    }
}

/// Resolves one hours-of-operation schedule into a per-rule table.
///
/// Extracts the occupied window from every rule profile and collects the days
/// each rule governs from the store's active-rule map. A single indeterminate
/// profile makes the whole schedule indeterminate (`Ok(None)`); the caller
/// decides how to report it.
///
/// # Errors
///
/// Propagates store failures (unknown schedule, invalid reference year).
pub fn resolve_schedule_hours(
    store: &impl ScheduleStore,
    schedule: &ScheduleRef,
    year: i32,
) -> Result<Option<HoursOfOperationTable>, SynthError> {
    let rule_map = store.active_rule_map(schedule, year)?;
    let profiles = store.rule_profiles(schedule)?;

    let mut entries = Vec::with_capacity(profiles.len());
    for (rule, profile) in profiles {
        let Some(window) = profile.operating_window() else {
            return Ok(None);
        };
        let days: Vec<u16> = rule_map
            .iter()
            .enumerate()
            .filter(|(_, active)| **active == rule)
            .map(|(i, _)| i as u16 + 1)
            .collect();
        entries.push(HoursOfOperationEntry {
            rule,
            start: window.start,
            end: window.end,
            duration: window.duration,
            days,
        });
    }
    Ok(Some(HoursOfOperationTable { entries }))
}

/// Picks the most frequent table by structural equality.
///
/// Representatives are kept in first-occurrence order and ties keep the
/// earlier table, so selection is stable for any input order. An empty input
/// yields `None`; absence is the caller's to handle, not an error.
pub fn modal_table(tables: &[HoursOfOperationTable]) -> Option<&HoursOfOperationTable> {
    // Insertion-ordered frequency map; each representative is the index of a
    // table's first occurrence
    let mut representatives: Vec<(usize, usize)> = Vec::new();
    for (index, table) in tables.iter().enumerate() {
        match representatives
            .iter_mut()
            .find(|(first, _)| &tables[*first] == table)
        {
            Some((_, count)) => *count += 1,
            None => representatives.push((index, 1)),
        }
    }
    let mut best: Option<(usize, usize)> = None;
    for &(first, count) in &representatives {
        if best.is_none_or(|(_, c)| count > c) {
            best = Some((first, count));
        }
    }
    best.map(|(first, _)| &tables[first])
}

/// Resolves hours of operation for a group of spaces and reduces them to the
/// modal table.
///
/// Spaces without an hours-of-operation schedule, or whose schedule is
/// indeterminate, are excluded with a warning diagnostic. `Ok(None)` means no
/// space produced a usable table.
///
/// # Errors
///
/// Returns [`SynthError::NoSpaces`] for an empty space list and propagates
/// store failures.
pub fn spaces_hours_of_operation(
    spaces: &[Space],
    store: &impl ScheduleStore,
    year: i32,
) -> Result<Option<HoursOfOperationTable>, SynthError> {
    if spaces.is_empty() {
        return Err(SynthError::NoSpaces);
    }

    let mut tables = Vec::with_capacity(spaces.len());
    for space in spaces {
        let Some(schedule) = &space.hours_of_operation else {
            warn!(space = %space.name, "hours of operation schedule is not set");
            continue;
        };
        match resolve_schedule_hours(store, schedule, year)? {
            Some(table) => tables.push(table),
            None => warn!(
                space = %space.name,
                schedule = %schedule,
                "schedule does not look like a valid hours of operation schedule"
            ),
        }
    }
    Ok(modal_table(&tables).cloned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::day_profile::DayProfile;
    use crate::schedule::types::ScheduleRef;
    use crate::store::{MemoryStore, RulesetSchedule, ScheduleRule};

    const YEAR: i32 = 2009;

    fn window_profile(start: f64, end: f64) -> DayProfile {
        DayProfile::new(vec![(start, 0.0), (end, 1.0), (24.0, 0.0)])
            .expect("test profile should be valid")
    }

    fn hoo_schedule(start: f64, end: f64) -> RulesetSchedule {
        let mut schedule = RulesetSchedule::new(window_profile(start, end));
        schedule.add_rule(ScheduleRule::new(
            DayProfile::constant(0.0),
            ScheduleRule::SUNDAY,
        ));
        schedule
    }

    fn entry_table(start: f64) -> HoursOfOperationTable {
        HoursOfOperationTable {
            entries: vec![HoursOfOperationEntry {
                rule: RuleId::Default,
                start,
                end: start + 8.0,
                duration: 8.0,
                days: vec![1],
            }],
        }
    }

    fn space(name: &str, schedule: Option<&str>) -> Space {
        Space {
            name: name.to_string(),
            hours_of_operation: schedule.map(|s| ScheduleRef::Ruleset(s.to_string())),
            people: Vec::new(),
        }
    }

    #[test]
    fn resolver_builds_table_with_day_partition() {
        let mut store = MemoryStore::new();
        store.insert("hoo", hoo_schedule(8.0, 18.0));
        let table = resolve_schedule_hours(&store, &ScheduleRef::Ruleset("hoo".to_string()), YEAR)
            .expect("store lookup should succeed")
            .expect("schedule is a valid hours of operation schedule");

        assert_eq!(table.entries.len(), 2);
        assert_eq!(table.entries[0].rule, RuleId::Default);
        assert_eq!(table.entries[0].duration, 10.0);
        assert_eq!(table.entries[1].rule, RuleId::Rule(0));
        assert_eq!(table.entries[1].duration, 0.0);

        // Sundays go to the rule, everything else to the default; together
        // they cover the year exactly once
        let default_days = table.entries[0].days.len();
        let sunday_days = table.entries[1].days.len();
        assert_eq!(sunday_days, 52);
        assert_eq!(default_days + sunday_days, 365);
    }

    #[test]
    fn indeterminate_rule_poisons_whole_schedule() {
        let mut schedule = RulesetSchedule::new(window_profile(8.0, 18.0));
        schedule.add_rule(ScheduleRule::new(
            DayProfile::constant(0.5),
            ScheduleRule::SATURDAY,
        ));
        let mut store = MemoryStore::new();
        store.insert("bad", schedule);
        let result = resolve_schedule_hours(&store, &ScheduleRef::Ruleset("bad".to_string()), YEAR)
            .expect("store lookup should succeed");
        assert!(result.is_none());
    }

    #[test]
    fn modal_picks_most_frequent() {
        let tables = vec![entry_table(7.0), entry_table(9.0), entry_table(9.0)];
        assert_eq!(modal_table(&tables), Some(&tables[1]));
    }

    #[test]
    fn modal_tie_keeps_first_occurrence() {
        let tables = vec![entry_table(7.0), entry_table(9.0)];
        assert_eq!(modal_table(&tables), Some(&tables[0]));
    }

    #[test]
    fn modal_of_empty_is_none() {
        assert_eq!(modal_table(&[]), None);
    }

    #[test]
    fn spaces_reduction_skips_unusable_spaces() {
        let mut store = MemoryStore::new();
        store.insert("hoo", hoo_schedule(8.0, 18.0));
        let spaces = vec![
            space("s1", Some("hoo")),
            space("s2", None),
            space("s3", Some("hoo")),
        ];
        let table = spaces_hours_of_operation(&spaces, &store, YEAR)
            .expect("non-empty space list")
            .expect("two spaces resolve");
        assert_eq!(table.entries[0].duration, 10.0);
    }

    #[test]
    fn empty_space_list_is_usage_error() {
        let store = MemoryStore::new();
        let result = spaces_hours_of_operation(&[], &store, YEAR);
        assert!(matches!(result, Err(SynthError::NoSpaces)));
    }

    #[test]
    fn all_indeterminate_spaces_yield_absence() {
        let mut store = MemoryStore::new();
        store.insert(
            "frac",
            RulesetSchedule::new(DayProfile::constant(0.5)),
        );
        let spaces = vec![space("s1", Some("frac"))];
        let result = spaces_hours_of_operation(&spaces, &store, YEAR)
            .expect("non-empty space list");
        assert!(result.is_none());
    }
}
