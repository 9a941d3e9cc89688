//! Shared test fixtures for integration tests.

use occ_synth::schedule::day_profile::DayProfile;
use occ_synth::schedule::types::{PeopleLoad, ScheduleRef, Space};
use occ_synth::store::{MemoryStore, RulesetSchedule, ScheduleRule};

/// Reference year used by every integration test (starts on a Thursday).
pub const YEAR: i32 = 2009;

/// Binary day profile occupied between `start` and `end`.
pub fn window_profile(start: f64, end: f64) -> DayProfile {
    DayProfile::new(vec![(start, 0.0), (end, 1.0), (24.0, 0.0)])
        .expect("test profile should be valid")
}

/// Hours-of-operation schedule: the given window on weekdays, a shorter
/// Saturday window, closed on Sundays.
pub fn office_hours_schedule(start: f64, end: f64) -> RulesetSchedule {
    let mut schedule = RulesetSchedule::new(window_profile(start, end));
    schedule.add_rule(ScheduleRule::new(
        window_profile(start, start + 4.0),
        ScheduleRule::SATURDAY,
    ));
    schedule.add_rule(ScheduleRule::new(
        DayProfile::constant(0.0),
        ScheduleRule::SUNDAY,
    ));
    schedule
}

/// Fractional occupancy schedule peaking at `peak` during business hours,
/// empty on weekends.
pub fn occupancy_schedule(peak: f64) -> RulesetSchedule {
    let default = DayProfile::new(vec![(7.0, 0.0), (18.0, peak), (24.0, 0.0)])
        .expect("test profile should be valid");
    let mut schedule = RulesetSchedule::new(default);
    schedule.add_rule(ScheduleRule::new(
        DayProfile::constant(0.0),
        ScheduleRule::SATURDAY,
    ));
    schedule.add_rule(ScheduleRule::new(
        DayProfile::constant(0.0),
        ScheduleRule::SUNDAY,
    ));
    schedule
}

/// Store pre-loaded with the named schedules.
pub fn store_with(schedules: Vec<(&str, RulesetSchedule)>) -> MemoryStore {
    let mut store = MemoryStore::new();
    for (name, schedule) in schedules {
        store.insert(name, schedule);
    }
    store
}

/// Space with one people load on a named schedule.
pub fn space(name: &str, hours: Option<&str>, people_schedule: &str, occupants: f64) -> Space {
    Space {
        name: name.to_string(),
        hours_of_operation: hours.map(|h| ScheduleRef::Ruleset(h.to_string())),
        people: vec![PeopleLoad {
            schedule: ScheduleRef::Ruleset(people_schedule.to_string()),
            occupants,
        }],
    }
}

/// Space with one constant-fraction people load and no hours of operation.
pub fn constant_space(name: &str, fraction: f64, occupants: f64) -> Space {
    Space {
        name: name.to_string(),
        hours_of_operation: None,
        people: vec![PeopleLoad {
            schedule: ScheduleRef::Constant(fraction),
            occupants,
        }],
    }
}
