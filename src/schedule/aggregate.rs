//! Weighted occupancy aggregation across a group of spaces.

use tracing::debug;

use crate::store::ScheduleStore;

use super::types::{AnnualSeries, HOURS_PER_YEAR, ScheduleRef, Space, SynthError};

/// Combined fractional occupancy for a group of spaces, with provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct OccupancyAggregate {
    /// Fractional occupancy series, nominal range `[0, 1]`.
    pub series: AnnualSeries,
    /// Sum of design occupant counts across all contributing schedules.
    pub total_design_occupancy: f64,
    /// Number of distinct schedules that contributed weight.
    pub schedule_count: usize,
}

fn round6(value: f64) -> f64 {
    (value * 1e6).round() / 1e6
}

/// Aggregates every people load across `spaces` into one fractional
/// occupancy series.
///
/// Occupant counts are merged per distinct schedule reference (loads sharing
/// a schedule add together), zero-weight references are dropped, each
/// surviving schedule's hourly values are weighted by its occupant count and
/// rounded to 6 decimals, and the element-wise sum is normalized by the total
/// design occupancy. A zero total produces the all-zero series.
///
/// # Errors
///
/// Returns [`SynthError::NoSpaces`] for an empty space list and propagates
/// store expansion failures.
pub fn aggregate_occupancy(
    spaces: &[Space],
    store: &impl ScheduleStore,
    year: i32,
) -> Result<OccupancyAggregate, SynthError> {
    if spaces.is_empty() {
        return Err(SynthError::NoSpaces);
    }

    // 1. Merge occupant counts per distinct schedule, keeping first-seen order
    let mut merged: Vec<(ScheduleRef, f64)> = Vec::new();
    for space in spaces {
        for load in &space.people {
            match merged.iter_mut().find(|(s, _)| *s == load.schedule) {
                Some((_, occupants)) => *occupants += load.occupants,
                None => merged.push((load.schedule.clone(), load.occupants)),
            }
        }
    }

    // 2. Drop schedules that carry no weight
    merged.retain(|(_, occupants)| *occupants != 0.0);
    let total_design_occupancy: f64 = merged.iter().map(|(_, occupants)| occupants).sum();
    debug!(
        spaces = spaces.len(),
        schedules = merged.len(),
        total = total_design_occupancy,
        "merged occupancy schedules"
    );

    // 3. Nothing to weight by: degenerate all-zero result
    if total_design_occupancy == 0.0 {
        return Ok(OccupancyAggregate {
            series: AnnualSeries::zeros(),
            total_design_occupancy: 0.0,
            schedule_count: 0,
        });
    }

    // 4./5. Weight each schedule by its occupant count and sum element-wise
    let schedule_count = merged.len();
    let mut combined = vec![0.0_f64; HOURS_PER_YEAR];
    for (schedule, occupants) in &merged {
        let series = store.expand(schedule, year)?;
        for (acc, value) in combined.iter_mut().zip(series.values()) {
            *acc += round6(value * occupants);
        }
    }

    // 6. Normalize to a fraction of the total design occupancy
    for value in &mut combined {
        *value /= total_design_occupancy;
    }

    Ok(OccupancyAggregate {
        series: AnnualSeries::from_values(combined)?,
        total_design_occupancy,
        schedule_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::types::PeopleLoad;
    use crate::store::MemoryStore;

    const YEAR: i32 = 2009;

    fn space_with(loads: Vec<PeopleLoad>) -> Space {
        Space {
            name: "s".to_string(),
            hours_of_operation: None,
            people: loads,
        }
    }

    fn load(schedule: ScheduleRef, occupants: f64) -> PeopleLoad {
        PeopleLoad {
            schedule,
            occupants,
        }
    }

    #[test]
    fn empty_space_list_is_usage_error() {
        let store = MemoryStore::new();
        assert!(matches!(
            aggregate_occupancy(&[], &store, YEAR),
            Err(SynthError::NoSpaces)
        ));
    }

    #[test]
    fn equal_weights_of_complementary_schedules_give_half() {
        let store = MemoryStore::new();
        let spaces = vec![space_with(vec![
            load(ScheduleRef::Constant(0.25), 10.0),
            load(ScheduleRef::Constant(0.75), 10.0),
        ])];
        let aggregate =
            aggregate_occupancy(&spaces, &store, YEAR).expect("spaces are non-empty");
        assert!(aggregate.series.values().iter().all(|&v| v == 0.5));
        assert_eq!(aggregate.total_design_occupancy, 20.0);
        assert_eq!(aggregate.schedule_count, 2);
    }

    #[test]
    fn co_scheduled_loads_merge_additively() {
        let store = MemoryStore::new();
        let spaces = vec![
            space_with(vec![load(ScheduleRef::Constant(1.0), 5.0)]),
            space_with(vec![load(ScheduleRef::Constant(1.0), 15.0)]),
        ];
        let aggregate =
            aggregate_occupancy(&spaces, &store, YEAR).expect("spaces are non-empty");
        assert_eq!(aggregate.schedule_count, 1);
        assert_eq!(aggregate.total_design_occupancy, 20.0);
        assert!(aggregate.series.values().iter().all(|&v| v == 1.0));
    }

    #[test]
    fn zero_weight_schedule_has_no_influence() {
        let store = MemoryStore::new();
        let with_ghost = vec![space_with(vec![
            load(ScheduleRef::Constant(0.4), 10.0),
            load(ScheduleRef::Constant(0.9), 0.0),
        ])];
        let without_ghost = vec![space_with(vec![load(ScheduleRef::Constant(0.4), 10.0)])];
        let a = aggregate_occupancy(&with_ghost, &store, YEAR).expect("non-empty");
        let b = aggregate_occupancy(&without_ghost, &store, YEAR).expect("non-empty");
        assert_eq!(a, b);
    }

    #[test]
    fn zero_total_occupancy_yields_all_zero_series() {
        let store = MemoryStore::new();
        let spaces = vec![space_with(vec![load(ScheduleRef::Constant(0.9), 0.0)])];
        let aggregate =
            aggregate_occupancy(&spaces, &store, YEAR).expect("spaces are non-empty");
        assert_eq!(aggregate.series, AnnualSeries::zeros());
        assert_eq!(aggregate.total_design_occupancy, 0.0);
        assert_eq!(aggregate.schedule_count, 0);
    }

    #[test]
    fn spaces_without_people_yield_all_zero_series() {
        let store = MemoryStore::new();
        let spaces = vec![space_with(Vec::new())];
        let aggregate =
            aggregate_occupancy(&spaces, &store, YEAR).expect("spaces are non-empty");
        assert_eq!(aggregate.series, AnnualSeries::zeros());
    }

    #[test]
    fn weighting_rounds_to_six_decimals() {
        let store = MemoryStore::new();
        // 1/3 * 1.0 rounds to 0.333333 before normalization
        let spaces = vec![space_with(vec![load(
            ScheduleRef::Constant(1.0 / 3.0),
            1.0,
        )])];
        let aggregate =
            aggregate_occupancy(&spaces, &store, YEAR).expect("spaces are non-empty");
        assert_eq!(aggregate.series.values()[0], 0.333333);
    }
}
