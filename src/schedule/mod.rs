//! Hours-of-operation extraction and multi-space occupancy schedule synthesis.

/// Weighted occupancy aggregation across spaces.
pub mod aggregate;
/// Reference-year calendar classification.
pub mod calendar;
/// Exact-equality day-pattern clustering.
pub mod cluster;
/// Calendar-rule compilation from day patterns.
pub mod compile;
/// Step-function day profiles and occupied-window extraction.
pub mod day_profile;
/// Per-space hours-of-operation resolution and modal reduction.
pub mod hours;
/// Pipeline orchestration and default/rule selection.
pub mod synth;
/// Threshold discretization policies.
pub mod threshold;
pub mod types;

// Re-export the main types for convenience
pub use day_profile::DayProfile;
pub use hours::HoursOfOperationTable;
pub use synth::SynthesizedSchedule;
pub use types::AnnualSeries;
pub use types::ScheduleRef;
pub use types::SynthError;
pub use types::ThresholdPolicy;
