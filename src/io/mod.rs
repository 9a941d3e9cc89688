//! File export for synthesized schedules.

pub mod export;
