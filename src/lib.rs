//! Occupancy schedule synthesis for building energy models.

pub mod config;
/// CSV export for annual series and synthesized rules.
pub mod io;
/// Hours-of-operation extraction, aggregation, thresholding, and clustering.
pub mod schedule;
/// Schedule store contract and in-memory reference implementation.
pub mod store;
