//! Threshold discretization of fractional occupancy series.

use super::types::{AnnualSeries, HOURS_PER_DAY, ThresholdPolicy};

fn min_max(values: &[f64]) -> (f64, f64) {
    values.iter().fold(
        (f64::INFINITY, f64::NEG_INFINITY),
        |(min, max), &v| (min.min(v), max.max(v)),
    )
}

/// Converts a fractional occupancy series into a binary occupied series
/// according to `policy`; [`ThresholdPolicy::None`] passes the series through
/// unchanged.
///
/// The daily-range policy keeps an all-zero day all-zero for any threshold
/// (a `frac != 0` guard), while the annual-range policy applies no such
/// guard. The asymmetry is observed upstream behavior and is preserved here.
pub fn apply_threshold(series: &AnnualSeries, policy: &ThresholdPolicy) -> AnnualSeries {
    match policy {
        ThresholdPolicy::None => series.clone(),
        ThresholdPolicy::Value(tau) => {
            let values = series
                .values()
                .iter()
                .map(|&frac| if frac >= *tau { 1.0 } else { 0.0 })
                .collect();
            AnnualSeries::from_vec(values)
        }
        ThresholdPolicy::NormalizedDailyRange(tau) => {
            let mut values = Vec::with_capacity(series.values().len());
            for day in series.values().chunks_exact(HOURS_PER_DAY) {
                let (day_min, day_max) = min_max(day);
                let effective = day_min + (day_max - day_min) * tau;
                for &frac in day {
                    let occupied = frac != 0.0 && frac >= effective;
                    values.push(if occupied { 1.0 } else { 0.0 });
                }
            }
            AnnualSeries::from_vec(values)
        }
        ThresholdPolicy::NormalizedAnnualRange(tau) => {
            let (annual_min, annual_max) = min_max(series.values());
            let effective = annual_min + (annual_max - annual_min) * tau;
            let values = series
                .values()
                .iter()
                .map(|&frac| if frac >= effective { 1.0 } else { 0.0 })
                .collect();
            AnnualSeries::from_vec(values)
        }
    }
}
