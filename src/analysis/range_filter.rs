use chrono::NaiveDateTime;

use crate::domain::Sample;

/// Samples with `start <= timestamp <= end`, order preserved.
pub fn filter_by_range(samples: &[Sample], start: NaiveDateTime, end: NaiveDateTime) -> Vec<Sample> {
    samples
        .iter()
        .filter(|s| s.timestamp >= start && s.timestamp <= end)
        .copied()
        .collect()
}
