use chrono::{NaiveDate, NaiveDateTime};

use crate::analysis::range_filter::filter_by_range;
use crate::analysis::resample::{ResampleOptions, resample_by_token};
use crate::config::settings::ALL_DATA_TIMESPAN;
use crate::domain::Sample;
use crate::utils::time_utils::{date_at_time_of, start_of_day};

/// What the chart is currently looking at.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewRequest {
    pub timespan: String,
    /// Inclusive, from midnight. `None` means from the first sample.
    pub start: Option<NaiveDate>,
    /// Inclusive, up to the current time of day on this date. `None` means no upper bound.
    pub end: Option<NaiveDate>,
}

impl Default for ViewRequest {
    fn default() -> Self {
        Self {
            timespan: ALL_DATA_TIMESPAN.to_string(),
            start: None,
            end: None,
        }
    }
}

impl ViewRequest {
    /// Timestamp bounds for the date filter, given the wall clock `now`.
    pub fn bounds(&self, now: NaiveDateTime) -> (NaiveDateTime, NaiveDateTime) {
        let start = self.start.map(start_of_day).unwrap_or(NaiveDateTime::MIN);
        let end = self
            .end
            .map(|date| date_at_time_of(date, now))
            .unwrap_or(NaiveDateTime::MAX);
        (start, end)
    }

    /// Resample by timespan, then keep what falls inside the date bounds.
    pub fn apply(&self, samples: &[Sample], now: NaiveDateTime, options: &ResampleOptions) -> Vec<Sample> {
        let resampled = resample_by_token(samples, &self.timespan, options);
        let (start, end) = self.bounds(now);
        filter_by_range(&resampled, start, end)
    }
}
