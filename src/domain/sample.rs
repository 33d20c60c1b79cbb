use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// One observation from the data source (or one imported CSV row).
///
/// A value of `0.0` means "nothing observed for this field at this instant".
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub timestamp: NaiveDateTime,
    pub price: f64,
    pub hashrate: f64,
}

impl Sample {
    pub fn new(timestamp: NaiveDateTime, price: f64, hashrate: f64) -> Self {
        Sample {
            timestamp: truncate_to_second(timestamp),
            price,
            hashrate,
        }
    }

    /// True when at least one field carries a real reading
    pub fn has_reading(&self) -> bool {
        self.price > 0.0 || self.hashrate > 0.0
    }
}

// Timestamps are compared for exact equality when deduplicating, so sub-second
// noise from the clock must not leak in.
fn truncate_to_second(ts: NaiveDateTime) -> NaiveDateTime {
    ts.with_nanosecond(0).unwrap_or(ts)
}
