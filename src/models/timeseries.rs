use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::Sample;

// ============================================================================
// TimeSeriesStore: the canonical (timestamp, price, hashrate) collection
// ============================================================================

/// Owns the one and only copy of the sample history.
///
/// Keyed by timestamp, so there is at most one sample per instant and
/// iteration is always chronological. Callers only ever receive copies.
#[derive(Serialize, Deserialize, Debug, Default, Clone)]
pub struct TimeSeriesStore {
    samples: BTreeMap<NaiveDateTime, Sample>,
}

/// The most recent known readings, as shown on the status line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatestReading {
    pub timestamp: NaiveDateTime,
    /// Last positive price seen, 0.0 if none
    pub price: f64,
    /// Last positive hashrate seen, 0.0 if none
    pub hashrate: f64,
}

impl TimeSeriesStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_samples(samples: Vec<Sample>) -> Self {
        let mut store = Self::new();
        store.replace(samples);
        store
    }

    /// Live-fetch accumulation.
    ///
    /// Discards the reading when neither field is positive. On a timestamp
    /// collision only the positive fields overwrite, so a failed fetch of one
    /// field never erases a known value.
    pub fn upsert(&mut self, timestamp: NaiveDateTime, price: f64, hashrate: f64) {
        let incoming = Sample::new(timestamp, price, hashrate);
        if !incoming.has_reading() {
            return;
        }

        match self.samples.get_mut(&incoming.timestamp) {
            Some(existing) => {
                if price > 0.0 {
                    existing.price = price;
                }
                if hashrate > 0.0 {
                    existing.hashrate = hashrate;
                }
            }
            None => {
                self.samples.insert(incoming.timestamp, incoming);
            }
        }
    }

    /// Bulk reconciliation with authoritative (imported) data.
    ///
    /// Unlike `upsert`, a matching timestamp is overwritten unconditionally,
    /// zeros included.
    pub fn merge(&mut self, incoming: impl IntoIterator<Item = Sample>) {
        for sample in incoming {
            let sample = Sample::new(sample.timestamp, sample.price, sample.hashrate);
            self.samples
                .entry(sample.timestamp)
                .and_modify(|existing| {
                    existing.price = sample.price;
                    existing.hashrate = sample.hashrate;
                })
                .or_insert(sample);
        }
    }

    /// Wholesale replacement ("use only this imported data").
    /// Duplicate timestamps in `samples` collapse to the last occurrence.
    pub fn replace(&mut self, samples: Vec<Sample>) {
        self.samples = samples
            .into_iter()
            .map(|s| {
                let s = Sample::new(s.timestamp, s.price, s.hashrate);
                (s.timestamp, s)
            })
            .collect();
    }

    /// Chronologically sorted, independent copy of every sample.
    pub fn snapshot(&self) -> Vec<Sample> {
        self.samples.values().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn get(&self, timestamp: &NaiveDateTime) -> Option<&Sample> {
        self.samples.get(timestamp)
    }

    /// (earliest, latest) timestamps, if any
    pub fn date_span(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let first = self.samples.keys().next()?;
        let last = self.samples.keys().next_back()?;
        Some((*first, *last))
    }

    /// Latest timestamp plus the latest positive price and hashrate.
    pub fn latest(&self) -> Option<LatestReading> {
        let (timestamp, _) = self.date_span()?;
        let mut reading = LatestReading {
            timestamp,
            price: 0.0,
            hashrate: 0.0,
        };
        for sample in self.samples.values() {
            if sample.price > 0.0 {
                reading.price = sample.price;
            }
            if sample.hashrate > 0.0 {
                reading.hashrate = sample.hashrate;
            }
            reading.timestamp = sample.timestamp;
        }
        Some(reading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_upsert_same_reading_twice_keeps_one_sample() {
        let mut store = TimeSeriesStore::new();
        store.upsert(ts(1, 0), 0.12, 500.0);
        store.upsert(ts(1, 0), 0.12, 500.0);
        assert_eq!(store.len(), 1);
        assert_eq!(store.snapshot(), vec![Sample::new(ts(1, 0), 0.12, 500.0)]);
    }

    #[test]
    fn test_upsert_zero_guard() {
        let mut store = TimeSeriesStore::new();
        store.upsert(ts(1, 0), 0.0, 0.0);
        assert!(store.is_empty());

        store.upsert(ts(1, 0), 5.0, 0.0);
        store.upsert(ts(1, 0), 0.0, 100.0);
        assert_eq!(store.snapshot(), vec![Sample::new(ts(1, 0), 5.0, 100.0)]);

        // A later zero price must not erase the known one
        store.upsert(ts(1, 0), 0.0, 200.0);
        assert_eq!(store.get(&ts(1, 0)).unwrap().price, 5.0);
        assert_eq!(store.get(&ts(1, 0)).unwrap().hashrate, 200.0);
    }

    #[test]
    fn test_merge_overwrites_unconditionally() {
        let mut store = TimeSeriesStore::new();
        store.upsert(ts(1, 0), 9.0, 9.0);
        store.merge(vec![Sample::new(ts(1, 0), 1.0, 2.0)]);
        assert_eq!(store.snapshot(), vec![Sample::new(ts(1, 0), 1.0, 2.0)]);

        store.merge(vec![Sample::new(ts(1, 0), 3.0, 0.0)]);
        assert_eq!(store.get(&ts(1, 0)).unwrap().hashrate, 0.0);
    }

    #[test]
    fn test_merge_appends_new_timestamps_sorted() {
        let mut store = TimeSeriesStore::new();
        store.upsert(ts(5, 0), 1.0, 0.0);
        store.merge(vec![
            Sample::new(ts(3, 0), 2.0, 0.0),
            Sample::new(ts(7, 0), 3.0, 0.0),
        ]);
        let times: Vec<_> = store.snapshot().iter().map(|s| s.timestamp).collect();
        assert_eq!(times, vec![ts(3, 0), ts(5, 0), ts(7, 0)]);
    }

    #[test]
    fn test_snapshot_sorted_regardless_of_insertion_order() {
        let mut store = TimeSeriesStore::new();
        for (day, hour) in [(9, 4), (2, 23), (9, 1), (1, 0), (5, 12)] {
            store.upsert(ts(day, hour), day as f64, 0.0);
        }
        let snap = store.snapshot();
        assert!(snap.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    }

    #[test]
    fn test_snapshot_is_independent_copy() {
        let mut store = TimeSeriesStore::new();
        store.upsert(ts(1, 0), 1.0, 1.0);
        let mut snap = store.snapshot();
        snap[0].price = 42.0;
        snap.clear();
        assert_eq!(store.get(&ts(1, 0)).unwrap().price, 1.0);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_replace_discards_previous_history() {
        let mut store = TimeSeriesStore::new();
        store.upsert(ts(1, 0), 1.0, 1.0);
        store.replace(vec![
            Sample::new(ts(4, 0), 4.0, 0.0),
            Sample::new(ts(2, 0), 2.0, 0.0),
        ]);
        assert_eq!(store.len(), 2);
        assert!(store.get(&ts(1, 0)).is_none());
        assert_eq!(store.date_span(), Some((ts(2, 0), ts(4, 0))));
    }

    #[test]
    fn test_latest_skips_zero_fields() {
        let mut store = TimeSeriesStore::new();
        assert!(store.latest().is_none());
        store.upsert(ts(1, 0), 0.10, 300.0);
        store.upsert(ts(2, 0), 0.11, 0.0);
        store.upsert(ts(3, 0), 0.0, 310.0);
        let latest = store.latest().unwrap();
        assert_eq!(latest.timestamp, ts(3, 0));
        assert_eq!(latest.price, 0.11);
        assert_eq!(latest.hashrate, 310.0);
    }
}
