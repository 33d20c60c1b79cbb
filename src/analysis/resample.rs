//! "View by timespan" down-sampling.
//!
//! Picks a subsequence whose successive gaps match the requested interval to
//! within a tolerance. Live data arrives at irregular times, so the result is
//! only approximately evenly spaced.

use chrono::Duration;

use crate::config::ANALYSIS;
#[cfg(debug_assertions)]
use crate::config::debug::PRINT_RESAMPLE_STATS;
use crate::domain::{Sample, Timespan};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResampleOptions {
    /// Accepted deviation either side of the interval
    pub variance: Duration,
}

impl Default for ResampleOptions {
    fn default() -> Self {
        Self {
            variance: ANALYSIS.resample.variance(),
        }
    }
}

/// Resample by a raw token such as `"15 Minutes"`.
///
/// Any token that does not parse ("All Data", "banana", ...) returns the
/// input unchanged.
pub fn resample_by_token(samples: &[Sample], token: &str, options: &ResampleOptions) -> Vec<Sample> {
    match token.parse::<Timespan>() {
        Ok(span) => resample(samples, &span, options),
        Err(_e) => {
            #[cfg(debug_assertions)]
            if PRINT_RESAMPLE_STATS {
                log::info!("Resample: '{}' is not a timespan ({}), keeping all data", token, _e);
            }
            samples.to_vec()
        }
    }
}

/// Down-sample a chronologically sorted series.
///
/// Starting from the first sample as reference, the first later sample whose
/// gap lies in `[interval - variance, interval + variance]` is emitted and
/// becomes the new reference. When no later sample matches, the reference
/// moves on to the next sample without emitting anything. The very first
/// sample is therefore never part of the output.
pub fn resample(samples: &[Sample], span: &Timespan, options: &ResampleOptions) -> Vec<Sample> {
    let Some(interval) = span.duration() else {
        return samples.to_vec();
    };
    let lower = interval.checked_sub(&options.variance).unwrap_or(interval);
    let upper = interval.checked_add(&options.variance).unwrap_or(interval);

    let mut out = Vec::new();
    let mut reference = 0;

    while reference + 1 < samples.len() {
        let ref_time = samples[reference].timestamp;
        let mut matched = None;

        for (offset, candidate) in samples[reference + 1..].iter().enumerate() {
            let gap = candidate.timestamp - ref_time;
            if gap > upper {
                // Sorted input: nothing further can match this reference
                break;
            }
            if gap >= lower {
                matched = Some(reference + 1 + offset);
                break;
            }
        }

        match matched {
            Some(idx) => {
                out.push(samples[idx]);
                reference = idx;
            }
            None => reference += 1,
        }
    }

    #[cfg(debug_assertions)]
    if PRINT_RESAMPLE_STATS {
        log::info!(
            "Resample {}: {} -> {} samples (tolerance {}s)",
            span,
            samples.len(),
            out.len(),
            options.variance.num_seconds()
        );
    }

    out
}
