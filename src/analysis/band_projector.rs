use chrono::{Days, NaiveDate, NaiveDateTime};

use crate::analysis::regression::RegressionError;
use crate::config::ANALYSIS;
use crate::domain::{Metric, Sample};
use crate::models::{BandConstants, BandSeries};
use crate::utils::time_utils::{days_between, start_of_day};

/// Fair constant plus the conventional +/- band offset for support and resistance
pub fn conventional_constants(exponent: f64, fair: f64) -> BandConstants {
    let pl = &ANALYSIS.power_law;
    BandConstants {
        exponent,
        support: fair * pl.support_multiplier(),
        resistance: fair * pl.resistance_multiplier(),
        fair,
    }
}

/// (support, resistance, fair) on a single date.
pub fn power_law_prices(
    exponent: f64,
    fair: f64,
    genesis: NaiveDateTime,
    as_of: NaiveDateTime,
) -> (f64, f64, f64) {
    conventional_constants(exponent, fair).values_at(days_between(genesis, as_of))
}

/// Band values over the observed samples, then one point per day up to `end_date`.
///
/// Samples whose `metric` value is not positive get no band point, so the
/// result need not line up one-to-one with `samples`. Extrapolated points
/// sit at midnight of each day after the latest sample's date.
pub fn project(
    genesis: NaiveDateTime,
    samples: &[Sample],
    constants: &BandConstants,
    end_date: NaiveDate,
    metric: Metric,
) -> BandSeries {
    let Some(latest) = samples.iter().map(|s| s.timestamp).max() else {
        return BandSeries::default();
    };

    let mut bands = BandSeries::with_capacity(samples.len());
    for sample in samples.iter().filter(|s| metric.value(s) > 0.0) {
        let delta = days_between(genesis, sample.timestamp);
        bands.push(sample.timestamp, constants.values_at(delta));
    }

    let mut next = latest.date().succ_opt();
    while let Some(day) = next.filter(|d| *d <= end_date) {
        let date = start_of_day(day);
        bands.push(date, constants.values_at(days_between(genesis, date)));
        next = day.succ_opt();
    }

    bands
}

/// `project` with the end date given as days past the latest sample.
///
/// Fails when `extend_days` is above the configured maximum or the end date
/// would fall off the calendar.
pub fn project_with_extension(
    genesis: NaiveDateTime,
    samples: &[Sample],
    constants: &BandConstants,
    extend_days: u32,
    metric: Metric,
) -> Result<BandSeries, RegressionError> {
    let Some(latest) = samples.iter().map(|s| s.timestamp).max() else {
        return Ok(BandSeries::default());
    };
    let max_days = ANALYSIS.power_law.max_extend_days;
    let end_date = Some(extend_days)
        .filter(|days| *days <= max_days)
        .and_then(|days| latest.date().checked_add_days(Days::new(u64::from(days))))
        .ok_or(RegressionError::ExtensionOutOfRange {
            extend_days,
            max_days,
        })?;
    Ok(project(genesis, samples, constants, end_date, metric))
}
