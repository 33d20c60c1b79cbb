//! Log-log least squares fit of `ln(value) = exponent * ln(days_since_genesis) + intercept`.

use chrono::{Duration, NaiveDateTime};
use itertools::izip;
use thiserror::Error;

#[cfg(debug_assertions)]
use crate::config::debug::PRINT_REGRESSION_SUMS;
use crate::domain::{Metric, Sample};
use crate::models::RegressionResult;
use crate::utils::time_utils::{days_between, format_datetime};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegressionError {
    #[error("regression inputs differ in length (x: {x}, y: {y})")]
    LengthMismatch { x: usize, y: usize },
    #[error("degenerate fit (slope: {slope}, intercept: {intercept})")]
    Degenerate { slope: f64, intercept: f64 },
    #[error("cannot extend the bands by {extend_days} days (max {max_days})")]
    ExtensionOutOfRange { extend_days: u32, max_days: u32 },
}

/// Collector for the human-readable trace of a fit.
pub trait DiagnosticSink {
    fn note(&mut self, line: String);
}

impl DiagnosticSink for Vec<String> {
    fn note(&mut self, line: String) {
        self.push(line);
    }
}

/// Forwards every line to the `log` facade at info level.
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn note(&mut self, line: String) {
        log::info!("{}", line);
    }
}

fn note(sink: &mut Option<&mut (dyn DiagnosticSink + '_)>, line: impl FnOnce() -> String) {
    if let Some(sink) = sink.as_deref_mut() {
        sink.note(line());
    }
}

/// The genesis actually used for `samples`.
///
/// Day zero has to come strictly before every sample, otherwise the log of the
/// day count is undefined. A genesis on or after the earliest sample is moved
/// to one day before it.
pub fn effective_genesis(genesis: NaiveDateTime, samples: &[Sample]) -> NaiveDateTime {
    match samples.iter().map(|s| s.timestamp).min() {
        Some(earliest) if genesis >= earliest => earliest - Duration::days(1),
        _ => genesis,
    }
}

/// Days since genesis, with non-positive values clamped to one day.
#[inline]
fn clamped_delta_days(genesis: NaiveDateTime, ts: NaiveDateTime) -> f64 {
    let delta = days_between(genesis, ts);
    if delta <= 0.0 { 1.0 } else { delta }
}

/// Fit the power law for `metric` over `samples`.
///
/// Samples whose metric value is not positive are left out of the fit. An
/// empty input (or one with no positive value) yields the all-NaN sentinel.
pub fn regress(
    samples: &[Sample],
    genesis: NaiveDateTime,
    metric: Metric,
    mut sink: Option<&mut (dyn DiagnosticSink + '_)>,
) -> Result<RegressionResult, RegressionError> {
    if samples.is_empty() {
        note(&mut sink, || "No data points, regression skipped".to_string());
        return Ok(RegressionResult::nan());
    }

    let genesis_used = effective_genesis(genesis, samples);
    if genesis_used != genesis {
        note(&mut sink, || {
            format!(
                "Genesis {} is not before the first sample, using {}",
                format_datetime(genesis),
                format_datetime(genesis_used)
            )
        });
    }

    let (log_deltas, log_values): (Vec<f64>, Vec<f64>) = samples
        .iter()
        .filter_map(|s| {
            let value = metric.value(s);
            (value > 0.0).then(|| (clamped_delta_days(genesis_used, s.timestamp).ln(), value.ln()))
        })
        .unzip();

    let skipped = samples.len() - log_values.len();
    if skipped > 0 {
        note(&mut sink, || format!("Skipped {} samples with no {}", skipped, metric));
    }
    if log_values.is_empty() {
        note(&mut sink, || format!("No positive {} values, regression skipped", metric));
        return Ok(RegressionResult::nan());
    }

    let result = least_squares(&log_deltas, &log_values)?;

    #[cfg(debug_assertions)]
    if PRINT_REGRESSION_SUMS {
        log::info!(
            "Regression sums n={} ΣX={:.6} ΣY={:.6} ΣXY={:.6} ΣX²={:.6} ΣY²={:.6}",
            result.n,
            result.sum_x,
            result.sum_y,
            result.sum_xy,
            result.sum_x2,
            result.sum_y2
        );
    }

    note(&mut sink, || format!("Data points: {}", result.n));
    note(&mut sink, || {
        format!(
            "Sums: X={:.6} Y={:.6} XY={:.6} X2={:.6} Y2={:.6}",
            result.sum_x, result.sum_y, result.sum_xy, result.sum_x2, result.sum_y2
        )
    });
    note(&mut sink, || {
        format!(
            "Exponent: {:.6}  Fair constant: {:.6e}  R²: {:.6}",
            result.exponent, result.fair_price_constant, result.r_squared
        )
    });

    Ok(result)
}

/// Ordinary least squares of `ys` on `xs`.
pub fn least_squares(xs: &[f64], ys: &[f64]) -> Result<RegressionResult, RegressionError> {
    if xs.len() != ys.len() {
        return Err(RegressionError::LengthMismatch {
            x: xs.len(),
            y: ys.len(),
        });
    }

    let n = xs.len() as f64;
    let (mut sum_x, mut sum_y, mut sum_xy, mut sum_x2, mut sum_y2) = (0.0, 0.0, 0.0, 0.0, 0.0);
    for (&x, &y) in izip!(xs, ys) {
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_x2 += x * x;
        sum_y2 += y * y;
    }

    let numerator = n * sum_xy - sum_x * sum_y;
    let x_spread = n * sum_x2 - sum_x * sum_x;
    let y_spread = n * sum_y2 - sum_y * sum_y;

    // Identical x values leave the slope undefined; rounding must not turn that into a huge number
    let slope = match xs.first() {
        Some(first) if xs.iter().any(|x| x != first) => numerator / x_spread,
        _ => f64::NAN,
    };
    let intercept = (sum_y - slope * sum_x) / n;

    if slope.is_nan() || intercept.is_nan() {
        return Err(RegressionError::Degenerate { slope, intercept });
    }

    let r = numerator / (x_spread * y_spread).sqrt();

    Ok(RegressionResult {
        exponent: slope,
        fair_price_constant: intercept.exp(),
        r_squared: r * r,
        sum_x,
        sum_y,
        sum_xy,
        sum_x2,
        sum_y2,
        n: xs.len(),
    })
}
