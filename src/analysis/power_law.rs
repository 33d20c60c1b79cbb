use chrono::NaiveDateTime;

use crate::analysis::band_projector::{conventional_constants, project_with_extension};
use crate::analysis::regression::{DiagnosticSink, RegressionError, effective_genesis, regress};
use crate::domain::{Metric, Sample};
use crate::models::{BandSeries, PowerLawOverlay};
use crate::utils::time_utils::format_date;

/// Fit, derive the conventional band constants and project them `extend_days`
/// past the latest sample.
///
/// When the fit has nothing to work with (NaN sentinel) the overlay carries no
/// band points. An extension past the configured maximum is an error.
pub fn prepare_power_law(
    samples: &[Sample],
    genesis: NaiveDateTime,
    extend_days: u32,
    metric: Metric,
    mut sink: Option<&mut (dyn DiagnosticSink + '_)>,
) -> Result<PowerLawOverlay, RegressionError> {
    let regression = regress(samples, genesis, metric, sink.as_deref_mut())?;
    let genesis = effective_genesis(genesis, samples);
    let constants = conventional_constants(regression.exponent, regression.fair_price_constant);

    let bands = if regression.is_nan() {
        BandSeries::default()
    } else {
        project_with_extension(genesis, samples, &constants, extend_days, metric)?
    };

    if let (Some(sink), Some(last)) = (sink, bands.last()) {
        sink.note(format!(
            "Projected {} band points to {} (support {:.6}, fair {:.6}, resistance {:.6})",
            bands.len(),
            format_date(last.date),
            last.support,
            last.fair,
            last.resistance
        ));
    }

    Ok(PowerLawOverlay {
        regression,
        constants,
        genesis,
        bands,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn midnight(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(0, 0, 0).unwrap()
    }

    fn synthetic(genesis: NaiveDateTime, days: i64) -> Vec<Sample> {
        (1..=days)
            .map(|d| Sample::new(genesis + Duration::days(d), 1e-3 * (d as f64).powf(1.8), 0.0))
            .collect()
    }

    #[test]
    fn test_overlay_covers_observed_and_extension() {
        let genesis = midnight(2021, 11, 7);
        let data = synthetic(genesis, 60);
        let overlay = prepare_power_law(&data, genesis, 365, Metric::Price, None).unwrap();

        assert_eq!(overlay.bands.len(), 60 + 365);
        assert!((overlay.regression.exponent - 1.8).abs() < 1e-6);
        let ratio = overlay.constants.resistance / overlay.constants.support;
        assert!((ratio - 10f64.powf(0.5)).abs() < 1e-9);

        let last = overlay.bands.last().unwrap();
        assert_eq!(last.date.date(), data[59].timestamp.date() + Duration::days(365));
        assert!(last.support < last.fair && last.fair < last.resistance);
    }

    #[test]
    fn test_fair_line_tracks_exact_data() {
        let genesis = midnight(2021, 11, 7);
        let data = synthetic(genesis, 30);
        let overlay = prepare_power_law(&data, genesis, 0, Metric::Price, None).unwrap();
        for (sample, point) in data.iter().zip(overlay.bands.iter()) {
            assert!(((point.fair - sample.price) / sample.price).abs() < 1e-6);
        }
    }

    #[test]
    fn test_empty_input_gives_empty_overlay() {
        let overlay = prepare_power_law(&[], midnight(2021, 11, 7), 365, Metric::Price, None).unwrap();
        assert!(overlay.regression.is_nan());
        assert!(overlay.bands.is_empty());
    }

    #[test]
    fn test_adjusted_genesis_is_reported() {
        let data = synthetic(midnight(2024, 1, 1), 10);
        let overlay = prepare_power_law(&data, midnight(2030, 1, 1), 5, Metric::Price, None).unwrap();
        assert_eq!(overlay.genesis, data[0].timestamp - Duration::days(1));
    }

    #[test]
    fn test_degenerate_fit_is_an_error() {
        let data = vec![Sample::new(midnight(2024, 1, 1), 1.0, 0.0)];
        let mut lines: Vec<String> = Vec::new();
        let result = prepare_power_law(&data, midnight(2021, 11, 7), 5, Metric::Price, Some(&mut lines));
        assert!(matches!(result, Err(RegressionError::Degenerate { .. })));
    }

    #[test]
    fn test_huge_extension_is_an_error() {
        let genesis = midnight(2021, 11, 7);
        let data = synthetic(genesis, 10);
        let result = prepare_power_law(&data, genesis, u32::MAX, Metric::Price, None);
        assert!(matches!(
            result,
            Err(RegressionError::ExtensionOutOfRange { extend_days: u32::MAX, .. })
        ));
    }

    #[test]
    fn test_sink_gets_projection_line() {
        let genesis = midnight(2021, 11, 7);
        let data = synthetic(genesis, 10);
        let mut lines: Vec<String> = Vec::new();
        prepare_power_law(&data, genesis, 3, Metric::Price, Some(&mut lines)).unwrap();
        assert!(lines.iter().any(|l| l.starts_with("Projected 13 band points")));
    }
}
