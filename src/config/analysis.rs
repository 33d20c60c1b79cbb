//! Analysis and computation configuration

use chrono::{Duration, NaiveDate};

/// Settings for the "view by timespan" resampler
pub struct ResampleSettings {
    // Allowed deviation (seconds) between an observed gap and the requested interval.
    // 120 corresponds to +/- 2 minutes.
    pub variance_secs: i64,
}

/// Settings for the power-law trend bands
pub struct PowerLawSettings {
    // Day zero of the "days since genesis" axis (Kaspa mainnet launch)
    pub genesis_year: i32,
    pub genesis_month: u32,
    pub genesis_day: u32,
    // Support/resistance sit this many decades below/above the fair price line
    pub band_offset_decades: f64,
    // How far past the latest sample the bands are extrapolated by default
    pub default_extend_days: u32,
    // Longest extension accepted (100 years)
    pub max_extend_days: u32,
}

/// The Master Analysis Configuration
pub struct AnalysisConfig {
    pub resample: ResampleSettings,
    pub power_law: PowerLawSettings,
}

pub const ANALYSIS: AnalysisConfig = AnalysisConfig {
    resample: ResampleSettings { variance_secs: 120 },

    power_law: PowerLawSettings {
        genesis_year: 2021,
        genesis_month: 11,
        genesis_day: 7,
        band_offset_decades: 0.25,
        default_extend_days: 365,
        max_extend_days: 36_500,
    },
};

impl ResampleSettings {
    pub fn variance(&self) -> Duration {
        Duration::seconds(self.variance_secs)
    }
}

impl PowerLawSettings {
    pub fn genesis_date(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.genesis_year, self.genesis_month, self.genesis_day)
            .unwrap_or_default()
    }

    /// Multiplier applied to the fair constant to get the support constant
    pub fn support_multiplier(&self) -> f64 {
        10f64.powf(-self.band_offset_decades)
    }

    /// Multiplier applied to the fair constant to get the resistance constant
    pub fn resistance_multiplier(&self) -> f64 {
        10f64.powf(self.band_offset_decades)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_genesis_is_kaspa_launch() {
        assert_eq!(
            ANALYSIS.power_law.genesis_date(),
            NaiveDate::from_ymd_opt(2021, 11, 7).unwrap()
        );
    }

    #[test]
    fn test_band_multipliers_are_reciprocal() {
        let pl = &ANALYSIS.power_law;
        let product = pl.support_multiplier() * pl.resistance_multiplier();
        assert!((product - 1.0).abs() < 1e-12);
        assert!((pl.resistance_multiplier() - 1.778_279_41).abs() < 1e-6);
    }
}
