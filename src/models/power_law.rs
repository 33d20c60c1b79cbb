use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Output of a log-log least squares fit.
///
/// The raw sums are kept because the report prints them alongside the fit.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct RegressionResult {
    pub exponent: f64,
    pub fair_price_constant: f64,
    pub r_squared: f64,
    pub sum_x: f64,
    pub sum_y: f64,
    pub sum_xy: f64,
    pub sum_x2: f64,
    pub sum_y2: f64,
    pub n: usize,
}

impl RegressionResult {
    /// Returned for an empty series instead of an error
    pub fn nan() -> Self {
        Self {
            exponent: f64::NAN,
            fair_price_constant: f64::NAN,
            r_squared: f64::NAN,
            sum_x: f64::NAN,
            sum_y: f64::NAN,
            sum_xy: f64::NAN,
            sum_x2: f64::NAN,
            sum_y2: f64::NAN,
            n: 0,
        }
    }

    pub fn is_nan(&self) -> bool {
        self.exponent.is_nan() && self.fair_price_constant.is_nan()
    }
}

/// The three band constants that scale `delta_days^exponent`
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct BandConstants {
    pub exponent: f64,
    pub support: f64,
    pub resistance: f64,
    pub fair: f64,
}

impl BandConstants {
    /// (support, resistance, fair) at `delta_days` since genesis
    #[inline]
    pub fn values_at(&self, delta_days: f64) -> (f64, f64, f64) {
        let scale = delta_days.powf(self.exponent);
        (
            self.support * scale,
            self.resistance * scale,
            self.fair * scale,
        )
    }
}

/// A single row of a `BandSeries`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandPoint {
    pub date: NaiveDateTime,
    pub support: f64,
    pub resistance: f64,
    pub fair: f64,
}

/// Support, resistance and fair lines as parallel columns keyed by `dates`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct BandSeries {
    pub dates: Vec<NaiveDateTime>,
    pub support: Vec<f64>,
    pub resistance: Vec<f64>,
    pub fair: Vec<f64>,
}

impl BandSeries {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            dates: Vec::with_capacity(capacity),
            support: Vec::with_capacity(capacity),
            resistance: Vec::with_capacity(capacity),
            fair: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, date: NaiveDateTime, (support, resistance, fair): (f64, f64, f64)) {
        self.dates.push(date);
        self.support.push(support);
        self.resistance.push(resistance);
        self.fair.push(fair);
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn point(&self, idx: usize) -> BandPoint {
        BandPoint {
            date: self.dates[idx],
            support: self.support[idx],
            resistance: self.resistance[idx],
            fair: self.fair[idx],
        }
    }

    pub fn last(&self) -> Option<BandPoint> {
        self.len().checked_sub(1).map(|idx| self.point(idx))
    }

    pub fn iter(&self) -> impl Iterator<Item = BandPoint> + '_ {
        (0..self.len()).map(|idx| self.point(idx))
    }
}

/// Everything the chart needs to draw the power-law overlay.
#[derive(Debug, Clone)]
pub struct PowerLawOverlay {
    pub regression: RegressionResult,
    pub constants: BandConstants,
    pub genesis: NaiveDateTime,
    pub bands: BandSeries,
}
