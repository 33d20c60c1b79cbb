use serde::{Deserialize, Serialize};

use crate::domain::Sample;

/// Which field of a sample a trend fit runs against.
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::EnumIter,
    clap::ValueEnum,
)]
#[strum(ascii_case_insensitive)]
pub enum Metric {
    #[default]
    Price,
    Hashrate,
}

impl Metric {
    #[inline]
    pub fn value(self, sample: &Sample) -> f64 {
        match self {
            Metric::Price => sample.price,
            Metric::Hashrate => sample.hashrate,
        }
    }
}
