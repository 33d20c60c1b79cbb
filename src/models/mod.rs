// Domain models for the price/hashrate history and its power-law overlay
// These modules hold data and invariants, the algorithms live in `analysis`

pub mod power_law;
pub mod timeseries;

// Re-export key types for convenience
pub use power_law::{BandConstants, BandPoint, BandSeries, PowerLawOverlay, RegressionResult};
pub use timeseries::{LatestReading, TimeSeriesStore};
