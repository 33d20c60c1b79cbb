// Analysis algorithms: view down-sampling and the power-law trend fit
pub mod band_projector;
pub mod power_law;
pub mod range_filter;
pub mod regression;
pub mod resample;
pub mod view;

// Re-export commonly used types
pub use band_projector::{conventional_constants, power_law_prices, project, project_with_extension};
pub use power_law::prepare_power_law;
pub use range_filter::filter_by_range;
pub use regression::{DiagnosticSink, LogSink, RegressionError, effective_genesis, regress};
pub use resample::{ResampleOptions, resample, resample_by_token};
pub use view::ViewRequest;
