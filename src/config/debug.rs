//! Debugging feature flags.
//!
//! Toggle individual diagnostics here. Every flag is further gated by
//! `cfg(debug_assertions)` at the call site, so release builds stay quiet.

/// Emit the raw regression accumulators (sums of X, Y, XY, X², Y²) after each fit.
pub const PRINT_REGRESSION_SUMS: bool = false;

/// Emit how many samples survived each resample / date-range pass.
pub const PRINT_RESAMPLE_STATS: bool = false;

/// Emit every fetch attempt and the values returned by the data source.
pub const PRINT_FETCH_EVENTS: bool = true;

/// Emit details of settings serialization/deserialization.
pub const PRINT_SETTINGS_SERDE: bool = false;

/// Emit CSV import/export summaries.
pub const PRINT_CSV_EVENTS: bool = true;

/// Emit worker job dispatch/completion timings.
pub const PRINT_WORKER_TIMINGS: bool = false;
