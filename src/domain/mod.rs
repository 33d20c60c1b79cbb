// Domain types and value objects
pub mod metric;
pub mod sample;
pub mod timespan;

// Re-export commonly used types
pub use metric::Metric;
pub use sample::Sample;
pub use timespan::{TimeUnit, Timespan, TimespanParseError};
