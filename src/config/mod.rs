//! Configuration module for the Kaspa price chart.

pub mod analysis;
pub mod kaspa;
pub mod persistence;
pub mod settings;

pub(crate) mod debug;

// Re-export commonly used items
pub use analysis::{ANALYSIS, AnalysisConfig};
pub use kaspa::KASPA;
pub use persistence::PERSISTENCE;
pub use settings::UserSettings;
