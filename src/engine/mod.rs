pub mod core;
pub mod messages;
pub mod state;
pub mod worker;

// Re-export key components
pub use core::{ChartEngine, StoragePaths};
pub use state::OverlayState;
