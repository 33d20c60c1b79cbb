// Data loading, persistence and live fetching
pub mod coincodex;
pub mod csv_store;
pub mod kaspa_api;
pub mod poller;

// Re-export commonly used types
pub use csv_store::{export_samples, import_file, import_files, load_master};
pub use kaspa_api::{KaspaApi, SampleSource};
pub use poller::{next_fetch_delay, watch};
