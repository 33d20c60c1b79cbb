#![allow(clippy::collapsible_if)]
#![allow(clippy::type_complexity)]

// Core modules
pub mod analysis;
pub mod config;
pub mod data;
pub mod domain;
pub mod models;
pub mod utils;

// The background worker + the state it feeds
pub mod engine;

// Re-export commonly used types
pub use analysis::{RegressionError, ResampleOptions, ViewRequest, prepare_power_law};
pub use config::UserSettings;
pub use data::{KaspaApi, SampleSource};
pub use domain::{Metric, Sample, Timespan};
pub use engine::{ChartEngine, StoragePaths};
pub use models::{BandSeries, PowerLawOverlay, RegressionResult, TimeSeriesStore};

use std::path::PathBuf;

use chrono::NaiveDate;
// CLI argument parsing
use clap::{Parser, Subcommand};

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory holding master.csv and AppSettings.json
    #[arg(long, default_value = ".")]
    pub data_dir: PathBuf,

    /// Without a subcommand, `watch` runs when auto-start is saved in the settings
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Poll the Kaspa API and keep adding readings to the master data set
    Watch {
        /// Minutes between fetches (never below the API minimum); saved to settings
        #[arg(long)]
        interval: Option<u32>,
        /// Stop after this many fetches
        #[arg(long)]
        count: Option<usize>,
    },
    /// Import native or CoinCodex CSV files
    Import {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Use only the imported data; master.csv is not touched
        #[arg(long, default_value_t = false)]
        only: bool,
    },
    /// Export the data set, resampled by a timespan, as CSV
    Export {
        path: PathBuf,
        /// e.g. "15 Minutes", "1 Day" or "All Data" (defaults to the saved view)
        #[arg(long)]
        timespan: Option<String>,
    },
    /// Fit the power law over the current view and print the bands
    Report {
        #[arg(long)]
        timespan: Option<String>,
        /// First day of the view (YYYY-MM-DD)
        #[arg(long)]
        start: Option<NaiveDate>,
        /// Last day of the view (YYYY-MM-DD), up to the current time of day
        #[arg(long)]
        end: Option<NaiveDate>,
        /// Days to extend the bands past the latest sample (defaults to the saved value)
        #[arg(long)]
        extend_days: Option<u32>,
        #[arg(long, value_enum, default_value = "price")]
        metric: Metric,
    },
}

impl Cli {
    pub fn storage_paths(&self) -> StoragePaths {
        StoragePaths::in_dir(&self.data_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_report() {
        let cli = Cli::try_parse_from([
            "kas-price-chart",
            "--data-dir",
            "/tmp/kas",
            "report",
            "--timespan",
            "1 Day",
            "--start",
            "2024-01-01",
            "--metric",
            "hashrate",
        ])
        .unwrap();
        assert_eq!(cli.storage_paths().master_csv, PathBuf::from("/tmp/kas/master.csv"));
        match cli.command {
            Some(Command::Report {
                timespan,
                start,
                metric,
                extend_days,
                ..
            }) => {
                assert_eq!(timespan.as_deref(), Some("1 Day"));
                assert_eq!(start, NaiveDate::from_ymd_opt(2024, 1, 1));
                assert_eq!(metric, Metric::Hashrate);
                assert_eq!(extend_days, None);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_import_requires_files() {
        assert!(Cli::try_parse_from(["kas-price-chart", "import"]).is_err());
        let cli = Cli::try_parse_from(["kas-price-chart", "import", "a.csv", "--only"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Import { only: true, .. })));
    }

    #[test]
    fn test_subcommand_is_optional() {
        let cli = Cli::try_parse_from(["kas-price-chart"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.data_dir, PathBuf::from("."));
    }
}
