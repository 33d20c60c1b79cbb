//! Persisted user preferences (what the settings panel used to remember between runs).

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::config::{ANALYSIS, KASPA};
#[cfg(debug_assertions)]
use crate::config::debug::PRINT_SETTINGS_SERDE;

/// Token meaning "no resampling"; any token that fails to parse behaves the same way.
pub const ALL_DATA_TIMESPAN: &str = "All Data";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default, rename_all = "PascalCase")]
pub struct UserSettings {
    /// Minutes between live fetches
    pub update_interval_minutes: u32,
    /// When set, live fetches and imports never touch the master CSV
    pub use_only_uploaded_data: bool,
    /// Start watching when the binary is run without a subcommand
    pub auto_start: bool,
    // Chart display preferences, carried so the file round-trips with the chart UI
    pub use_power_law: bool,
    pub log_scale: bool,
    pub extend_lines_by_days: u32,
    pub time_span_view: String,
    pub last_fetch_time: Option<NaiveDateTime>,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            update_interval_minutes: 5,
            use_only_uploaded_data: false,
            auto_start: false,
            use_power_law: false,
            log_scale: false,
            extend_lines_by_days: ANALYSIS.power_law.default_extend_days,
            time_span_view: ALL_DATA_TIMESPAN.to_string(),
            last_fetch_time: None,
        }
    }
}

impl UserSettings {
    /// Load settings, falling back to defaults when the file is missing or unreadable.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            #[cfg(debug_assertions)]
            if PRINT_SETTINGS_SERDE {
                log::info!("No settings at {}, using defaults", path.display());
            }
            return Self::default();
        }
        match Self::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("⚠️  Ignoring unreadable settings file: {:#}", e);
                Self::default()
            }
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings: {}", path.display()))?;
        let settings: Self = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse settings: {}", path.display()))?;

        #[cfg(debug_assertions)]
        if PRINT_SETTINGS_SERDE {
            log::info!("Loaded settings from {}: {:?}", path.display(), settings);
        }
        Ok(settings)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self).context("Failed to serialize settings")?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write settings: {}", path.display()))
    }

    /// The interval actually used between fetches, never below the API floor.
    pub fn effective_interval_minutes(&self) -> u32 {
        self.update_interval_minutes
            .max(KASPA.limits.min_minutes_between_calls)
    }
}
