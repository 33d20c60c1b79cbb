//! File persistence and serialization configuration

/// Paths and formats used by the CSV and settings layers
pub struct PersistenceConfig {
    /// The canonical data set, rewritten after every live fetch or merge
    pub master_csv_path: &'static str,
    /// Header line written at the top of every exported CSV
    pub csv_header: [&'static str; 3],
    /// Timestamp format used when writing CSV rows
    pub csv_timestamp_format: &'static str,
    /// JSON file holding the user's preferences
    pub settings_path: &'static str,
    /// CoinCodex rows carry dates only: the open price is placed at this hour of the start date
    pub coincodex_open_hour: u32,
    /// ...and the close price at this hour of the end date
    pub coincodex_close_hour: u32,
}

pub const PERSISTENCE: PersistenceConfig = PersistenceConfig {
    master_csv_path: "master.csv",
    csv_header: ["Timestamp", "Price", "Hashrate"],
    csv_timestamp_format: "%Y-%m-%d %H:%M:%S",
    settings_path: "AppSettings.json",
    coincodex_open_hour: 8,
    coincodex_close_hour: 20,
};
