//! Kaspa REST API configuration constants.

/// Configuration for the REST endpoints polled by the live fetcher
pub struct KaspaApiConfig {
    pub price_url: &'static str,
    pub hashrate_url: &'static str,
    /// Per-request timeout
    pub timeout_ms: u64,
}

/// Configuration for the fetch schedule
pub struct FetchLimits {
    /// Never hit the API more often than this, whatever the user's interval says
    pub min_minutes_between_calls: u32,
    /// Delay before retrying after a tick that could not fetch
    pub retry_after_failure_secs: u64,
}

/// The Master Configuration Struct
pub struct KaspaConfig {
    pub api: KaspaApiConfig,
    pub limits: FetchLimits,
}

pub const KASPA: KaspaConfig = KaspaConfig {
    api: KaspaApiConfig {
        price_url: "https://api.kaspa.org/info/price",
        hashrate_url: "https://api.kaspa.org/info/hashrate?stringOnly=false",
        timeout_ms: 10_000,
    },
    limits: FetchLimits {
        min_minutes_between_calls: 3,
        retry_after_failure_secs: 5,
    },
};
