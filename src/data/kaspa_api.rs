use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::Client;
use serde::Deserialize;

use crate::config::KASPA;
#[cfg(debug_assertions)]
use crate::config::debug::PRINT_FETCH_EVENTS;
use crate::domain::Sample;

/// Anything that can produce a live (price, hashrate) reading.
///
/// A field that could not be fetched comes back as 0.0; the store's upsert
/// then leaves the previously known value alone.
#[async_trait]
pub trait SampleSource: Send + Sync {
    async fn fetch_sample(&self, at: NaiveDateTime) -> Sample;

    /// A unique identifier for this implementation (so the logs say where data came from).
    fn signature(&self) -> &'static str;
}

#[derive(Debug, Deserialize)]
struct PriceResponse {
    price: f64,
}

#[derive(Debug, Deserialize)]
struct HashrateResponse {
    hashrate: f64,
}

/// The public api.kaspa.org REST endpoints.
pub struct KaspaApi {
    client: Client,
}

impl KaspaApi {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(KASPA.api.timeout_ms))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client })
    }

    pub async fn fetch_price(&self) -> Result<f64> {
        let response: PriceResponse = self
            .client
            .get(KASPA.api.price_url)
            .send()
            .await
            .context("price request failed")?
            .error_for_status()?
            .json()
            .await
            .context("price response was not the expected JSON")?;
        Ok(response.price)
    }

    pub async fn fetch_hashrate(&self) -> Result<f64> {
        let response: HashrateResponse = self
            .client
            .get(KASPA.api.hashrate_url)
            .send()
            .await
            .context("hashrate request failed")?
            .error_for_status()?
            .json()
            .await
            .context("hashrate response was not the expected JSON")?;
        Ok(response.hashrate)
    }
}

fn or_zero(what: &str, result: Result<f64>) -> f64 {
    match result {
        Ok(value) => value,
        Err(e) => {
            log::warn!("⚠️  Error fetching {}: {:#}", what, e);
            0.0
        }
    }
}

#[async_trait]
impl SampleSource for KaspaApi {
    async fn fetch_sample(&self, at: NaiveDateTime) -> Sample {
        let (price, hashrate) = tokio::join!(self.fetch_price(), self.fetch_hashrate());
        let sample = Sample::new(at, or_zero("price", price), or_zero("hashrate", hashrate));

        #[cfg(debug_assertions)]
        if PRINT_FETCH_EVENTS {
            log::info!(
                "🌐 {} @ {}: price {} hashrate {}",
                self.signature(),
                sample.timestamp,
                sample.price,
                sample.hashrate
            );
        }
        sample
    }

    fn signature(&self) -> &'static str {
        "api.kaspa.org"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_shapes() {
        let price: PriceResponse = serde_json::from_str(r#"{"price": 0.1234}"#).unwrap();
        assert_eq!(price.price, 0.1234);
        let hashrate: HashrateResponse =
            serde_json::from_str(r#"{"hashrate": 1.5e15, "unit": "H/s"}"#).unwrap();
        assert_eq!(hashrate.hashrate, 1.5e15);
    }

    #[test]
    fn test_failed_field_reads_as_zero() {
        assert_eq!(or_zero("price", Err(anyhow::anyhow!("timeout"))), 0.0);
        assert_eq!(or_zero("price", Ok(0.2)), 0.2);
    }
}
