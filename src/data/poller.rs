use anyhow::{Context, Result};
use chrono::{Duration, NaiveDateTime};

use crate::config::KASPA;
use crate::data::kaspa_api::SampleSource;
use crate::engine::ChartEngine;
use crate::utils::describe_reading;
use crate::utils::time_utils::{describe_duration, local_now};

/// How long to wait before the next fetch is allowed.
///
/// Zero when nothing was fetched yet or the interval has passed. The interval
/// is never shorter than the API's minimum spacing, and a last fetch in the
/// future (clock change) never pushes the wait past one interval.
pub fn next_fetch_delay(
    last_fetch: Option<NaiveDateTime>,
    now: NaiveDateTime,
    interval_minutes: u32,
) -> Duration {
    let minutes = interval_minutes.max(KASPA.limits.min_minutes_between_calls);
    let interval = Duration::minutes(i64::from(minutes));
    let Some(last) = last_fetch else {
        return Duration::zero();
    };

    let elapsed = now - last;
    if elapsed >= interval {
        Duration::zero()
    } else {
        (interval - elapsed).min(interval)
    }
}

/// Poll `source` on the engine's configured interval, recording every reading.
///
/// Runs until `max_fetches` readings were taken, or forever when `None`.
pub async fn watch(
    engine: &mut ChartEngine,
    source: &dyn SampleSource,
    max_fetches: Option<usize>,
) -> Result<()> {
    log::info!(
        "Watching {} every {} minutes",
        source.signature(),
        engine.settings.effective_interval_minutes()
    );

    let mut fetches = 0;
    while max_fetches.is_none_or(|max| fetches < max) {
        let delay = next_fetch_delay(
            engine.settings.last_fetch_time,
            local_now(),
            engine.settings.effective_interval_minutes(),
        );
        if delay > Duration::zero() {
            log::info!("Next update in {}", describe_duration(delay));
            tokio::time::sleep(delay.to_std().context("negative fetch delay")?).await;
            continue;
        }

        let sample = source.fetch_sample(local_now()).await;
        fetches += 1;

        if let Err(e) = engine.record_sample(sample) {
            log::error!("❌ Failed to persist reading: {:#}", e);
            tokio::time::sleep(std::time::Duration::from_secs(
                KASPA.limits.retry_after_failure_secs,
            ))
            .await;
            continue;
        }

        if let Some(latest) = engine.latest() {
            log::info!(
                "{}  Last Update: {}",
                describe_reading(latest.price, latest.hashrate),
                latest.timestamp.format("%b %d-%y %I:%M:%S %p")
            );
        }
    }
    Ok(())
}
