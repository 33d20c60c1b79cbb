//! CoinCodex historical export: one row per date range with open/close prices.
//!
//! Each row becomes two samples, the open price on the start date and the
//! close price on the end date. Hashrate is not part of the export and is left at 0.

use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use chrono::NaiveDate;

use crate::config::PERSISTENCE;
use crate::data::csv_store::{csv_reader, parse_timestamp};
use crate::domain::Sample;

struct Columns {
    start: usize,
    end: usize,
    open: usize,
    close: usize,
}

impl Columns {
    /// First header containing each keyword, case-insensitively
    fn locate(headers: &csv::StringRecord) -> Result<Self> {
        let lowered: Vec<String> = headers.iter().map(|h| h.to_lowercase()).collect();
        let find = |keyword: &str| {
            lowered
                .iter()
                .position(|h| h.contains(keyword))
                .ok_or_else(|| anyhow!("no '{}' column in header", keyword))
        };
        Ok(Self {
            start: find("start")?,
            end: find("end")?,
            open: find("open")?,
            close: find("close")?,
        })
    }
}

fn parse_date(text: &str) -> Result<NaiveDate> {
    parse_timestamp(text)
        .map(|ts| ts.date())
        .ok_or_else(|| anyhow!("unrecognised date '{}'", text))
}

fn parse_price(text: &str) -> Result<f64> {
    text.parse::<f64>()
        .with_context(|| format!("bad price '{}'", text))
}

pub fn import_coincodex(path: &Path) -> Result<Vec<Sample>> {
    let mut reader = csv_reader(path)?;
    let columns = Columns::locate(reader.headers()?)?;
    let open_hour = PERSISTENCE.coincodex_open_hour;
    let close_hour = PERSISTENCE.coincodex_close_hour;

    let mut samples = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let line = idx + 2;
        let record = record.with_context(|| format!("unreadable CSV line {}", line))?;
        let get = |col: usize| record.get(col).unwrap_or_default();

        let start = parse_date(get(columns.start)).with_context(|| format!("line {}", line))?;
        let end = parse_date(get(columns.end)).with_context(|| format!("line {}", line))?;
        let open = parse_price(get(columns.open)).with_context(|| format!("line {}", line))?;
        let close = parse_price(get(columns.close)).with_context(|| format!("line {}", line))?;

        let (Some(open_at), Some(close_at)) = (
            start.and_hms_opt(open_hour, 0, 0),
            end.and_hms_opt(close_hour, 0, 0),
        ) else {
            bail!("invalid CoinCodex hours {}/{}", open_hour, close_hour);
        };
        samples.push(Sample::new(open_at, open, 0.0));
        samples.push(Sample::new(close_at, close, 0.0));
    }

    samples.sort_by_key(|s| s.timestamp);
    log::info!("Converted {} CoinCodex samples from {}", samples.len(), path.display());
    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::csv_store::import_file;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("kas_coincodex_{}_{}.csv", name, std::process::id()))
    }

    const EXPORT: &str = "\
Start,End,Open,High,Low,Close,Volume,Market Cap
2024-01-02,2024-01-02,0.105,0.11,0.1,0.108,1000,2000
2024-01-01,2024-01-01,0.1,0.104,0.098,0.102,1000,2000
";

    #[test]
    fn test_rows_become_open_and_close_samples() {
        let path = temp_path("rows");
        std::fs::write(&path, EXPORT).unwrap();
        let samples = import_coincodex(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(samples.len(), 4);
        let day = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
        assert_eq!(samples[0], Sample::new(day(1).and_hms_opt(8, 0, 0).unwrap(), 0.1, 0.0));
        assert_eq!(samples[1], Sample::new(day(1).and_hms_opt(20, 0, 0).unwrap(), 0.102, 0.0));
        assert_eq!(samples[2].timestamp, day(2).and_hms_opt(8, 0, 0).unwrap());
        assert_eq!(samples[3].price, 0.108);
        assert!(samples.iter().all(|s| s.hashrate == 0.0));
    }

    #[test]
    fn test_native_import_falls_back_to_coincodex() {
        let path = temp_path("fallback");
        std::fs::write(&path, EXPORT).unwrap();
        let samples = import_file(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(samples.len(), 4);
    }

    #[test]
    fn test_missing_columns_fail() {
        let path = temp_path("missing");
        std::fs::write(&path, "Date,Price\n2024-01-01,0.1\n").unwrap();
        let result = import_coincodex(&path);
        let _ = std::fs::remove_file(&path);
        assert!(result.is_err());
    }
}
