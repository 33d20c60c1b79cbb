//! `Timestamp,Price,Hashrate` CSV files: the master data set plus user imports/exports.

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::config::PERSISTENCE;
#[cfg(debug_assertions)]
use crate::config::debug::PRINT_CSV_EVENTS;
use crate::data::coincodex;
use crate::domain::Sample;
use crate::utils::time_utils::start_of_day;

// Tried in order. Month-first wins over day-first when both would parse.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
    "%d.%m.%Y %H:%M:%S",
];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%d/%m/%Y", "%d.%m.%Y"];

/// Lenient timestamp parsing for imported files.
///
/// Accepts the format we write, ISO 8601 (offsets are dropped, keeping local
/// wall time), common US/EU layouts, and bare dates (taken as midnight).
pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_local());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
                .map(start_of_day)
        })
}

pub(crate) fn csv_reader(path: &Path) -> Result<csv::Reader<std::fs::File>> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Failed to open CSV: {}", path.display()))
}

fn parse_native_record(record: &csv::StringRecord) -> Result<Sample> {
    let field = |idx: usize, name: &str| {
        record
            .get(idx)
            .ok_or_else(|| anyhow!("missing {} column", name))
    };

    let ts_text = field(0, "Timestamp")?;
    let timestamp =
        parse_timestamp(ts_text).ok_or_else(|| anyhow!("unrecognised timestamp '{}'", ts_text))?;
    let price = field(1, "Price")?
        .parse::<f64>()
        .with_context(|| format!("bad price '{}'", record.get(1).unwrap_or_default()))?;
    let hashrate = field(2, "Hashrate")?
        .parse::<f64>()
        .with_context(|| format!("bad hashrate '{}'", record.get(2).unwrap_or_default()))?;

    Ok(Sample::new(timestamp, price, hashrate))
}

fn read_native<R: io::Read>(reader: &mut csv::Reader<R>) -> Result<Vec<Sample>> {
    let mut samples = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        // +2: one for the header, one for 1-based line numbers
        let line = idx + 2;
        let record = record.with_context(|| format!("unreadable CSV line {}", line))?;
        samples.push(parse_native_record(&record).with_context(|| format!("line {}", line))?);
    }
    Ok(samples)
}

/// Read one file, native layout first, CoinCodex layout as the fallback.
pub fn import_file(path: &Path) -> Result<Vec<Sample>> {
    let mut reader = csv_reader(path)?;
    match read_native(&mut reader) {
        Ok(samples) => {
            #[cfg(debug_assertions)]
            if PRINT_CSV_EVENTS {
                log::info!("📄 Imported {} samples from {}", samples.len(), path.display());
            }
            Ok(samples)
        }
        Err(native_err) => {
            log::debug!(
                "{} is not a native CSV ({:#}), trying CoinCodex layout",
                path.display(),
                native_err
            );
            coincodex::import_coincodex(path).with_context(|| {
                format!(
                    "{} is neither a native nor a CoinCodex CSV (native: {:#})",
                    path.display(),
                    native_err
                )
            })
        }
    }
}

/// Import several files, skipping (and logging) the ones that fail.
pub fn import_files(paths: &[PathBuf]) -> Vec<Sample> {
    let mut all = Vec::new();
    for path in paths {
        match import_file(path) {
            Ok(samples) => all.extend(samples),
            Err(e) => log::error!("❌ Error importing file {}: {:#}", path.display(), e),
        }
    }
    all
}

/// Write `samples` sorted by timestamp, with the standard header.
pub fn export_samples(samples: &[Sample], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let mut sorted = samples.to_vec();
    sorted.sort_by_key(|s| s.timestamp);

    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create file: {}", path.display()))?;
    writer.write_record(PERSISTENCE.csv_header)?;
    for sample in &sorted {
        writer.write_record([
            sample
                .timestamp
                .format(PERSISTENCE.csv_timestamp_format)
                .to_string(),
            sample.price.to_string(),
            sample.hashrate.to_string(),
        ])?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to write CSV: {}", path.display()))?;

    #[cfg(debug_assertions)]
    if PRINT_CSV_EVENTS {
        log::info!("💾 Wrote {} samples to {}", sorted.len(), path.display());
    }
    Ok(())
}

/// Create an empty master file (header only) if none exists. Returns true when created.
pub fn ensure_master_file(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    export_samples(&[], path)?;
    Ok(true)
}

/// Load the master data set, creating it on first run.
pub fn load_master(path: &Path) -> Result<Vec<Sample>> {
    if ensure_master_file(path)? {
        log::info!("No data loaded, starting a new data set at {}", path.display());
        return Ok(Vec::new());
    }
    import_file(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("kas_csv_{}_{}.csv", name, std::process::id()))
    }

    fn ts(d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 8, d).unwrap().and_hms_opt(h, 15, 30).unwrap()
    }

    #[test]
    fn test_parse_timestamp_layouts() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap().and_hms_opt(14, 7, 9).unwrap();
        for text in [
            "2024-03-05 14:07:09",
            "2024-03-05T14:07:09",
            "2024-03-05T14:07:09.123",
            "2024-03-05T14:07:09+02:00",
            "3/5/2024 2:07:09 PM",
            "03/05/2024 14:07:09",
        ] {
            let parsed = parse_timestamp(text).map(|t| t.with_nanosecond(0).unwrap());
            assert_eq!(parsed, Some(expected), "{text}");
        }
        assert_eq!(
            parse_timestamp("25/12/2023 08:00:00"),
            NaiveDate::from_ymd_opt(2023, 12, 25).unwrap().and_hms_opt(8, 0, 0)
        );
        assert_eq!(
            parse_timestamp("2024-03-05"),
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap().and_hms_opt(0, 0, 0)
        );
        assert_eq!(parse_timestamp("yesterday"), None);
    }

    #[test]
    fn test_export_sorts_and_import_reads_back() {
        let path = temp_path("export");
        let data = vec![
            Sample::new(ts(3, 1), 0.15, 1.2e15),
            Sample::new(ts(1, 1), 0.11, 0.0),
            Sample::new(ts(2, 1), 0.0, 1.1e15),
        ];
        export_samples(&data, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("Timestamp,Price,Hashrate"));
        assert!(text.contains("2024-08-01 01:15:30,0.11,0"));

        let loaded = import_file(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        let times: Vec<_> = loaded.iter().map(|s| s.timestamp).collect();
        assert_eq!(times, vec![ts(1, 1), ts(2, 1), ts(3, 1)]);
        assert_eq!(loaded[2].hashrate, 1.2e15);
    }

    #[test]
    fn test_master_file_created_once() {
        let path = temp_path("master");
        let _ = std::fs::remove_file(&path);
        assert!(load_master(&path).unwrap().is_empty());
        assert!(path.exists());
        assert!(!ensure_master_file(&path).unwrap());
        assert!(import_file(&path).unwrap().is_empty());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_import_files_skips_bad_files() {
        let good = temp_path("good");
        let bad = temp_path("bad");
        std::fs::write(&good, "Timestamp,Price,Hashrate\n2024-08-01 00:00:00,0.1,5\n").unwrap();
        std::fs::write(&bad, "what,is,this\nnot,a,number\n").unwrap();
        let missing = temp_path("missing_never_written");

        let samples = import_files(&[bad.clone(), good.clone(), missing]);
        let _ = std::fs::remove_file(&good);
        let _ = std::fs::remove_file(&bad);
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].price, 0.1);
    }
}
