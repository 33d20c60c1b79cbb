use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender};
use std::thread;
use std::time::Instant;

use super::messages::{JobRequest, JobResult};
use crate::analysis::prepare_power_law;
#[cfg(debug_assertions)]
use crate::config::debug::PRINT_WORKER_TIMINGS;

pub fn spawn_worker_thread(rx: Receiver<JobRequest>, tx: Sender<JobResult>) {
    thread::spawn(move || {
        while let Ok(req) = rx.recv() {
            let result = run_job(req);

            #[cfg(debug_assertions)]
            if PRINT_WORKER_TIMINGS {
                log::info!(
                    "Worker finished job {} ({}) in {} ms",
                    result.job_id,
                    result.metric,
                    result.duration_ms
                );
            }

            // Receiver gone means the engine is shutting down
            if tx.send(result).is_err() {
                break;
            }
        }
    });
}

/// The heavy calculation (pure function of the request)
pub fn run_job(req: JobRequest) -> JobResult {
    let start = Instant::now();
    let mut diagnostics: Vec<String> = Vec::new();

    let result = prepare_power_law(
        &req.samples,
        req.genesis,
        req.extend_days,
        req.metric,
        Some(&mut diagnostics),
    )
    .map(Arc::new)
    .map_err(|e| e.to_string());

    JobResult {
        job_id: req.job_id,
        metric: req.metric,
        duration_ms: start.elapsed().as_millis(),
        result,
        diagnostics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Metric, Sample};
    use chrono::{Duration, NaiveDate};
    use std::sync::mpsc::channel;

    fn request(samples: Vec<Sample>) -> JobRequest {
        JobRequest {
            job_id: 7,
            metric: Metric::Price,
            samples: Arc::new(samples),
            genesis: NaiveDate::from_ymd_opt(2021, 11, 7).unwrap().and_hms_opt(0, 0, 0).unwrap(),
            extend_days: 10,
        }
    }

    #[test]
    fn test_run_job_reports_errors_as_strings() {
        let ts = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        let result = run_job(request(vec![Sample::new(ts, 1.0, 0.0)]));
        assert_eq!(result.job_id, 7);
        assert!(result.result.unwrap_err().contains("degenerate"));
    }

    #[test]
    fn test_worker_thread_round_trip() {
        let (job_tx, job_rx) = channel();
        let (result_tx, result_rx) = channel();
        spawn_worker_thread(job_rx, result_tx);

        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        let samples = (0..20)
            .map(|d| Sample::new(start + Duration::days(d), 0.1 + d as f64 * 0.01, 0.0))
            .collect();
        job_tx.send(request(samples)).unwrap();

        let result = result_rx.recv_timeout(std::time::Duration::from_secs(5)).unwrap();
        let overlay = result.result.unwrap();
        assert_eq!(overlay.bands.len(), 20 + 10);
        assert!(!result.diagnostics.is_empty());
    }
}
