use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender, TryRecvError, channel};
use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::NaiveDateTime;

use crate::analysis::{DiagnosticSink, LogSink, ResampleOptions, ViewRequest, resample_by_token};
use crate::config::settings::ALL_DATA_TIMESPAN;
use crate::config::{ANALYSIS, PERSISTENCE, UserSettings};
use crate::data::csv_store::{export_samples, import_files, load_master};
use crate::domain::{Metric, Sample};
use crate::models::{LatestReading, PowerLawOverlay, TimeSeriesStore};
use crate::utils::time_utils::start_of_day;

use super::messages::{JobRequest, JobResult};
use super::state::OverlayState;
use super::worker;

const WORKER_UNAVAILABLE: &str = "worker unavailable";

/// Where the master data set and the settings live on disk
#[derive(Debug, Clone, PartialEq)]
pub struct StoragePaths {
    pub master_csv: PathBuf,
    pub settings: PathBuf,
}

impl Default for StoragePaths {
    fn default() -> Self {
        Self {
            master_csv: PathBuf::from(PERSISTENCE.master_csv_path),
            settings: PathBuf::from(PERSISTENCE.settings_path),
        }
    }
}

impl StoragePaths {
    /// Both files inside `dir`, with their usual names
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            master_csv: dir.join(PERSISTENCE.master_csv_path),
            settings: dir.join(PERSISTENCE.settings_path),
        }
    }
}

pub struct ChartEngine {
    /// The one owned copy of the history
    store: TimeSeriesStore,

    /// The live preferences (persisted on change)
    pub settings: UserSettings,

    paths: StoragePaths,

    /// One overlay per metric
    overlays: HashMap<Metric, OverlayState>,

    /// Latest request per metric that arrived while the worker was busy with it
    queued: HashMap<Metric, JobRequest>,

    /// Worker Communication
    job_tx: Sender<JobRequest>,
    result_rx: Receiver<JobResult>,

    next_job_id: u64,
}

impl ChartEngine {
    /// Initialize the engine and spawn the worker.
    pub fn new(store: TimeSeriesStore, settings: UserSettings, paths: StoragePaths) -> Self {
        let (job_tx, job_rx) = channel::<JobRequest>();
        let (result_tx, result_rx) = channel::<JobResult>();

        worker::spawn_worker_thread(job_rx, result_tx);

        Self::with_channels(store, settings, paths, job_tx, result_rx)
    }

    fn with_channels(
        store: TimeSeriesStore,
        settings: UserSettings,
        paths: StoragePaths,
        job_tx: Sender<JobRequest>,
        result_rx: Receiver<JobResult>,
    ) -> Self {
        Self {
            store,
            settings,
            paths,
            overlays: HashMap::new(),
            queued: HashMap::new(),
            job_tx,
            result_rx,
            next_job_id: 0,
        }
    }

    /// Load settings and the master data set (created if missing).
    pub fn open(paths: StoragePaths) -> Result<Self> {
        let settings = UserSettings::load_or_default(&paths.settings);
        let samples = load_master(&paths.master_csv)?;
        let store = TimeSeriesStore::from_samples(samples);

        match store.date_span() {
            Some((first, last)) => log::info!(
                "Data loaded from {} through {} ({} samples)",
                first,
                last,
                store.len()
            ),
            None => log::info!("No data loaded, starting new data set from right now"),
        }

        Ok(Self::new(store, settings, paths))
    }

    // --- DATA ---

    pub fn store(&self) -> &TimeSeriesStore {
        &self.store
    }

    pub fn paths(&self) -> &StoragePaths {
        &self.paths
    }

    pub fn snapshot(&self) -> Vec<Sample> {
        self.store.snapshot()
    }

    pub fn latest(&self) -> Option<LatestReading> {
        self.store.latest()
    }

    /// Accumulate one live reading and persist it.
    ///
    /// The master CSV is left untouched while "use only uploaded data" is on.
    pub fn record_sample(&mut self, sample: Sample) -> Result<()> {
        self.store.upsert(sample.timestamp, sample.price, sample.hashrate);
        self.settings.last_fetch_time = Some(sample.timestamp);
        self.save_settings()?;

        if !self.settings.use_only_uploaded_data {
            self.save_master()?;
        }
        Ok(())
    }

    /// Import CSV files. `only` replaces the in-memory history instead of merging
    /// into (and saving) the master data set. Returns the number of samples read.
    pub fn import(&mut self, files: &[PathBuf], only: bool) -> Result<usize> {
        let samples = import_files(files);
        if samples.is_empty() {
            log::warn!("⚠️  Nothing imported from {} file(s)", files.len());
            return Ok(0);
        }
        let count = samples.len();

        if only {
            self.store.replace(samples);
        } else {
            self.store.merge(samples);
            self.save_master()?;
        }

        // A fresh import is shown in full
        self.settings.use_only_uploaded_data = only;
        self.settings.time_span_view = ALL_DATA_TIMESPAN.to_string();
        self.save_settings()?;

        log::info!("Imported {} samples, store now holds {}", count, self.store.len());
        Ok(count)
    }

    /// Write the history, resampled by `timespan`, to `path`. Returns rows written.
    pub fn export(&self, path: &Path, timespan: &str) -> Result<usize> {
        let samples = resample_by_token(&self.snapshot(), timespan, &ResampleOptions::default());
        export_samples(&samples, path)?;
        Ok(samples.len())
    }

    pub fn view(&self, request: &ViewRequest, now: NaiveDateTime) -> Vec<Sample> {
        request.apply(&self.snapshot(), now, &ResampleOptions::default())
    }

    pub fn save_master(&self) -> Result<()> {
        export_samples(&self.snapshot(), &self.paths.master_csv)
    }

    pub fn save_settings(&self) -> Result<()> {
        self.settings.save(&self.paths.settings)
    }

    // --- POWER LAW JOBS ---

    /// THE LOOP.
    /// Returns TRUE if the engine is busy (a job queued OR the worker calculating).
    pub fn update(&mut self) -> bool {
        // 1. Process Results (Swap Buffers)
        loop {
            match self.result_rx.try_recv() {
                Ok(result) => self.handle_job_result(result),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.handle_worker_lost();
                    break;
                }
            }
        }

        // 2. Dispatch whatever was waiting on a now idle metric
        let ready: Vec<Metric> = self
            .queued
            .keys()
            .filter(|m| !self.is_calculating(**m))
            .copied()
            .collect();
        for metric in ready {
            if let Some(req) = self.queued.remove(&metric) {
                self.dispatch_job(req);
            }
        }

        // 3. Report Busy Status
        !self.queued.is_empty() || self.has_active_workers()
    }

    /// Ask for a fresh overlay over `samples` (normally the current view).
    /// A newer request for the same metric supersedes one still waiting.
    pub fn request_overlay(&mut self, metric: Metric, samples: Vec<Sample>) {
        self.next_job_id += 1;
        let req = JobRequest {
            job_id: self.next_job_id,
            metric,
            samples: Arc::new(samples),
            genesis: start_of_day(ANALYSIS.power_law.genesis_date()),
            extend_days: self.settings.extend_lines_by_days,
        };

        if self.is_calculating(metric) {
            self.queued.insert(metric, req);
        } else {
            self.dispatch_job(req);
        }
    }

    /// Pump `update` until nothing is pending. Returns false on timeout.
    pub fn wait_until_idle(&mut self, timeout: Duration) -> bool {
        let start = Instant::now();
        while self.update() {
            if start.elapsed() >= timeout {
                return false;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        true
    }

    /// Accessor for the front buffer
    pub fn get_overlay(&self, metric: Metric) -> Option<Arc<PowerLawOverlay>> {
        self.overlays.get(&metric).and_then(|state| state.overlay.clone())
    }

    pub fn get_diagnostics(&self, metric: Metric) -> &[String] {
        self.overlays
            .get(&metric)
            .map(|state| state.diagnostics.as_slice())
            .unwrap_or_default()
    }

    /// (is calculating, last error)
    pub fn get_status(&self, metric: Metric) -> (bool, Option<String>) {
        match self.overlays.get(&metric) {
            Some(state) => (state.is_calculating(), state.last_error.clone()),
            None => (false, None),
        }
    }

    pub fn get_worker_status_msg(&self) -> Option<String> {
        let calculating = self
            .overlays
            .iter()
            .find(|(_, state)| state.is_calculating())
            .map(|(metric, _)| *metric);

        if let Some(metric) = calculating {
            Some(format!("Fitting {} power law", metric))
        } else if !self.queued.is_empty() {
            Some(format!("Queued: {}", self.queued.len()))
        } else {
            None
        }
    }

    // --- INTERNAL LOGIC ---

    fn is_calculating(&self, metric: Metric) -> bool {
        self.overlays
            .get(&metric)
            .is_some_and(|state| state.is_calculating())
    }

    fn has_active_workers(&self) -> bool {
        self.overlays.values().any(|s| s.is_calculating())
    }

    fn handle_job_result(&mut self, result: JobResult) {
        let Some(state) = self.overlays.get_mut(&result.metric) else {
            return;
        };
        if state.in_flight != Some(result.job_id) {
            log::debug!("Dropping stale {} result (job {})", result.metric, result.job_id);
            return;
        }

        match result.result {
            Ok(overlay) => state.update_buffer(overlay, result.diagnostics),
            Err(e) => {
                log::error!("Worker failed for {}: {}", result.metric, e);
                let mut sink = LogSink;
                for line in &result.diagnostics {
                    sink.note(line.clone());
                }
                state.record_failure(e, result.diagnostics);
            }
        }
    }

    /// No result can ever arrive again: fail everything in flight or queued.
    fn handle_worker_lost(&mut self) {
        let mut lost: Vec<Metric> = self.queued.drain().map(|(metric, _)| metric).collect();
        for (metric, state) in self.overlays.iter_mut() {
            if state.in_flight.take().is_some() {
                lost.push(*metric);
            }
        }
        if lost.is_empty() {
            return;
        }

        log::error!("❌ Power law worker stopped, dropping jobs for {:?}", lost);
        for metric in lost {
            let state = self.overlays.entry(metric).or_default();
            state.last_error = Some(WORKER_UNAVAILABLE.to_string());
        }
    }

    fn dispatch_job(&mut self, req: JobRequest) {
        let state = self.overlays.entry(req.metric).or_default();
        state.in_flight = Some(req.job_id);

        // If the worker is gone we are shutting down; clear the flag so nobody waits on it
        if self.job_tx.send(req).is_err() {
            state.in_flight = None;
            state.last_error = Some(WORKER_UNAVAILABLE.to_string());
        }
    }
}
