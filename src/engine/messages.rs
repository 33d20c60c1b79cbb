use std::sync::Arc;

use chrono::NaiveDateTime;

use crate::domain::{Metric, Sample};
use crate::models::PowerLawOverlay;

/// A request to fit and project the power law for one metric
#[derive(Debug, Clone)]
pub struct JobRequest {
    pub job_id: u64,
    pub metric: Metric,
    // The already-filtered view, shared rather than copied into the worker
    pub samples: Arc<Vec<Sample>>,
    pub genesis: NaiveDateTime,
    pub extend_days: u32,
}

/// The result returned by the worker
#[derive(Debug, Clone)]
pub struct JobResult {
    pub job_id: u64,
    pub metric: Metric,
    pub duration_ms: u128,

    // Success: the new front buffer
    // Failure: the error string
    pub result: Result<Arc<PowerLawOverlay>, String>,

    /// The fit's human-readable trace, for the "show more" report
    pub diagnostics: Vec<String>,
}
