use std::sync::Arc;

use crate::models::PowerLawOverlay;

/// State of the power-law overlay for a single metric.
#[derive(Debug, Clone)]
pub struct OverlayState {
    /// THE FRONT BUFFER.
    /// Readers clone the Arc; a finished job replaces the pointer.
    pub overlay: Option<Arc<PowerLawOverlay>>,

    /// Trace lines from the fit that produced `overlay`
    pub diagnostics: Vec<String>,

    /// Job currently with the worker, if any. Results for other ids are stale.
    pub in_flight: Option<u64>,

    /// Last error (if any) to report
    pub last_error: Option<String>,
}

impl Default for OverlayState {
    fn default() -> Self {
        Self::new()
    }
}

impl OverlayState {
    pub fn new() -> Self {
        Self {
            overlay: None,
            diagnostics: Vec::new(),
            in_flight: None,
            last_error: None,
        }
    }

    pub fn is_calculating(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Promote a finished result to the front buffer.
    pub fn update_buffer(&mut self, overlay: Arc<PowerLawOverlay>, diagnostics: Vec<String>) {
        self.overlay = Some(overlay);
        self.diagnostics = diagnostics;
        self.in_flight = None;
        self.last_error = None;
    }

    /// Keep the previous overlay, remember why the new one failed.
    pub fn record_failure(&mut self, error: String, diagnostics: Vec<String>) {
        self.diagnostics = diagnostics;
        self.in_flight = None;
        self.last_error = Some(error);
    }
}
