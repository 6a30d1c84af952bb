//! Human-readable status shared with the local listener

use std::sync::{Arc, Mutex};

use serde::Serialize;

use super::phase::Phase;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    pub status: String,
    pub phase: Option<Phase>,
    pub connected: bool,
}

impl Default for StatusReport {
    fn default() -> Self {
        Self {
            status: "Starting...".to_string(),
            phase: None,
            connected: false,
        }
    }
}

/// Last known condition of the presence pipeline, written by the driver.
#[derive(Debug, Clone, Default)]
pub struct StatusLine {
    inner: Arc<Mutex<StatusReport>>,
}

impl StatusLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> StatusReport {
        match self.inner.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn text(&self) -> String {
        self.get().status
    }

    pub fn set(&self, status: impl Into<String>, phase: Option<Phase>, connected: bool) {
        let report = StatusReport {
            status: status.into(),
            phase,
            connected,
        };

        let mut guard = match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if guard.status != report.status {
            tracing::info!("Status: {}", report.status);
        }
        *guard = report;
    }
}
