// ABOUTME: Error types for rollout verification.
// ABOUTME: Timeouts carry the diagnostic bundle collected after the deadline.

use std::time::Duration;

use thiserror::Error;

use super::DiagnosticBundle;
use crate::cloud::{CloudError, WorkloadStatus};

#[derive(Debug, Error)]
pub enum RolloutError {
    /// The image update itself was rejected; nothing changed.
    #[error("failed to update {workload} to {image}: {source}")]
    Update {
        workload: String,
        image: String,
        source: CloudError,
    },

    #[error("{workload} did not converge within {timeout:?} (last status: {})", last_status_summary(.last_status))]
    Timeout {
        workload: String,
        timeout: Duration,
        last_status: Option<WorkloadStatus>,
        diagnostics: DiagnosticBundle,
    },
}

fn last_status_summary(status: &Option<WorkloadStatus>) -> String {
    status
        .as_ref()
        .map(WorkloadStatus::summary)
        .unwrap_or_else(|| "unknown".to_string())
}

impl RolloutError {
    /// Diagnostics captured for a timed-out rollout.
    pub fn diagnostics(&self) -> Option<&DiagnosticBundle> {
        match self {
            RolloutError::Update { .. } => None,
            RolloutError::Timeout { diagnostics, .. } => Some(diagnostics),
        }
    }
}
