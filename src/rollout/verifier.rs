// ABOUTME: Triggers an image update and polls the workload until it converges.
// ABOUTME: No retry on timeout: diagnostics are captured and the rollout fails.

use std::time::Duration;

use serde::Serialize;
use tokio::time::Instant;

use super::{DiagnosticBundle, RolloutError};
use crate::cloud::{ClusterOps, WorkloadRef, WorkloadStatus};
use crate::types::ImageRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RolloutSettings {
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for RolloutSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(300),
            poll_interval: Duration::from_secs(5),
        }
    }
}

/// A converged image update.
#[derive(Debug, Clone, Serialize)]
pub struct RolloutAttempt {
    pub workload: WorkloadRef,
    pub image: ImageRef,
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
    pub status: WorkloadStatus,
    #[serde(with = "humantime_serde")]
    pub elapsed: Duration,
}

pub struct RolloutVerifier<'a, C: ?Sized> {
    cluster: &'a C,
    settings: RolloutSettings,
}

impl<'a, C: ClusterOps + ?Sized> RolloutVerifier<'a, C> {
    pub fn new(cluster: &'a C, settings: RolloutSettings) -> Self {
        Self { cluster, settings }
    }

    /// Point `workload` at `image` and wait for every replica to be updated,
    /// ready and available.
    pub async fn rollout(
        &self,
        workload: &WorkloadRef,
        image: &ImageRef,
    ) -> Result<RolloutAttempt, RolloutError> {
        tracing::info!("updating {} to {}", workload, image);
        self.cluster
            .set_image(workload, image)
            .await
            .map_err(|source| RolloutError::Update {
                workload: workload.to_string(),
                image: image.to_string(),
                source,
            })?;

        let started = Instant::now();
        let deadline = started + self.settings.timeout;
        let mut last_status = None;

        loop {
            match self.cluster.workload_status(workload).await {
                Ok(status) if status.is_converged() => {
                    tracing::info!("{} converged: {}", workload, status.summary());
                    return Ok(RolloutAttempt {
                        workload: workload.clone(),
                        image: image.clone(),
                        timeout: self.settings.timeout,
                        status,
                        elapsed: started.elapsed(),
                    });
                }
                Ok(status) => {
                    tracing::debug!("{}: {}", workload, status.summary());
                    last_status = Some(status);
                }
                Err(e) => tracing::debug!("status of {} unavailable: {}", workload, e),
            }

            let now = Instant::now();
            if now >= deadline {
                break;
            }
            tokio::time::sleep(self.settings.poll_interval.min(deadline - now)).await;
        }

        tracing::warn!(
            "{} did not converge within {:?}; collecting diagnostics",
            workload,
            self.settings.timeout
        );
        let diagnostics = DiagnosticBundle::collect(self.cluster, workload).await;

        Err(RolloutError::Timeout {
            workload: workload.to_string(),
            timeout: self.settings.timeout,
            last_status,
            diagnostics,
        })
    }
}
