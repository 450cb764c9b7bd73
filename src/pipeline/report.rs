// ABOUTME: Serializable summary of a pipeline run.
// ABOUTME: Rendered as text for humans or as one JSON document for scripts.

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::diagnostics::Warning;
use crate::expose::ExposureOutcome;
use crate::identity::BuildIdentity;
use crate::provision::Backend;
use crate::publish::PublishedImage;
use crate::rollout::RolloutAttempt;

/// What happened in the cluster stage.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum DeployStage {
    /// No manifest directory configured or present.
    Skipped,
    /// The workload did not exist; manifests were applied and the service exposed.
    FirstTime {
        applied: Vec<PathBuf>,
        exposure: ExposureOutcome,
    },
    /// The workload existed and was updated in place.
    Rollout { rollout: RolloutAttempt },
}

#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub identity: BuildIdentity,
    pub backend: Backend,
    pub image: PublishedImage,
    pub stage: DeployStage,
    pub warnings: Vec<Warning>,
}

impl fmt::Display for PipelineReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "account {} in {}, tag {}",
            self.identity.account, self.identity.region, self.identity.tag
        )?;
        writeln!(
            f,
            "backend: bucket {}, lock table {}",
            self.backend.bucket.name, self.backend.table.name
        )?;
        writeln!(f, "image: {}", self.image.remote)?;

        match &self.stage {
            DeployStage::Skipped => writeln!(f, "cluster: skipped (no manifests)")?,
            DeployStage::FirstTime { applied, exposure } => {
                writeln!(f, "cluster: first deployment, {} manifest(s) applied", applied.len())?;
                match exposure.hostname() {
                    Some(hostname) => writeln!(f, "endpoint: {}", hostname)?,
                    None => writeln!(f, "endpoint: unresolved")?,
                }
            }
            DeployStage::Rollout { rollout } => {
                writeln!(f, "cluster: {} rolled out ({})", rollout.workload, rollout.status.summary())?;
            }
        }

        if !self.warnings.is_empty() {
            writeln!(f, "{} warning(s)", self.warnings.len())?;
        }
        Ok(())
    }
}
