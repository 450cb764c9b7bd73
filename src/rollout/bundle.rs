// ABOUTME: Post-timeout diagnostic bundle with one entry per capture step.
// ABOUTME: A failed capture is recorded in place and never stops later ones.

use std::fmt;

use serde::Serialize;

use crate::cloud::{ClusterOps, DiagnosticStep, WorkloadRef};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "output", rename_all = "lowercase")]
pub enum CaptureResult {
    Captured(String),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Capture {
    pub step: DiagnosticStep,
    pub result: CaptureResult,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiagnosticBundle {
    pub captures: Vec<Capture>,
}

impl DiagnosticBundle {
    /// Run every capture step in order against `workload`.
    pub async fn collect<C: ClusterOps + ?Sized>(cluster: &C, workload: &WorkloadRef) -> Self {
        let mut captures = Vec::with_capacity(DiagnosticStep::ALL.len());

        for step in DiagnosticStep::ALL {
            let result = match cluster.capture(workload, step).await {
                Ok(output) => CaptureResult::Captured(output),
                Err(e) => {
                    tracing::warn!("diagnostic capture '{}' failed: {}", step, e);
                    CaptureResult::Failed(e.to_string())
                }
            };
            captures.push(Capture { step, result });
        }

        Self { captures }
    }

    pub fn steps(&self) -> Vec<DiagnosticStep> {
        self.captures.iter().map(|c| c.step).collect()
    }

    pub fn failed(&self) -> usize {
        self.captures
            .iter()
            .filter(|c| matches!(c.result, CaptureResult::Failed(_)))
            .count()
    }
}

impl fmt::Display for DiagnosticBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for capture in &self.captures {
            writeln!(f, "=== {} ===", capture.step)?;
            match &capture.result {
                CaptureResult::Captured(output) => writeln!(f, "{}", output.trim_end())?,
                CaptureResult::Failed(error) => writeln!(f, "(capture failed: {})", error)?,
            }
        }
        Ok(())
    }
}
