// ABOUTME: Types shared between the capability traits and their callers.
// ABOUTME: Bucket probes, build requests, scan reports and workload state.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::types::ImageRef;

/// Existence of a bucket from the caller's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketProbe {
    /// Exists and is accessible to the caller.
    Owned,
    /// Does not exist anywhere.
    Missing,
    /// Exists but belongs to someone else (name is globally claimed).
    Foreign,
}

/// Everything needed to build an image locally.
#[derive(Debug, Clone)]
pub struct BuildRequest {
    pub context: PathBuf,
    pub dockerfile: Option<PathBuf>,
    pub image: ImageRef,
    pub build_args: BTreeMap<String, String>,
    pub platform: Option<String>,
}

/// Outcome of an informational vulnerability scan.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub status: String,
    pub findings: BTreeMap<String, u64>,
}

impl ScanReport {
    pub fn total_findings(&self) -> u64 {
        self.findings.values().sum()
    }

    pub fn summary(&self) -> String {
        if self.findings.is_empty() {
            return format!("scan {}", self.status.to_lowercase());
        }
        let counts: Vec<String> = self
            .findings
            .iter()
            .map(|(severity, count)| format!("{} {}", count, severity.to_lowercase()))
            .collect();
        format!("scan {}: {}", self.status.to_lowercase(), counts.join(", "))
    }
}

/// A deployment running in the cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkloadRef {
    pub namespace: String,
    pub deployment: String,
    pub container: String,
    /// Label selector matching the workload's pods, e.g. `app=orders-api`.
    pub selector: String,
}

impl fmt::Display for WorkloadRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/deployment/{}", self.namespace, self.deployment)
    }
}

/// Replica counters reported for a deployment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WorkloadStatus {
    pub generation: i64,
    pub observed_generation: i64,
    pub desired: i32,
    /// Pods across all replica sets, old ones included.
    pub replicas: i32,
    pub updated: i32,
    pub ready: i32,
    pub available: i32,
}

impl WorkloadStatus {
    /// The controller has seen the latest spec, no old replica is left and
    /// every desired replica is updated, ready and available.
    pub fn is_converged(&self) -> bool {
        self.observed_generation >= self.generation
            && self.replicas == self.updated
            && self.updated == self.desired
            && self.ready == self.desired
            && self.available == self.desired
    }

    pub fn summary(&self) -> String {
        let mut summary = format!(
            "{}/{} ready, {}/{} updated, {}/{} available",
            self.ready, self.desired, self.updated, self.desired, self.available, self.desired
        );
        if self.replicas > self.updated {
            summary.push_str(&format!(", {} old", self.replicas - self.updated));
        }
        summary
    }
}

/// One snapshot in the post-timeout diagnostic bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticStep {
    DeploymentSummary,
    DeploymentDescription,
    ReplicaSets,
    Pods,
    PodDescriptions,
    RecentEvents,
}

impl DiagnosticStep {
    /// Capture order of the bundle.
    pub const ALL: [DiagnosticStep; 6] = [
        DiagnosticStep::DeploymentSummary,
        DiagnosticStep::DeploymentDescription,
        DiagnosticStep::ReplicaSets,
        DiagnosticStep::Pods,
        DiagnosticStep::PodDescriptions,
        DiagnosticStep::RecentEvents,
    ];

    /// Number of events kept by [`DiagnosticStep::RecentEvents`].
    pub const EVENT_LIMIT: usize = 100;

    pub fn label(&self) -> &'static str {
        match self {
            DiagnosticStep::DeploymentSummary => "deployment summary",
            DiagnosticStep::DeploymentDescription => "deployment description",
            DiagnosticStep::ReplicaSets => "replica sets",
            DiagnosticStep::Pods => "pods",
            DiagnosticStep::PodDescriptions => "pod descriptions",
            DiagnosticStep::RecentEvents => "recent events",
        }
    }
}

impl fmt::Display for DiagnosticStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(desired: i32, updated: i32, ready: i32, available: i32) -> WorkloadStatus {
        WorkloadStatus {
            generation: 3,
            observed_generation: 3,
            desired,
            replicas: desired.max(updated),
            updated,
            ready,
            available,
        }
    }

    #[test]
    fn converged_when_all_counters_match() {
        assert!(status(2, 2, 2, 2).is_converged());
    }

    #[test]
    fn not_converged_while_pods_are_not_ready() {
        let s = status(2, 2, 0, 0);
        assert!(!s.is_converged());
        assert_eq!(s.summary(), "0/2 ready, 2/2 updated, 0/2 available");
    }

    #[test]
    fn old_replicas_block_convergence() {
        let mut s = status(2, 2, 2, 2);
        s.replicas = 3;
        assert!(!s.is_converged());
        assert_eq!(s.summary(), "2/2 ready, 2/2 updated, 2/2 available, 1 old");
    }

    #[test]
    fn not_converged_until_generation_is_observed() {
        let mut s = status(2, 2, 2, 2);
        s.generation = 4;
        assert!(!s.is_converged());
    }

    #[test]
    fn diagnostic_steps_are_in_capture_order() {
        let labels: Vec<_> = DiagnosticStep::ALL.iter().map(|s| s.label()).collect();
        assert_eq!(
            labels,
            [
                "deployment summary",
                "deployment description",
                "replica sets",
                "pods",
                "pod descriptions",
                "recent events"
            ]
        );
    }

    #[test]
    fn scan_summary_lists_severities() {
        let mut findings = BTreeMap::new();
        findings.insert("CRITICAL".to_string(), 1);
        findings.insert("HIGH".to_string(), 3);
        let report = ScanReport {
            status: "COMPLETE".to_string(),
            findings,
        };
        assert_eq!(report.total_findings(), 4);
        assert_eq!(report.summary(), "scan complete: 1 critical, 3 high");
    }
}
