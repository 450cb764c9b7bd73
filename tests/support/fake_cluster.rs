// ABOUTME: In-memory cluster driven by tokio's clock.
// ABOUTME: Service addresses appear after a delay; workload status follows a script.

use std::collections::{BTreeSet, HashMap, VecDeque};
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use rollgate::cloud::{CloudError, ClusterOps, DiagnosticStep, WorkloadRef, WorkloadStatus};
use rollgate::types::ImageRef;
use tokio::time::Instant;

use super::cloud_failure;

#[derive(Debug, Default)]
pub struct ClusterState {
    pub workload_exists: bool,
    /// Service name -> (delay after its manifest is applied, address).
    pub addresses: HashMap<String, (Duration, String)>,
    /// Manifest file name -> service it creates.
    pub manifest_services: HashMap<String, String>,
    /// Manifest file names whose apply fails.
    pub reject_apply: BTreeSet<String>,
    pub reject_set_image: bool,
    /// Statuses returned in order; the last one repeats.
    pub statuses: VecDeque<WorkloadStatus>,
    pub failing_captures: BTreeSet<DiagnosticStep>,
    applied_at: HashMap<String, Instant>,
    pub calls: Vec<String>,
}

#[derive(Debug, Default)]
pub struct FakeCluster {
    state: Mutex<ClusterState>,
}

/// A status with the given replica counters at a stable generation.
pub fn status(desired: i32, updated: i32, ready: i32, available: i32) -> WorkloadStatus {
    WorkloadStatus {
        generation: 2,
        observed_generation: 2,
        desired,
        replicas: desired.max(updated),
        updated,
        ready,
        available,
    }
}

impl FakeCluster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, f: impl FnOnce(&mut ClusterState)) -> Self {
        f(&mut self.state.lock());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().calls.clone()
    }

    /// File names passed to `apply`, in order.
    pub fn applied(&self) -> Vec<String> {
        self.state
            .lock()
            .calls
            .iter()
            .filter_map(|c| c.strip_prefix("apply "))
            .map(str::to_string)
            .collect()
    }

    pub fn count(&self, operation: &str) -> usize {
        self.state
            .lock()
            .calls
            .iter()
            .filter(|c| c.split(' ').next() == Some(operation))
            .count()
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[async_trait]
impl ClusterOps for FakeCluster {
    async fn apply(&self, manifest: &Path) -> Result<(), CloudError> {
        let name = file_name(manifest);
        let mut state = self.state.lock();
        state.calls.push(format!("apply {}", name));
        if state.reject_apply.contains(&name) {
            return Err(cloud_failure("kubectl apply", "admission webhook denied"));
        }
        if let Some(service) = state.manifest_services.get(&name).cloned() {
            state.applied_at.insert(service, Instant::now());
        }
        Ok(())
    }

    async fn service_address(
        &self,
        namespace: &str,
        service: &str,
    ) -> Result<Option<String>, CloudError> {
        let mut state = self.state.lock();
        state.calls.push(format!("service_address {}/{}", namespace, service));
        let Some(applied) = state.applied_at.get(service).copied() else {
            return Ok(None);
        };
        Ok(state
            .addresses
            .get(service)
            .filter(|(delay, _)| applied.elapsed() >= *delay)
            .map(|(_, address)| address.clone()))
    }

    async fn workload_exists(&self, workload: &WorkloadRef) -> Result<bool, CloudError> {
        let mut state = self.state.lock();
        state.calls.push(format!("workload_exists {}", workload.deployment));
        Ok(state.workload_exists)
    }

    async fn set_image(&self, workload: &WorkloadRef, image: &ImageRef) -> Result<(), CloudError> {
        let mut state = self.state.lock();
        state
            .calls
            .push(format!("set_image {} {}", workload.deployment, image));
        if state.reject_set_image {
            return Err(cloud_failure("kubectl set image", "container not found"));
        }
        Ok(())
    }

    async fn workload_status(&self, workload: &WorkloadRef) -> Result<WorkloadStatus, CloudError> {
        let mut state = self.state.lock();
        state.calls.push(format!("workload_status {}", workload.deployment));
        let status = if state.statuses.len() > 1 {
            state.statuses.pop_front()
        } else {
            state.statuses.front().copied()
        };
        status.ok_or_else(|| cloud_failure("kubectl get deployment", "NotFound"))
    }

    async fn capture(
        &self,
        workload: &WorkloadRef,
        step: DiagnosticStep,
    ) -> Result<String, CloudError> {
        let mut state = self.state.lock();
        state.calls.push(format!("capture {}", step.label()));
        if state.failing_captures.contains(&step) {
            return Err(cloud_failure("kubectl", "connection refused"));
        }
        Ok(format!("{} of {}", step, workload.deployment))
    }
}
