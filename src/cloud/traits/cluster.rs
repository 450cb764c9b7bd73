// ABOUTME: Cluster operations used for exposure, rollout and diagnostics.
// ABOUTME: Apply manifests, read service addresses, update and observe workloads.

use std::path::Path;

use async_trait::async_trait;

use super::{DiagnosticStep, WorkloadRef, WorkloadStatus};
use crate::cloud::CloudError;
use crate::types::ImageRef;

#[async_trait]
pub trait ClusterOps: Send + Sync {
    /// Apply a manifest file declaratively.
    async fn apply(&self, manifest: &Path) -> Result<(), CloudError>;

    /// External hostname (or IP) assigned to a service, if any yet.
    async fn service_address(
        &self,
        namespace: &str,
        service: &str,
    ) -> Result<Option<String>, CloudError>;

    async fn workload_exists(&self, workload: &WorkloadRef) -> Result<bool, CloudError>;

    /// Point the workload's container at a new image.
    async fn set_image(&self, workload: &WorkloadRef, image: &ImageRef) -> Result<(), CloudError>;

    async fn workload_status(&self, workload: &WorkloadRef) -> Result<WorkloadStatus, CloudError>;

    /// Capture one diagnostic snapshot as text.
    async fn capture(
        &self,
        workload: &WorkloadRef,
        step: DiagnosticStep,
    ) -> Result<String, CloudError>;
}
