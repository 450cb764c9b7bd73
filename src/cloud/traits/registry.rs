// ABOUTME: Container registry operations.
// ABOUTME: Repository bootstrap, credential exchange and image scanning.

use async_trait::async_trait;

use super::ScanReport;
use crate::cloud::CloudError;
use crate::types::{ImageTag, RepositoryName};

#[async_trait]
pub trait RegistryOps: Send + Sync {
    async fn repository_exists(&self, repository: &RepositoryName) -> Result<bool, CloudError>;

    async fn create_repository(&self, repository: &RepositoryName) -> Result<(), CloudError>;

    /// Exchange cloud credentials for a short-lived registry password.
    async fn login_password(&self) -> Result<String, CloudError>;

    /// Start a vulnerability scan of a pushed image.
    ///
    /// The report is informational; callers never fail on its contents.
    async fn scan_image(
        &self,
        repository: &RepositoryName,
        tag: &ImageTag,
    ) -> Result<ScanReport, CloudError>;
}
