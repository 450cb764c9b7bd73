// ABOUTME: Object storage operations for the Terraform state bucket.
// ABOUTME: Probe, create and harden a bucket.

use async_trait::async_trait;

use super::BucketProbe;
use crate::cloud::CloudError;
use crate::types::{BucketName, Region};

#[async_trait]
pub trait ObjectStoreOps: Send + Sync {
    /// Report whether the bucket exists and who owns it.
    async fn probe_bucket(&self, name: &BucketName) -> Result<BucketProbe, CloudError>;

    /// Create the bucket in `region`.
    async fn create_bucket(&self, name: &BucketName, region: &Region) -> Result<(), CloudError>;

    /// Turn on object versioning.
    async fn enable_versioning(&self, name: &BucketName) -> Result<(), CloudError>;

    /// Block every form of public access.
    async fn block_public_access(&self, name: &BucketName) -> Result<(), CloudError>;
}
