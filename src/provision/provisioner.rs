// ABOUTME: Resource provisioner tying bucket and lock table bootstrap together.
// ABOUTME: Holds the account, region and retry budget for one pipeline run.

use serde::Serialize;

use super::backend_config::BackendConfig;
use super::retry::RetryPolicy;
use super::state::BackendResource;
use super::{ProvisionError, ensure_bucket, ensure_lock_table};
use crate::cloud::{LockTableOps, ObjectStoreOps};
use crate::types::{AccountId, BucketMarker, BucketName, Region, TableMarker, TableName};

/// The Terraform state backend once both resources are ready.
#[derive(Debug, Clone, Serialize)]
pub struct Backend {
    pub bucket: BackendResource<BucketMarker>,
    pub table: BackendResource<TableMarker>,
}

impl Backend {
    /// Terraform `-backend-config` values for this backend.
    pub fn config(&self, state_key: &str) -> BackendConfig {
        BackendConfig {
            bucket: self.bucket.name.to_string(),
            key: state_key.to_string(),
            region: self.bucket.region.to_string(),
            dynamodb_table: self.table.name.to_string(),
            encrypt: true,
        }
    }
}

/// Bootstraps backend resources for one account and region.
pub struct Provisioner<'a, B: ?Sized> {
    cloud: &'a B,
    account: AccountId,
    retry: RetryPolicy,
}

impl<'a, B> Provisioner<'a, B>
where
    B: ObjectStoreOps + LockTableOps + ?Sized,
{
    pub fn new(cloud: &'a B, account: AccountId) -> Self {
        Self {
            cloud,
            account,
            retry: RetryPolicy::default(),
        }
    }

    /// Budget for the post-creation visibility check.
    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Ensure the state bucket exists in `region`.
    pub async fn ensure_backend(
        &self,
        name: &BucketName,
        region: &Region,
    ) -> Result<BackendResource<BucketMarker>, ProvisionError> {
        ensure_bucket(self.cloud, name, &self.account, region, &self.retry).await
    }

    /// Ensure the lock table exists in `region`.
    pub async fn ensure_lock_table(
        &self,
        name: &TableName,
        region: &Region,
    ) -> Result<BackendResource<TableMarker>, ProvisionError> {
        ensure_lock_table(self.cloud, name, region).await
    }

    /// Bucket first, then the lock table.
    pub async fn bootstrap(
        &self,
        bucket: &BucketName,
        table: &TableName,
        region: &Region,
    ) -> Result<Backend, ProvisionError> {
        let bucket = self.ensure_backend(bucket, region).await?;
        let table = self.ensure_lock_table(table, region).await?;
        Ok(Backend { bucket, table })
    }
}
