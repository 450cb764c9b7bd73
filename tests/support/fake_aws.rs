// ABOUTME: In-memory identity, object store, lock table and registry.
// ABOUTME: Records every call so tests can assert on creation counts and ordering.

use std::collections::BTreeSet;

use async_trait::async_trait;
use parking_lot::Mutex;
use rollgate::cloud::{
    BucketProbe, CloudError, IdentityOps, LockTableOps, ObjectStoreOps, RegistryOps, ScanReport,
};
use rollgate::types::{AccountId, BucketName, ImageTag, Region, RepositoryName, TableName};

use super::cloud_failure;

pub const ACCOUNT: &str = "123456789012";

#[derive(Debug, Default)]
pub struct AwsState {
    /// Buckets owned by the caller.
    pub buckets: BTreeSet<String>,
    /// Bucket names claimed by other accounts.
    pub foreign_buckets: BTreeSet<String>,
    pub tables: BTreeSet<String>,
    pub repositories: BTreeSet<String>,
    /// Bucket names whose creation is rejected.
    pub reject_bucket_create: BTreeSet<String>,
    pub reject_table_create: bool,
    /// Another writer creates the table just before this create call lands.
    pub concurrent_table_create: bool,
    pub fail_identity: bool,
    pub fail_versioning: bool,
    pub fail_login: bool,
    /// Number of probes after a create that still report the bucket missing.
    pub invisible_probes: u32,
    pub scan: Option<Result<ScanReport, String>>,
    pub calls: Vec<String>,
}

#[derive(Debug, Default)]
pub struct FakeAws {
    state: Mutex<AwsState>,
}

impl FakeAws {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mutate the fake's state before running the code under test.
    pub fn with(self, f: impl FnOnce(&mut AwsState)) -> Self {
        f(&mut self.state.lock());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().calls.clone()
    }

    /// Number of recorded calls whose operation is `operation`.
    pub fn count(&self, operation: &str) -> usize {
        self.state
            .lock()
            .calls
            .iter()
            .filter(|c| c.split(' ').next() == Some(operation))
            .count()
    }

    pub fn has_bucket(&self, name: &str) -> bool {
        self.state.lock().buckets.contains(name)
    }

    pub fn has_table(&self, name: &str) -> bool {
        self.state.lock().tables.contains(name)
    }

    fn record(&self, call: String) -> parking_lot::MutexGuard<'_, AwsState> {
        let mut state = self.state.lock();
        state.calls.push(call);
        state
    }
}

#[async_trait]
impl IdentityOps for FakeAws {
    async fn account_id(&self) -> Result<AccountId, CloudError> {
        let state = self.record("account_id".to_string());
        if state.fail_identity {
            return Err(cloud_failure("aws sts get-caller-identity", "ExpiredToken"));
        }
        Ok(AccountId::new(ACCOUNT).unwrap())
    }
}

#[async_trait]
impl ObjectStoreOps for FakeAws {
    async fn probe_bucket(&self, name: &BucketName) -> Result<BucketProbe, CloudError> {
        let mut state = self.record(format!("probe_bucket {}", name));
        if state.foreign_buckets.contains(name.as_str()) {
            return Ok(BucketProbe::Foreign);
        }
        if !state.buckets.contains(name.as_str()) {
            return Ok(BucketProbe::Missing);
        }
        if state.invisible_probes > 0 {
            state.invisible_probes -= 1;
            return Ok(BucketProbe::Missing);
        }
        Ok(BucketProbe::Owned)
    }

    async fn create_bucket(&self, name: &BucketName, region: &Region) -> Result<(), CloudError> {
        let mut state = self.record(format!("create_bucket {} {}", name, region));
        if state.reject_bucket_create.contains(name.as_str())
            || state.foreign_buckets.contains(name.as_str())
        {
            return Err(cloud_failure(
                "aws s3api create-bucket",
                "BucketAlreadyExists",
            ));
        }
        state.buckets.insert(name.to_string());
        Ok(())
    }

    async fn enable_versioning(&self, name: &BucketName) -> Result<(), CloudError> {
        let state = self.record(format!("enable_versioning {}", name));
        if state.fail_versioning {
            return Err(cloud_failure("aws s3api put-bucket-versioning", "AccessDenied"));
        }
        Ok(())
    }

    async fn block_public_access(&self, name: &BucketName) -> Result<(), CloudError> {
        self.record(format!("block_public_access {}", name));
        Ok(())
    }
}

#[async_trait]
impl LockTableOps for FakeAws {
    async fn table_exists(&self, name: &TableName) -> Result<bool, CloudError> {
        let state = self.record(format!("table_exists {}", name));
        Ok(state.tables.contains(name.as_str()))
    }

    async fn create_table(&self, name: &TableName, region: &Region) -> Result<(), CloudError> {
        let mut state = self.record(format!("create_table {} {}", name, region));
        if state.concurrent_table_create {
            state.tables.insert(name.to_string());
            return Err(cloud_failure("aws dynamodb create-table", "ResourceInUseException"));
        }
        if state.reject_table_create {
            return Err(cloud_failure("aws dynamodb create-table", "LimitExceededException"));
        }
        state.tables.insert(name.to_string());
        Ok(())
    }

    async fn wait_table_active(&self, name: &TableName) -> Result<(), CloudError> {
        self.record(format!("wait_table_active {}", name));
        Ok(())
    }
}

#[async_trait]
impl RegistryOps for FakeAws {
    async fn repository_exists(&self, repository: &RepositoryName) -> Result<bool, CloudError> {
        let state = self.record(format!("repository_exists {}", repository));
        Ok(state.repositories.contains(repository.as_str()))
    }

    async fn create_repository(&self, repository: &RepositoryName) -> Result<(), CloudError> {
        let mut state = self.record(format!("create_repository {}", repository));
        state.repositories.insert(repository.to_string());
        Ok(())
    }

    async fn login_password(&self) -> Result<String, CloudError> {
        let state = self.record("login_password".to_string());
        if state.fail_login {
            return Err(cloud_failure("aws ecr get-login-password", "AccessDenied"));
        }
        Ok("registry-token".to_string())
    }

    async fn scan_image(
        &self,
        repository: &RepositoryName,
        tag: &ImageTag,
    ) -> Result<ScanReport, CloudError> {
        let state = self.record(format!("scan_image {}:{}", repository, tag));
        match &state.scan {
            Some(Ok(report)) => Ok(report.clone()),
            Some(Err(message)) => Err(cloud_failure("aws ecr describe-image-scan-findings", message)),
            None => Ok(ScanReport {
                status: "COMPLETE".to_string(),
                findings: Default::default(),
            }),
        }
    }
}
