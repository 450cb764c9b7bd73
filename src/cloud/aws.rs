// ABOUTME: AWS CLI adapter for identity, S3 state bucket, DynamoDB lock table and ECR.
// ABOUTME: Translates capability calls into `aws` invocations and parses their output.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::Deserialize;

use super::traits::{
    BucketProbe, IdentityOps, LockTableOps, ObjectStoreOps, RegistryOps, ScanReport,
};
use super::CloudError;
use crate::exec::{CommandOutput, CommandRunner, CommandSpec};
use crate::types::{AccountId, BucketName, ImageTag, Region, RepositoryName, TableName};

const PUBLIC_ACCESS_BLOCK: &str = "BlockPublicAcls=true,IgnorePublicAcls=true,\
BlockPublicPolicy=true,RestrictPublicBuckets=true";

/// Hash key Terraform uses for its lock entries.
const LOCK_KEY: &str = "LockID";

/// Registry host serving the account's repositories in `region`.
pub fn registry_host(account: &AccountId, region: &Region) -> String {
    format!("{}.dkr.ecr.{}.amazonaws.com", account, region)
}

/// Adapter over the `aws` command line tool.
#[derive(Debug, Clone)]
pub struct AwsCli<R> {
    runner: R,
    region: Option<Region>,
    profile: Option<String>,
}

impl<R: CommandRunner> AwsCli<R> {
    pub fn new(runner: R) -> Self {
        Self {
            runner,
            region: None,
            profile: None,
        }
    }

    /// Pin every call to `region`.
    pub fn region(mut self, region: Region) -> Self {
        self.region = Some(region);
        self
    }

    /// Use a named credentials profile.
    pub fn profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    fn command(&self, service: &str, operation: &str) -> CommandSpec {
        // An empty pager keeps output on the captured stdout.
        let mut spec = CommandSpec::new("aws")
            .args([service, operation])
            .env("AWS_PAGER", "");
        if let Some(region) = &self.region {
            spec = spec.args(["--region", region.as_str()]);
        }
        if let Some(profile) = &self.profile {
            spec = spec.args(["--profile", profile.as_str()]);
        }
        spec
    }

    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, CloudError> {
        Ok(self.runner.run(spec).await?)
    }

    /// Run and require a zero exit status.
    async fn run_checked(&self, spec: &CommandSpec) -> Result<CommandOutput, CloudError> {
        let output = self.run(spec).await?;
        if !output.success() {
            return Err(CloudError::command_failed(spec, &output));
        }
        Ok(output)
    }
}

fn mentions_any(output: &CommandOutput, needles: &[&str]) -> bool {
    needles
        .iter()
        .any(|n| output.stderr.contains(n) || output.stdout.contains(n))
}

#[async_trait]
impl<R: CommandRunner> IdentityOps for AwsCli<R> {
    async fn account_id(&self) -> Result<AccountId, CloudError> {
        let spec = self
            .command("sts", "get-caller-identity")
            .args(["--query", "Account", "--output", "text"]);
        let output = self.run_checked(&spec).await?;
        AccountId::new(&output.stdout).map_err(|e| CloudError::parse(&spec, e.to_string()))
    }
}

#[async_trait]
impl<R: CommandRunner> ObjectStoreOps for AwsCli<R> {
    async fn probe_bucket(&self, name: &BucketName) -> Result<BucketProbe, CloudError> {
        let spec = self
            .command("s3api", "head-bucket")
            .args(["--bucket", name.as_str()]);
        let output = self.run(&spec).await?;

        if output.success() {
            return Ok(BucketProbe::Owned);
        }
        if mentions_any(&output, &["404", "Not Found", "NoSuchBucket"]) {
            return Ok(BucketProbe::Missing);
        }
        if mentions_any(&output, &["403", "Forbidden", "AccessDenied"]) {
            return Ok(BucketProbe::Foreign);
        }
        Err(CloudError::command_failed(&spec, &output))
    }

    async fn create_bucket(&self, name: &BucketName, region: &Region) -> Result<(), CloudError> {
        let mut spec = self
            .command("s3api", "create-bucket")
            .args(["--bucket", name.as_str()]);
        if self.region.is_none() {
            spec = spec.args(["--region", region.as_str()]);
        }
        if region.needs_location_constraint() {
            spec = spec.args([
                "--create-bucket-configuration".to_string(),
                format!("LocationConstraint={}", region),
            ]);
        }
        self.run_checked(&spec).await?;
        Ok(())
    }

    async fn enable_versioning(&self, name: &BucketName) -> Result<(), CloudError> {
        let spec = self.command("s3api", "put-bucket-versioning").args([
            "--bucket",
            name.as_str(),
            "--versioning-configuration",
            "Status=Enabled",
        ]);
        self.run_checked(&spec).await?;
        Ok(())
    }

    async fn block_public_access(&self, name: &BucketName) -> Result<(), CloudError> {
        let spec = self.command("s3api", "put-public-access-block").args([
            "--bucket",
            name.as_str(),
            "--public-access-block-configuration",
            PUBLIC_ACCESS_BLOCK,
        ]);
        self.run_checked(&spec).await?;
        Ok(())
    }
}

#[async_trait]
impl<R: CommandRunner> LockTableOps for AwsCli<R> {
    async fn table_exists(&self, name: &TableName) -> Result<bool, CloudError> {
        let spec = self
            .command("dynamodb", "describe-table")
            .args(["--table-name", name.as_str()]);
        let output = self.run(&spec).await?;

        if output.success() {
            return Ok(true);
        }
        if mentions_any(&output, &["ResourceNotFoundException"]) {
            return Ok(false);
        }
        Err(CloudError::command_failed(&spec, &output))
    }

    async fn create_table(&self, name: &TableName, region: &Region) -> Result<(), CloudError> {
        let mut spec = self.command("dynamodb", "create-table").args([
            "--table-name".to_string(),
            name.to_string(),
            "--attribute-definitions".to_string(),
            format!("AttributeName={},AttributeType=S", LOCK_KEY),
            "--key-schema".to_string(),
            format!("AttributeName={},KeyType=HASH", LOCK_KEY),
            "--billing-mode".to_string(),
            "PAY_PER_REQUEST".to_string(),
        ]);
        if self.region.is_none() {
            spec = spec.args(["--region", region.as_str()]);
        }
        self.run_checked(&spec).await?;
        Ok(())
    }

    async fn wait_table_active(&self, name: &TableName) -> Result<(), CloudError> {
        let spec = self
            .command("dynamodb", "wait")
            .args(["table-exists", "--table-name", name.as_str()]);
        self.run_checked(&spec).await?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScanFindingsResponse {
    image_scan_status: Option<ScanStatus>,
    image_scan_findings: Option<ScanFindings>,
}

#[derive(Debug, Deserialize)]
struct ScanStatus {
    status: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScanFindings {
    #[serde(default)]
    finding_severity_counts: BTreeMap<String, u64>,
}

#[async_trait]
impl<R: CommandRunner> RegistryOps for AwsCli<R> {
    async fn repository_exists(&self, repository: &RepositoryName) -> Result<bool, CloudError> {
        let spec = self
            .command("ecr", "describe-repositories")
            .args(["--repository-names", repository.as_str()]);
        let output = self.run(&spec).await?;

        if output.success() {
            return Ok(true);
        }
        if mentions_any(&output, &["RepositoryNotFoundException"]) {
            return Ok(false);
        }
        Err(CloudError::command_failed(&spec, &output))
    }

    async fn create_repository(&self, repository: &RepositoryName) -> Result<(), CloudError> {
        let spec = self.command("ecr", "create-repository").args([
            "--repository-name",
            repository.as_str(),
            "--image-scanning-configuration",
            "scanOnPush=true",
        ]);
        self.run_checked(&spec).await?;
        Ok(())
    }

    async fn login_password(&self) -> Result<String, CloudError> {
        let spec = self.command("ecr", "get-login-password");
        let output = self.run_checked(&spec).await?;
        let password = output.stdout.trim().to_string();
        if password.is_empty() {
            return Err(CloudError::parse(&spec, "empty registry password"));
        }
        Ok(password)
    }

    async fn scan_image(
        &self,
        repository: &RepositoryName,
        tag: &ImageTag,
    ) -> Result<ScanReport, CloudError> {
        let image_id = format!("imageTag={}", tag);

        // Repositories with scan-on-push reject a second scan; the findings
        // query below still works, so the start result is only logged.
        let start = self.command("ecr", "start-image-scan").args([
            "--repository-name",
            repository.as_str(),
            "--image-id",
            image_id.as_str(),
        ]);
        let started = self.run(&start).await?;
        if !started.success() {
            tracing::debug!("start-image-scan: {}", started.failure_message());
        }

        let spec = self.command("ecr", "describe-image-scan-findings").args([
            "--repository-name",
            repository.as_str(),
            "--image-id",
            image_id.as_str(),
            "--output",
            "json",
        ]);
        let output = self.run_checked(&spec).await?;
        let response: ScanFindingsResponse = serde_json::from_str(&output.stdout)
            .map_err(|e| CloudError::parse(&spec, e.to_string()))?;

        Ok(ScanReport {
            status: response
                .image_scan_status
                .map(|s| s.status)
                .unwrap_or_else(|| "UNKNOWN".to_string()),
            findings: response
                .image_scan_findings
                .map(|f| f.finding_severity_counts)
                .unwrap_or_default(),
        })
    }
}
