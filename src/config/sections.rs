// ABOUTME: Nested config sections for backend, build, manifests and cluster workload.
// ABOUTME: Durations use humantime strings like "15s" or "6m".

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use super::EnvValue;
use crate::provision::RetryPolicy;
use crate::types::{BucketName, TableName};

/// Terraform state backend resources.
#[derive(Debug, Clone, Deserialize)]
pub struct BackendSection {
    pub bucket: BucketName,
    pub table: TableName,

    /// Object key of the state file; defaults to `<service>/terraform.tfstate`.
    #[serde(default)]
    pub state_key: Option<String>,

    #[serde(default)]
    pub retry: RetryPolicy,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BuildSection {
    #[serde(default = "default_context")]
    pub context: PathBuf,

    #[serde(default)]
    pub dockerfile: Option<PathBuf>,

    #[serde(default)]
    pub platform: Option<String>,

    #[serde(default)]
    pub args: BTreeMap<String, EnvValue>,

    /// Run an informational vulnerability scan after push.
    #[serde(default = "default_true")]
    pub scan: bool,

    /// Create the registry repository when missing.
    #[serde(default = "default_true")]
    pub create_repository: bool,
}

impl Default for BuildSection {
    fn default() -> Self {
        Self {
            context: default_context(),
            dockerfile: None,
            platform: None,
            args: BTreeMap::new(),
            scan: true,
            create_repository: true,
        }
    }
}

fn default_context() -> PathBuf {
    PathBuf::from(".")
}

fn default_true() -> bool {
    true
}

/// Manifest directory and the file names inside it.
#[derive(Debug, Clone, Deserialize)]
pub struct ManifestSection {
    pub dir: PathBuf,

    #[serde(default = "default_namespace_file")]
    pub namespace: String,
    #[serde(default = "default_config_file")]
    pub config: String,
    #[serde(default = "default_secret_file")]
    pub secret: String,
    #[serde(default = "default_workload_file")]
    pub workload: String,
    #[serde(default = "default_service_file")]
    pub service: String,
    #[serde(default = "default_fallback_service_file")]
    pub fallback_service: String,
}

impl ManifestSection {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            namespace: default_namespace_file(),
            config: default_config_file(),
            secret: default_secret_file(),
            workload: default_workload_file(),
            service: default_service_file(),
            fallback_service: default_fallback_service_file(),
        }
    }

    /// Workload manifests in application order: namespace, config, secret, workload.
    pub fn workload_files(&self) -> [PathBuf; 4] {
        [
            self.dir.join(&self.namespace),
            self.dir.join(&self.config),
            self.dir.join(&self.secret),
            self.dir.join(&self.workload),
        ]
    }

    pub fn service_file(&self) -> PathBuf {
        self.dir.join(&self.service)
    }

    pub fn fallback_service_file(&self) -> PathBuf {
        self.dir.join(&self.fallback_service)
    }
}

fn default_namespace_file() -> String {
    "namespace.yaml".to_string()
}

fn default_config_file() -> String {
    "configmap.yaml".to_string()
}

fn default_secret_file() -> String {
    "secret.yaml".to_string()
}

fn default_workload_file() -> String {
    "deployment.yaml".to_string()
}

fn default_service_file() -> String {
    "service.yaml".to_string()
}

fn default_fallback_service_file() -> String {
    "service-fallback.yaml".to_string()
}

/// The deployment being rolled out. Unset names default to the service name.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkloadSection {
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(default)]
    pub deployment: Option<String>,
    #[serde(default)]
    pub container: Option<String>,
    #[serde(default)]
    pub selector: Option<String>,
    /// kubeconfig context to use.
    #[serde(default)]
    pub context: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExposureSection {
    /// Service object created by the primary manifest.
    #[serde(default)]
    pub service: Option<String>,

    /// Service object created by the fallback manifest.
    #[serde(default)]
    pub fallback_service: Option<String>,

    #[serde(default, with = "humantime_serde")]
    pub interval: Option<Duration>,

    #[serde(default, with = "humantime_serde")]
    pub deadline: Option<Duration>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RolloutSection {
    #[serde(default, with = "humantime_serde")]
    pub timeout: Option<Duration>,

    #[serde(default, with = "humantime_serde")]
    pub poll_interval: Option<Duration>,
}

/// Per-environment overrides, merged over the base config.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Environment {
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub registry: Option<String>,
    #[serde(default)]
    pub profile: Option<String>,
    #[serde(default)]
    pub bucket: Option<BucketName>,
    #[serde(default)]
    pub table: Option<TableName>,
    #[serde(default)]
    pub manifests_dir: Option<PathBuf>,
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub build_args: BTreeMap<String, EnvValue>,
}
