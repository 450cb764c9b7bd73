// ABOUTME: Configuration types and parsing for rollgate.yml.
// ABOUTME: Handles YAML parsing, env var interpolation, and environment merging.

mod env_value;
mod init;
mod sections;

pub use env_value::{EnvValue, resolve_env_map};
pub use init::init_config;
pub use sections::{
    BackendSection, BuildSection, Environment, ExposureSection, ManifestSection, RolloutSection,
    WorkloadSection,
};

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::cloud::WorkloadRef;
use crate::error::{Error, Result};
use crate::expose::{ExposureSettings, ExposureStrategy};
use crate::publish::PublishSettings;
use crate::rollout::RolloutSettings;
use crate::types::{BucketName, RepositoryName, ServiceName, TableName};

pub const CONFIG_FILENAME: &str = "rollgate.yml";
pub const CONFIG_FILENAME_ALT: &str = "rollgate.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".rollgate/config.yml";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub service: ServiceName,

    /// Registry repository; defaults to the service name.
    #[serde(default)]
    pub repository: Option<RepositoryName>,

    /// Falls back to AWS_REGION / AWS_DEFAULT_REGION when unset.
    #[serde(default)]
    pub region: Option<String>,

    /// Registry host; defaults to the account's regional registry.
    #[serde(default)]
    pub registry: Option<String>,

    /// Named AWS credentials profile.
    #[serde(default)]
    pub profile: Option<String>,

    pub backend: BackendSection,

    #[serde(default)]
    pub build: BuildSection,

    /// Without a manifest directory the pipeline stops after publishing.
    #[serde(default)]
    pub manifests: Option<ManifestSection>,

    #[serde(default)]
    pub workload: WorkloadSection,

    #[serde(default)]
    pub exposure: ExposureSection,

    #[serde(default)]
    pub rollout: RolloutSection,

    #[serde(default)]
    pub environments: HashMap<String, Environment>,
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(Error::from)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                tracing::debug!("loading config from {}", path.display());
                return Self::load(path);
            }
        }

        Err(Error::ConfigNotFound(dir.to_path_buf()))
    }

    /// The config with the named environment's overrides applied.
    pub fn for_environment(&self, name: &str) -> Result<Config> {
        let env = self
            .environments
            .get(name)
            .ok_or_else(|| Error::UnknownEnvironment(name.to_string()))?;

        let mut merged = self.clone();

        if env.region.is_some() {
            merged.region = env.region.clone();
        }
        if env.registry.is_some() {
            merged.registry = env.registry.clone();
        }
        if env.profile.is_some() {
            merged.profile = env.profile.clone();
        }
        if let Some(ref bucket) = env.bucket {
            merged.backend.bucket = bucket.clone();
        }
        if let Some(ref table) = env.table {
            merged.backend.table = table.clone();
        }
        if let Some(ref dir) = env.manifests_dir {
            match merged.manifests.as_mut() {
                Some(manifests) => manifests.dir = dir.clone(),
                None => merged.manifests = Some(ManifestSection::new(dir.clone())),
            }
        }
        if env.namespace.is_some() {
            merged.workload.namespace = env.namespace.clone();
        }
        if env.context.is_some() {
            merged.workload.context = env.context.clone();
        }

        // Deep merge build args
        for (k, v) in &env.build_args {
            merged.build.args.insert(k.clone(), v.clone());
        }

        Ok(merged)
    }

    /// Apply an optional environment, returning the base config when none is given.
    pub fn select(self, environment: Option<&str>) -> Result<Config> {
        match environment {
            Some(name) => self.for_environment(name),
            None => Ok(self),
        }
    }

    pub fn repository(&self) -> RepositoryName {
        self.repository
            .clone()
            .unwrap_or_else(|| RepositoryName::new(self.service.as_str()))
    }

    pub fn bucket(&self) -> &BucketName {
        &self.backend.bucket
    }

    pub fn table(&self) -> &TableName {
        &self.backend.table
    }

    pub fn state_key(&self) -> String {
        self.backend
            .state_key
            .clone()
            .unwrap_or_else(|| format!("{}/terraform.tfstate", self.service))
    }

    pub fn namespace(&self) -> &str {
        self.workload.namespace.as_deref().unwrap_or("default")
    }

    pub fn workload_ref(&self) -> WorkloadRef {
        let service = self.service.as_str();
        WorkloadRef {
            namespace: self.namespace().to_string(),
            deployment: self
                .workload
                .deployment
                .clone()
                .unwrap_or_else(|| service.to_string()),
            container: self
                .workload
                .container
                .clone()
                .unwrap_or_else(|| service.to_string()),
            selector: self
                .workload
                .selector
                .clone()
                .unwrap_or_else(|| format!("app={}", service)),
        }
    }

    /// Resolve build args and assemble publish settings.
    pub fn publish_settings(&self) -> Result<PublishSettings> {
        let mut settings = PublishSettings::new(self.repository());
        settings.registry = self.registry.clone();
        settings.context = self.build.context.clone();
        settings.dockerfile = self.build.dockerfile.clone();
        settings.platform = self.build.platform.clone();
        settings.build_args = resolve_env_map(&self.build.args)?;
        settings.scan = self.build.scan;
        settings.ensure_repository = self.build.create_repository;
        Ok(settings)
    }

    pub fn exposure_settings(&self) -> ExposureSettings {
        let defaults = ExposureSettings::default();
        ExposureSettings {
            interval: self.exposure.interval.unwrap_or(defaults.interval),
            deadline: self.exposure.deadline.unwrap_or(defaults.deadline),
        }
    }

    pub fn rollout_settings(&self) -> RolloutSettings {
        let defaults = RolloutSettings::default();
        RolloutSettings {
            timeout: self.rollout.timeout.unwrap_or(defaults.timeout),
            poll_interval: self.rollout.poll_interval.unwrap_or(defaults.poll_interval),
        }
    }

    /// Exposure strategies whose manifests exist, primary first.
    pub fn exposure_strategies(&self) -> Vec<ExposureStrategy> {
        let Some(manifests) = &self.manifests else {
            return Vec::new();
        };
        let primary = self
            .exposure
            .service
            .clone()
            .unwrap_or_else(|| self.service.to_string());
        let secondary = self
            .exposure
            .fallback_service
            .clone()
            .unwrap_or_else(|| primary.clone());

        ExposureStrategy::discover(
            manifests.service_file(),
            manifests.fallback_service_file(),
            &primary,
            &secondary,
        )
    }
}
