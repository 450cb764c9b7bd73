// ABOUTME: Application-wide error types for rollgate.
// ABOUTME: Wraps component errors so every fatal stage maps to one exit path.

use std::path::PathBuf;
use thiserror::Error;

use crate::cloud::CloudError;
use crate::provision::ProvisionError;
use crate::publish::PublishError;
use crate::rollout::RolloutError;
use crate::types::ImageTagError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("file already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error("configuration file not found in {0}")]
    ConfigNotFound(PathBuf),

    #[error("unknown environment: {0}")]
    UnknownEnvironment(String),

    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("cannot derive image tag: {0}")]
    InvalidTag(#[from] ImageTagError),

    #[error("provisioning failed: {0}")]
    Provision(#[from] ProvisionError),

    #[error("publishing failed: {0}")]
    Publish(#[from] PublishError),

    #[error("rollout failed: {0}")]
    Rollout(#[from] RolloutError),

    #[error(transparent)]
    Cloud(#[from] CloudError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
