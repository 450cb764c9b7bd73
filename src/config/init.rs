// ABOUTME: Config scaffolding for new projects.
// ABOUTME: Creates rollgate.yml template files.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::types::ServiceName;

use super::CONFIG_FILENAME;

const DEFAULT_SERVICE: &str = "my-app";

/// Write a starter config into `dir`, returning its path.
pub fn init_config(dir: &Path, service: Option<&str>, force: bool) -> Result<PathBuf> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        return Err(Error::AlreadyExists(config_path));
    }

    let service = ServiceName::new(service.unwrap_or(DEFAULT_SERVICE))
        .map_err(|e| Error::InvalidConfig(e.to_string()))?;

    std::fs::write(&config_path, generate_template_yaml(&service))?;
    Ok(config_path)
}

fn generate_template_yaml(service: &ServiceName) -> String {
    format!(
        r#"service: {service}
# region: eu-west-1        # default: AWS_REGION / AWS_DEFAULT_REGION
# registry: 123456789012.dkr.ecr.eu-west-1.amazonaws.com

backend:
  bucket: {service}-terraform-state
  table: {service}-terraform-locks
  # state_key: {service}/terraform.tfstate

build:
  context: .
  # dockerfile: Dockerfile
  # args:
  #   NPM_TOKEN: {{ env: NPM_TOKEN }}

manifests:
  dir: k8s
  # namespace.yaml, configmap.yaml, secret.yaml, deployment.yaml,
  # service.yaml and service-fallback.yaml are applied when present

# workload:
#   namespace: default
#   deployment: {service}
#   container: {service}
#   selector: app={service}

# exposure:
#   interval: 15s
#   deadline: 6m

# rollout:
#   timeout: 5m
#   poll_interval: 5s

# environments:
#   staging:
#     bucket: {service}-terraform-state-staging
#     namespace: staging
"#
    )
}
