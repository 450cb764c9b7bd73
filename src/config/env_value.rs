// ABOUTME: Config values that are either literals or environment variable references.
// ABOUTME: Used for build arguments so secrets stay out of the config file.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum EnvValue {
    Literal(String),
    FromEnv {
        #[serde(rename = "env")]
        var: String,
        #[serde(default)]
        default: Option<String>,
    },
}

impl EnvValue {
    /// The referenced variable, or `None` for a literal.
    pub fn env_var(&self) -> Option<&str> {
        match self {
            EnvValue::Literal(_) => None,
            EnvValue::FromEnv { var, .. } => Some(var.as_str()),
        }
    }

    pub fn resolve(&self) -> Result<String> {
        let (var, default) = match self {
            EnvValue::Literal(value) => return Ok(value.clone()),
            EnvValue::FromEnv { var, default } => (var, default),
        };

        match (std::env::var(var), default) {
            (Ok(value), _) => Ok(value),
            (Err(_), Some(default)) => {
                tracing::debug!("{} is unset; using its configured default", var);
                Ok(default.clone())
            }
            (Err(_), None) => Err(Error::MissingEnvVar(var.clone())),
        }
    }
}

/// Resolve every value, failing on the first unset variable without a default.
/// Values are never logged.
pub fn resolve_env_map(map: &BTreeMap<String, EnvValue>) -> Result<BTreeMap<String, String>> {
    let mut resolved = BTreeMap::new();
    for (key, value) in map {
        if let Some(var) = value.env_var() {
            tracing::debug!("build arg {} from ${}", key, var);
        }
        resolved.insert(key.clone(), value.resolve()?);
    }
    Ok(resolved)
}
