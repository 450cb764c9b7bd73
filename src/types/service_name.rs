// ABOUTME: Service name shared by the registry repository and Kubernetes objects.
// ABOUTME: Must be a valid RFC 1123 DNS label so it can name a deployment.

use std::fmt;

use serde::{Deserialize, Deserializer};
use thiserror::Error;

const MAX_LABEL_LEN: usize = 63;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceNameError {
    #[error("service name cannot be empty")]
    Empty,

    #[error("service name is {0} characters; the limit is {MAX_LABEL_LEN}")]
    TooLong(usize),

    #[error("service name must start and end with a letter or digit")]
    HyphenAtEdge,

    #[error("service name must be lowercase")]
    NotLowercase,

    #[error("invalid character in service name: '{0}'")]
    InvalidChar(char),
}

/// Name of the deployed service. Doubles as the default repository,
/// deployment, container and service object name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServiceName(String);

impl ServiceName {
    pub fn new(value: &str) -> Result<Self, ServiceNameError> {
        match value.len() {
            0 => return Err(ServiceNameError::Empty),
            len if len > MAX_LABEL_LEN => return Err(ServiceNameError::TooLong(len)),
            _ => {}
        }

        if value.starts_with('-') || value.ends_with('-') {
            return Err(ServiceNameError::HyphenAtEdge);
        }

        if let Some(c) = value.chars().find(|c| !is_label_char(*c)) {
            return Err(if c.is_ascii_uppercase() {
                ServiceNameError::NotLowercase
            } else {
                ServiceNameError::InvalidChar(c)
            });
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_label_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'
}

impl fmt::Display for ServiceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ServiceName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        ServiceName::new(&value).map_err(serde::de::Error::custom)
    }
}
