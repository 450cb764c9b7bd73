// ABOUTME: Container image references as built locally and pushed to a registry.
// ABOUTME: Parses and formats `[registry/]name[:tag][@digest]`.

use std::fmt;
use thiserror::Error;

use super::{ImageTag, RepositoryName};

const DEFAULT_TAG: &str = "latest";

#[derive(Debug, Error)]
pub enum ParseImageRefError {
    #[error("image reference cannot be empty")]
    Empty,

    #[error("invalid character in image reference: {0}")]
    InvalidChar(char),

    #[error("invalid image reference format: {0}")]
    InvalidFormat(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    registry: Option<String>,
    name: String,
    tag: Option<String>,
    digest: Option<String>,
}

/// The first path component names a registry host when it looks like one:
/// it has a dot or a port, or is `localhost`.
fn is_registry_host(component: &str) -> bool {
    component.contains('.') || component.contains(':') || component == "localhost"
}

fn is_reference_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '/' | ':' | '.' | '-' | '_' | '@')
}

impl ImageRef {
    /// Local reference `<repo>:<tag>` as produced by a build.
    pub fn local(repository: &RepositoryName, tag: &ImageTag) -> Self {
        Self {
            registry: None,
            name: repository.to_string(),
            tag: Some(tag.to_string()),
            digest: None,
        }
    }

    /// The same image addressed through a remote registry:
    /// `<registry-host>/<repo>:<tag>`.
    pub fn with_registry(&self, registry: &str) -> Self {
        Self {
            registry: Some(registry.trim_end_matches('/').to_string()),
            ..self.clone()
        }
    }

    pub fn is_remote(&self) -> bool {
        self.registry.is_some()
    }

    /// Parse a reference. A reference with neither tag nor digest is `:latest`.
    pub fn parse(input: &str) -> Result<Self, ParseImageRefError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ParseImageRefError::Empty);
        }
        if let Some(c) = input.chars().find(|c| !is_reference_char(*c)) {
            return Err(ParseImageRefError::InvalidChar(c));
        }
        let malformed = || ParseImageRefError::InvalidFormat(input.to_string());

        let (reference, digest) = match input.split_once('@') {
            Some((reference, digest)) if !digest.is_empty() => (reference, Some(digest)),
            Some(_) => return Err(malformed()),
            None => (input, None),
        };

        let (registry, path) = match reference.split_once('/') {
            Some((host, path)) if is_registry_host(host) => (Some(host), path),
            _ => (None, reference),
        };

        // Only the last path segment may carry a tag.
        let (name, tag) = match path.rsplit_once(':') {
            Some((name, tag)) => {
                ImageTag::new(tag).map_err(|_| malformed())?;
                (name, Some(tag))
            }
            None => (path, None),
        };
        if name.is_empty() || name.contains(':') || name.split('/').any(str::is_empty) {
            return Err(malformed());
        }

        let tag = match (tag, digest) {
            (None, None) => Some(DEFAULT_TAG),
            (tag, _) => tag,
        };

        Ok(Self {
            registry: registry.map(str::to_string),
            name: name.to_string(),
            tag: tag.map(str::to_string),
            digest: digest.map(str::to_string),
        })
    }

    pub fn registry(&self) -> Option<&str> {
        self.registry.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn digest(&self) -> Option<&str> {
        self.digest.as_deref()
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(registry) = &self.registry {
            write!(f, "{registry}/")?;
        }
        f.write_str(&self.name)?;
        if let Some(tag) = &self.tag {
            write!(f, ":{tag}")?;
        }
        if let Some(digest) = &self.digest {
            write!(f, "@{digest}")?;
        }
        Ok(())
    }
}

impl serde::Serialize for ImageRef {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
