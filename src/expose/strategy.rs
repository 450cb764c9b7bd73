// ABOUTME: Exposure strategies and the endpoint each attempt produces.
// ABOUTME: Strategies are tried in order: primary first, secondary on expiry.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExposureKind {
    Primary,
    Secondary,
}

impl fmt::Display for ExposureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExposureKind::Primary => f.write_str("primary"),
            ExposureKind::Secondary => f.write_str("secondary"),
        }
    }
}

/// One way of exposing the service: a manifest and the service it creates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExposureStrategy {
    pub kind: ExposureKind,
    pub manifest: PathBuf,
    /// Name of the service object whose address is polled.
    pub service: String,
}

impl ExposureStrategy {
    /// Strategies for the manifests that exist on disk, primary first.
    pub fn discover(
        primary: PathBuf,
        secondary: PathBuf,
        service: &str,
        secondary_service: &str,
    ) -> Vec<ExposureStrategy> {
        [
            (ExposureKind::Primary, primary, service),
            (ExposureKind::Secondary, secondary, secondary_service),
        ]
        .into_iter()
        .filter(|(_, manifest, _)| manifest.is_file())
        .map(|(kind, manifest, service)| ExposureStrategy {
            kind,
            manifest,
            service: service.to_string(),
        })
        .collect()
    }
}

/// What one exposure attempt observed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceEndpoint {
    pub kind: ExposureKind,
    pub service: String,
    /// External hostname or IP, when one was assigned before the deadline.
    pub hostname: Option<String>,
    #[serde(with = "humantime_serde")]
    pub deadline: Duration,
}
