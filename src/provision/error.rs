// ABOUTME: Provisioning error types with SNAFU context selectors.
// ABOUTME: Every variant is fatal: downstream state storage cannot be trusted.

use snafu::Snafu;

use crate::cloud::CloudError;
use crate::types::RegionError;

/// Failure to establish the shared state backend.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ProvisionError {
    #[snafu(display("failed to resolve caller identity: {source}"))]
    Identity { source: CloudError },

    #[snafu(display(
        "no region configured: set `region` in the config file or AWS_REGION/AWS_DEFAULT_REGION"
    ))]
    RegionUnresolved,

    #[snafu(display("invalid region {value:?}: {source}"))]
    InvalidRegion { value: String, source: RegionError },

    #[snafu(display("failed to check {resource} {name}: {source}"))]
    Probe {
        resource: &'static str,
        name: String,
        source: CloudError,
    },

    #[snafu(display("failed to create bucket {name} or its fallback {fallback}: {source}"))]
    Create {
        name: String,
        fallback: String,
        source: CloudError,
    },

    #[snafu(display("failed to harden bucket {name}: {source}"))]
    Harden { name: String, source: CloudError },

    #[snafu(display("bucket {name} still not visible after {attempts} checks"))]
    NotReady { name: String, attempts: u32 },

    #[snafu(display("failed to create lock table {name}: {source}"))]
    CreateTable { name: String, source: CloudError },

    #[snafu(display("lock table {name} never became active: {source}"))]
    TableNotActive { name: String, source: CloudError },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionErrorKind {
    /// Account or region could not be determined.
    IdentityUnresolved,
    /// A cloud call failed while checking or creating a resource.
    CloudCall,
    /// The resource was created but never became visible.
    Unreachable,
}

impl ProvisionError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> ProvisionErrorKind {
        match self {
            ProvisionError::Identity { .. }
            | ProvisionError::RegionUnresolved
            | ProvisionError::InvalidRegion { .. } => ProvisionErrorKind::IdentityUnresolved,
            ProvisionError::Probe { .. }
            | ProvisionError::Create { .. }
            | ProvisionError::Harden { .. }
            | ProvisionError::CreateTable { .. } => ProvisionErrorKind::CloudCall,
            ProvisionError::NotReady { .. } | ProvisionError::TableNotActive { .. } => {
                ProvisionErrorKind::Unreachable
            }
        }
    }
}
