// ABOUTME: Build-wide identifiers resolved once per pipeline run.
// ABOUTME: Account from identity lookup, region from config or env, tag from revision.

use serde::Serialize;
use snafu::ResultExt;

use crate::cloud::IdentityOps;
use crate::error::Result;
use crate::provision::{IdentitySnafu, InvalidRegionSnafu, ProvisionError, RegionUnresolvedSnafu};
use crate::types::{AccountId, ImageTag, Region};

/// Environment variables consulted for the source revision, in order.
pub const REVISION_ENV_VARS: &[&str] = &[
    "CODEBUILD_RESOLVED_SOURCE_VERSION",
    "GITHUB_SHA",
    "GIT_COMMIT",
];

/// Environment variables consulted for the build counter, in order.
pub const BUILD_NUMBER_ENV_VARS: &[&str] =
    &["CODEBUILD_BUILD_NUMBER", "GITHUB_RUN_NUMBER", "BUILD_NUMBER"];

/// Environment variables consulted for the region, in order.
pub const REGION_ENV_VARS: &[&str] = &["AWS_REGION", "AWS_DEFAULT_REGION"];

/// Identifiers that stay fixed for the whole run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildIdentity {
    pub account: AccountId,
    pub region: Region,
    pub tag: ImageTag,
}

/// Where the tag comes from: explicit values win over the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSource {
    pub revision: Option<String>,
    pub build_number: Option<u64>,
}

impl TagSource {
    /// Fill unset values from the CI environment.
    pub fn with_env_defaults(self) -> Self {
        Self {
            revision: self.revision.or_else(revision_from_env),
            build_number: self.build_number.or_else(build_number_from_env),
        }
    }

    /// The deterministic tag for these inputs. A missing build counter is 0.
    pub fn tag(&self) -> std::result::Result<ImageTag, crate::types::ImageTagError> {
        ImageTag::derive(self.revision.as_deref(), self.build_number.unwrap_or(0))
    }
}

fn first_env(vars: &[&str]) -> Option<String> {
    vars.iter()
        .filter_map(|var| std::env::var(var).ok())
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}

/// Source revision from the first populated CI variable.
pub fn revision_from_env() -> Option<String> {
    first_env(REVISION_ENV_VARS)
}

/// Build counter from the first populated, numeric CI variable.
pub fn build_number_from_env() -> Option<u64> {
    BUILD_NUMBER_ENV_VARS
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find_map(|value| match value.trim().parse::<u64>() {
            Ok(n) => Some(n),
            Err(_) => {
                tracing::warn!("ignoring non-numeric build number {:?}", value);
                None
            }
        })
}

/// Region from configuration, falling back to the standard variables.
pub fn resolve_region(configured: Option<&str>) -> std::result::Result<Region, ProvisionError> {
    let value = configured
        .map(str::to_string)
        .or_else(|| first_env(REGION_ENV_VARS))
        .ok_or_else(|| RegionUnresolvedSnafu.build())?;

    Region::new(&value).context(InvalidRegionSnafu { value })
}

impl BuildIdentity {
    /// Resolve account, region and tag. Fails fast when any is unavailable.
    pub async fn resolve<I: IdentityOps + ?Sized>(
        identity: &I,
        configured_region: Option<&str>,
        source: &TagSource,
    ) -> Result<Self> {
        let region = resolve_region(configured_region)?;
        let account = identity
            .account_id()
            .await
            .context(IdentitySnafu)?;
        let tag = source.tag()?;

        tracing::info!("build identity: account {}, region {}, tag {}", account, region, tag);
        Ok(Self {
            account,
            region,
            tag,
        })
    }
}
