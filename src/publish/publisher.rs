// ABOUTME: Image publishing pipeline against a registry and a local image builder.
// ABOUTME: Every step except the scan is fatal; scan results become warnings.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;

use super::PublishError;
use crate::cloud::{BuildRequest, ImageOps, RegistryOps, ScanReport, registry_host};
use crate::diagnostics::{Diagnostics, Warning};
use crate::identity::BuildIdentity;
use crate::types::{ImageRef, ImageTag, RepositoryName};

/// Username the registry expects alongside a token password.
const REGISTRY_USERNAME: &str = "AWS";

/// What to build and where to push it.
#[derive(Debug, Clone)]
pub struct PublishSettings {
    pub repository: RepositoryName,
    /// Registry host override; defaults to the account's regional registry.
    pub registry: Option<String>,
    pub context: PathBuf,
    pub dockerfile: Option<PathBuf>,
    pub build_args: BTreeMap<String, String>,
    pub platform: Option<String>,
    pub scan: bool,
    pub ensure_repository: bool,
}

impl PublishSettings {
    pub fn new(repository: RepositoryName) -> Self {
        Self {
            repository,
            registry: None,
            context: PathBuf::from("."),
            dockerfile: None,
            build_args: BTreeMap::new(),
            platform: None,
            scan: true,
            ensure_repository: true,
        }
    }
}

/// Result of a successful publish.
#[derive(Debug, Clone, Serialize)]
pub struct PublishedImage {
    pub tag: ImageTag,
    pub local: ImageRef,
    pub remote: ImageRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scan: Option<ScanReport>,
}

/// Publishes one image per run.
pub struct Publisher<'a, R: ?Sized, I: ?Sized> {
    registry: &'a R,
    images: &'a I,
    settings: &'a PublishSettings,
}

impl<'a, R, I> Publisher<'a, R, I>
where
    R: RegistryOps + ?Sized,
    I: ImageOps + ?Sized,
{
    pub fn new(registry: &'a R, images: &'a I, settings: &'a PublishSettings) -> Self {
        Self {
            registry,
            images,
            settings,
        }
    }

    /// Registry host the image is pushed to.
    pub fn registry_host(&self, identity: &BuildIdentity) -> String {
        self.settings
            .registry
            .clone()
            .unwrap_or_else(|| registry_host(&identity.account, &identity.region))
    }

    async fn ensure_repository(&self) -> Result<(), PublishError> {
        let repository = &self.settings.repository;
        let wrap = |source| PublishError::Repository {
            repository: repository.to_string(),
            source,
        };

        if self.registry.repository_exists(repository).await.map_err(wrap)? {
            tracing::debug!("registry repository {} exists", repository);
            return Ok(());
        }

        tracing::info!("creating registry repository {}", repository);
        self.registry
            .create_repository(repository)
            .await
            .map_err(wrap)
    }

    async fn scan(&self, tag: &ImageTag, diagnostics: &mut Diagnostics) -> Option<ScanReport> {
        match self.registry.scan_image(&self.settings.repository, tag).await {
            Ok(report) => {
                if report.total_findings() > 0 {
                    diagnostics.warn(Warning::scan_findings(format!(
                        "{}:{} {}",
                        self.settings.repository,
                        tag,
                        report.summary()
                    )));
                } else {
                    tracing::info!("{}", report.summary());
                }
                Some(report)
            }
            Err(e) => {
                diagnostics.warn(Warning::scan_unavailable(format!(
                    "image scan unavailable for {}:{}: {}",
                    self.settings.repository, tag, e
                )));
                None
            }
        }
    }

    /// Build the image for `identity.tag` and push it to the registry.
    pub async fn publish(
        &self,
        identity: &BuildIdentity,
        diagnostics: &mut Diagnostics,
    ) -> Result<PublishedImage, PublishError> {
        if self.settings.ensure_repository {
            self.ensure_repository().await?;
        }

        let host = self.registry_host(identity);
        let password = self
            .registry
            .login_password()
            .await
            .map_err(|source| PublishError::Authentication {
                registry: host.clone(),
                source,
            })?;
        self.images
            .login(&host, REGISTRY_USERNAME, &password)
            .await
            .map_err(|source| PublishError::Authentication {
                registry: host.clone(),
                source,
            })?;

        let local = ImageRef::local(&self.settings.repository, &identity.tag);
        tracing::info!("building {}", local);
        let request = BuildRequest {
            context: self.settings.context.clone(),
            dockerfile: self.settings.dockerfile.clone(),
            image: local.clone(),
            build_args: self.settings.build_args.clone(),
            platform: self.settings.platform.clone(),
        };
        self.images
            .build(&request)
            .await
            .map_err(|source| PublishError::Build {
                image: local.to_string(),
                source,
            })?;

        let remote = local.with_registry(&host);
        self.images
            .tag(&local, &remote)
            .await
            .map_err(|source| PublishError::Tag {
                image: local.to_string(),
                target: remote.to_string(),
                source,
            })?;

        tracing::info!("pushing {}", remote);
        self.images
            .push(&remote)
            .await
            .map_err(|source| PublishError::Push {
                image: remote.to_string(),
                source,
            })?;

        let scan = if self.settings.scan {
            self.scan(&identity.tag, diagnostics).await
        } else {
            None
        };

        Ok(PublishedImage {
            tag: identity.tag.clone(),
            local,
            remote,
            scan,
        })
    }
}
