// ABOUTME: Pipeline controller wiring the stages together in a fixed order.
// ABOUTME: Provisioning and publishing failures stop the run; exposure never does.

use std::path::PathBuf;

use chrono::Utc;

use super::{DeployStage, PipelineReport};
use crate::cloud::{ClusterOps, IdentityOps, ImageOps, LockTableOps, ObjectStoreOps, RegistryOps};
use crate::config::{Config, ManifestSection};
use crate::diagnostics::Diagnostics;
use crate::error::Result;
use crate::expose::ExposureManager;
use crate::identity::{BuildIdentity, TagSource};
use crate::provision::{Backend, Provisioner};
use crate::publish::{PublishedImage, Publisher};
use crate::rollout::RolloutVerifier;
use crate::types::ImageRef;

/// One pipeline run over a set of collaborators.
pub struct Pipeline<'a, A: ?Sized, I: ?Sized, C: ?Sized> {
    config: &'a Config,
    aws: &'a A,
    images: &'a I,
    cluster: &'a C,
}

impl<'a, A, I, C> Pipeline<'a, A, I, C>
where
    A: IdentityOps + ObjectStoreOps + LockTableOps + RegistryOps + ?Sized,
    I: ImageOps + ?Sized,
    C: ClusterOps + ?Sized,
{
    pub fn new(config: &'a Config, aws: &'a A, images: &'a I, cluster: &'a C) -> Self {
        Self {
            config,
            aws,
            images,
            cluster,
        }
    }

    pub async fn identity(&self, source: &TagSource) -> Result<BuildIdentity> {
        BuildIdentity::resolve(self.aws, self.config.region.as_deref(), source).await
    }

    pub async fn provision(&self, identity: &BuildIdentity) -> Result<Backend> {
        let provisioner = Provisioner::new(self.aws, identity.account.clone())
            .retry(self.config.backend.retry);
        let backend = provisioner
            .bootstrap(self.config.bucket(), self.config.table(), &identity.region)
            .await?;
        Ok(backend)
    }

    pub async fn publish(
        &self,
        identity: &BuildIdentity,
        diagnostics: &mut Diagnostics,
    ) -> Result<PublishedImage> {
        let settings = self.config.publish_settings()?;
        let publisher = Publisher::new(self.aws, self.images, &settings);
        Ok(publisher.publish(identity, diagnostics).await?)
    }

    /// First deployment applies manifests and exposes the service; later
    /// deployments roll the new image out to the existing workload.
    pub async fn deploy(
        &self,
        image: &ImageRef,
        diagnostics: &mut Diagnostics,
    ) -> Result<DeployStage> {
        let Some(manifests) = self.manifests() else {
            return Ok(DeployStage::Skipped);
        };

        let workload = self.config.workload_ref();
        if self.cluster.workload_exists(&workload).await? {
            let verifier = RolloutVerifier::new(self.cluster, self.config.rollout_settings());
            let rollout = verifier.rollout(&workload, image).await?;
            return Ok(DeployStage::Rollout { rollout });
        }

        tracing::info!("{} not found; performing first deployment", workload);
        let applied = self.apply_workload(manifests).await?;

        let manager = ExposureManager::new(
            self.cluster,
            self.config.namespace(),
            self.config.exposure_settings(),
        );
        let exposure = manager
            .expose_service(&self.config.exposure_strategies(), diagnostics)
            .await;

        Ok(DeployStage::FirstTime { applied, exposure })
    }

    fn manifests(&self) -> Option<&'a ManifestSection> {
        let manifests = self.config.manifests.as_ref()?;
        if manifests.dir.is_dir() {
            Some(manifests)
        } else {
            tracing::info!(
                "manifest directory {} not found; skipping cluster stage",
                manifests.dir.display()
            );
            None
        }
    }

    async fn apply_workload(&self, manifests: &ManifestSection) -> Result<Vec<PathBuf>> {
        let mut applied = Vec::new();
        for path in manifests.workload_files() {
            if !path.is_file() {
                tracing::debug!("{} not present; skipping", path.display());
                continue;
            }
            tracing::info!("applying {}", path.display());
            self.cluster.apply(&path).await?;
            applied.push(path);
        }
        Ok(applied)
    }

    /// Run every stage in order.
    pub async fn run(&self, source: &TagSource) -> Result<PipelineReport> {
        let started_at = Utc::now();
        let mut diagnostics = Diagnostics::default();

        let identity = self.identity(source).await?;
        let backend = self.provision(&identity).await?;
        let image = self.publish(&identity, &mut diagnostics).await?;
        let stage = self.deploy(&image.remote, &mut diagnostics).await?;

        Ok(PipelineReport {
            started_at,
            finished_at: Utc::now(),
            identity,
            backend,
            image,
            stage,
            warnings: diagnostics.into_warnings(),
        })
    }
}
