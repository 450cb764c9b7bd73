// ABOUTME: Shared helper building the CLI-backed cloud, image and cluster adapters.
// ABOUTME: Eliminates duplication across deploy, bootstrap, publish and rollout.

use rollgate::cloud::{AwsCli, DockerCli, Kubectl};
use rollgate::config::Config;
use rollgate::error::Result;
use rollgate::exec::LocalRunner;
use rollgate::identity::resolve_region;

pub struct Collaborators {
    pub aws: AwsCli<LocalRunner>,
    pub docker: DockerCli<LocalRunner>,
    pub kubectl: Kubectl<LocalRunner>,
}

impl Collaborators {
    /// Adapters for `config`, with every aws call pinned to the resolved region.
    pub fn for_config(config: &Config) -> Result<Self> {
        let region = resolve_region(config.region.as_deref())?;

        let mut aws = AwsCli::new(LocalRunner::new()).region(region);
        if let Some(profile) = &config.profile {
            aws = aws.profile(profile);
        }

        let mut kubectl = Kubectl::new(LocalRunner::new());
        if let Some(context) = &config.workload.context {
            kubectl = kubectl.context(context);
        }

        Ok(Self {
            aws,
            docker: DockerCli::new(LocalRunner::new()),
            kubectl,
        })
    }
}
