// ABOUTME: Cloud, registry and cluster adapters behind capability traits.
// ABOUTME: The aws, docker and kubectl CLIs are reached through a CommandRunner.

mod aws;
mod docker;
mod error;
mod kubectl;
pub mod traits;

pub use aws::{AwsCli, registry_host};
pub use docker::DockerCli;
pub use error::CloudError;
pub use kubectl::Kubectl;
pub use traits::*;
