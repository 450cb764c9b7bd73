// ABOUTME: Sequences identity, provisioning, publishing, exposure and rollout.
// ABOUTME: Produces a report of everything one run did.

mod controller;
mod report;

pub use controller::Pipeline;
pub use report::{DeployStage, PipelineReport};
