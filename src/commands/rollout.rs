// ABOUTME: Rollout command implementation.
// ABOUTME: Updates the running workload to an existing image and verifies convergence.

use super::collaborators::Collaborators;
use rollgate::config::Config;
use rollgate::error::{Error, Result};
use rollgate::output::Output;
use rollgate::rollout::RolloutVerifier;
use rollgate::types::ImageRef;

pub async fn rollout(config: Config, image: &str, output: &Output) -> Result<()> {
    let image = ImageRef::parse(image).map_err(|e| Error::InvalidConfig(e.to_string()))?;

    let adapters = Collaborators::for_config(&config)?;
    let workload = config.workload_ref();

    output.progress(&format!("Rolling out {} to {}", image, workload));

    let verifier = RolloutVerifier::new(&adapters.kubectl, config.rollout_settings());
    match verifier.rollout(&workload, &image).await {
        Ok(attempt) => {
            output.success(&format!("{} converged: {}", workload, attempt.status.summary()));
            Ok(())
        }
        Err(e) => {
            if let Some(bundle) = e.diagnostics() {
                output.diagnostics(bundle);
            }
            Err(e.into())
        }
    }
}
