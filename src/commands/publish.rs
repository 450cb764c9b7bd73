// ABOUTME: Publish command implementation.
// ABOUTME: Resolves the build identity, then builds and pushes the image.

use super::collaborators::Collaborators;
use rollgate::config::Config;
use rollgate::diagnostics::Diagnostics;
use rollgate::error::Result;
use rollgate::identity::TagSource;
use rollgate::output::Output;
use rollgate::pipeline::Pipeline;

pub async fn publish(config: Config, source: TagSource, output: &Output) -> Result<()> {
    let adapters = Collaborators::for_config(&config)?;
    let pipeline = Pipeline::new(&config, &adapters.aws, &adapters.docker, &adapters.kubectl);
    let mut diag = Diagnostics::default();

    let identity = pipeline.identity(&source.with_env_defaults()).await?;
    output.progress(&format!(
        "Publishing {}:{} for account {} in {}",
        config.repository(),
        identity.tag,
        identity.account,
        identity.region
    ));

    let image = pipeline.publish(&identity, &mut diag).await?;

    // Emit collected warnings
    for warning in diag.warnings() {
        output.warning(&warning.message);
    }

    output.success(&format!("Pushed {}", image.remote));
    Ok(())
}
