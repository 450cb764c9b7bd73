// ABOUTME: Bootstrap command implementation.
// ABOUTME: Ensures the state bucket and lock table, optionally writing backend config.

use std::path::Path;

use super::collaborators::Collaborators;
use rollgate::config::Config;
use rollgate::error::Result;
use rollgate::identity::TagSource;
use rollgate::output::Output;
use rollgate::pipeline::Pipeline;

pub async fn bootstrap(
    config: Config,
    backend_config: Option<&Path>,
    output: &Output,
) -> Result<()> {
    let adapters = Collaborators::for_config(&config)?;
    let pipeline = Pipeline::new(&config, &adapters.aws, &adapters.docker, &adapters.kubectl);

    output.progress(&format!(
        "Bootstrapping state backend for {} ({} / {})",
        config.service,
        config.bucket(),
        config.table()
    ));

    let identity = pipeline.identity(&TagSource::default()).await?;
    let backend = pipeline.provision(&identity).await?;

    if let Some(path) = backend_config {
        backend.config(&config.state_key()).write_to(path)?;
        output.progress(&format!("  → Wrote backend config to {}", path.display()));
    }

    output.success(&format!(
        "Backend ready: bucket {}, lock table {}",
        backend.bucket.name, backend.table.name
    ));
    Ok(())
}
