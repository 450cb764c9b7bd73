// ABOUTME: Deploy command implementation.
// ABOUTME: Runs the whole pipeline and prints its report and warnings.

use super::collaborators::Collaborators;
use rollgate::config::Config;
use rollgate::error::{Error, Result};
use rollgate::identity::TagSource;
use rollgate::output::Output;
use rollgate::pipeline::Pipeline;

pub async fn deploy(config: Config, source: TagSource, output: &Output) -> Result<()> {
    let adapters = Collaborators::for_config(&config)?;
    let pipeline = Pipeline::new(&config, &adapters.aws, &adapters.docker, &adapters.kubectl);

    output.progress(&format!("Deploying {}", config.service));

    let report = match pipeline.run(&source.with_env_defaults()).await {
        Ok(report) => report,
        Err(Error::Rollout(e)) => {
            if let Some(bundle) = e.diagnostics() {
                output.diagnostics(bundle);
            }
            return Err(Error::Rollout(e));
        }
        Err(e) => return Err(e),
    };

    // Emit collected warnings
    for warning in &report.warnings {
        output.warning(&warning.message);
    }

    output.report(&report);
    output.success(&format!("Deployed {}", report.image.remote));
    Ok(())
}
