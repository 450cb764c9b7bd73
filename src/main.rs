// ABOUTME: Entry point for the rollgate CLI application.
// ABOUTME: Parses arguments and dispatches to appropriate command handlers.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands, TagArgs};
use rollgate::config::{self, Config};
use rollgate::error::Result;
use rollgate::identity::TagSource;
use rollgate::output::{Output, OutputMode};
use std::env;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber based on verbose flag
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("warn")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let mode = if cli.json {
        OutputMode::Json
    } else if cli.quiet {
        OutputMode::Quiet
    } else {
        OutputMode::Normal
    };

    let mut output = Output::new(mode);
    output.start_timer();
    if let Err(e) = run(cli.command, &output).await {
        output.error(&e.to_string());
        std::process::exit(1);
    }
}

fn tag_source(args: TagArgs) -> TagSource {
    TagSource {
        revision: args.revision,
        build_number: args.build_number,
    }
}

fn load_config(environment: Option<&str>) -> Result<Config> {
    let cwd = env::current_dir()?;
    Config::discover(&cwd)?.select(environment)
}

async fn run(command: Commands, output: &Output) -> Result<()> {
    match command {
        Commands::Init { service, force } => {
            let cwd = env::current_dir()?;
            let path = config::init_config(&cwd, service.as_deref(), force)?;
            output.success(&format!("Created {}", path.display()));
            Ok(())
        }
        Commands::Deploy { environment, tag } => {
            let config = load_config(environment.as_deref())?;
            commands::deploy(config, tag_source(tag), output).await
        }
        Commands::Bootstrap {
            environment,
            backend_config,
        } => {
            let config = load_config(environment.as_deref())?;
            commands::bootstrap(config, backend_config.as_deref(), output).await
        }
        Commands::Publish { environment, tag } => {
            let config = load_config(environment.as_deref())?;
            commands::publish(config, tag_source(tag), output).await
        }
        Commands::Rollout { environment, image } => {
            let config = load_config(environment.as_deref())?;
            commands::rollout(config, &image, output).await
        }
        Commands::Tag { tag } => commands::tag(tag_source(tag), output),
    }
}
