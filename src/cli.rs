// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "rollgate")]
#[command(about = "Build, publish and roll out a containerized service to Kubernetes on AWS")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print final results (for CI)
    #[arg(short, long, global = true, conflicts_with = "json")]
    pub quiet: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

/// Inputs for the image tag.
#[derive(Args, Debug, Clone, Default)]
pub struct TagArgs {
    /// Source revision (default: CODEBUILD_RESOLVED_SOURCE_VERSION, GITHUB_SHA, GIT_COMMIT)
    #[arg(long)]
    pub revision: Option<String>,

    /// Build counter (default: CODEBUILD_BUILD_NUMBER, GITHUB_RUN_NUMBER, BUILD_NUMBER)
    #[arg(long)]
    pub build_number: Option<u64>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new rollgate.yml configuration file
    Init {
        /// Service name
        #[arg(long)]
        service: Option<String>,

        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Run the full pipeline: provision, publish, then expose or roll out
    Deploy {
        /// Target environment (defined in config)
        #[arg(short, long)]
        environment: Option<String>,

        #[command(flatten)]
        tag: TagArgs,
    },

    /// Ensure the Terraform state bucket and lock table exist
    Bootstrap {
        /// Target environment (defined in config)
        #[arg(short, long)]
        environment: Option<String>,

        /// Write a Terraform -backend-config file to this path
        #[arg(long)]
        backend_config: Option<PathBuf>,
    },

    /// Build and push the service image
    Publish {
        /// Target environment (defined in config)
        #[arg(short, long)]
        environment: Option<String>,

        #[command(flatten)]
        tag: TagArgs,
    },

    /// Roll an already published image out to the running workload
    Rollout {
        /// Target environment (defined in config)
        #[arg(short, long)]
        environment: Option<String>,

        /// Image reference, e.g. 123456789012.dkr.ecr.eu-west-1.amazonaws.com/app:a1b2c3d
        #[arg(long)]
        image: String,
    },

    /// Print the image tag derived for this build
    Tag {
        #[command(flatten)]
        tag: TagArgs,
    },
}
