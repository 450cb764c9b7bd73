// ABOUTME: Command module aggregator for the rollgate CLI.
// ABOUTME: Re-exports the handlers for each subcommand.

mod bootstrap;
mod collaborators;
mod deploy;
mod publish;
mod rollout;
mod tag;

pub use bootstrap::bootstrap;
pub use deploy::deploy;
pub use publish::publish;
pub use rollout::rollout;
pub use tag::tag;
