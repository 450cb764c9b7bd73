// ABOUTME: External command execution for the aws, docker and kubectl adapters.
// ABOUTME: Exposes the CommandRunner seam and its local process implementation.

mod error;
mod local;
mod spec;

pub use error::{Error, Result};
pub use local::LocalRunner;
pub use spec::{CommandOutput, CommandSpec};

use async_trait::async_trait;

/// Runs external programs to completion.
///
/// Every adapter talks to its tool exclusively through this trait so that the
/// pipeline can be driven by scripted runners in tests.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run the command and capture its output.
    ///
    /// A non-zero exit status is not an error at this level; callers inspect
    /// [`CommandOutput::success`].
    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutput>;
}

#[async_trait]
impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutput> {
        (**self).run(spec).await
    }
}
