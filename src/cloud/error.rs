// ABOUTME: Errors raised by the cloud, registry and cluster adapters.
// ABOUTME: Distinguishes process failures, non-zero exits and unparseable output.

use thiserror::Error;

use crate::exec::{self, CommandOutput, CommandSpec};

#[derive(Debug, Error)]
pub enum CloudError {
    #[error(transparent)]
    Exec(#[from] exec::Error),

    #[error("`{command}` failed: {message}")]
    CommandFailed { command: String, message: String },

    #[error("unexpected output from `{command}`: {message}")]
    Parse { command: String, message: String },
}

impl CloudError {
    pub fn command_failed(spec: &CommandSpec, output: &CommandOutput) -> Self {
        CloudError::CommandFailed {
            command: spec.to_string(),
            message: output.failure_message(),
        }
    }

    pub fn parse(spec: &CommandSpec, message: impl Into<String>) -> Self {
        CloudError::Parse {
            command: spec.to_string(),
            message: message.into(),
        }
    }
}
