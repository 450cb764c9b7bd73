// ABOUTME: CommandRunner backed by local child processes.
// ABOUTME: Pipes stdout/stderr, optionally feeds stdin, and enforces timeouts.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use super::{CommandOutput, CommandRunner, CommandSpec, Error, Result};

/// Runs commands as child processes of the current process.
#[derive(Debug, Clone)]
pub struct LocalRunner {
    default_timeout: Duration,
}

impl Default for LocalRunner {
    fn default() -> Self {
        Self {
            default_timeout: Duration::from_secs(30 * 60),
        }
    }
}

impl LocalRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Timeout applied to commands that don't specify their own.
    pub fn default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    async fn run_inner(&self, spec: &CommandSpec) -> Result<CommandOutput> {
        let mut command = Command::new(&spec.program);
        command
            .args(&spec.args)
            .envs(spec.envs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(if spec.stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        if let Some(dir) = &spec.current_dir {
            command.current_dir(dir);
        }

        let mut child = command.spawn().map_err(|source| Error::Spawn {
            program: spec.program.clone(),
            source,
        })?;

        if let Some(input) = &spec.stdin
            && let Some(mut stdin) = child.stdin.take()
        {
            stdin
                .write_all(input.as_bytes())
                .await
                .map_err(|source| Error::Stdin {
                    program: spec.program.clone(),
                    source,
                })?;
            // Dropping stdin closes the pipe so the child sees EOF.
            drop(stdin);
        }

        let output = child.wait_with_output().await?;

        Ok(CommandOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

#[async_trait]
impl CommandRunner for LocalRunner {
    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutput> {
        let timeout = spec.timeout.unwrap_or(self.default_timeout);
        tracing::debug!("exec: {}", spec);

        match tokio::time::timeout(timeout, self.run_inner(spec)).await {
            Ok(result) => {
                if let Ok(output) = &result
                    && !output.success()
                {
                    tracing::debug!("{} failed: {}", spec.program, output.failure_message());
                }
                result
            }
            Err(_) => Err(Error::Timeout {
                program: spec.program.clone(),
                timeout,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn captures_stdout_and_exit_code() {
        let runner = LocalRunner::new();
        let spec = CommandSpec::new("sh").args(["-c", "echo hello; exit 3"]);
        let out = runner.run(&spec).await.unwrap();
        assert_eq!(out.exit_code, Some(3));
        assert_eq!(out.stdout.trim(), "hello");
        assert!(!out.success());
    }

    #[tokio::test]
    async fn feeds_stdin() {
        let runner = LocalRunner::new();
        let spec = CommandSpec::new("cat").stdin("secret-token");
        let out = runner.run(&spec).await.unwrap();
        assert!(out.success());
        assert_eq!(out.stdout, "secret-token");
    }

    #[tokio::test]
    async fn passes_environment() {
        let runner = LocalRunner::new();
        let spec = CommandSpec::new("sh")
            .args(["-c", "printf %s \"$ROLLGATE_TEST_VALUE\""])
            .env("ROLLGATE_TEST_VALUE", "42");
        let out = runner.run(&spec).await.unwrap();
        assert_eq!(out.stdout, "42");
    }

    #[tokio::test]
    async fn missing_program_is_spawn_error() {
        let runner = LocalRunner::new();
        let spec = CommandSpec::new("rollgate-definitely-not-installed");
        let err = runner.run(&spec).await.unwrap_err();
        assert!(matches!(err, Error::Spawn { .. }));
    }

    #[tokio::test]
    async fn enforces_timeout() {
        let runner = LocalRunner::new();
        let spec = CommandSpec::new("sleep")
            .arg("5")
            .timeout(Duration::from_millis(100));
        let err = runner.run(&spec).await.unwrap_err();
        assert!(matches!(err, Error::Timeout { .. }));
    }
}
