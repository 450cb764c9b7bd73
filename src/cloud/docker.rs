// ABOUTME: Docker CLI adapter for registry login, build, tag and push.
// ABOUTME: Works with any docker-compatible CLI (docker, podman, nerdctl).

use async_trait::async_trait;

use super::traits::{BuildRequest, ImageOps};
use super::CloudError;
use crate::exec::{CommandRunner, CommandSpec};
use crate::types::ImageRef;

/// Adapter over a docker-compatible command line tool.
#[derive(Debug, Clone)]
pub struct DockerCli<R> {
    runner: R,
    program: String,
}

impl<R: CommandRunner> DockerCli<R> {
    pub fn new(runner: R) -> Self {
        Self {
            runner,
            program: "docker".to_string(),
        }
    }

    /// Use a different docker-compatible binary.
    pub fn program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    async fn run_checked(&self, spec: &CommandSpec) -> Result<(), CloudError> {
        let output = self.runner.run(spec).await?;
        if !output.success() {
            return Err(CloudError::command_failed(spec, &output));
        }
        Ok(())
    }
}

/// Build the `docker build` invocation for a request.
fn build_command(program: &str, request: &BuildRequest) -> CommandSpec {
    let mut spec = CommandSpec::new(program)
        .args(["build", "-t"])
        .arg(request.image.to_string());

    if let Some(dockerfile) = &request.dockerfile {
        spec = spec.arg("-f").arg(dockerfile.display().to_string());
    }
    if let Some(platform) = &request.platform {
        spec = spec.args(["--platform", platform.as_str()]);
    }
    for (key, value) in &request.build_args {
        spec = spec.arg("--build-arg").arg(format!("{}={}", key, value));
    }

    spec.arg(request.context.display().to_string())
}

#[async_trait]
impl<R: CommandRunner> ImageOps for DockerCli<R> {
    async fn login(
        &self,
        registry: &str,
        username: &str,
        password: &str,
    ) -> Result<(), CloudError> {
        let spec = CommandSpec::new(&self.program)
            .args(["login", "--username", username, "--password-stdin", registry])
            .stdin(password);
        self.run_checked(&spec).await
    }

    async fn build(&self, request: &BuildRequest) -> Result<(), CloudError> {
        let spec = build_command(&self.program, request);
        self.run_checked(&spec).await
    }

    async fn tag(&self, source: &ImageRef, target: &ImageRef) -> Result<(), CloudError> {
        let spec = CommandSpec::new(&self.program)
            .arg("tag")
            .arg(source.to_string())
            .arg(target.to_string());
        self.run_checked(&spec).await
    }

    async fn push(&self, image: &ImageRef) -> Result<(), CloudError> {
        let spec = CommandSpec::new(&self.program)
            .arg("push")
            .arg(image.to_string());
        self.run_checked(&spec).await
    }
}
