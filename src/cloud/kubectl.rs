// ABOUTME: kubectl adapter for manifest application, rollout and diagnostics.
// ABOUTME: Parses deployment and service JSON into the engine's workload types.

use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;

use super::traits::{ClusterOps, DiagnosticStep, WorkloadRef, WorkloadStatus};
use super::CloudError;
use crate::exec::{CommandOutput, CommandRunner, CommandSpec};
use crate::types::ImageRef;

/// Adapter over the `kubectl` command line tool.
#[derive(Debug, Clone)]
pub struct Kubectl<R> {
    runner: R,
    program: String,
    context: Option<String>,
}

impl<R: CommandRunner> Kubectl<R> {
    pub fn new(runner: R) -> Self {
        Self {
            runner,
            program: "kubectl".to_string(),
            context: None,
        }
    }

    /// Target a specific kubeconfig context.
    pub fn context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    fn command(&self) -> CommandSpec {
        let spec = CommandSpec::new(&self.program);
        match &self.context {
            Some(context) => spec.args(["--context", context.as_str()]),
            None => spec,
        }
    }

    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, CloudError> {
        Ok(self.runner.run(spec).await?)
    }

    async fn run_checked(&self, spec: &CommandSpec) -> Result<CommandOutput, CloudError> {
        let output = self.run(spec).await?;
        if !output.success() {
            return Err(CloudError::command_failed(spec, &output));
        }
        Ok(output)
    }
}

fn is_not_found(output: &CommandOutput) -> bool {
    output.stderr.contains("NotFound") || output.stderr.contains("not found")
}

/// Arguments for one diagnostic capture.
fn capture_args(workload: &WorkloadRef, step: DiagnosticStep) -> Vec<String> {
    let ns = workload.namespace.as_str();
    let deployment = workload.deployment.as_str();
    let selector = workload.selector.as_str();

    let args: Vec<&str> = match step {
        DiagnosticStep::DeploymentSummary => {
            vec!["get", "deployment", deployment, "-n", ns, "-o", "wide"]
        }
        DiagnosticStep::DeploymentDescription => {
            vec!["describe", "deployment", deployment, "-n", ns]
        }
        DiagnosticStep::ReplicaSets => {
            vec!["get", "replicasets", "-n", ns, "-l", selector, "-o", "wide"]
        }
        DiagnosticStep::Pods => vec!["get", "pods", "-n", ns, "-l", selector, "-o", "wide"],
        DiagnosticStep::PodDescriptions => vec!["describe", "pods", "-n", ns, "-l", selector],
        DiagnosticStep::RecentEvents => vec![
            "get",
            "events",
            "-n",
            ns,
            "--sort-by=.metadata.creationTimestamp",
        ],
    };
    args.into_iter().map(String::from).collect()
}

/// Keep the header line and the newest `limit` rows of a sorted table.
fn keep_last_rows(table: &str, limit: usize) -> String {
    let mut lines = table.lines();
    let Some(header) = lines.next() else {
        return String::new();
    };
    let rows: Vec<&str> = lines.collect();
    let start = rows.len().saturating_sub(limit);

    let mut kept = Vec::with_capacity(rows.len() - start + 1);
    kept.push(header);
    kept.extend_from_slice(&rows[start..]);
    kept.join("\n")
}

#[derive(Debug, Deserialize)]
struct ServiceObject {
    #[serde(default)]
    status: ServiceStatus,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServiceStatus {
    #[serde(default)]
    load_balancer: LoadBalancerStatus,
}

#[derive(Debug, Default, Deserialize)]
struct LoadBalancerStatus {
    #[serde(default)]
    ingress: Vec<LoadBalancerIngress>,
}

#[derive(Debug, Deserialize)]
struct LoadBalancerIngress {
    hostname: Option<String>,
    ip: Option<String>,
}

/// First externally resolvable address of a service, preferring hostnames.
fn parse_service_address(json: &str) -> Result<Option<String>, serde_json::Error> {
    let service: ServiceObject = serde_json::from_str(json)?;
    let ingress = &service.status.load_balancer.ingress;

    let hostname = ingress
        .iter()
        .filter_map(|i| i.hostname.as_deref())
        .find(|h| !h.is_empty());
    let ip = ingress
        .iter()
        .filter_map(|i| i.ip.as_deref())
        .find(|ip| !ip.is_empty());

    Ok(hostname.or(ip).map(str::to_string))
}

#[derive(Debug, Deserialize)]
struct DeploymentObject {
    metadata: DeploymentMetadata,
    #[serde(default)]
    spec: DeploymentSpec,
    #[serde(default)]
    status: DeploymentStatus,
}

#[derive(Debug, Deserialize)]
struct DeploymentMetadata {
    #[serde(default)]
    generation: i64,
}

#[derive(Debug, Default, Deserialize)]
struct DeploymentSpec {
    replicas: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeploymentStatus {
    #[serde(default)]
    observed_generation: i64,
    #[serde(default)]
    replicas: i32,
    #[serde(default)]
    updated_replicas: i32,
    #[serde(default)]
    ready_replicas: i32,
    #[serde(default)]
    available_replicas: i32,
}

fn parse_workload_status(json: &str) -> Result<WorkloadStatus, serde_json::Error> {
    let deployment: DeploymentObject = serde_json::from_str(json)?;
    Ok(WorkloadStatus {
        generation: deployment.metadata.generation,
        observed_generation: deployment.status.observed_generation,
        // The API server defaults an omitted replica count to one.
        desired: deployment.spec.replicas.unwrap_or(1),
        replicas: deployment.status.replicas,
        updated: deployment.status.updated_replicas,
        ready: deployment.status.ready_replicas,
        available: deployment.status.available_replicas,
    })
}

#[async_trait]
impl<R: CommandRunner> ClusterOps for Kubectl<R> {
    async fn apply(&self, manifest: &Path) -> Result<(), CloudError> {
        let spec = self
            .command()
            .args(["apply", "-f"])
            .arg(manifest.display().to_string());
        self.run_checked(&spec).await?;
        Ok(())
    }

    async fn service_address(
        &self,
        namespace: &str,
        service: &str,
    ) -> Result<Option<String>, CloudError> {
        let spec = self
            .command()
            .args(["get", "service", service, "-n", namespace, "-o", "json"]);
        let output = self.run(&spec).await?;

        if !output.success() {
            if is_not_found(&output) {
                return Ok(None);
            }
            return Err(CloudError::command_failed(&spec, &output));
        }

        parse_service_address(&output.stdout).map_err(|e| CloudError::parse(&spec, e.to_string()))
    }

    async fn workload_exists(&self, workload: &WorkloadRef) -> Result<bool, CloudError> {
        let spec = self.command().args([
            "get",
            "deployment",
            workload.deployment.as_str(),
            "-n",
            workload.namespace.as_str(),
            "-o",
            "name",
        ]);
        let output = self.run(&spec).await?;

        if output.success() {
            return Ok(true);
        }
        if is_not_found(&output) {
            return Ok(false);
        }
        Err(CloudError::command_failed(&spec, &output))
    }

    async fn set_image(&self, workload: &WorkloadRef, image: &ImageRef) -> Result<(), CloudError> {
        let spec = self
            .command()
            .args(["set", "image"])
            .arg(format!("deployment/{}", workload.deployment))
            .arg(format!("{}={}", workload.container, image))
            .args(["-n", workload.namespace.as_str()]);
        self.run_checked(&spec).await?;
        Ok(())
    }

    async fn workload_status(&self, workload: &WorkloadRef) -> Result<WorkloadStatus, CloudError> {
        let spec = self.command().args([
            "get",
            "deployment",
            workload.deployment.as_str(),
            "-n",
            workload.namespace.as_str(),
            "-o",
            "json",
        ]);
        let output = self.run_checked(&spec).await?;
        parse_workload_status(&output.stdout).map_err(|e| CloudError::parse(&spec, e.to_string()))
    }

    async fn capture(
        &self,
        workload: &WorkloadRef,
        step: DiagnosticStep,
    ) -> Result<String, CloudError> {
        let spec = self.command().args(capture_args(workload, step));
        let output = self.run_checked(&spec).await?;

        Ok(match step {
            DiagnosticStep::RecentEvents => {
                keep_last_rows(&output.stdout, DiagnosticStep::EVENT_LIMIT)
            }
            _ => output.stdout,
        })
    }
}
