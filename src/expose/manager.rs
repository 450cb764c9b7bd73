// ABOUTME: Runs exposure strategies in order until one resolves.
// ABOUTME: Unresolved exposure is reported as a warning, never as an error.

use std::time::Duration;

use serde::Serialize;

use super::exposure::{AttemptOutcome, Exposure};
use super::strategy::{ExposureStrategy, ServiceEndpoint};
use crate::cloud::ClusterOps;
use crate::diagnostics::{Diagnostics, Warning};

/// Polling cadence for exposure attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExposureSettings {
    pub interval: Duration,
    /// Per-attempt deadline, measured from the attempt's apply.
    pub deadline: Duration,
}

impl Default for ExposureSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(15),
            deadline: Duration::from_secs(360),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ExposureOutcome {
    Resolved { endpoint: ServiceEndpoint },
    Unresolved { attempts: Vec<ServiceEndpoint> },
}

impl ExposureOutcome {
    pub fn hostname(&self) -> Option<&str> {
        match self {
            ExposureOutcome::Resolved { endpoint } => endpoint.hostname.as_deref(),
            ExposureOutcome::Unresolved { .. } => None,
        }
    }
}

pub struct ExposureManager<'a, C: ?Sized> {
    cluster: &'a C,
    namespace: String,
    settings: ExposureSettings,
}

impl<'a, C: ClusterOps + ?Sized> ExposureManager<'a, C> {
    pub fn new(cluster: &'a C, namespace: impl Into<String>, settings: ExposureSettings) -> Self {
        Self {
            cluster,
            namespace: namespace.into(),
            settings,
        }
    }

    async fn attempt(&self, strategy: &ExposureStrategy) -> AttemptOutcome {
        let pending = Exposure::new(strategy.clone(), &self.namespace, self.settings.deadline);
        match pending.apply(self.cluster).await {
            Ok(applied) => applied.poll(self.cluster, self.settings.interval).await,
            Err(expired) => expired,
        }
    }

    /// Try each strategy in order; later strategies run only after the
    /// previous one expired.
    pub async fn expose_service(
        &self,
        strategies: &[ExposureStrategy],
        diagnostics: &mut Diagnostics,
    ) -> ExposureOutcome {
        let mut attempts = Vec::with_capacity(strategies.len());

        for (index, strategy) in strategies.iter().enumerate() {
            match self.attempt(strategy).await {
                AttemptOutcome::Resolved(endpoint) => {
                    return ExposureOutcome::Resolved { endpoint };
                }
                AttemptOutcome::Expired(endpoint) => {
                    if let Some(next) = strategies.get(index + 1) {
                        diagnostics.warn(Warning::exposure_fallback(format!(
                            "{} exposure of {} did not resolve within {:?}; trying {}",
                            endpoint.kind,
                            endpoint.service,
                            endpoint.deadline,
                            next.kind
                        )));
                    }
                    attempts.push(endpoint);
                }
            }
        }

        diagnostics.warn(Warning::exposure_unresolved(if attempts.is_empty() {
            "no service exposure manifests found".to_string()
        } else {
            format!(
                "service has no external address after {} attempt(s)",
                attempts.len()
            )
        }));
        ExposureOutcome::Unresolved { attempts }
    }
}
