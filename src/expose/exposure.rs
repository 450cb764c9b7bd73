// ABOUTME: A single exposure attempt moving from Pending to Applied to an outcome.
// ABOUTME: Each transition consumes self so an attempt cannot be polled twice.

use std::time::Duration;

use tokio::time::Instant;

use super::state::{Applied, Pending};
use super::strategy::{ExposureStrategy, ServiceEndpoint};
use crate::cloud::ClusterOps;

/// Final state of one attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// An external address was assigned before the deadline.
    Resolved(ServiceEndpoint),
    /// The deadline passed, or the manifest could not be applied.
    Expired(ServiceEndpoint),
}

impl AttemptOutcome {
    pub fn endpoint(&self) -> &ServiceEndpoint {
        match self {
            AttemptOutcome::Resolved(endpoint) | AttemptOutcome::Expired(endpoint) => endpoint,
        }
    }
}

/// An exposure attempt, parameterized by its current state.
#[derive(Debug)]
pub struct Exposure<S> {
    strategy: ExposureStrategy,
    namespace: String,
    deadline: Duration,
    state: S,
}

impl<S> Exposure<S> {
    fn endpoint(&self, hostname: Option<String>) -> ServiceEndpoint {
        ServiceEndpoint {
            kind: self.strategy.kind,
            service: self.strategy.service.clone(),
            hostname,
            deadline: self.deadline,
        }
    }
}

impl Exposure<Pending> {
    pub fn new(strategy: ExposureStrategy, namespace: impl Into<String>, deadline: Duration) -> Self {
        Self {
            strategy,
            namespace: namespace.into(),
            deadline,
            state: Pending,
        }
    }

    /// Apply the strategy's manifest and start the deadline clock.
    ///
    /// An apply failure ends the attempt as expired.
    pub async fn apply<C: ClusterOps + ?Sized>(
        self,
        cluster: &C,
    ) -> Result<Exposure<Applied>, AttemptOutcome> {
        let started = Instant::now();
        tracing::info!(
            "applying {} exposure manifest {}",
            self.strategy.kind,
            self.strategy.manifest.display()
        );

        if let Err(e) = cluster.apply(&self.strategy.manifest).await {
            tracing::warn!("{} exposure manifest failed to apply: {}", self.strategy.kind, e);
            return Err(AttemptOutcome::Expired(self.endpoint(None)));
        }

        Ok(Exposure {
            state: Applied {
                started,
                deadline: started + self.deadline,
            },
            strategy: self.strategy,
            namespace: self.namespace,
            deadline: self.deadline,
        })
    }
}

impl Exposure<Applied> {
    /// Poll for an external address every `interval` until the deadline.
    pub async fn poll<C: ClusterOps + ?Sized>(self, cluster: &C, interval: Duration) -> AttemptOutcome {
        let service = self.strategy.service.as_str();

        loop {
            match cluster.service_address(&self.namespace, service).await {
                Ok(Some(address)) => {
                    tracing::info!(
                        "service {} exposed at {} after {:?}",
                        service,
                        address,
                        self.state.started.elapsed()
                    );
                    return AttemptOutcome::Resolved(self.endpoint(Some(address)));
                }
                Ok(None) => tracing::debug!("service {} has no external address yet", service),
                Err(e) => tracing::debug!("service {} address lookup failed: {}", service, e),
            }

            let now = Instant::now();
            if now >= self.state.deadline {
                tracing::warn!(
                    "{} exposure of {} expired after {:?}",
                    self.strategy.kind,
                    service,
                    self.deadline
                );
                return AttemptOutcome::Expired(self.endpoint(None));
            }
            tokio::time::sleep(interval.min(self.state.deadline - now)).await;
        }
    }
}
