// ABOUTME: Lifecycle state of a provisioned backend resource.
// ABOUTME: Absent until created, Creating until visible, then Ready.

use serde::Serialize;

use crate::types::{LogicalName, Region};

/// Existence state of a backend resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceState {
    Absent,
    Creating,
    Ready,
}

/// A backend resource as seen by the provisioner.
#[derive(Debug, Clone, Serialize)]
#[serde(bound = "")]
pub struct BackendResource<T> {
    pub name: LogicalName<T>,
    pub state: ResourceState,
    pub region: Region,
    /// Whether this run issued the create call.
    pub created: bool,
}

impl<T> BackendResource<T> {
    pub(crate) fn absent(name: LogicalName<T>, region: &Region) -> Self {
        Self {
            name,
            state: ResourceState::Absent,
            region: region.clone(),
            created: false,
        }
    }

    /// A resource that already existed before this run.
    pub(crate) fn existing(name: LogicalName<T>, region: &Region) -> Self {
        Self {
            name,
            state: ResourceState::Ready,
            region: region.clone(),
            created: false,
        }
    }

    pub(crate) fn creating(self) -> Self {
        Self {
            state: ResourceState::Creating,
            created: true,
            ..self
        }
    }

    pub(crate) fn ready(self) -> Self {
        Self {
            state: ResourceState::Ready,
            ..self
        }
    }

    pub fn is_ready(&self) -> bool {
        self.state == ResourceState::Ready
    }
}
