// ABOUTME: Exposure attempt state markers for the type state pattern.
// ABOUTME: Polling is only possible once a manifest has been applied.

use tokio::time::Instant;

/// Manifest not applied yet.
/// Available actions: `apply()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Pending;

/// Manifest applied; the attempt's clock is running.
/// Available actions: `poll()`
#[derive(Debug, Clone, Copy)]
pub struct Applied {
    pub(crate) started: Instant,
    pub(crate) deadline: Instant,
}
