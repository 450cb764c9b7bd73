// ABOUTME: Service exposure with an ordered fallback of strategies.
// ABOUTME: Applies a service manifest and polls for an external address until a deadline.

mod exposure;
mod manager;
mod state;
mod strategy;

pub use exposure::{AttemptOutcome, Exposure};
pub use manager::{ExposureManager, ExposureOutcome, ExposureSettings};
pub use state::{Applied, Pending};
pub use strategy::{ExposureKind, ExposureStrategy, ServiceEndpoint};
