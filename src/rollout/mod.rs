// ABOUTME: Image updates on a running workload with convergence verification.
// ABOUTME: A timed-out rollout fails with a bundle of diagnostic captures.

mod bundle;
mod error;
mod verifier;

pub use bundle::{Capture, CaptureResult, DiagnosticBundle};
pub use error::RolloutError;
pub use verifier::{RolloutAttempt, RolloutSettings, RolloutVerifier};
