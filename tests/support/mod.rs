// ABOUTME: Test support utilities.
// ABOUTME: Provides in-memory collaborators and tracing setup for integration tests.

use std::sync::Once;

// Each test binary only uses some of these modules, so allow dead_code.
#[allow(dead_code)]
pub mod fake_aws;
#[allow(dead_code)]
pub mod fake_cluster;
#[allow(dead_code)]
pub mod fake_images;
#[allow(dead_code)]
pub mod scripted_runner;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
#[allow(dead_code)]
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter = EnvFilter::from_default_env().add_directive("rollgate=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// A failed cloud call as an adapter would report it.
#[allow(dead_code)]
pub fn cloud_failure(command: &str, message: &str) -> rollgate::cloud::CloudError {
    rollgate::cloud::CloudError::CommandFailed {
        command: command.to_string(),
        message: message.to_string(),
    }
}
