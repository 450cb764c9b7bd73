// ABOUTME: Error types for image publishing.
// ABOUTME: One variant per stage so the failing step is visible in the message.

use thiserror::Error;

use crate::cloud::CloudError;

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("failed to ensure registry repository {repository}: {source}")]
    Repository { repository: String, source: CloudError },

    #[error("registry authentication failed for {registry}: {source}")]
    Authentication { registry: String, source: CloudError },

    #[error("image build failed for {image}: {source}")]
    Build { image: String, source: CloudError },

    #[error("failed to tag {image} as {target}: {source}")]
    Tag {
        image: String,
        target: String,
        source: CloudError,
    },

    #[error("failed to push {image}: {source}")]
    Push { image: String, source: CloudError },
}
