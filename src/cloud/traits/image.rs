// ABOUTME: Local image operations.
// ABOUTME: Registry login, build, tag and push.

use async_trait::async_trait;

use super::BuildRequest;
use crate::cloud::CloudError;
use crate::types::ImageRef;

#[async_trait]
pub trait ImageOps: Send + Sync {
    /// Log in to `registry`, passing the password on stdin.
    async fn login(
        &self,
        registry: &str,
        username: &str,
        password: &str,
    ) -> Result<(), CloudError>;

    /// Build an image and tag it with `request.image`.
    async fn build(&self, request: &BuildRequest) -> Result<(), CloudError>;

    /// Add `target` as another name for `source`.
    async fn tag(&self, source: &ImageRef, target: &ImageRef) -> Result<(), CloudError>;

    async fn push(&self, image: &ImageRef) -> Result<(), CloudError>;
}
