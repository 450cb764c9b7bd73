// ABOUTME: In-memory image builder recording login, build, tag and push.
// ABOUTME: Any step can be made to fail.

use async_trait::async_trait;
use parking_lot::Mutex;
use rollgate::cloud::{BuildRequest, CloudError, ImageOps};
use rollgate::types::ImageRef;

use super::cloud_failure;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageStep {
    Login,
    Build,
    Tag,
    Push,
}

#[derive(Debug, Default)]
pub struct FakeImages {
    fail: Option<ImageStep>,
    calls: Mutex<Vec<String>>,
    builds: Mutex<Vec<BuildRequest>>,
    passwords: Mutex<Vec<String>>,
}

impl FakeImages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(step: ImageStep) -> Self {
        Self {
            fail: Some(step),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn builds(&self) -> Vec<BuildRequest> {
        self.builds.lock().clone()
    }

    pub fn passwords(&self) -> Vec<String> {
        self.passwords.lock().clone()
    }

    fn step(&self, step: ImageStep, call: String) -> Result<(), CloudError> {
        self.calls.lock().push(call.clone());
        if self.fail == Some(step) {
            return Err(cloud_failure(&format!("docker {}", call), "simulated failure"));
        }
        Ok(())
    }
}

#[async_trait]
impl ImageOps for FakeImages {
    async fn login(&self, registry: &str, username: &str, password: &str) -> Result<(), CloudError> {
        self.passwords.lock().push(password.to_string());
        self.step(ImageStep::Login, format!("login {} {}", username, registry))
    }

    async fn build(&self, request: &BuildRequest) -> Result<(), CloudError> {
        self.builds.lock().push(request.clone());
        self.step(ImageStep::Build, format!("build {}", request.image))
    }

    async fn tag(&self, source: &ImageRef, target: &ImageRef) -> Result<(), CloudError> {
        self.step(ImageStep::Tag, format!("tag {} {}", source, target))
    }

    async fn push(&self, image: &ImageRef) -> Result<(), CloudError> {
        self.step(ImageStep::Push, format!("push {}", image))
    }
}
