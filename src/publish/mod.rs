// ABOUTME: Builds the service image and pushes it to the account's registry.
// ABOUTME: Registry login, build, tag, push and an informational vulnerability scan.

mod error;
mod publisher;

pub use error::PublishError;
pub use publisher::{PublishSettings, PublishedImage, Publisher};
