// ABOUTME: Validated domain types shared across the pipeline.
// ABOUTME: Uses phantom types to keep bucket, table and repository names apart.

mod account;
mod image_ref;
mod name;
mod service_name;
mod tag;

pub use account::{AccountId, AccountIdError, Region, RegionError};
pub use image_ref::{ImageRef, ParseImageRefError};
pub use name::{
    BucketMarker, BucketName, LogicalName, RepositoryMarker, RepositoryName, TableMarker, TableName,
};
pub use service_name::{ServiceName, ServiceNameError};
pub use tag::{ImageTag, ImageTagError, REVISION_TAG_LEN};
