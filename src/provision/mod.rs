// ABOUTME: Idempotent bootstrap of the shared Terraform state backend.
// ABOUTME: Ensures the state bucket and lock table exist, creating each at most once.

mod backend_config;
mod bucket;
mod error;
mod provisioner;
mod retry;
mod state;
mod table;

pub use backend_config::BackendConfig;
pub use bucket::ensure_bucket;
pub use error::{ProvisionError, ProvisionErrorKind};
pub use provisioner::{Backend, Provisioner};
pub use retry::{RetryExhausted, RetryPolicy, retry_until};
pub use state::{BackendResource, ResourceState};
pub use table::ensure_lock_table;

pub(crate) use error::{
    CreateSnafu, CreateTableSnafu, HardenSnafu, IdentitySnafu, InvalidRegionSnafu, NotReadySnafu,
    ProbeSnafu, RegionUnresolvedSnafu, TableNotActiveSnafu,
};
