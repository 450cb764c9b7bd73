// ABOUTME: Caller identity lookup.
// ABOUTME: Resolves the account the pipeline is operating in.

use async_trait::async_trait;

use crate::cloud::CloudError;
use crate::types::AccountId;

#[async_trait]
pub trait IdentityOps: Send + Sync {
    /// Account of the credentials the pipeline runs with.
    async fn account_id(&self) -> Result<AccountId, CloudError>;
}
