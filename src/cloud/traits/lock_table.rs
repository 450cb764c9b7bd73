// ABOUTME: Lock table operations for Terraform state locking.
// ABOUTME: Existence check, creation and the provider's native active-state wait.

use async_trait::async_trait;

use crate::cloud::CloudError;
use crate::types::{Region, TableName};

#[async_trait]
pub trait LockTableOps: Send + Sync {
    async fn table_exists(&self, name: &TableName) -> Result<bool, CloudError>;

    /// Create the table with a string `LockID` hash key.
    async fn create_table(&self, name: &TableName, region: &Region) -> Result<(), CloudError>;

    /// Block until the provider reports the table active.
    async fn wait_table_active(&self, name: &TableName) -> Result<(), CloudError>;
}
