// ABOUTME: Phantom-typed logical names for backend and registry resources.
// ABOUTME: Prevents passing a lock table name where a bucket name is expected.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use super::AccountId;

/// Marker types for phantom type parameters.
/// Empty enums cannot be instantiated; the derives only satisfy derive bounds
/// on types that carry a `LogicalName<T>`.
#[derive(Debug, Clone, Copy)]
pub enum BucketMarker {}
#[derive(Debug, Clone, Copy)]
pub enum TableMarker {}
#[derive(Debug, Clone, Copy)]
pub enum RepositoryMarker {}

/// The logical name of an externally provisioned resource.
///
/// The marker parameter keeps the different resource kinds apart at compile
/// time; the value itself is whatever the cloud provider calls the resource.
#[must_use = "names reference resources and should not be ignored"]
pub struct LogicalName<T> {
    value: String,
    _marker: PhantomData<T>,
}

impl<T> LogicalName<T> {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            _marker: PhantomData,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn into_inner(self) -> String {
        self.value
    }

    /// The account-qualified variant of this name: `<base>-<accountId>`.
    ///
    /// Used when the unqualified name is already claimed by another tenant.
    pub fn qualified(&self, account: &AccountId) -> Self {
        Self::new(format!("{}-{}", self.value, account))
    }
}

// Manual trait implementations that don't require T to implement the trait.

impl<T> std::fmt::Debug for LogicalName<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("LogicalName").field(&self.value).finish()
    }
}

impl<T> Clone for LogicalName<T> {
    fn clone(&self) -> Self {
        Self::new(self.value.clone())
    }
}

impl<T> PartialEq for LogicalName<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T> Eq for LogicalName<T> {}

impl<T> Hash for LogicalName<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T> std::fmt::Display for LogicalName<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl<T> Serialize for LogicalName<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value.serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for LogicalName<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        if value.trim().is_empty() {
            return Err(serde::de::Error::custom("resource name cannot be empty"));
        }
        Ok(Self::new(value))
    }
}

/// Object storage container holding Terraform state.
pub type BucketName = LogicalName<BucketMarker>;
/// Table providing Terraform state locking.
pub type TableName = LogicalName<TableMarker>;
/// Container registry repository.
pub type RepositoryName = LogicalName<RepositoryMarker>;
