// ABOUTME: Check-then-create-then-wait bootstrap of the state bucket.
// ABOUTME: Falls back to an account-qualified name when the plain name is taken.

use snafu::ResultExt;

use super::retry::{RetryPolicy, retry_until};
use super::state::BackendResource;
use super::{CreateSnafu, HardenSnafu, NotReadySnafu, ProbeSnafu, ProvisionError};
use crate::cloud::{BucketProbe, ObjectStoreOps};
use crate::types::{AccountId, BucketMarker, BucketName, Region};

/// Ensure a state bucket exists and is visible.
///
/// The bucket is created at most once: an owned bucket under either the given
/// name or its account-qualified fallback is reused without a create call.
/// A freshly created bucket is versioned, closed to public access and then
/// polled until it is visible, within `retry`'s budget.
pub async fn ensure_bucket<S: ObjectStoreOps + ?Sized>(
    store: &S,
    name: &BucketName,
    account: &AccountId,
    region: &Region,
    retry: &RetryPolicy,
) -> Result<BackendResource<BucketMarker>, ProvisionError> {
    let fallback = name.qualified(account);

    let primary = probe(store, name).await?;
    if primary == BucketProbe::Owned {
        tracing::info!("state bucket {} already exists", name);
        return Ok(BackendResource::existing(name.clone(), region));
    }

    if probe(store, &fallback).await? == BucketProbe::Owned {
        tracing::info!("state bucket {} already exists (account-qualified)", fallback);
        return Ok(BackendResource::existing(fallback, region));
    }

    let created = create(store, name, &fallback, primary, region).await?;
    let resource = BackendResource::absent(created.clone(), region).creating();

    store
        .enable_versioning(&created)
        .await
        .context(HardenSnafu {
            name: created.as_str(),
        })?;
    store
        .block_public_access(&created)
        .await
        .context(HardenSnafu {
            name: created.as_str(),
        })?;

    wait_until_visible(store, &created, retry).await?;
    tracing::info!("state bucket {} is ready", created);
    Ok(resource.ready())
}

async fn probe<S: ObjectStoreOps + ?Sized>(
    store: &S,
    name: &BucketName,
) -> Result<BucketProbe, ProvisionError> {
    store.probe_bucket(name).await.context(ProbeSnafu {
        resource: "bucket",
        name: name.as_str(),
    })
}

/// Create under the given name, then under the fallback.
///
/// A name already claimed by another tenant skips straight to the fallback.
async fn create<S: ObjectStoreOps + ?Sized>(
    store: &S,
    name: &BucketName,
    fallback: &BucketName,
    primary: BucketProbe,
    region: &Region,
) -> Result<BucketName, ProvisionError> {
    if primary == BucketProbe::Missing {
        tracing::info!("creating state bucket {} in {}", name, region);
        match store.create_bucket(name, region).await {
            Ok(()) => return Ok(name.clone()),
            Err(e) => {
                tracing::warn!("creating bucket {} failed, trying {}: {}", name, fallback, e)
            }
        }
    } else {
        tracing::warn!("bucket name {} is owned by another account, using {}", name, fallback);
    }

    store
        .create_bucket(fallback, region)
        .await
        .context(CreateSnafu {
            name: name.as_str(),
            fallback: fallback.as_str(),
        })?;
    Ok(fallback.clone())
}

async fn wait_until_visible<S: ObjectStoreOps + ?Sized>(
    store: &S,
    name: &BucketName,
    retry: &RetryPolicy,
) -> Result<(), ProvisionError> {
    retry_until(retry, |attempt| async move {
        match store.probe_bucket(name).await {
            Ok(BucketProbe::Owned) => Some(()),
            Ok(other) => {
                tracing::debug!("bucket {} not visible yet ({:?}), check {}", name, other, attempt);
                None
            }
            Err(e) => {
                tracing::debug!("checking bucket {} failed on check {}: {}", name, attempt, e);
                None
            }
        }
    })
    .await
    .map_err(|exhausted| {
        NotReadySnafu {
            name: name.as_str(),
            attempts: exhausted.attempts,
        }
        .build()
    })
}
