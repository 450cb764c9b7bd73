// ABOUTME: Check-then-create-then-wait bootstrap of the lock table.
// ABOUTME: Relies on the provider's native wait instead of a poll loop.

use snafu::ResultExt;

use super::state::BackendResource;
use super::{CreateTableSnafu, ProbeSnafu, ProvisionError, TableNotActiveSnafu};
use crate::cloud::LockTableOps;
use crate::types::{Region, TableMarker, TableName};

/// Ensure the lock table exists and is active.
pub async fn ensure_lock_table<T: LockTableOps + ?Sized>(
    tables: &T,
    name: &TableName,
    region: &Region,
) -> Result<BackendResource<TableMarker>, ProvisionError> {
    if table_exists(tables, name).await? {
        tracing::info!("lock table {} already exists", name);
        return Ok(BackendResource::existing(name.clone(), region));
    }

    tracing::info!("creating lock table {} in {}", name, region);
    let resource = match tables.create_table(name, region).await {
        Ok(()) => BackendResource::absent(name.clone(), region).creating(),
        // Another run may have created it between the check and the create.
        Err(e) => {
            if !table_exists(tables, name).await? {
                return Err(e).context(CreateTableSnafu {
                    name: name.as_str(),
                });
            }
            tracing::info!("lock table {} was created concurrently", name);
            BackendResource::existing(name.clone(), region)
        }
    };

    tables
        .wait_table_active(name)
        .await
        .context(TableNotActiveSnafu {
            name: name.as_str(),
        })?;

    tracing::info!("lock table {} is active", name);
    Ok(resource.ready())
}

async fn table_exists<T: LockTableOps + ?Sized>(
    tables: &T,
    name: &TableName,
) -> Result<bool, ProvisionError> {
    tables.table_exists(name).await.context(ProbeSnafu {
        resource: "lock table",
        name: name.as_str(),
    })
}
