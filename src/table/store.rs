// Copyright 2025 Adobe. All rights reserved.
// This file is licensed to you under the Apache License,
// Version 2.0 (http://www.apache.org/licenses/LICENSE-2.0)
// or the MIT license (http://opensource.org/licenses/MIT),
// at your option.
//
// Unless required by applicable law or agreed to in writing,
// this software is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR REPRESENTATIONS OF ANY KIND, either express or
// implied. See the LICENSE-MIT and LICENSE-APACHE files for the
// specific language governing permissions and limitations under
// each license.

use bytes::Bytes;
use futures::stream::{BoxStream, StreamExt, TryStreamExt};
use std::fmt::{Debug, Formatter};
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::entity::{validate_key, ETag, TableEntity};
use super::error::{EntityError, EntityResult};
use crate::storage::provider::join_path;
use crate::storage::{StorageError, StorageProvider, StorageResult, WriteCondition};

const TABLES_PREFIX: &str = "tables";
const META_PREFIX: &str = "_meta";

/// Typed access to one partitioned table.
///
/// Updates use optimistic concurrency: a write is applied only if the
/// entity's version tag still matches the stored one.
///
/// # Examples
///
/// ```no_run
/// use cloud_entity_store::storage::{StorageConfig, StorageProviderFactory};
/// use cloud_entity_store::table::{Customer, EntityStore};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
/// let provider = StorageProviderFactory::from_config(StorageConfig::memory()).await?;
/// let customers = EntityStore::<Customer>::open(provider).await?;
///
/// let mut customer = customers.add(Customer::new("A", "1", "X")).await?;
/// customer.email = Some("x@example.com".to_string());
/// let customer = customers.update(customer).await?;
/// # Ok(())
/// # }
/// ```
pub struct EntityStore<E: TableEntity> {
    provider: Arc<dyn StorageProvider>,
    table: String,
    _entity: PhantomData<fn() -> E>,
}

impl<E: TableEntity> EntityStore<E> {
    /// Open the table for `E`, creating it first if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns the backend error if the table cannot be created.
    pub async fn open(provider: Arc<dyn StorageProvider>) -> StorageResult<Self> {
        let store = Self {
            provider,
            table: E::KIND.table_name().into_owned(),
            _entity: PhantomData,
        };
        store.create_table_if_absent().await?;
        Ok(store)
    }

    /// Name of the table this store reads and writes.
    pub fn table_name(&self) -> &str {
        &self.table
    }

    async fn create_table_if_absent(&self) -> StorageResult<()> {
        let marker = join_path([META_PREFIX, TABLES_PREFIX, self.table.as_str()]);
        match self
            .provider
            .put_object(&marker, Bytes::new(), WriteCondition::CreateNew)
            .await
        {
            Ok(_) => {
                info!("Created table={}", self.table);
                Ok(())
            }
            Err(StorageError::AlreadyExists { .. }) => {
                debug!("Table={} already exists", self.table);
                Ok(())
            }
            Err(e) => {
                error!("Failed to create table={}: {}", self.table, e);
                Err(e)
            }
        }
    }

    fn table_prefix(&self) -> String {
        join_path([TABLES_PREFIX, self.table.as_str()])
    }

    fn entity_path(&self, partition_key: &str, row_key: &str) -> EntityResult<String> {
        validate_key("partition key", partition_key)?;
        validate_key("row key", row_key)?;
        Ok(join_path([
            TABLES_PREFIX,
            self.table.as_str(),
            partition_key,
            row_key,
        ]))
    }

    fn backend_error(&self, operation: &str, path: &str, e: StorageError) -> EntityError {
        error!(
            "Backend failure during {} on table={}, path={}: {}",
            operation, self.table, path, e
        );
        EntityError::Backend(e)
    }

    fn serialization_error(&self, operation: &str, path: &str, e: serde_json::Error) -> EntityError {
        error!(
            "Malformed entity during {} on table={}, path={}: {}",
            operation, self.table, path, e
        );
        EntityError::Serialization(e)
    }

    fn encode(&self, operation: &str, path: &str, entity: &E) -> EntityResult<Bytes> {
        serde_json::to_vec(entity)
            .map(Bytes::from)
            .map_err(|e| self.serialization_error(operation, path, e))
    }

    async fn read_entity(&self, path: &str) -> EntityResult<Option<E>> {
        let stored = match self.provider.read_object(path).await {
            Ok(stored) => stored,
            Err(StorageError::NotFound { .. }) => return Ok(None),
            Err(e) => return Err(self.backend_error("read", path, e)),
        };

        let mut entity: E = serde_json::from_slice(&stored.bytes)
            .map_err(|e| self.serialization_error("read", path, e))?;
        entity.set_etag(stored.e_tag.map(ETag::new));
        Ok(Some(entity))
    }

    /// Stream every entity in the table.
    ///
    /// The listing is lazy: rows are fetched as the stream is polled. Each
    /// call starts a fresh listing. Rows deleted between the listing and
    /// the fetch are skipped.
    pub fn list_all(&self) -> BoxStream<'_, EntityResult<E>> {
        self.provider
            .list_objects(&self.table_prefix())
            .then(move |meta| async move {
                match meta {
                    Ok(meta) => self.read_entity(&meta.path).await,
                    Err(e) => Err(self.backend_error("list", &self.table_prefix(), e)),
                }
            })
            .try_filter_map(|entity| async move { Ok(entity) })
            .boxed()
    }

    /// Fetch one entity by key; `Ok(None)` when it does not exist.
    pub async fn get(&self, partition_key: &str, row_key: &str) -> EntityResult<Option<E>> {
        let path = self.entity_path(partition_key, row_key)?;
        self.read_entity(&path).await
    }

    /// Insert a new entity and return it carrying its version tag.
    ///
    /// # Errors
    ///
    /// * `EntityError::Conflict` - an entity with the same keys exists
    /// * `EntityError::Backend` - any other backend failure (logged)
    pub async fn add(&self, mut entity: E) -> EntityResult<E> {
        let path = self.entity_path(entity.partition_key(), entity.row_key())?;
        let body = self.encode("add", &path, &entity)?;

        match self
            .provider
            .put_object(&path, body, WriteCondition::CreateNew)
            .await
        {
            Ok(version) => {
                entity.set_etag(version.e_tag.map(ETag::new));
                debug!(
                    "Added entity table={}, partition_key={}, row_key={}",
                    self.table,
                    entity.partition_key(),
                    entity.row_key()
                );
                Ok(entity)
            }
            Err(StorageError::AlreadyExists { .. }) => Err(EntityError::Conflict {
                table: self.table.clone(),
                partition_key: entity.partition_key().to_string(),
                row_key: entity.row_key().to_string(),
            }),
            Err(e) => Err(self.backend_error("add", &path, e)),
        }
    }

    /// Replace an entity, provided nobody else wrote it since it was read.
    ///
    /// The write is conditional on the version tag the entity carries, and
    /// the returned entity carries the new tag.
    ///
    /// # Errors
    ///
    /// * `EntityError::MissingVersionTag` - the entity was never read or written
    /// * `EntityError::StaleWrite` - the stored tag differs; nothing was written
    /// * `EntityError::Backend` - any other backend failure (logged)
    pub async fn update(&self, mut entity: E) -> EntityResult<E> {
        let path = self.entity_path(entity.partition_key(), entity.row_key())?;
        let Some(etag) = entity.etag().cloned() else {
            return Err(EntityError::MissingVersionTag {
                table: self.table.clone(),
                partition_key: entity.partition_key().to_string(),
                row_key: entity.row_key().to_string(),
            });
        };
        let body = self.encode("update", &path, &entity)?;

        match self
            .provider
            .put_object(&path, body, WriteCondition::IfMatch(etag.as_str().to_string()))
            .await
        {
            Ok(version) => {
                entity.set_etag(version.e_tag.map(ETag::new));
                debug!(
                    "Updated entity table={}, partition_key={}, row_key={}",
                    self.table,
                    entity.partition_key(),
                    entity.row_key()
                );
                Ok(entity)
            }
            Err(StorageError::PreconditionFailed { .. }) => {
                warn!(
                    "Stale write rejected table={}, partition_key={}, row_key={}, etag={}",
                    self.table,
                    entity.partition_key(),
                    entity.row_key(),
                    etag
                );
                Err(EntityError::StaleWrite {
                    table: self.table.clone(),
                    partition_key: entity.partition_key().to_string(),
                    row_key: entity.row_key().to_string(),
                })
            }
            Err(e) => Err(self.backend_error("update", &path, e)),
        }
    }

    /// Remove an entity. Removing an absent entity is a no-op.
    pub async fn delete(&self, partition_key: &str, row_key: &str) -> EntityResult<()> {
        let path = self.entity_path(partition_key, row_key)?;
        self.provider
            .delete_object(&path)
            .await
            .map_err(|e| self.backend_error("delete", &path, e))?;
        debug!(
            "Deleted entity table={}, partition_key={}, row_key={}",
            self.table, partition_key, row_key
        );
        Ok(())
    }
}

impl<E: TableEntity> Clone for EntityStore<E> {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
            table: self.table.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E: TableEntity> Debug for EntityStore<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "EntityStore(table={}, provider={:?})",
            self.table, self.provider
        )
    }
}
