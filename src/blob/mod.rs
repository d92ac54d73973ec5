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

//! Blob containers
//!
//! A container is a named group of blobs. Containers are created
//! idempotently with an access level, and every stored blob has an address
//! that can be handed out to clients.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Formatter};
use std::sync::Arc;
use tracing::{debug, info};
use url::Url;

use crate::storage::provider::join_path;
use crate::storage::{StorageError, StorageProvider, StorageResult, WriteCondition};
use crate::util::naming::{unique_name, validate_object_name, validate_resource_name};

const BLOBS_PREFIX: &str = "blobs";
const META_PREFIX: &str = "_meta";

/// Who may read blobs in a container without credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ContainerAccess {
    /// Only authenticated callers.
    #[default]
    Private,
    /// Anonymous read access to individual blobs.
    Blob,
}

#[derive(Debug, Serialize, Deserialize)]
struct ContainerProperties {
    access: ContainerAccess,
}

/// A stored blob and the address it can be retrieved from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobRef {
    pub name: String,
    pub address: Url,
}

/// Handle to one blob container.
pub struct BlobContainer {
    provider: Arc<dyn StorageProvider>,
    name: String,
    access: ContainerAccess,
}

impl BlobContainer {
    /// Create the container if it does not exist and return a handle to it.
    ///
    /// When the container already exists its recorded access level wins.
    ///
    /// # Errors
    ///
    /// * `StorageError::InvalidName` - the container name breaks the naming rules
    /// * any backend failure while writing or reading the container record
    pub async fn create_if_absent(
        provider: Arc<dyn StorageProvider>,
        name: &str,
        access: ContainerAccess,
    ) -> StorageResult<Self> {
        validate_resource_name(name)?;

        let marker = join_path([META_PREFIX, "containers", name]);
        let properties = serde_json::to_vec(&ContainerProperties { access })?;

        let access = match provider
            .put_object(&marker, Bytes::from(properties), WriteCondition::CreateNew)
            .await
        {
            Ok(_) => {
                info!("Created container={}, access={:?}", name, access);
                access
            }
            Err(StorageError::AlreadyExists { .. }) => {
                let stored = provider.read_object(&marker).await?;
                let existing: ContainerProperties = serde_json::from_slice(&stored.bytes)?;
                debug!(
                    "Container={} already exists, access={:?}",
                    name, existing.access
                );
                existing.access
            }
            Err(e) => return Err(e),
        };

        Ok(Self {
            provider,
            name: name.to_string(),
            access,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn access(&self) -> ContainerAccess {
        self.access
    }

    fn blob_path(&self, blob_name: &str) -> StorageResult<String> {
        validate_object_name(blob_name)?;
        Ok(join_path([BLOBS_PREFIX, self.name.as_str(), blob_name]))
    }

    /// Address a blob can be retrieved from.
    pub fn address(&self, blob_name: &str) -> StorageResult<Url> {
        let path = self.blob_path(blob_name)?;
        Ok(Url::parse(&self.provider.uri_from_path(&path))?)
    }

    /// Write a blob under `blob_name`, replacing any existing content.
    pub async fn upload(&self, blob_name: &str, bytes: impl Into<Bytes>) -> StorageResult<BlobRef> {
        let path = self.blob_path(blob_name)?;
        let bytes = bytes.into();
        let size = bytes.len();
        self.provider
            .put_object(&path, bytes, WriteCondition::Overwrite)
            .await?;
        info!(
            "Uploaded blob container={}, name={}, size={}",
            self.name, blob_name, size
        );

        Ok(BlobRef {
            name: blob_name.to_string(),
            address: self.address(blob_name)?,
        })
    }

    /// Write a blob under a generated, collision-resistant name that keeps
    /// the extension of `original_file_name`.
    pub async fn upload_unique(
        &self,
        original_file_name: &str,
        bytes: impl Into<Bytes>,
    ) -> StorageResult<BlobRef> {
        let blob_name = unique_name(original_file_name);
        let path = self.blob_path(&blob_name)?;
        let bytes = bytes.into();
        let size = bytes.len();
        self.provider
            .put_object(&path, bytes, WriteCondition::CreateNew)
            .await?;
        info!(
            "Uploaded blob container={}, name={}, original_name={}, size={}",
            self.name, blob_name, original_file_name, size
        );

        let address = self.address(&blob_name)?;
        Ok(BlobRef {
            name: blob_name,
            address,
        })
    }

    /// Read a whole blob into memory.
    pub async fn download(&self, blob_name: &str) -> StorageResult<Bytes> {
        let path = self.blob_path(blob_name)?;
        Ok(self.provider.read_object(&path).await?.bytes)
    }

    /// Delete a blob. Deleting an absent blob succeeds.
    pub async fn delete(&self, blob_name: &str) -> StorageResult<()> {
        let path = self.blob_path(blob_name)?;
        self.provider.delete_object(&path).await?;
        debug!("Deleted blob container={}, name={}", self.name, blob_name);
        Ok(())
    }
}

impl Debug for BlobContainer {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BlobContainer(name={}, access={:?})",
            self.name, self.access
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{StorageConfig, StorageProviderFactory};

    async fn memory_provider() -> Arc<dyn StorageProvider> {
        StorageProviderFactory::from_config(StorageConfig::memory())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_if_absent_is_idempotent_and_keeps_access() {
        let provider = memory_provider().await;
        let first =
            BlobContainer::create_if_absent(Arc::clone(&provider), "images", ContainerAccess::Blob)
                .await
                .unwrap();
        let second = BlobContainer::create_if_absent(
            Arc::clone(&provider),
            "images",
            ContainerAccess::Private,
        )
        .await
        .unwrap();

        assert_eq!(first.access(), ContainerAccess::Blob);
        assert_eq!(second.access(), ContainerAccess::Blob);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_name() {
        let result =
            BlobContainer::create_if_absent(memory_provider().await, "Images", ContainerAccess::Blob)
                .await;
        assert!(matches!(result, Err(StorageError::InvalidName { .. })));
    }

    #[tokio::test]
    async fn test_upload_download_and_address() {
        let container = BlobContainer::create_if_absent(
            memory_provider().await,
            "images",
            ContainerAccess::Blob,
        )
        .await
        .unwrap();

        let blob = container
            .upload("logo.png", Bytes::from_static(b"png-bytes"))
            .await
            .unwrap();
        assert_eq!(blob.name, "logo.png");
        assert_eq!(blob.address.as_str(), "memory:///blobs/images/logo.png");

        let bytes = container.download("logo.png").await.unwrap();
        assert_eq!(bytes.as_ref(), b"png-bytes");
    }

    #[tokio::test]
    async fn test_upload_overwrites() {
        let container = BlobContainer::create_if_absent(
            memory_provider().await,
            "images",
            ContainerAccess::Private,
        )
        .await
        .unwrap();

        container.upload("a.txt", b"one".to_vec()).await.unwrap();
        container.upload("a.txt", b"two".to_vec()).await.unwrap();
        assert_eq!(container.download("a.txt").await.unwrap().as_ref(), b"two");
    }

    #[tokio::test]
    async fn test_upload_unique_generates_distinct_names() {
        let container = BlobContainer::create_if_absent(
            memory_provider().await,
            "images",
            ContainerAccess::Blob,
        )
        .await
        .unwrap();

        let a = container
            .upload_unique("Photo.JPG", b"a".to_vec())
            .await
            .unwrap();
        let b = container
            .upload_unique("Photo.JPG", b"b".to_vec())
            .await
            .unwrap();

        assert_ne!(a.name, b.name);
        assert!(a.name.ends_with(".jpg"));
        assert!(a.address.as_str().ends_with(&a.name));
        assert_eq!(container.download(&a.name).await.unwrap().as_ref(), b"a");
        assert_eq!(container.download(&b.name).await.unwrap().as_ref(), b"b");
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let container = BlobContainer::create_if_absent(
            memory_provider().await,
            "images",
            ContainerAccess::Blob,
        )
        .await
        .unwrap();
        container.upload("gone.txt", b"x".to_vec()).await.unwrap();

        container.delete("gone.txt").await.unwrap();
        container.delete("gone.txt").await.unwrap();
        assert!(container.download("gone.txt").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_blob_names_with_path_separators_are_rejected() {
        let container = BlobContainer::create_if_absent(
            memory_provider().await,
            "images",
            ContainerAccess::Blob,
        )
        .await
        .unwrap();
        let err = container
            .upload("../escape", b"x".to_vec())
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::InvalidName { .. }));
    }
}
