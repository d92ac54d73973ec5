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

//! File shares with a single working directory.

use bytes::Bytes;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;
use tracing::{debug, info};
use url::Url;

use crate::storage::provider::join_path;
use crate::storage::{StorageError, StorageProvider, StorageResult, WriteCondition};
use crate::util::naming::{unique_name, validate_object_name, validate_resource_name};

const SHARES_PREFIX: &str = "shares";
const META_PREFIX: &str = "_meta";
// Kept apart from share markers: a local filesystem cannot hold a file and
// a directory at the same path.
const DIRECTORIES_PREFIX: &str = "directories";

/// A stored file and the address it can be retrieved from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRef {
    pub name: String,
    pub address: Url,
}

/// Handle to one directory inside a file share.
pub struct FileShare {
    provider: Arc<dyn StorageProvider>,
    share: String,
    directory: String,
}

async fn create_marker(
    provider: &dyn StorageProvider,
    marker: &str,
    description: &str,
) -> StorageResult<()> {
    match provider
        .put_object(marker, Bytes::new(), WriteCondition::CreateNew)
        .await
    {
        Ok(_) => {
            info!("Created {}", description);
            Ok(())
        }
        Err(StorageError::AlreadyExists { .. }) => {
            debug!("{} already exists", description);
            Ok(())
        }
        Err(e) => Err(e),
    }
}

impl FileShare {
    /// Create the share, then the directory inside it, if either is absent.
    pub async fn create_if_absent(
        provider: Arc<dyn StorageProvider>,
        share: &str,
        directory: &str,
    ) -> StorageResult<Self> {
        validate_resource_name(share)?;
        validate_object_name(directory)?;

        create_marker(
            provider.as_ref(),
            &join_path([META_PREFIX, SHARES_PREFIX, share]),
            &format!("share={}", share),
        )
        .await?;
        create_marker(
            provider.as_ref(),
            &join_path([META_PREFIX, DIRECTORIES_PREFIX, share, directory]),
            &format!("directory={} in share={}", directory, share),
        )
        .await?;

        Ok(Self {
            provider,
            share: share.to_string(),
            directory: directory.to_string(),
        })
    }

    pub fn share(&self) -> &str {
        &self.share
    }

    pub fn directory(&self) -> &str {
        &self.directory
    }

    fn file_path(&self, file_name: &str) -> StorageResult<String> {
        validate_object_name(file_name)?;
        Ok(join_path([
            SHARES_PREFIX,
            self.share.as_str(),
            self.directory.as_str(),
            file_name,
        ]))
    }

    fn file_ref(&self, file_name: String, path: &str) -> StorageResult<FileRef> {
        let address = Url::parse(&self.provider.uri_from_path(path))?;
        Ok(FileRef {
            name: file_name,
            address,
        })
    }

    /// Write a file, replacing any existing content.
    pub async fn write_file(&self, file_name: &str, bytes: impl Into<Bytes>) -> StorageResult<FileRef> {
        let path = self.file_path(file_name)?;
        let bytes = bytes.into();
        let size = bytes.len();
        self.provider
            .put_object(&path, bytes, WriteCondition::Overwrite)
            .await?;
        info!(
            "Wrote file share={}, directory={}, name={}, size={}",
            self.share, self.directory, file_name, size
        );
        self.file_ref(file_name.to_string(), &path)
    }

    /// Write a file under a generated name that keeps the extension of
    /// `original_file_name`.
    pub async fn write_file_unique(
        &self,
        original_file_name: &str,
        bytes: impl Into<Bytes>,
    ) -> StorageResult<FileRef> {
        let file_name = unique_name(original_file_name);
        let path = self.file_path(&file_name)?;
        self.provider
            .put_object(&path, bytes.into(), WriteCondition::CreateNew)
            .await?;
        info!(
            "Wrote file share={}, directory={}, name={}, original_name={}",
            self.share, self.directory, file_name, original_file_name
        );
        self.file_ref(file_name, &path)
    }

    /// Read a whole file into memory.
    pub async fn read_file(&self, file_name: &str) -> StorageResult<Vec<u8>> {
        let path = self.file_path(file_name)?;
        let stored = self.provider.read_object(&path).await?;
        Ok(stored.bytes.to_vec())
    }
}

impl Debug for FileShare {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "FileShare(share={}, directory={})",
            self.share, self.directory
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{StorageConfig, StorageProviderFactory};
    use tempfile::TempDir;

    async fn memory_share() -> FileShare {
        let provider = StorageProviderFactory::from_config(StorageConfig::memory())
            .await
            .unwrap();
        FileShare::create_if_absent(provider, "contracts", "uploads")
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_if_absent_twice() {
        let provider = StorageProviderFactory::from_config(StorageConfig::memory())
            .await
            .unwrap();
        FileShare::create_if_absent(Arc::clone(&provider), "contracts", "uploads")
            .await
            .unwrap();
        FileShare::create_if_absent(Arc::clone(&provider), "contracts", "uploads")
            .await
            .unwrap();

        assert!(provider.exists("_meta/shares/contracts").await.unwrap());
        assert!(provider
            .exists("_meta/directories/contracts/uploads")
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_write_and_read_file() {
        let share = memory_share().await;
        let file = share
            .write_file("contract.pdf", b"%PDF-1.7".to_vec())
            .await
            .unwrap();

        assert_eq!(file.name, "contract.pdf");
        assert_eq!(
            file.address.as_str(),
            "memory:///shares/contracts/uploads/contract.pdf"
        );
        assert_eq!(share.read_file("contract.pdf").await.unwrap(), b"%PDF-1.7");
    }

    #[tokio::test]
    async fn test_write_file_unique() {
        let share = memory_share().await;
        let a = share.write_file_unique("terms.pdf", b"a".to_vec()).await.unwrap();
        let b = share.write_file_unique("terms.pdf", b"b".to_vec()).await.unwrap();

        assert_ne!(a.name, b.name);
        assert!(a.name.ends_with(".pdf"));
        assert_eq!(share.read_file(&b.name).await.unwrap(), b"b");
    }

    #[tokio::test]
    async fn test_read_missing_file() {
        let share = memory_share().await;
        let err = share.read_file("nope.txt").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_invalid_share_name() {
        let provider = StorageProviderFactory::from_config(StorageConfig::memory())
            .await
            .unwrap();
        let result = FileShare::create_if_absent(provider, "Bad_Share", "uploads").await;
        assert!(matches!(result, Err(StorageError::InvalidName { .. })));
    }

    #[tokio::test]
    async fn test_files_on_local_disk() {
        let temp_dir = TempDir::new().unwrap();
        let config = StorageConfig::local()
            .with_option("path", temp_dir.path().to_str().unwrap());
        let provider = StorageProviderFactory::from_config(config).await.unwrap();
        let share = FileShare::create_if_absent(provider, "contracts", "uploads")
            .await
            .unwrap();

        let file = share.write_file("notes.txt", b"hello".to_vec()).await.unwrap();
        assert_eq!(file.address.scheme(), "file");
        assert!(temp_dir
            .path()
            .join("shares/contracts/uploads/notes.txt")
            .exists());
        assert_eq!(share.read_file("notes.txt").await.unwrap(), b"hello");
    }
}
