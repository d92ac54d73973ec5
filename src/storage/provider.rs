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

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;
use object_store::path::Path as ObjectPath;
use std::collections::HashMap;
use std::fmt::{Debug, Formatter, Result as FmtResult};

use super::error::{StorageError, StorageResult};

/// Metadata about an object in storage
#[derive(Debug, Clone)]
pub struct ObjectMetadata {
    /// Full path to the object
    pub path: String,

    /// Object size in bytes
    pub size: u64,

    /// Last modified timestamp (if available)
    pub last_modified: Option<chrono::DateTime<chrono::Utc>>,

    /// Backend version tag (if the backend reports one)
    pub e_tag: Option<String>,
}

/// Precondition attached to a write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteCondition {
    /// Write unconditionally, replacing whatever is there.
    Overwrite,
    /// Write only if no object exists at the path.
    CreateNew,
    /// Replace only if the current object carries this version tag.
    IfMatch(String),
}

/// Version information returned by a successful write.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectVersion {
    pub e_tag: Option<String>,
    pub version: Option<String>,
}

/// The contents of an object together with the version it was read at.
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub bytes: Bytes,
    pub e_tag: Option<String>,
    pub last_modified: chrono::DateTime<chrono::Utc>,
}

/// Generic trait for cloud storage providers
///
/// Every table, blob, queue and file-share operation in this crate is
/// expressed as one of these object-level calls.
#[async_trait]
pub trait StorageProvider: Send + Sync {
    /// Get the base path/prefix for this storage provider.
    fn base_path(&self) -> &str;

    /// Validate the connection to the storage provider.
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// * Credentials are invalid or expired
    /// * Network connectivity issues occur
    async fn validate_connection(&self) -> StorageResult<()>;

    /// Write an object under the given precondition.
    ///
    /// # Returns
    ///
    /// The version assigned by the backend to the new contents.
    ///
    /// # Errors
    ///
    /// * `StorageError::AlreadyExists` - `CreateNew` and the object exists
    /// * `StorageError::PreconditionFailed` - `IfMatch` and the tag differs
    /// * any other backend failure
    async fn put_object(
        &self,
        path: &str,
        bytes: Bytes,
        condition: WriteCondition,
    ) -> StorageResult<ObjectVersion>;

    /// Read an object and the version tag it was read at.
    ///
    /// # Errors
    ///
    /// * `StorageError::NotFound` - nothing stored at the path
    async fn read_object(&self, path: &str) -> StorageResult<StoredObject>;

    /// Delete an object. Deleting an absent object succeeds.
    async fn delete_object(&self, path: &str) -> StorageResult<()>;

    /// Check if an object exists.
    async fn exists(&self, path: &str) -> StorageResult<bool>;

    /// Get metadata for a specific object.
    async fn get_metadata(&self, path: &str) -> StorageResult<ObjectMetadata>;

    /// Lazily list every object below `prefix`.
    ///
    /// Each call starts a new listing against the backend.
    fn list_objects(&self, prefix: &str) -> BoxStream<'_, StorageResult<ObjectMetadata>>;

    /// Get the provider-specific configuration options.
    fn options(&self) -> &HashMap<String, String>;

    /// Get the provider-specific configuration without connection tuning options.
    fn clean_options(&self) -> HashMap<String, String>;

    /// Get a full provider-specific URL for a path.
    fn uri_from_path(&self, path: &str) -> String;
}

impl Debug for dyn StorageProvider {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "StorageProvider(base_path={})", self.base_path())
    }
}

/// Helper function to create an ObjectPath from an already-encoded string
///
/// The string is parsed, not re-encoded, so paths produced by [`join_path`]
/// or returned by a listing round-trip unchanged.
pub(crate) fn string_to_path(s: &str) -> StorageResult<ObjectPath> {
    ObjectPath::parse(s).map_err(|e| StorageError::InvalidName {
        name: s.to_string(),
        reason: e.to_string(),
    })
}

/// Join path segments, percent-encoding each one so a segment can never
/// introduce a delimiter of its own.
pub(crate) fn join_path<'a>(parts: impl IntoIterator<Item = &'a str>) -> String {
    ObjectPath::from_iter(parts).to_string()
}
