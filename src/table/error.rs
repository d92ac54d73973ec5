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

use thiserror::Error;

use crate::storage::StorageError;

/// Errors returned by [`EntityStore`](super::EntityStore) operations.
///
/// A read miss is not an error: `get` returns `Ok(None)`.
#[derive(Error, Debug)]
pub enum EntityError {
    /// An entity with the same keys already exists.
    #[error("Entity already exists in table {table}: partition_key={partition_key}, row_key={row_key}")]
    Conflict {
        table: String,
        partition_key: String,
        row_key: String,
    },

    /// The version tag no longer matches the stored entity.
    #[error("Entity in table {table} (partition_key={partition_key}, row_key={row_key}) was modified by another process; re-read and retry")]
    StaleWrite {
        table: String,
        partition_key: String,
        row_key: String,
    },

    /// `update` was called on a value that was never read from the store.
    #[error("Entity in table {table} (partition_key={partition_key}, row_key={row_key}) carries no version tag; read it before updating")]
    MissingVersionTag {
        table: String,
        partition_key: String,
        row_key: String,
    },

    #[error("Invalid {key} '{value}': {reason}")]
    InvalidKey {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Backend error: {0}")]
    Backend(#[from] StorageError),
}

impl EntityError {
    /// Whether re-reading the entity and retrying can succeed.
    pub fn is_stale_write(&self) -> bool {
        matches!(self, EntityError::StaleWrite { .. })
    }
}

/// Result type for entity operations
pub type EntityResult<T> = Result<T, EntityError>;
