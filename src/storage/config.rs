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

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

use super::error::StorageError;

/// Storage provider type
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageType {
    /// Local filesystem storage
    Local,
    /// AWS S3 storage
    Aws,
    /// Azure Blob Storage
    Azure,
    /// Google Cloud Storage
    Gcs,
    /// Process-local in-memory storage
    Memory,
}

impl FromStr for StorageType {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" => Ok(StorageType::Local),
            "aws" | "s3" => Ok(StorageType::Aws),
            "azure" => Ok(StorageType::Azure),
            "gcs" | "gcp" => Ok(StorageType::Gcs),
            "memory" | "inmemory" => Ok(StorageType::Memory),
            _ => Err(StorageError::ConfigError(format!(
                "Unknown storage type: {}",
                s
            ))),
        }
    }
}

/// Generic configuration for storage providers using object_store
///
/// Provider-specific options live in a string map and are handed to the
/// matching object_store builder.
///
/// # Examples
///
/// ## Azure
/// ```
/// use cloud_entity_store::storage::StorageConfig;
///
/// let config = StorageConfig::azure()
///     .with_option("container", "appdata")
///     .with_option("account_name", "myaccount")
///     .with_option("access_key", "ACCOUNT_KEY");
/// ```
///
/// ## Local filesystem
/// ```
/// use cloud_entity_store::storage::StorageConfig;
///
/// let config = StorageConfig::local()
///     .with_option("path", "/tmp/data");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Storage provider type
    #[serde(rename = "type")]
    pub storage_type: StorageType,

    /// Provider-specific configuration options
    ///
    /// AWS S3:
    /// - bucket, region, access_key_id, secret_access_key, session_token
    /// - endpoint, allow_http
    ///
    /// Azure:
    /// - container, account_name
    /// - access_key | sas_token | tenant_id + client_id + client_secret
    /// - use_emulator: "true" to target Azurite
    /// - endpoint
    ///
    /// GCS:
    /// - bucket, service_account_key_path | service_account_key
    ///
    /// Local:
    /// - path: Base path
    ///
    /// All remote providers also accept timeout, connect_timeout, max_retries,
    /// retry_timeout, pool_idle_timeout and pool_max_idle_per_host.
    #[serde(default)]
    pub options: HashMap<String, String>,
}

impl StorageConfig {
    /// Create a new storage configuration from a provider name.
    ///
    /// Accepts "local", "aws"/"s3", "azure", "gcs"/"gcp" and "memory".
    pub fn parse(storage_type: &str) -> Result<Self, StorageError> {
        Ok(Self {
            storage_type: storage_type.parse()?,
            options: Self::default_options(),
        })
    }

    /// Create a local filesystem storage configuration.
    ///
    /// The local filesystem supports create-if-absent writes but not
    /// replace-by-tag, so `EntityStore::update` fails with a backend error
    /// on this provider. Use it for blobs, queues, files and append-only
    /// tables.
    pub fn local() -> Self {
        Self {
            storage_type: StorageType::Local,
            options: Self::default_options(),
        }
    }

    /// Create an AWS S3 storage configuration.
    pub fn aws() -> Self {
        Self {
            storage_type: StorageType::Aws,
            options: Self::default_options(),
        }
    }

    /// Create an Azure Blob Storage configuration.
    pub fn azure() -> Self {
        Self {
            storage_type: StorageType::Azure,
            options: Self::default_options(),
        }
    }

    /// Create a GCS storage configuration.
    pub fn gcs() -> Self {
        Self {
            storage_type: StorageType::Gcs,
            options: Self::default_options(),
        }
    }

    /// Create an in-memory storage configuration. Nothing survives the process.
    pub fn memory() -> Self {
        Self {
            storage_type: StorageType::Memory,
            options: HashMap::new(),
        }
    }

    /// Default timeout, retry, and connection pool settings for remote providers.
    pub fn default_options() -> HashMap<String, String> {
        [
            ("timeout", "120"),
            ("connect_timeout", "30"),
            ("max_retries", "10"),
            ("retry_timeout", "180"),
            ("pool_idle_timeout", "15"),
            ("pool_max_idle_per_host", "5"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    /// Add a configuration option.
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Add multiple configuration options.
    pub fn with_options(mut self, options: HashMap<String, String>) -> Self {
        self.options.extend(options);
        self
    }

    /// Get a configuration option.
    pub fn get_option(&self, key: &str) -> Option<&String> {
        self.options.get(key)
    }

    /// Get the storage type as a string.
    pub fn storage_type_str(&self) -> &str {
        match self.storage_type {
            StorageType::Local => "local",
            StorageType::Aws => "aws",
            StorageType::Azure => "azure",
            StorageType::Gcs => "gcs",
            StorageType::Memory => "memory",
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::memory()
    }
}
