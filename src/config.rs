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

//! Application configuration
//!
//! ```json
//! {
//!   "storage": { "type": "azure", "options": { "account_name": "acct", "container": "appdata" } },
//!   "resources": { "container": "product-images", "queue": "order-processing" }
//! }
//! ```
//!
//! Every section and field is optional; missing values fall back to the
//! in-memory backend and the default resource names.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::storage::{StorageConfig, StorageError, StorageResult};

/// Names of the non-table resources created at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceConfig {
    /// Blob container for product images.
    pub container: String,
    /// Queue of orders awaiting processing.
    pub queue: String,
    pub share: String,
    /// Directory inside `share` that receives uploads.
    pub directory: String,
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            container: "product-images".to_string(),
            queue: "order-processing".to_string(),
            share: "contracts".to_string(),
            directory: "uploads".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub resources: ResourceConfig,
}

impl AppConfig {
    /// Parse a configuration document.
    pub fn from_json_str(json: &str) -> StorageResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| StorageError::ConfigError(format!("Invalid configuration: {}", e)))
    }

    /// Read and parse a configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to read configuration '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json_str(&json)
    }
}
