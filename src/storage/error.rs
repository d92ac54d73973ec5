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

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Invalid resource name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    #[error("Object not found: {path}")]
    NotFound { path: String },

    #[error("Object already exists: {path}")]
    AlreadyExists { path: String },

    #[error("Precondition failed for object: {path}")]
    PreconditionFailed { path: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Object store error: {0}")]
    ObjectStoreError(#[from] object_store::Error),

    #[error("URL parse error: {0}")]
    UrlParseError(#[from] url::ParseError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl StorageError {
    /// Map an `object_store` error onto the variants callers branch on.
    ///
    /// `NotFound`, `AlreadyExists` and `Precondition` become their dedicated
    /// variants; everything else is wrapped unchanged.
    pub(crate) fn from_object_store(error: object_store::Error) -> Self {
        match error {
            object_store::Error::NotFound { path, .. } => StorageError::NotFound { path },
            object_store::Error::AlreadyExists { path, .. } => {
                StorageError::AlreadyExists { path }
            }
            object_store::Error::Precondition { path, .. } => {
                StorageError::PreconditionFailed { path }
            }
            other => StorageError::ObjectStoreError(other),
        }
    }

    /// Whether the backend reported the object as absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound { .. })
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_config_error() {
        let error = StorageError::ConfigError("Invalid configuration".to_string());
        assert_eq!(
            error.to_string(),
            "Configuration error: Invalid configuration"
        );
    }

    #[test]
    fn test_invalid_name_error() {
        let error = StorageError::InvalidName {
            name: "Bad--Name".to_string(),
            reason: "uppercase letters are not allowed".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid resource name 'Bad--Name': uppercase letters are not allowed"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let storage_error: StorageError = io_error.into();

        match storage_error {
            StorageError::IoError(_) => {
                assert!(storage_error.to_string().contains("IO error"));
            }
            _ => panic!("Expected IoError variant"),
        }
    }

    #[test]
    fn test_url_parse_error_conversion() {
        let url_error = url::ParseError::EmptyHost;
        let storage_error: StorageError = url_error.into();

        match storage_error {
            StorageError::UrlParseError(_) => {
                assert!(storage_error.to_string().contains("URL parse error"));
            }
            _ => panic!("Expected UrlParseError variant"),
        }
    }

    #[test]
    fn test_from_object_store_not_found() {
        let error = StorageError::from_object_store(object_store::Error::NotFound {
            path: "tables/Customers/A/1".to_string(),
            source: "missing".into(),
        });

        assert!(error.is_not_found());
        assert_eq!(error.to_string(), "Object not found: tables/Customers/A/1");
    }

    #[test]
    fn test_from_object_store_already_exists() {
        let error = StorageError::from_object_store(object_store::Error::AlreadyExists {
            path: "tables/Customers/A/1".to_string(),
            source: "exists".into(),
        });

        match error {
            StorageError::AlreadyExists { path } => assert_eq!(path, "tables/Customers/A/1"),
            other => panic!("Expected AlreadyExists, got {:?}", other),
        }
    }

    #[test]
    fn test_from_object_store_precondition() {
        let error = StorageError::from_object_store(object_store::Error::Precondition {
            path: "tables/Orders/A/1".to_string(),
            source: "etag mismatch".into(),
        });

        match error {
            StorageError::PreconditionFailed { path } => assert_eq!(path, "tables/Orders/A/1"),
            other => panic!("Expected PreconditionFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_from_object_store_other_is_wrapped() {
        let error = StorageError::from_object_store(object_store::Error::Generic {
            store: "test",
            source: "boom".into(),
        });

        assert!(matches!(error, StorageError::ObjectStoreError(_)));
        assert!(!error.is_not_found());
    }

    #[test]
    fn test_storage_result_err() {
        let result: StorageResult<i32> = Err(StorageError::ConfigError("error".to_string()));
        assert!(result.is_err());
    }
}
