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

use super::config::{StorageConfig, StorageType};
use super::error::{StorageError, StorageResult};
use super::provider::{
    string_to_path, ObjectMetadata, ObjectVersion, StorageProvider, StoredObject, WriteCondition,
};
use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{self, BoxStream, StreamExt};
use object_store::{
    aws::AmazonS3Builder, azure::MicrosoftAzureBuilder, gcp::GoogleCloudStorageBuilder,
    local::LocalFileSystem, memory::InMemory, ClientOptions, ObjectMeta, ObjectStore,
    ObjectStoreExt, PutMode, PutOptions, PutPayload, RetryConfig, UpdateVersion,
};
use std::collections::HashMap;
use std::fmt::{Debug, Formatter};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Options consumed by `build_connection_options` and `build_retry_options`.
const CONNECTION_OPTIONS: [&str; 6] = [
    "timeout",
    "connect_timeout",
    "max_retries",
    "retry_timeout",
    "pool_idle_timeout",
    "pool_max_idle_per_host",
];

/// Generic storage provider that works with any object_store backend
pub struct ObjectStoreProvider {
    pub config: StorageConfig,
    pub store: Arc<dyn ObjectStore>,
    pub base_path: String,
}

impl ObjectStoreProvider {
    /// Create a new storage provider from configuration.
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// * Required configuration options are missing
    /// * The storage backend cannot be created (e.g., invalid credentials)
    pub async fn new(config: StorageConfig) -> StorageResult<Self> {
        let (store, base_path) = Self::build_store(&config)?;
        info!(
            "Created storage provider, type={}, base_path={}",
            config.storage_type_str(),
            base_path
        );

        Ok(Self {
            config,
            store: Arc::from(store),
            base_path,
        })
    }

    /// Wrap an existing object store. Used to share one in-memory store
    /// between several providers.
    pub fn with_store(
        config: StorageConfig,
        store: Arc<dyn ObjectStore>,
        base_path: impl Into<String>,
    ) -> Self {
        Self {
            config,
            store,
            base_path: base_path.into(),
        }
    }

    /// Build the appropriate object store based on configuration.
    fn build_store(config: &StorageConfig) -> StorageResult<(Box<dyn ObjectStore>, String)> {
        match config.storage_type {
            StorageType::Local => Self::build_local_store(config),
            StorageType::Aws => Self::build_aws_store(config),
            StorageType::Azure => Self::build_azure_store(config),
            StorageType::Gcs => Self::build_gcs_store(config),
            StorageType::Memory => Ok((Box::new(InMemory::new()), "memory://".to_string())),
        }
    }

    /// Build a local filesystem store rooted at the `path` option.
    ///
    /// # Errors
    ///
    /// * The 'path' option is missing
    /// * The path cannot be canonicalized or is not a directory
    fn build_local_store(config: &StorageConfig) -> StorageResult<(Box<dyn ObjectStore>, String)> {
        let path = config.options.get("path").ok_or_else(|| {
            StorageError::ConfigError("Local storage requires 'path' option".to_string())
        })?;
        let base_path = PathBuf::from(path);

        let canonical_path = base_path.canonicalize().map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to resolve path '{}': {} (path must exist)",
                path, e
            ))
        })?;

        if !canonical_path.is_dir() {
            return Err(StorageError::ConfigError(format!(
                "Base path is not a directory: {}",
                canonical_path.display()
            )));
        }

        let store = LocalFileSystem::new_with_prefix(&canonical_path).map_err(|e| {
            StorageError::ConfigError(format!("Failed to create local store: {}", e))
        })?;

        let base_path_str = canonical_path.to_string_lossy().to_string();
        Ok((Box::new(store), base_path_str))
    }

    /// Build HTTP client options (timeouts, connection pool) from configuration.
    fn build_connection_options(config: &StorageConfig) -> ClientOptions {
        let mut client_options = ClientOptions::default();
        if let Some(timeout_str) = config.options.get("timeout") {
            if timeout_str == "0" || timeout_str == "disabled" {
                client_options = client_options.with_timeout_disabled();
            } else if let Ok(sec) = timeout_str.parse::<u64>() {
                client_options = client_options.with_timeout(Duration::from_secs(sec))
            }
        };
        if let Some(connect_timeout_str) = config.options.get("connect_timeout") {
            if connect_timeout_str == "0" || connect_timeout_str == "disabled" {
                client_options = client_options.with_connect_timeout_disabled();
            } else if let Ok(sec) = connect_timeout_str.parse::<u64>() {
                client_options = client_options.with_connect_timeout(Duration::from_secs(sec))
            }
        }
        if let Some(pool_idle_timeout_str) = config.options.get("pool_idle_timeout") {
            if let Ok(sec) = pool_idle_timeout_str.parse::<u64>() {
                client_options = client_options.with_pool_idle_timeout(Duration::from_secs(sec))
            }
        }
        if let Some(pool_max_idle_per_host_str) = config.options.get("pool_max_idle_per_host") {
            if let Ok(max_idle) = pool_max_idle_per_host_str.parse::<usize>() {
                client_options = client_options.with_pool_max_idle_per_host(max_idle)
            }
        }
        client_options
    }

    /// Build the backend client's retry policy from configuration.
    ///
    /// Retries happen inside the object_store client; this crate never
    /// retries an operation itself.
    fn build_retry_options(config: &StorageConfig) -> RetryConfig {
        let default_retry_config = RetryConfig::default();
        let max_retries = config
            .options
            .get("max_retries")
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(default_retry_config.max_retries);
        let retry_timeout = config
            .options
            .get("retry_timeout")
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(default_retry_config.retry_timeout);
        RetryConfig {
            backoff: Default::default(),
            max_retries,
            retry_timeout,
        }
    }

    /// Build an AWS S3 store.
    fn build_aws_store(config: &StorageConfig) -> StorageResult<(Box<dyn ObjectStore>, String)> {
        let mut builder = AmazonS3Builder::new()
            .with_client_options(Self::build_connection_options(config))
            .with_retry(Self::build_retry_options(config));
        let mut bucket: Option<&String> = None;
        let mut endpoint: Option<&String> = None;

        for (key, value) in &config.options {
            match key.as_str() {
                "bucket" => {
                    bucket = Some(value);
                    builder = builder.with_bucket_name(value);
                }
                "region" => builder = builder.with_region(value),
                "access_key_id" => builder = builder.with_access_key_id(value),
                "secret_access_key" => builder = builder.with_secret_access_key(value),
                "session_token" | "token" => builder = builder.with_token(value),
                "endpoint" => {
                    endpoint = Some(value);
                    builder = builder.with_endpoint(value);
                }
                "allow_http" => {
                    if value.to_lowercase() == "true" {
                        builder = builder.with_allow_http(true);
                    }
                }
                k if CONNECTION_OPTIONS.contains(&k) => (),
                _ => {
                    tracing::warn!("Unknown AWS S3 option: {}", key);
                }
            }
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(format!("Failed to create S3 store: {}", e)))?;

        let base_url = if let Some(endpoint_url) = endpoint {
            endpoint_url.trim_end_matches('/').to_string()
        } else if let Some(bucket_name) = bucket {
            format!("https://{}.s3.amazonaws.com", bucket_name)
        } else {
            "s3://".to_string()
        };

        Ok((Box::new(store), base_url))
    }

    /// Build an Azure Blob Storage store.
    ///
    /// # Errors
    ///
    /// * 'account_name' or 'container' is missing
    /// * The Azure client cannot be built from the given credentials
    fn build_azure_store(config: &StorageConfig) -> StorageResult<(Box<dyn ObjectStore>, String)> {
        let mut builder = MicrosoftAzureBuilder::new()
            .with_client_options(Self::build_connection_options(config))
            .with_retry(Self::build_retry_options(config));

        let account_name = config.get_option("account_name").ok_or_else(|| {
            StorageError::ConfigError("Azure requires 'account_name' option".to_string())
        })?;
        let container = config.get_option("container").ok_or_else(|| {
            StorageError::ConfigError("Azure requires 'container' option".to_string())
        })?;

        builder = builder
            .with_account(account_name)
            .with_container_name(container);

        let mut use_emulator = false;
        let mut custom_endpoint: Option<&String> = None;

        for (key, value) in &config.options {
            match key.as_str() {
                "container" | "account_name" => (),
                "access_key" | "account_key" => builder = builder.with_access_key(value),
                "sas_token" => {
                    let pairs: Vec<(String, String)> = value
                        .trim_start_matches('?')
                        .split('&')
                        .filter_map(|pair| {
                            let mut parts = pair.split('=');
                            match (parts.next(), parts.next()) {
                                (Some(k), Some(v)) => Some((k.to_string(), v.to_string())),
                                _ => None,
                            }
                        })
                        .collect();
                    builder = builder.with_sas_authorization(pairs);
                }
                "tenant_id" => builder = builder.with_tenant_id(value),
                "client_id" => builder = builder.with_client_id(value),
                "client_secret" => builder = builder.with_client_secret(value),
                "use_emulator" => {
                    use_emulator = value.to_lowercase() == "true";
                    builder = builder.with_use_emulator(use_emulator);
                }
                "endpoint" => {
                    custom_endpoint = Some(value);
                    builder = builder.with_endpoint(value.clone());
                }
                k if CONNECTION_OPTIONS.contains(&k) => (),
                _ => {
                    tracing::info!("Unknown Azure option: {}", key);
                }
            }
        }

        let store = builder.build().map_err(|e| {
            StorageError::ConfigError(format!("Failed to create Azure store: {}", e))
        })?;

        let base_url = if let Some(endpoint) = custom_endpoint {
            format!("{}/{}", endpoint.trim_end_matches('/'), container)
        } else if use_emulator {
            format!("http://127.0.0.1:10000/{}/{}", account_name, container)
        } else {
            format!("https://{}.blob.core.windows.net/{}", account_name, container)
        };

        Ok((Box::new(store), base_url))
    }

    /// Build a GCS store.
    fn build_gcs_store(config: &StorageConfig) -> StorageResult<(Box<dyn ObjectStore>, String)> {
        let mut builder = GoogleCloudStorageBuilder::new()
            .with_client_options(Self::build_connection_options(config))
            .with_retry(Self::build_retry_options(config));
        let mut bucket: Option<&String> = None;

        for (key, value) in &config.options {
            match key.as_str() {
                "bucket" => {
                    bucket = Some(value);
                    builder = builder.with_bucket_name(value);
                }
                "service_account_key_path" => builder = builder.with_service_account_path(value),
                "service_account_key" => builder = builder.with_service_account_key(value),
                k if CONNECTION_OPTIONS.contains(&k) => (),
                _ => {
                    tracing::warn!("Unknown GCS option: {}", key);
                }
            }
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(format!("Failed to create GCS store: {}", e)))?;

        let base_url = match bucket {
            Some(bucket_name) => format!("https://storage.googleapis.com/{}", bucket_name),
            None => "gs://".to_string(),
        };

        Ok((Box::new(store), base_url))
    }
}

impl From<ObjectMeta> for ObjectMetadata {
    fn from(meta: ObjectMeta) -> Self {
        ObjectMetadata {
            path: meta.location.to_string(),
            size: meta.size as u64,
            last_modified: Some(meta.last_modified),
            e_tag: meta.e_tag,
        }
    }
}

impl From<WriteCondition> for PutMode {
    fn from(condition: WriteCondition) -> Self {
        match condition {
            WriteCondition::Overwrite => PutMode::Overwrite,
            WriteCondition::CreateNew => PutMode::Create,
            WriteCondition::IfMatch(e_tag) => PutMode::Update(UpdateVersion {
                e_tag: Some(e_tag),
                version: None,
            }),
        }
    }
}

#[async_trait]
impl StorageProvider for ObjectStoreProvider {
    fn base_path(&self) -> &str {
        &self.base_path
    }

    async fn validate_connection(&self) -> StorageResult<()> {
        if self.config.storage_type == StorageType::Local {
            let path = PathBuf::from(&self.base_path);
            return if path.is_dir() {
                Ok(())
            } else {
                Err(StorageError::ConnectionError(format!(
                    "Base path is not accessible: {}",
                    self.base_path
                )))
            };
        }

        self.store
            .list_with_delimiter(None)
            .await
            .map_err(|e| StorageError::ConnectionError(e.to_string()))?;
        Ok(())
    }

    async fn put_object(
        &self,
        path: &str,
        bytes: Bytes,
        condition: WriteCondition,
    ) -> StorageResult<ObjectVersion> {
        let object_path = string_to_path(path)?;
        let size = bytes.len();
        let options = PutOptions::from(PutMode::from(condition));

        let result = self
            .store
            .put_opts(&object_path, PutPayload::from(bytes), options)
            .await
            .map_err(StorageError::from_object_store)?;

        debug!(
            "Wrote object path={}, size={}, e_tag={:?}",
            path, size, result.e_tag
        );
        Ok(ObjectVersion {
            e_tag: result.e_tag,
            version: result.version,
        })
    }

    async fn read_object(&self, path: &str) -> StorageResult<StoredObject> {
        let object_path = string_to_path(path)?;
        let result = self
            .store
            .get(&object_path)
            .await
            .map_err(StorageError::from_object_store)?;
        let e_tag = result.meta.e_tag.clone();
        let last_modified = result.meta.last_modified;
        let bytes: Bytes = result
            .bytes()
            .await
            .map_err(StorageError::from_object_store)?;

        Ok(StoredObject {
            bytes,
            e_tag,
            last_modified,
        })
    }

    async fn delete_object(&self, path: &str) -> StorageResult<()> {
        let object_path = string_to_path(path)?;
        match self.store.delete(&object_path).await {
            Ok(()) => Ok(()),
            Err(object_store::Error::NotFound { .. }) => {
                debug!("Delete of absent object path={} ignored", path);
                Ok(())
            }
            Err(e) => Err(StorageError::from_object_store(e)),
        }
    }

    async fn exists(&self, path: &str) -> StorageResult<bool> {
        let object_path = string_to_path(path)?;
        match self.store.head(&object_path).await {
            Ok(_) => Ok(true),
            Err(object_store::Error::NotFound { .. }) => Ok(false),
            Err(e) => Err(StorageError::from_object_store(e)),
        }
    }

    async fn get_metadata(&self, path: &str) -> StorageResult<ObjectMetadata> {
        let object_path = string_to_path(path)?;
        let meta = self
            .store
            .head(&object_path)
            .await
            .map_err(StorageError::from_object_store)?;

        Ok(meta.into())
    }

    fn list_objects(&self, prefix: &str) -> BoxStream<'_, StorageResult<ObjectMetadata>> {
        let prefix = if prefix.is_empty() {
            None
        } else {
            match string_to_path(prefix) {
                Ok(path) => Some(path),
                Err(e) => return stream::once(async move { Err(e) }).boxed(),
            }
        };

        self.store
            .list(prefix.as_ref())
            .map(|meta| {
                meta.map(ObjectMetadata::from)
                    .map_err(StorageError::from_object_store)
            })
            .boxed()
    }

    fn options(&self) -> &HashMap<String, String> {
        &self.config.options
    }

    fn clean_options(&self) -> HashMap<String, String> {
        self.config
            .options
            .iter()
            .filter(|(k, _)| !CONNECTION_OPTIONS.contains(&k.as_str()))
            .filter(|(k, _)| {
                !matches!(
                    k.as_str(),
                    "access_key"
                        | "account_key"
                        | "sas_token"
                        | "client_secret"
                        | "secret_access_key"
                        | "session_token"
                        | "token"
                        | "service_account_key"
                )
            })
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect::<HashMap<_, _>>()
    }

    fn uri_from_path(&self, path: &str) -> String {
        if self.config.storage_type == StorageType::Local {
            let base = self.base_path.replace('\\', "/");
            let base = base.strip_prefix("//?/").unwrap_or(&base);
            return format!(
                "file:///{}/{}",
                base.trim_start_matches('/'),
                path.trim_start_matches('/')
            );
        }

        format!(
            "{}/{}",
            self.base_path.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl Debug for ObjectStoreProvider {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "StorageProvider(type=object_store, cloud_provider={}, options={:?})",
            self.config.storage_type_str(),
            self.clean_options()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::TryStreamExt;
    use std::fs;
    use tempfile::TempDir;

    async fn memory_provider() -> ObjectStoreProvider {
        ObjectStoreProvider::new(StorageConfig::memory()).await.unwrap()
    }

    #[test]
    fn test_build_connection_options_with_disabled_timeout() {
        let config = StorageConfig::azure()
            .with_option("timeout", "disabled")
            .with_option("connect_timeout", "0");

        let _options = ObjectStoreProvider::build_connection_options(&config);
    }

    #[test]
    fn test_build_connection_options_invalid_values() {
        let config = StorageConfig::azure()
            .with_option("timeout", "invalid")
            .with_option("pool_max_idle_per_host", "not_a_number");

        let _options = ObjectStoreProvider::build_connection_options(&config);
    }

    #[test]
    fn test_build_retry_options_custom() {
        let config = StorageConfig::azure()
            .with_option("max_retries", "5")
            .with_option("retry_timeout", "300");

        let retry_config = ObjectStoreProvider::build_retry_options(&config);
        assert_eq!(retry_config.max_retries, 5);
        assert_eq!(retry_config.retry_timeout, Duration::from_secs(300));
    }

    #[test]
    fn test_build_retry_options_invalid_values() {
        let config = StorageConfig::azure()
            .with_option("max_retries", "invalid")
            .with_option("retry_timeout", "not_a_number");

        let retry_config = ObjectStoreProvider::build_retry_options(&config);
        let default_config = RetryConfig::default();
        assert_eq!(retry_config.max_retries, default_config.max_retries);
        assert_eq!(retry_config.retry_timeout, default_config.retry_timeout);
    }

    #[test]
    fn test_write_condition_to_put_mode() {
        assert!(matches!(
            PutMode::from(WriteCondition::Overwrite),
            PutMode::Overwrite
        ));
        assert!(matches!(
            PutMode::from(WriteCondition::CreateNew),
            PutMode::Create
        ));
        match PutMode::from(WriteCondition::IfMatch("7".to_string())) {
            PutMode::Update(v) => {
                assert_eq!(v.e_tag.as_deref(), Some("7"));
                assert!(v.version.is_none());
            }
            _ => panic!("Expected PutMode::Update"),
        }
    }

    #[tokio::test]
    async fn test_new_local_provider_missing_path() {
        let provider = ObjectStoreProvider::new(StorageConfig::local()).await;

        match provider {
            Err(StorageError::ConfigError(msg)) => assert!(msg.contains("path")),
            _ => panic!("Expected ConfigError for missing path"),
        }
    }

    #[tokio::test]
    async fn test_new_local_provider_file_not_directory() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("test_file.txt");
        fs::write(&file_path, "test content").unwrap();

        let config = StorageConfig::local().with_option("path", file_path.to_str().unwrap());
        match ObjectStoreProvider::new(config).await {
            Err(StorageError::ConfigError(msg)) => assert!(msg.contains("not a directory")),
            _ => panic!("Expected ConfigError for file instead of directory"),
        }
    }

    #[tokio::test]
    async fn test_azure_requires_account_name() {
        let config = StorageConfig::azure().with_option("container", "appdata");
        match ObjectStoreProvider::new(config).await {
            Err(StorageError::ConfigError(msg)) => assert!(msg.contains("account_name")),
            _ => panic!("Expected ConfigError for missing account_name"),
        }
    }

    #[tokio::test]
    async fn test_azure_base_path_uses_blob_endpoint() {
        let config = StorageConfig::azure()
            .with_option("account_name", "acct")
            .with_option("container", "appdata")
            .with_option("access_key", "a2V5");
        let provider = ObjectStoreProvider::new(config).await.unwrap();

        assert_eq!(
            provider.base_path(),
            "https://acct.blob.core.windows.net/appdata"
        );
        assert_eq!(
            provider.uri_from_path("blobs/images/a.png"),
            "https://acct.blob.core.windows.net/appdata/blobs/images/a.png"
        );
        assert!(!provider.clean_options().contains_key("access_key"));
        assert!(!provider.clean_options().contains_key("timeout"));
    }

    #[tokio::test]
    async fn test_local_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let config = StorageConfig::local().with_option("path", temp_dir.path().to_str().unwrap());
        let provider = ObjectStoreProvider::new(config).await.unwrap();

        provider.validate_connection().await.unwrap();
        provider
            .put_object(
                "shares/docs/a.txt",
                Bytes::from_static(b"hello"),
                WriteCondition::Overwrite,
            )
            .await
            .unwrap();

        let stored = provider.read_object("shares/docs/a.txt").await.unwrap();
        assert_eq!(stored.bytes.as_ref(), b"hello");
        assert!(provider.exists("shares/docs/a.txt").await.unwrap());
        assert!(provider
            .uri_from_path("shares/docs/a.txt")
            .starts_with("file:///"));
    }

    #[tokio::test]
    async fn test_local_delete_absent_is_ok() {
        let temp_dir = TempDir::new().unwrap();
        let config = StorageConfig::local().with_option("path", temp_dir.path().to_str().unwrap());
        let provider = ObjectStoreProvider::new(config).await.unwrap();

        provider.delete_object("blobs/nothing/here").await.unwrap();
    }

    #[tokio::test]
    async fn test_create_new_conflicts_on_existing_object() {
        let provider = memory_provider().await;
        provider
            .put_object("a/b", Bytes::from_static(b"1"), WriteCondition::CreateNew)
            .await
            .unwrap();

        let err = provider
            .put_object("a/b", Bytes::from_static(b"2"), WriteCondition::CreateNew)
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::AlreadyExists { .. }));

        let stored = provider.read_object("a/b").await.unwrap();
        assert_eq!(stored.bytes.as_ref(), b"1");
    }

    #[tokio::test]
    async fn test_if_match_replaces_only_on_current_tag() {
        let provider = memory_provider().await;
        let first = provider
            .put_object("a/b", Bytes::from_static(b"1"), WriteCondition::CreateNew)
            .await
            .unwrap();
        let first_tag = first.e_tag.clone().unwrap();

        let second = provider
            .put_object(
                "a/b",
                Bytes::from_static(b"2"),
                WriteCondition::IfMatch(first_tag.clone()),
            )
            .await
            .unwrap();
        assert_ne!(second.e_tag, first.e_tag);

        let err = provider
            .put_object(
                "a/b",
                Bytes::from_static(b"3"),
                WriteCondition::IfMatch(first_tag),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::PreconditionFailed { .. }));
        assert_eq!(
            provider.read_object("a/b").await.unwrap().bytes.as_ref(),
            b"2"
        );
    }

    #[tokio::test]
    async fn test_read_missing_object_is_not_found() {
        let provider = memory_provider().await;
        let err = provider.read_object("missing/object").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_list_objects_below_prefix() {
        let provider = memory_provider().await;
        for path in ["t/A/1", "t/A/2", "t/B/1", "other/x"] {
            provider
                .put_object(path, Bytes::from_static(b"{}"), WriteCondition::Overwrite)
                .await
                .unwrap();
        }

        let mut paths: Vec<String> = provider
            .list_objects("t")
            .map_ok(|meta| meta.path)
            .try_collect()
            .await
            .unwrap();
        paths.sort();
        assert_eq!(paths, vec!["t/A/1", "t/A/2", "t/B/1"]);
    }

    #[tokio::test]
    async fn test_get_metadata_reports_size_and_tag() {
        let provider = memory_provider().await;
        provider
            .put_object("m/x", Bytes::from_static(b"abcd"), WriteCondition::Overwrite)
            .await
            .unwrap();

        let meta = provider.get_metadata("m/x").await.unwrap();
        assert_eq!(meta.size, 4);
        assert!(meta.e_tag.is_some());
    }

    #[tokio::test]
    async fn test_memory_uri_from_path() {
        let provider = memory_provider().await;
        assert_eq!(provider.uri_from_path("/blobs/c/x"), "memory:///blobs/c/x");
    }

    #[tokio::test]
    async fn test_debug_hides_secrets() {
        let provider = ObjectStoreProvider::new(
            StorageConfig::memory().with_option("client_secret", "hunter2"),
        )
        .await
        .unwrap();
        let debug_str = format!("{:?}", provider);
        assert!(debug_str.contains("cloud_provider=memory"));
        assert!(!debug_str.contains("hunter2"));
    }
}
