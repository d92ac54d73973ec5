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

use std::fmt::{Debug, Formatter};
use std::sync::Arc;
use tracing::info;

use crate::blob::{BlobContainer, ContainerAccess};
use crate::config::{AppConfig, ResourceConfig};
use crate::queue::MessageQueue;
use crate::share::FileShare;
use crate::storage::{StorageConfig, StorageProvider, StorageProviderFactory, StorageResult};
use crate::table::{Customer, EntityStore, Order, Product};

/// Builder for constructing an [`AppStorage`] instance.
///
/// # Examples
///
/// ```no_run
/// use cloud_entity_store::bootstrap::AppStorage;
/// use cloud_entity_store::config::ResourceConfig;
/// use cloud_entity_store::storage::StorageConfig;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
/// let storage = AppStorage::builder(StorageConfig::memory())
///     .with_resources(ResourceConfig::default())
///     .build()
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct AppStorageBuilder {
    config: StorageConfig,
    resources: Option<ResourceConfig>,
}

impl AppStorageBuilder {
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            resources: None,
        }
    }

    /// Override the names of the container, queue and share.
    pub fn with_resources(mut self, resources: ResourceConfig) -> Self {
        self.resources = Some(resources);
        self
    }

    /// Connect to the backend and make sure every resource exists.
    ///
    /// Resources are created in order: the three tables, the blob container
    /// (anonymous blob read access), the queue, then the share and its
    /// directory.
    ///
    /// # Errors
    ///
    /// The first failure aborts the build:
    /// * The configuration is incomplete or the backend is unreachable
    /// * A resource name is invalid
    /// * Any resource cannot be created
    pub async fn build(self) -> StorageResult<AppStorage> {
        let resources = self.resources.unwrap_or_default();
        let provider = StorageProviderFactory::from_config(self.config).await?;
        provider.validate_connection().await?;

        let customers = EntityStore::open(Arc::clone(&provider)).await?;
        let products = EntityStore::open(Arc::clone(&provider)).await?;
        let orders = EntityStore::open(Arc::clone(&provider)).await?;

        let images = BlobContainer::create_if_absent(
            Arc::clone(&provider),
            &resources.container,
            ContainerAccess::Blob,
        )
        .await?;
        let order_queue = MessageQueue::create_if_absent(Arc::clone(&provider), &resources.queue).await?;
        let files = FileShare::create_if_absent(
            Arc::clone(&provider),
            &resources.share,
            &resources.directory,
        )
        .await?;

        info!(
            "Storage ready base_path={}, container={}, queue={}, share={}/{}",
            provider.base_path(),
            resources.container,
            resources.queue,
            resources.share,
            resources.directory
        );

        Ok(AppStorage {
            provider,
            customers,
            products,
            orders,
            images,
            order_queue,
            files,
        })
    }
}

/// Every storage resource the application uses, ready for use.
pub struct AppStorage {
    provider: Arc<dyn StorageProvider>,
    pub customers: EntityStore<Customer>,
    pub products: EntityStore<Product>,
    pub orders: EntityStore<Order>,
    pub images: BlobContainer,
    pub order_queue: MessageQueue,
    pub files: FileShare,
}

impl AppStorage {
    pub fn builder(config: StorageConfig) -> AppStorageBuilder {
        AppStorageBuilder::new(config)
    }

    /// Bootstrap from a full application configuration.
    pub async fn from_app_config(config: AppConfig) -> StorageResult<Self> {
        Self::builder(config.storage)
            .with_resources(config.resources)
            .build()
            .await
    }

    pub fn provider(&self) -> &Arc<dyn StorageProvider> {
        &self.provider
    }
}

impl Debug for AppStorage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppStorage")
            .field("provider", &self.provider)
            .field("customers", &self.customers)
            .field("products", &self.products)
            .field("orders", &self.orders)
            .field("images", &self.images)
            .field("order_queue", &self.order_queue)
            .field("files", &self.files)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StorageError;
    use futures::TryStreamExt;

    #[tokio::test]
    async fn test_build_with_defaults() {
        let storage = AppStorage::builder(StorageConfig::memory())
            .build()
            .await
            .unwrap();

        assert_eq!(storage.customers.table_name(), "Customers");
        assert_eq!(storage.products.table_name(), "Products");
        assert_eq!(storage.orders.table_name(), "Orders");
        assert_eq!(storage.images.name(), "product-images");
        assert_eq!(storage.images.access(), ContainerAccess::Blob);
        assert_eq!(storage.order_queue.name(), "order-processing");
        assert_eq!(storage.files.share(), "contracts");
        assert_eq!(storage.files.directory(), "uploads");

        for marker in [
            "_meta/tables/Customers",
            "_meta/tables/Products",
            "_meta/tables/Orders",
            "_meta/containers/product-images",
            "_meta/queues/order-processing",
            "_meta/shares/contracts",
            "_meta/directories/contracts/uploads",
        ] {
            assert!(storage.provider().exists(marker).await.unwrap(), "{}", marker);
        }
    }

    #[tokio::test]
    async fn test_custom_resources() {
        let resources = ResourceConfig {
            container: "avatars".to_string(),
            queue: "emails".to_string(),
            share: "legal".to_string(),
            directory: "signed".to_string(),
        };
        let storage = AppStorage::builder(StorageConfig::memory())
            .with_resources(resources)
            .build()
            .await
            .unwrap();

        assert_eq!(storage.images.name(), "avatars");
        assert_eq!(storage.order_queue.name(), "emails");
        assert_eq!(storage.files.share(), "legal");
    }

    #[tokio::test]
    async fn test_invalid_resource_name_aborts_build() {
        let resources = ResourceConfig {
            queue: "Not_Valid".to_string(),
            ..ResourceConfig::default()
        };
        let result = AppStorage::builder(StorageConfig::memory())
            .with_resources(resources)
            .build()
            .await;
        assert!(matches!(result, Err(StorageError::InvalidName { .. })));
    }

    #[tokio::test]
    async fn test_incomplete_backend_config_aborts_build() {
        let result = AppStorage::builder(StorageConfig::azure()).build().await;
        assert!(matches!(result, Err(StorageError::ConfigError(_))));
    }

    #[tokio::test]
    async fn test_order_flow_across_resources() {
        let storage = AppStorage::from_app_config(AppConfig::default())
            .await
            .unwrap();

        let mut product = Product::new("tools", "saw", "Saw", 19.5);
        let image = storage
            .images
            .upload_unique("saw.png", b"png".to_vec())
            .await
            .unwrap();
        product.image_url = Some(image.address.to_string());
        storage.products.add(product).await.unwrap();

        let order = storage
            .orders
            .add(Order::new("cust-1", "order-1", "cust-1", "saw", 3))
            .await
            .unwrap();
        storage.order_queue.enqueue(order.row_key.clone()).await.unwrap();

        let message = storage.order_queue.dequeue().await.unwrap().unwrap();
        let stored = storage
            .orders
            .get("cust-1", &message.body)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.quantity, 3);

        let products: Vec<Product> = storage.products.list_all().try_collect().await.unwrap();
        assert_eq!(products.len(), 1);
        assert!(products[0].image_url.as_deref().unwrap().ends_with(".png"));
    }
}
