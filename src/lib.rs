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

//! # Cloud Entity Store
//!
//! Typed entity tables with optimistic concurrency, plus blob containers,
//! message queues and file shares, all on top of a single `object_store`
//! backend (Azure Blob Storage, AWS S3, Google Cloud Storage, local
//! filesystem or in-memory).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cloud_entity_store::{Customer, EntityStore, StorageConfig, StorageProviderFactory};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//! let config = StorageConfig::azure()
//!     .with_option("container", "appdata")
//!     .with_option("account_name", "myaccount")
//!     .with_option("access_key", "ACCOUNT_KEY");
//! let provider = StorageProviderFactory::from_config(config).await?;
//!
//! let customers = EntityStore::<Customer>::open(provider).await?;
//! let mut alice = customers.add(Customer::new("A", "1", "Alice")).await?;
//!
//! alice.name = "Alice Smith".to_string();
//! // Fails with a stale write if someone else updated the row in between.
//! let alice = customers.update(alice).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`table`] - Entity tables and the domain models
//! - [`blob`] - Blob containers
//! - [`queue`] - Message queues
//! - [`share`] - File shares
//! - [`bootstrap`] - Startup provisioning of every resource
//! - [`config`] - Application configuration
//! - [`storage`] - Cloud storage abstraction layer
//! - [`util`] - Utility functions and helpers

pub mod blob;
pub mod bootstrap;
pub mod config;
pub mod queue;
pub mod share;
pub mod storage;
pub mod table;
pub mod util;

// Re-export commonly used types
pub use blob::{BlobContainer, BlobRef, ContainerAccess};
pub use bootstrap::AppStorage;
pub use config::{AppConfig, ResourceConfig};
pub use queue::{MessageQueue, QueueMessage};
pub use share::{FileRef, FileShare};
pub use storage::{StorageConfig, StorageError, StorageProviderFactory};
pub use table::{
    Customer, ETag, EntityError, EntityStore, Order, OrderStatus, Product, TableEntity,
};
