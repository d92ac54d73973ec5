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

use futures::TryStreamExt;
use std::error::Error;
use std::time::Instant;
use tracing::info;

use cloud_entity_store::table::{EntityResult, EntityStore, TableEntity};
use cloud_entity_store::{AppConfig, AppStorage};

async fn row_count<E: TableEntity>(store: &EntityStore<E>) -> EntityResult<usize> {
    store
        .list_all()
        .try_fold(0, |count, _| async move { Ok(count + 1) })
        .await
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            info!("Loading configuration from {}", path);
            AppConfig::from_json_file(&path)?
        }
        None => {
            info!("No configuration given, using in-memory storage");
            AppConfig::default()
        }
    };

    info!(
        "Starting Cloud Entity Store with storage={}",
        config.storage.storage_type_str()
    );
    let start = Instant::now();
    let storage = AppStorage::from_app_config(config).await?;
    info!("Bootstrap finished in {}ms", start.elapsed().as_millis());

    info!(
        "Table {} rows={}",
        storage.customers.table_name(),
        row_count(&storage.customers).await?
    );
    info!(
        "Table {} rows={}",
        storage.products.table_name(),
        row_count(&storage.products).await?
    );
    info!(
        "Table {} rows={}",
        storage.orders.table_name(),
        row_count(&storage.orders).await?
    );
    info!(
        "Queue {} messages={}",
        storage.order_queue.name(),
        storage.order_queue.approximate_len().await?
    );

    Ok(())
}
