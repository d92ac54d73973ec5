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

//! Entities stored by the application.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity::{ETag, EntityKind, TableEntity};

/// A customer record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Customer {
    pub partition_key: String,
    pub row_key: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(skip)]
    etag: Option<ETag>,
}

impl Customer {
    pub fn new(
        partition_key: impl Into<String>,
        row_key: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            partition_key: partition_key.into(),
            row_key: row_key.into(),
            name: name.into(),
            email: None,
            phone: None,
            etag: None,
        }
    }
}

/// A product in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Product {
    pub partition_key: String,
    pub row_key: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub stock: u32,
    /// Address of the product image blob, if one was uploaded.
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(skip)]
    etag: Option<ETag>,
}

impl Product {
    pub fn new(
        partition_key: impl Into<String>,
        row_key: impl Into<String>,
        name: impl Into<String>,
        price: f64,
    ) -> Self {
        Self {
            partition_key: partition_key.into(),
            row_key: row_key.into(),
            name: name.into(),
            description: None,
            price,
            stock: 0,
            image_url: None,
            etag: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

/// An order placed by a customer. Partitioned by customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Order {
    pub partition_key: String,
    pub row_key: String,
    pub customer_id: String,
    pub product_id: String,
    pub quantity: u32,
    pub order_date: DateTime<Utc>,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(skip)]
    etag: Option<ETag>,
}

impl Order {
    pub fn new(
        partition_key: impl Into<String>,
        row_key: impl Into<String>,
        customer_id: impl Into<String>,
        product_id: impl Into<String>,
        quantity: u32,
    ) -> Self {
        Self {
            partition_key: partition_key.into(),
            row_key: row_key.into(),
            customer_id: customer_id.into(),
            product_id: product_id.into(),
            quantity,
            order_date: Utc::now(),
            status: OrderStatus::Pending,
            etag: None,
        }
    }
}

macro_rules! impl_table_entity {
    ($ty:ty, $kind:expr) => {
        impl TableEntity for $ty {
            const KIND: EntityKind = $kind;

            fn partition_key(&self) -> &str {
                &self.partition_key
            }

            fn row_key(&self) -> &str {
                &self.row_key
            }

            fn etag(&self) -> Option<&ETag> {
                self.etag.as_ref()
            }

            fn set_etag(&mut self, etag: Option<ETag>) {
                self.etag = etag;
            }
        }
    };
}

impl_table_entity!(Customer, EntityKind::Customer);
impl_table_entity!(Product, EntityKind::Product);
impl_table_entity!(Order, EntityKind::Order);
