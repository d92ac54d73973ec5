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

//! Partitioned key-value tables with optimistic concurrency
//!
//! Entities are addressed by a (partition key, row key) pair and live in the
//! table named after their [`EntityKind`]. Every successful write assigns a
//! new [`ETag`]; [`EntityStore::update`] only succeeds when the entity still
//! carries the stored tag.

pub mod entity;
pub mod error;
pub mod models;
pub mod store;

pub use entity::{table_name_for, ETag, EntityKind, TableEntity};
pub use error::{EntityError, EntityResult};
pub use models::{Customer, Order, OrderStatus, Product};
pub use store::EntityStore;
