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

//! Cloud storage abstraction layer
//!
//! Every primitive in this crate (tables, blob containers, queues, file
//! shares) is laid out on a single object namespace reached through the
//! [`StorageProvider`] trait. The implementation is backed by the
//! `object_store` crate, so Azure Blob Storage, AWS S3, GCS, the local
//! filesystem and an in-memory store are interchangeable.

pub mod config;
pub mod error;
pub mod factory;
pub mod object_store;
pub mod provider;

// Public exports
pub use config::{StorageConfig, StorageType};
pub use error::{StorageError, StorageResult};
pub use factory::StorageProviderFactory;
pub use provider::{ObjectMetadata, ObjectVersion, StorageProvider, StoredObject, WriteCondition};
