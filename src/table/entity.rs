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

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::borrow::Cow;
use std::fmt::{Display, Formatter};

use super::error::{EntityError, EntityResult};

/// Maximum key length accepted by the table service.
pub const MAX_KEY_LENGTH: usize = 1024;

/// Opaque version tag assigned by the backend on every successful write.
///
/// Callers cannot build one; they can only carry a tag obtained from a
/// previous read or write back into [`EntityStore::update`].
///
/// [`EntityStore::update`]: super::EntityStore::update
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ETag(String);

impl ETag {
    pub(crate) fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ETag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The kind of an entity, which fixes the table it lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Customer,
    Product,
    Order,
    /// Any other entity type, identified by its type name.
    Custom(&'static str),
}

impl EntityKind {
    /// Resolve a type name to its kind.
    pub fn from_type_name(type_name: &'static str) -> Self {
        match type_name {
            "Customer" => EntityKind::Customer,
            "Product" => EntityKind::Product,
            "Order" => EntityKind::Order,
            other => EntityKind::Custom(other),
        }
    }

    /// Table the entities of this kind are stored in.
    ///
    /// The mapping is fixed; previously written data depends on it.
    pub fn table_name(&self) -> Cow<'static, str> {
        match self {
            EntityKind::Customer => Cow::Borrowed("Customers"),
            EntityKind::Product => Cow::Borrowed("Products"),
            EntityKind::Order => Cow::Borrowed("Orders"),
            EntityKind::Custom(type_name) => Cow::Owned(format!("{}s", type_name)),
        }
    }
}

/// Table name for an entity type name. Unknown types map to `"{TypeName}s"`.
pub fn table_name_for(type_name: &'static str) -> Cow<'static, str> {
    EntityKind::from_type_name(type_name).table_name()
}

/// A record stored in a partitioned table.
///
/// The version tag must be excluded from serialization
/// (`#[serde(skip)]`); the store fills it in from the backend.
pub trait TableEntity: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Kind of the entity, which decides its table.
    const KIND: EntityKind;

    fn partition_key(&self) -> &str;

    fn row_key(&self) -> &str;

    /// Version tag observed when this value was last read or written.
    fn etag(&self) -> Option<&ETag>;

    fn set_etag(&mut self, etag: Option<ETag>);
}

/// Check a partition or row key against the table service's key rules.
pub(crate) fn validate_key(kind: &'static str, value: &str) -> EntityResult<()> {
    let invalid = |reason: &str| EntityError::InvalidKey {
        key: kind,
        value: value.to_string(),
        reason: reason.to_string(),
    };

    if value.is_empty() {
        return Err(invalid("must not be empty"));
    }
    if value.chars().count() > MAX_KEY_LENGTH {
        return Err(invalid("must be at most 1024 characters long"));
    }
    if let Some(c) = value
        .chars()
        .find(|c| matches!(c, '/' | '\\' | '#' | '?') || c.is_control())
    {
        return Err(invalid(&format!("contains disallowed character {:?}", c)));
    }
    Ok(())
}
