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

use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;
use uuid::Uuid;

use crate::storage::{StorageError, StorageResult};

static RESOURCE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9][a-z0-9-]{1,61}[a-z0-9]$").unwrap());

/// Generate a collision-resistant object name for an uploaded file.
///
/// The name is a random v4 UUID followed by the original file's extension,
/// lowercased. Anything else from the original name is dropped.
pub fn unique_name(original_file_name: &str) -> String {
    let extension = Path::new(original_file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
        .unwrap_or_default();

    format!("{}{}", Uuid::new_v4(), extension)
}

/// Validate a container, queue or share name.
///
/// Names are 3-63 characters of lowercase letters, digits and hyphens,
/// start and end with a letter or digit, and never contain `--`.
pub fn validate_resource_name(name: &str) -> StorageResult<()> {
    let invalid = |reason: &str| StorageError::InvalidName {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    if !(3..=63).contains(&name.len()) {
        return Err(invalid("must be between 3 and 63 characters long"));
    }
    if name.contains("--") {
        return Err(invalid("must not contain consecutive hyphens"));
    }
    if !RESOURCE_NAME.is_match(name) {
        return Err(invalid(
            "must contain only lowercase letters, digits and hyphens, and start and end with a letter or digit",
        ));
    }
    Ok(())
}

/// Validate a blob, file or directory name.
///
/// Names are non-empty, at most 1024 characters, and contain neither path
/// separators nor control characters.
pub fn validate_object_name(name: &str) -> StorageResult<()> {
    let invalid = |reason: &str| StorageError::InvalidName {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    if name.is_empty() {
        return Err(invalid("must not be empty"));
    }
    if name.chars().count() > 1024 {
        return Err(invalid("must be at most 1024 characters long"));
    }
    if name == "." || name == ".." {
        return Err(invalid("must not be a relative path segment"));
    }
    if name.chars().any(|c| c == '/' || c == '\\' || c.is_control()) {
        return Err(invalid(
            "must not contain path separators or control characters",
        ));
    }
    Ok(())
}
