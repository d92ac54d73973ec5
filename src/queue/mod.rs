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

//! Message queues with at-least-once delivery
//!
//! Messages are text. [`MessageQueue::receive`] hands out the oldest message
//! without removing it; the consumer removes it with
//! [`MessageQueue::acknowledge`] once it has been processed. A message that
//! is never acknowledged will be received again.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Formatter};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::storage::provider::join_path;
use crate::storage::{StorageError, StorageProvider, StorageResult, WriteCondition};
use crate::util::naming::validate_resource_name;

const QUEUES_PREFIX: &str = "queues";
const META_PREFIX: &str = "_meta";

static LAST_SEQUENCE: AtomicI64 = AtomicI64::new(0);

/// Microsecond timestamp, strictly increasing within this process.
fn next_sequence(now: DateTime<Utc>) -> i64 {
    let now = now.timestamp_micros();
    let mut last = LAST_SEQUENCE.load(Ordering::Relaxed);
    loop {
        let next = now.max(last + 1);
        match LAST_SEQUENCE.compare_exchange_weak(last, next, Ordering::Relaxed, Ordering::Relaxed) {
            Ok(_) => return next,
            Err(current) => last = current,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredMessage {
    id: String,
    body: String,
    inserted_on: DateTime<Utc>,
}

/// Proof of receipt, needed to acknowledge a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopReceipt(String);

/// A message handed out by [`MessageQueue::receive`].
#[derive(Debug, Clone)]
pub struct QueueMessage {
    pub id: String,
    pub body: String,
    pub inserted_on: DateTime<Utc>,
    pub receipt: PopReceipt,
}

/// Handle to one message queue.
pub struct MessageQueue {
    provider: Arc<dyn StorageProvider>,
    name: String,
}

impl MessageQueue {
    /// Create the queue if it does not exist and return a handle to it.
    pub async fn create_if_absent(
        provider: Arc<dyn StorageProvider>,
        name: &str,
    ) -> StorageResult<Self> {
        validate_resource_name(name)?;

        let marker = join_path([META_PREFIX, QUEUES_PREFIX, name]);
        match provider
            .put_object(&marker, Bytes::new(), WriteCondition::CreateNew)
            .await
        {
            Ok(_) => info!("Created queue={}", name),
            Err(StorageError::AlreadyExists { .. }) => debug!("Queue={} already exists", name),
            Err(e) => return Err(e),
        }

        Ok(Self {
            provider,
            name: name.to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn queue_prefix(&self) -> String {
        join_path([QUEUES_PREFIX, self.name.as_str()])
    }

    /// Append a message and return its id.
    pub async fn enqueue(&self, body: impl Into<String>) -> StorageResult<String> {
        let inserted_on = Utc::now();
        let id = Uuid::new_v4().to_string();
        // Zero-padded so lexical order of names is insertion order.
        let entry = format!("{:020}-{}", next_sequence(inserted_on), id);
        let message = StoredMessage {
            id: id.clone(),
            body: body.into(),
            inserted_on,
        };

        let path = join_path([QUEUES_PREFIX, self.name.as_str(), entry.as_str()]);
        self.provider
            .put_object(
                &path,
                Bytes::from(serde_json::to_vec(&message)?),
                WriteCondition::CreateNew,
            )
            .await?;
        debug!("Enqueued message queue={}, id={}", self.name, id);
        Ok(id)
    }

    /// Hand out the oldest message without removing it.
    ///
    /// Returns `None` when the queue is empty.
    ///
    /// Not every backend lists in key order, so each call lists and sorts
    /// the names of all stored messages before reading the oldest one. The
    /// cost grows with queue depth; keep queues drained.
    pub async fn receive(&self) -> StorageResult<Option<QueueMessage>> {
        let mut paths: Vec<String> = self
            .provider
            .list_objects(&self.queue_prefix())
            .map_ok(|meta| meta.path)
            .try_collect()
            .await?;
        paths.sort();

        for path in paths {
            let stored = match self.provider.read_object(&path).await {
                Ok(stored) => stored,
                // Acknowledged by another consumer since the listing.
                Err(StorageError::NotFound { .. }) => continue,
                Err(e) => return Err(e),
            };
            let message: StoredMessage = serde_json::from_slice(&stored.bytes)?;
            debug!("Received message queue={}, id={}", self.name, message.id);
            return Ok(Some(QueueMessage {
                id: message.id,
                body: message.body,
                inserted_on: message.inserted_on,
                receipt: PopReceipt(path),
            }));
        }

        Ok(None)
    }

    /// Remove a received message. Acknowledging twice succeeds.
    pub async fn acknowledge(&self, message: &QueueMessage) -> StorageResult<()> {
        self.provider.delete_object(&message.receipt.0).await?;
        debug!("Acknowledged message queue={}, id={}", self.name, message.id);
        Ok(())
    }

    /// Receive the oldest message and acknowledge it straight away.
    pub async fn dequeue(&self) -> StorageResult<Option<QueueMessage>> {
        let Some(message) = self.receive().await? else {
            return Ok(None);
        };
        self.acknowledge(&message).await?;
        Ok(Some(message))
    }

    /// Number of messages currently stored.
    pub async fn approximate_len(&self) -> StorageResult<usize> {
        self.provider
            .list_objects(&self.queue_prefix())
            .try_fold(0, |count, _| async move { Ok(count + 1) })
            .await
    }
}

impl Debug for MessageQueue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "MessageQueue(name={})", self.name)
    }
}
