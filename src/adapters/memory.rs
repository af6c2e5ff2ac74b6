//! In-memory queue and status store
//!
//! Both adapters record what the core did to them (acknowledged tokens,
//! status writes) and can be told to fail, which is what the drain and
//! reconciliation tests assert against.

use crate::adapters::traits::{AckToken, MessageSource, QueueMessage, StatusStore};
use crate::domain::{
    ImporterError, ItemId, LifecycleStatus, QueueError, RegionId, Result, StoreError,
};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

/// A write observed by [`InMemoryStatusStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusWrite {
    pub item_id: ItemId,
    pub region_id: RegionId,
    pub status: LifecycleStatus,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone)]
struct StoredStatus {
    code: u8,
    error_message: Option<String>,
}

/// Status store backed by a `HashMap`
#[derive(Debug, Default)]
pub struct InMemoryStatusStore {
    rows: Mutex<HashMap<(ItemId, RegionId), StoredStatus>>,
    writes: Mutex<Vec<StatusWrite>>,
    reads: Mutex<usize>,
    failing_reads: Mutex<HashSet<ItemId>>,
    failing_writes: Mutex<HashSet<ItemId>>,
    phantom_writes: Mutex<HashSet<ItemId>>,
}

impl InMemoryStatusStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a status row
    pub fn insert(&self, item_id: &ItemId, region_id: &RegionId, status: LifecycleStatus) {
        self.insert_code(item_id, region_id, status.code());
    }

    /// Seeds a raw code, including codes that are not valid statuses
    pub fn insert_code(&self, item_id: &ItemId, region_id: &RegionId, code: u8) {
        lock(&self.rows).insert(
            (item_id.clone(), region_id.clone()),
            StoredStatus {
                code,
                error_message: None,
            },
        );
    }

    /// Makes every read of `item_id` fail
    pub fn fail_reads_for(&self, item_id: &ItemId) {
        lock(&self.failing_reads).insert(item_id.clone());
    }

    /// Makes every write of `item_id` fail
    pub fn fail_writes_for(&self, item_id: &ItemId) {
        lock(&self.failing_writes).insert(item_id.clone());
    }

    /// Makes writes of `item_id` report zero affected rows
    pub fn affect_no_rows_for(&self, item_id: &ItemId) {
        lock(&self.phantom_writes).insert(item_id.clone());
    }

    /// Current status of a row, if any
    pub fn status_of(&self, item_id: &ItemId, region_id: &RegionId) -> Option<LifecycleStatus> {
        lock(&self.rows)
            .get(&(item_id.clone(), region_id.clone()))
            .and_then(|row| LifecycleStatus::from_code(row.code))
    }

    /// Stored error message of a row, if any
    pub fn error_message_of(&self, item_id: &ItemId, region_id: &RegionId) -> Option<String> {
        lock(&self.rows)
            .get(&(item_id.clone(), region_id.clone()))
            .and_then(|row| row.error_message.clone())
    }

    /// Every successful write in order
    pub fn writes(&self) -> Vec<StatusWrite> {
        lock(&self.writes).clone()
    }

    /// Number of status reads served
    pub fn read_count(&self) -> usize {
        *lock(&self.reads)
    }
}

#[async_trait]
impl StatusStore for InMemoryStatusStore {
    async fn get_status(
        &self,
        item_id: &ItemId,
        region_id: &RegionId,
    ) -> std::result::Result<u8, StoreError> {
        *lock(&self.reads) += 1;

        if lock(&self.failing_reads).contains(item_id) {
            return Err(StoreError::QueryFailed(format!(
                "simulated read failure for {item_id}"
            )));
        }

        lock(&self.rows)
            .get(&(item_id.clone(), region_id.clone()))
            .map(|row| row.code)
            .ok_or_else(|| StoreError::ItemNotFound {
                item_id: item_id.to_string(),
                region_id: region_id.to_string(),
            })
    }

    async fn set_status(
        &self,
        item_id: &ItemId,
        region_id: &RegionId,
        status: LifecycleStatus,
        error_message: Option<&str>,
    ) -> std::result::Result<u64, StoreError> {
        if lock(&self.failing_writes).contains(item_id) {
            return Err(StoreError::UpdateFailed(format!(
                "simulated write failure for {item_id}"
            )));
        }
        if lock(&self.phantom_writes).contains(item_id) {
            return Ok(0);
        }

        let mut rows = lock(&self.rows);
        let Some(row) = rows.get_mut(&(item_id.clone(), region_id.clone())) else {
            return Ok(0);
        };
        row.code = status.code();
        row.error_message = error_message.map(str::to_string);

        lock(&self.writes).push(StatusWrite {
            item_id: item_id.clone(),
            region_id: region_id.clone(),
            status,
            error_message: error_message.map(str::to_string),
        });
        Ok(1)
    }
}

/// Queue backed by a `VecDeque`
///
/// `receive` returns immediately; an empty queue behaves like a receive
/// timeout.
#[derive(Debug, Default)]
pub struct InMemoryQueue {
    pending: Mutex<VecDeque<QueueMessage>>,
    acknowledged: Mutex<Vec<AckToken>>,
    failing_acks: Mutex<HashSet<AckToken>>,
    fail_receive: Mutex<bool>,
    closed: Mutex<bool>,
    next_id: Mutex<u64>,
}

impl InMemoryQueue {
    /// Creates an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueues a body and returns the token it will be acknowledged with
    pub fn push(&self, body: impl Into<Vec<u8>>) -> AckToken {
        let mut next_id = lock(&self.next_id);
        *next_id += 1;
        let token = AckToken::new(format!("lock-{}", *next_id));

        let mut message = QueueMessage::new(body, token.clone());
        message.message_id = Some(format!("message-{}", *next_id));
        message.delivery_count = Some(1);
        lock(&self.pending).push_back(message);
        token
    }

    /// Makes acknowledging `token` fail
    pub fn fail_ack_for(&self, token: &AckToken) {
        lock(&self.failing_acks).insert(token.clone());
    }

    /// Makes the next receive fail
    pub fn fail_next_receive(&self) {
        *lock(&self.fail_receive) = true;
    }

    /// Tokens acknowledged so far, in order
    pub fn acknowledged(&self) -> Vec<AckToken> {
        lock(&self.acknowledged).clone()
    }

    /// Messages still waiting to be received
    pub fn pending_count(&self) -> usize {
        lock(&self.pending).len()
    }

    /// Whether `close` was called
    pub fn is_closed(&self) -> bool {
        *lock(&self.closed)
    }
}

#[async_trait]
impl MessageSource for InMemoryQueue {
    async fn receive(&self, _timeout: Duration) -> Result<Option<QueueMessage>> {
        {
            let mut fail = lock(&self.fail_receive);
            if *fail {
                *fail = false;
                return Err(ImporterError::Queue(QueueError::ReceiveFailed(
                    "simulated receive failure".to_string(),
                )));
            }
        }
        Ok(lock(&self.pending).pop_front())
    }

    async fn acknowledge(&self, token: &AckToken) -> Result<()> {
        if lock(&self.failing_acks).contains(token) {
            return Err(ImporterError::Queue(QueueError::AcknowledgeFailed(
                "simulated acknowledge failure".to_string(),
            )));
        }
        lock(&self.acknowledged).push(token.clone());
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        *lock(&self.closed) = true;
        Ok(())
    }

    fn describe(&self) -> String {
        "in-memory queue".to_string()
    }
}

// A poisoned lock only means another test thread panicked mid-update.
fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
