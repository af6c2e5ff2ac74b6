//! Capability traits for the queue and the status store
//!
//! The drain loop and reconciler only see these traits, so the Service Bus
//! and PostgreSQL adapters can be swapped for in-memory ones in tests.

use crate::domain::{ItemId, LifecycleStatus, RegionId, Result, StoreError};
use async_trait::async_trait;
use std::fmt;
use std::time::Duration;

/// Opaque handle used to acknowledge a received message
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct AckToken(String);

impl AckToken {
    /// Wraps a transport-specific token
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the raw token for the transport that issued it
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Lock tokens are bearer-like; keep them out of logs.
impl fmt::Debug for AckToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AckToken(..)")
    }
}

/// One message received from the queue
#[derive(Debug, Clone)]
pub struct QueueMessage {
    /// Raw message body
    pub body: Vec<u8>,

    /// Token to pass back to [`MessageSource::acknowledge`]
    pub ack_token: AckToken,

    /// Transport message ID, if the transport has one
    pub message_id: Option<String>,

    /// How many times the transport has delivered this message
    pub delivery_count: Option<u32>,
}

impl QueueMessage {
    /// Creates a message with only a body and a token
    pub fn new(body: impl Into<Vec<u8>>, ack_token: AckToken) -> Self {
        Self {
            body: body.into(),
            ack_token,
            message_id: None,
            delivery_count: None,
        }
    }
}

/// Source of response messages
#[async_trait]
pub trait MessageSource: Send + Sync {
    /// Waits up to `timeout` for the next message
    ///
    /// Returns `Ok(None)` when nothing arrived in time.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport fails.
    async fn receive(&self, timeout: Duration) -> Result<Option<QueueMessage>>;

    /// Removes a received message from the queue
    ///
    /// # Errors
    ///
    /// Returns an error if the transport rejects the token.
    async fn acknowledge(&self, token: &AckToken) -> Result<()>;

    /// Releases transport resources at the end of a run
    async fn close(&self) -> Result<()> {
        Ok(())
    }

    /// Short description for logs
    fn describe(&self) -> String;
}

/// Store of per-item lifecycle statuses
///
/// Store methods return [`StoreError`] directly so the reconciler can
/// isolate failures per record.
#[async_trait]
pub trait StatusStore: Send + Sync {
    /// Reads the raw stored status code
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ItemNotFound`] when nothing is stored for the
    /// key, or another [`StoreError`] if the read fails.
    async fn get_status(
        &self,
        item_id: &ItemId,
        region_id: &RegionId,
    ) -> std::result::Result<u8, StoreError>;

    /// Writes a new status and sets or clears the stored error message
    ///
    /// Returns the number of rows affected.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the write fails.
    async fn set_status(
        &self,
        item_id: &ItemId,
        region_id: &RegionId,
        status: LifecycleStatus,
        error_message: Option<&str>,
    ) -> std::result::Result<u64, StoreError>;

    /// Reads and decodes the stored status
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidStatusCode`] if the stored code is not a
    /// known lifecycle status.
    async fn current_status(
        &self,
        item_id: &ItemId,
        region_id: &RegionId,
    ) -> std::result::Result<LifecycleStatus, StoreError> {
        let code = self.get_status(item_id, region_id).await?;
        LifecycleStatus::from_code(code).ok_or_else(|| StoreError::InvalidStatusCode {
            item_id: item_id.to_string(),
            code: i64::from(code),
        })
    }
}
