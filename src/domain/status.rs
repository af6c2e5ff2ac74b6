//! Lifecycle status of an exported item
//!
//! The store persists one of these codes per item and region. The numeric
//! codes are part of the store contract and must not be renumbered.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Persisted stage of an item's export lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum LifecycleStatus {
    /// Newly added item
    NewItem = 0,
    /// Ready to be sent for creation
    ReadyForCreation = 1,
    /// Sent for creation, awaiting the export result
    SentForCreation = 2,
    /// Creation was reported as failed
    FailedToCreate = 3,
    /// Export reported as successful
    ExportSuccessful = 4,
    /// Ready to be sent for update
    ReadyForUpdate = 5,
    /// Sent for update, awaiting the export result
    SentForUpdate = 6,
    /// Update was reported as failed
    FailedToUpdate = 7,
}

impl LifecycleStatus {
    /// Every status in code order
    pub const ALL: [LifecycleStatus; 8] = [
        LifecycleStatus::NewItem,
        LifecycleStatus::ReadyForCreation,
        LifecycleStatus::SentForCreation,
        LifecycleStatus::FailedToCreate,
        LifecycleStatus::ExportSuccessful,
        LifecycleStatus::ReadyForUpdate,
        LifecycleStatus::SentForUpdate,
        LifecycleStatus::FailedToUpdate,
    ];

    /// Numeric code as stored
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Looks up a status by its stored code
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(usize::from(code)).copied()
    }

    /// Whether the item is waiting for an export result
    pub fn is_awaiting_result(self) -> bool {
        matches!(
            self,
            LifecycleStatus::SentForCreation | LifecycleStatus::SentForUpdate
        )
    }

    /// Status name as used in logs
    pub fn as_str(self) -> &'static str {
        match self {
            LifecycleStatus::NewItem => "NewItem",
            LifecycleStatus::ReadyForCreation => "ReadyForCreation",
            LifecycleStatus::SentForCreation => "SentForCreation",
            LifecycleStatus::FailedToCreate => "FailedToCreate",
            LifecycleStatus::ExportSuccessful => "ExportSuccessful",
            LifecycleStatus::ReadyForUpdate => "ReadyForUpdate",
            LifecycleStatus::SentForUpdate => "SentForUpdate",
            LifecycleStatus::FailedToUpdate => "FailedToUpdate",
        }
    }
}

impl TryFrom<u8> for LifecycleStatus {
    type Error = u8;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::from_code(code).ok_or(code)
    }
}

impl From<LifecycleStatus> for u8 {
    fn from(status: LifecycleStatus) -> Self {
        status.code()
    }
}

impl fmt::Display for LifecycleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
