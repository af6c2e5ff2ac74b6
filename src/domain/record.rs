//! Export result records
//!
//! One record per line of a response message from the trade-export API.

use super::ids::ItemId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Result reported by the external system for one item
///
/// Unknown literals are kept verbatim so they can be logged; the transition
/// function treats them as "no change".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResultStatus {
    /// Export accepted
    Successful,
    /// Export rejected
    Error,
    /// Any other literal
    Unrecognized(String),
}

impl ResultStatus {
    /// Literal as sent by the external system
    pub fn as_str(&self) -> &str {
        match self {
            ResultStatus::Successful => "Successful",
            ResultStatus::Error => "Error",
            ResultStatus::Unrecognized(value) => value,
        }
    }
}

impl From<&str> for ResultStatus {
    fn from(value: &str) -> Self {
        match value {
            "Successful" => ResultStatus::Successful,
            "Error" => ResultStatus::Error,
            other => ResultStatus::Unrecognized(other.to_string()),
        }
    }
}

impl From<String> for ResultStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Successful" => ResultStatus::Successful,
            "Error" => ResultStatus::Error,
            _ => ResultStatus::Unrecognized(value),
        }
    }
}

impl fmt::Display for ResultStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One parsed export result line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRecord {
    /// External catalog key
    pub item_id: ItemId,

    /// Reported outcome
    pub result_status: ResultStatus,

    /// Error text from the external system, if any
    pub error_message: Option<String>,
}

impl ExportRecord {
    /// Creates a record
    pub fn new(
        item_id: ItemId,
        result_status: impl Into<ResultStatus>,
        error_message: Option<String>,
    ) -> Self {
        Self {
            item_id,
            result_status: result_status.into(),
            error_message,
        }
    }
}
