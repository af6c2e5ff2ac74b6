//! Domain error types
//!
//! This module defines the error hierarchy for the importer.
//! All errors are domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main importer error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum ImporterError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A queue or store connection could not be established
    #[error("Connection error: {0}")]
    Connection(String),

    /// Message queue errors
    #[error("Queue error: {0}")]
    Queue(#[from] QueueError),

    /// Status store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Message body could not be parsed
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Message queue errors
///
/// Errors that occur when talking to the queue transport.
/// These errors don't expose third-party HTTP client types.
#[derive(Debug, Error)]
pub enum QueueError {
    /// Failed to reach the queue endpoint
    #[error("Failed to connect to queue: {0}")]
    ConnectionFailed(String),

    /// Credential could not produce a token
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Receive request failed
    #[error("Receive failed: {0}")]
    ReceiveFailed(String),

    /// Completing a locked message failed
    #[error("Acknowledge failed: {0}")]
    AcknowledgeFailed(String),

    /// The transport answered with something we cannot interpret
    #[error("Invalid response from queue: {0}")]
    InvalidResponse(String),

    /// Request timeout
    #[error("Request timeout: {0}")]
    Timeout(String),
}

/// Status store errors
///
/// Errors that occur when reading or writing lifecycle statuses.
/// These errors don't expose database driver types.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to connect to the database
    #[error("Failed to connect to store: {0}")]
    ConnectionFailed(String),

    /// Status lookup failed
    #[error("Status query failed: {0}")]
    QueryFailed(String),

    /// Status update failed
    #[error("Status update failed: {0}")]
    UpdateFailed(String),

    /// The store has no status for the item
    #[error("No status stored for item {item_id} in region {region_id}")]
    ItemNotFound { item_id: String, region_id: String },

    /// The stored code is not a known lifecycle status
    #[error("Invalid lifecycle status code {code} stored for item {item_id}")]
    InvalidStatusCode { item_id: String, code: i64 },
}

/// Message body parse errors
///
/// Any of these fails the whole message; no partial result is produced.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Body is not UTF-8
    #[error("Message body is not valid UTF-8: {0}")]
    InvalidUtf8(String),

    /// Body is not JSON
    #[error("Message body is not valid JSON: {0}")]
    InvalidJson(String),

    /// Top-level JSON value is not an object
    #[error("Message body is not a JSON object")]
    NotAnObject,

    /// `Lines` is present but not an array
    #[error("\"Lines\" is not an array")]
    LinesNotArray,

    /// A line is not an object
    #[error("Line {index} is not a JSON object")]
    LineNotObject { index: usize },

    /// A required field is missing or null
    #[error("Missing required field \"{field}\"{}", line_suffix(.index))]
    MissingField {
        index: Option<usize>,
        field: &'static str,
    },

    /// A field holds an object or array where a scalar was expected
    #[error("Field \"{field}\" on line {index} is not a scalar value")]
    InvalidField { index: usize, field: &'static str },

    /// `StyleNo` is blank
    #[error("Line {index} has an empty item identifier")]
    EmptyItemId { index: usize },
}

fn line_suffix(index: &Option<usize>) -> String {
    match index {
        Some(index) => format!(" on line {index}"),
        None => String::new(),
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for ImporterError {
    fn from(err: std::io::Error) -> Self {
        ImporterError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for ImporterError {
    fn from(err: serde_json::Error) -> Self {
        ImporterError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for ImporterError {
    fn from(err: toml::de::Error) -> Self {
        ImporterError::Configuration(format!("TOML parse error: {err}"))
    }
}

impl ImporterError {
    /// Whether the error happened while establishing a queue or store connection
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            ImporterError::Connection(_)
                | ImporterError::Queue(QueueError::ConnectionFailed(_))
                | ImporterError::Queue(QueueError::AuthenticationFailed(_))
                | ImporterError::Store(StoreError::ConnectionFailed(_))
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_importer_error_display() {
        let err = ImporterError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_queue_error_conversion() {
        let queue_err = QueueError::ReceiveFailed("503".to_string());
        let err: ImporterError = queue_err.into();
        assert!(matches!(err, ImporterError::Queue(_)));
    }

    #[test]
    fn test_store_error_conversion() {
        let store_err = StoreError::QueryFailed("timeout".to_string());
        let err: ImporterError = store_err.into();
        assert!(matches!(err, ImporterError::Store(_)));
    }

    #[test]
    fn test_parse_error_messages() {
        let err = ParseError::MissingField {
            index: None,
            field: "Lines",
        };
        assert_eq!(err.to_string(), "Missing required field \"Lines\"");

        let err = ParseError::MissingField {
            index: Some(3),
            field: "StyleNo",
        };
        assert_eq!(err.to_string(), "Missing required field \"StyleNo\" on line 3");
    }

    #[test]
    fn test_item_not_found_message() {
        let err = StoreError::ItemNotFound {
            item_id: "9780023381737".to_string(),
            region_id: "US".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "No status stored for item 9780023381737 in region US"
        );
    }

    #[test]
    fn test_is_connection_error() {
        assert!(ImporterError::Connection("down".to_string()).is_connection_error());
        assert!(
            ImporterError::Store(StoreError::ConnectionFailed("refused".to_string()))
                .is_connection_error()
        );
        assert!(
            ImporterError::Queue(QueueError::AuthenticationFailed("401".to_string()))
                .is_connection_error()
        );
        assert!(!ImporterError::Queue(QueueError::ReceiveFailed("500".to_string()))
            .is_connection_error());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: ImporterError = io_err.into();
        assert!(matches!(err, ImporterError::Io(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: ImporterError = toml_err.into();
        assert!(matches!(err, ImporterError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_importer_error_implements_std_error() {
        let err = ImporterError::Validation("Test error".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
