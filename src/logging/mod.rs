//! Logging and observability
//!
//! Structured logging through `tracing` with:
//! - Human-readable console output
//! - JSON log files with daily or hourly rotation
//! - `RUST_LOG` overrides of the configured level
//!
//! # Example
//!
//! ```no_run
//! use trade_importer::logging::init_logging;
//! use trade_importer::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Importer started");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, LoggingGuard};

/// Log a lifecycle status change of one item
///
/// # Example
///
/// ```no_run
/// use trade_importer::log_status_transition;
/// use trade_importer::domain::{ItemId, LifecycleStatus};
///
/// let item_id = ItemId::new("9780023381737").unwrap();
/// log_status_transition!(&item_id, LifecycleStatus::SentForCreation, LifecycleStatus::ExportSuccessful);
/// ```
#[macro_export]
macro_rules! log_status_transition {
    ($item_id:expr, $from:expr, $to:expr) => {
        tracing::debug!(
            item_id = %$item_id,
            from = %$from,
            to = %$to,
            "Updated status to {} for item {}",
            $to,
            $item_id
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use trade_importer::log_error_with_context;
/// use trade_importer::domain::ImporterError;
///
/// let error = ImporterError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}

#[cfg(test)]
mod tests {
    use crate::domain::{ImporterError, ItemId, LifecycleStatus};

    #[test]
    fn test_macros_expand_without_subscriber() {
        let item_id = ItemId::new("9780023381737").unwrap();
        log_status_transition!(
            &item_id,
            LifecycleStatus::SentForUpdate,
            LifecycleStatus::FailedToUpdate
        );

        let error = ImporterError::Other("boom".to_string());
        log_error_with_context!(&error, "while testing");
    }
}
