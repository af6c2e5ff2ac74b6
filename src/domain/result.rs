//! Result type alias for the importer
//!
//! This module provides a convenient Result type alias that uses ImporterError
//! as the error type.

use super::errors::ImporterError;

/// Result type alias for importer operations
///
/// This is a convenience type alias that uses `ImporterError` as the error type.
/// Use this throughout the codebase for fallible operations.
///
/// # Examples
///
/// ```
/// use trade_importer::domain::result::Result;
/// use trade_importer::domain::errors::ImporterError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(ImporterError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, ImporterError>;
