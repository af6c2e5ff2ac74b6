//! CLI command implementations
//!
//! This module contains all CLI command implementations.

pub mod init;
pub mod run;
pub mod status;
pub mod validate;

use crate::domain::ImporterError;

/// Exit code for an error raised while connecting
///
/// Configuration problems found while building a client exit with 2,
/// everything else with 4.
pub(crate) fn connect_exit_code(error: &ImporterError) -> i32 {
    match error {
        ImporterError::Configuration(_) | ImporterError::Validation(_) => 2,
        _ => 4,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{QueueError, StoreError};

    #[test]
    fn test_connect_exit_code() {
        assert_eq!(
            connect_exit_code(&ImporterError::Configuration("bad".to_string())),
            2
        );
        assert_eq!(
            connect_exit_code(&ImporterError::Connection("refused".to_string())),
            4
        );
        assert_eq!(
            connect_exit_code(&QueueError::AuthenticationFailed("401".to_string()).into()),
            4
        );
        assert_eq!(
            connect_exit_code(&StoreError::ConnectionFailed("timeout".to_string()).into()),
            4
        );
    }
}
