//! Queue draining
//!
//! This module contains the drain loop and its summary report.

pub mod coordinator;
pub mod summary;

pub use coordinator::DrainLoop;
pub use summary::{DrainSummary, RecordFailure};
