//! PostgreSQL status store
//!
//! Reads and writes item lifecycle statuses through stored functions in the
//! catalogue database.

pub mod adapter;
pub mod client;

pub use adapter::PostgresStatusStore;
pub use client::PostgresClient;
