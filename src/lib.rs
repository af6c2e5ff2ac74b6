//! # Trade Importer
//!
//! Applies trade export API results to item lifecycle statuses.
//!
//! ## Overview
//!
//! Each export response on the queue lists items the trade API accepted or
//! rejected. The importer:
//! - **Drains** the response queue until a receive times out empty
//! - **Parses** every message into export records
//! - **Reconciles** each record against the stored lifecycle status
//! - **Acknowledges** every message once its records are handled
//!
//! Only items that are awaiting a result move, so redelivered messages
//! write nothing the second time.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Parsing, the transition policy, reconciliation and the drain loop
//! - [`adapters`] - Azure Service Bus queue, PostgreSQL store and in-memory doubles
//! - [`domain`] - Identifiers, statuses, export records and error types
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use trade_importer::adapters::{create_message_source, create_status_store};
//! use trade_importer::config::load_config;
//! use trade_importer::core::drain::DrainLoop;
//! use trade_importer::core::reconcile::StatusReconciler;
//! use trade_importer::domain::RegionId;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("trade-importer.toml")?;
//!
//!     let source = create_message_source(&config.queue).await?;
//!     let store = create_status_store(&config.store).await?;
//!     let region_id = RegionId::new(config.store.region_id.clone())?;
//!
//!     let drain = DrainLoop::new(
//!         source,
//!         StatusReconciler::new(store, region_id),
//!         config.queue.receive_timeout(),
//!     );
//!     let summary = drain.run().await?;
//!
//!     println!("Updated {} item(s)", summary.records_updated);
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Library code returns [`domain::ImporterError`]; the binary maps errors to
//! exit codes (2 configuration, 4 connection, 5 fatal).

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
