//! Core business logic for the trade importer.
//!
//! # Modules
//!
//! - [`parser`] - Parses response message bodies into export records
//! - [`transition`] - Lifecycle status transition policy
//! - [`reconcile`] - Applies one record to the status store
//! - [`drain`] - Drain loop and run summary
//!
//! # Drain Workflow
//!
//! 1. **Receive**: Wait up to the receive timeout for the next message
//! 2. **Parse**: Turn the body into export records (unparsable bodies are discarded)
//! 3. **Reconcile**: Read, transition and write each record's status
//! 4. **Acknowledge**: Remove the message from the queue
//! 5. **Report**: Log the drain summary once a receive comes back empty
//!
//! # Example
//!
//! ```rust,no_run
//! use trade_importer::adapters::{create_message_source, create_status_store};
//! use trade_importer::config::load_config;
//! use trade_importer::core::drain::DrainLoop;
//! use trade_importer::core::reconcile::StatusReconciler;
//! use trade_importer::domain::RegionId;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("trade-importer.toml")?;
//!
//! let source = create_message_source(&config.queue).await?;
//! let store = create_status_store(&config.store).await?;
//! let region = RegionId::new(config.store.region_id.clone())?;
//!
//! let drain = DrainLoop::new(
//!     source,
//!     StatusReconciler::new(store, region),
//!     config.queue.receive_timeout(),
//! );
//! let summary = drain.run().await?;
//!
//! println!("Messages: {}", summary.messages_received);
//! println!("Updated: {}", summary.records_updated);
//! # Ok(())
//! # }
//! ```

pub mod drain;
pub mod parser;
pub mod reconcile;
pub mod transition;
