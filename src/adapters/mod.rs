//! External system integrations for the trade importer.
//!
//! - [`traits`] - The `MessageSource` and `StatusStore` capabilities the core depends on
//! - [`servicebus`] - Azure Service Bus response queue
//! - [`postgresql`] - PostgreSQL status store
//! - [`memory`] - In-memory queue and store for tests
//! - [`factory`] - Builds the configured adapters
//!
//! # Design Pattern
//!
//! Adapters isolate external dependencies behind traits so the drain loop
//! can be exercised against in-memory implementations:
//!
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use trade_importer::adapters::memory::{InMemoryQueue, InMemoryStatusStore};
//! use trade_importer::core::drain::DrainLoop;
//! use trade_importer::core::reconcile::StatusReconciler;
//! use trade_importer::domain::{ItemId, LifecycleStatus, RegionId};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let queue = Arc::new(InMemoryQueue::new());
//! let store = Arc::new(InMemoryStatusStore::new());
//! let region = RegionId::new("US")?;
//! store.insert(&ItemId::new("9780023381737")?, &region, LifecycleStatus::SentForUpdate);
//! queue.push(r#"{"Lines":[{"StyleNo":"9780023381737","Status":"Successful","Error":null}]}"#);
//!
//! let drain = DrainLoop::new(
//!     queue,
//!     StatusReconciler::new(store.clone(), region),
//!     Duration::from_secs(1),
//! );
//! let summary = drain.run().await?;
//! assert_eq!(summary.records_updated, 1);
//! # Ok(())
//! # }
//! ```

pub mod factory;
pub mod memory;
pub mod postgresql;
pub mod servicebus;
pub mod traits;

pub use factory::{create_message_source, create_status_store};
pub use traits::{AckToken, MessageSource, QueueMessage, StatusStore};
