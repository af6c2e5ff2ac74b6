//! Domain models and types for the importer.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`ItemId`], [`RegionId`])
//! - **Domain models** ([`ExportRecord`], [`ResultStatus`], [`LifecycleStatus`])
//! - **Error types** ([`ImporterError`], [`QueueError`], [`StoreError`], [`ParseError`])
//! - **Result type alias** ([`Result`])
//!
//! # Type Safety
//!
//! Item and region keys are distinct newtypes, so a lookup cannot swap them:
//!
//! ```rust
//! use trade_importer::domain::{ItemId, RegionId};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let item_id = ItemId::new("9780023381737")?;
//! let region_id = RegionId::new("US")?;
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, ImporterError>`]:
//!
//! ```rust,no_run
//! use trade_importer::domain::Result;
//!
//! fn example() -> Result<()> {
//!     let config = trade_importer::config::load_config("trade-importer.toml")?;
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod ids;
pub mod record;
pub mod result;
pub mod status;

// Re-export commonly used types for convenience
pub use errors::{ImporterError, ParseError, QueueError, StoreError};
pub use ids::{ItemId, RegionId};
pub use record::{ExportRecord, ResultStatus};
pub use result::Result;
pub use status::LifecycleStatus;
