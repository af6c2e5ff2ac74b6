//! Configuration management for the trade importer.
//!
//! # Overview
//!
//! The importer reads one TOML file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `TRADE_IMPORTER_<SECTION>_<KEY>` environment overrides
//! - Default values for optional settings
//! - Validation of every section on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use trade_importer::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("trade-importer.toml")?;
//!
//! println!("Queue: {}/{}", config.queue.endpoint, config.queue.queue_name);
//! println!("Region: {}", config.store.region_id);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level
//! - [`QueueConfig`] - Response queue endpoint, receive timeout and credentials
//! - [`StoreConfig`] - Status store connection, region and procedure names
//! - [`LoggingConfig`] - Local log files
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [queue]
//! endpoint = "https://trade.servicebus.windows.net"
//! queue_name = "trade-export-responses"
//! receive_timeout_seconds = 30
//! auth_type = "azure_ad"
//! tenant_id = "${AZURE_TENANT_ID}"
//! client_id = "${AZURE_CLIENT_ID}"
//! client_secret = "${AZURE_CLIENT_SECRET}"
//!
//! [store]
//! connection_string = "${TRADE_IMPORTER_DB_URL}"
//! region_id = "US"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, load_config_from_str};
pub use schema::{
    ApplicationConfig, ImporterConfig, LoggingConfig, QueueAuthType, QueueConfig, StoreConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
