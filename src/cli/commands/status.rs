//! Status command implementation
//!
//! This module implements the `status` command for reading the stored
//! lifecycle status of a single item.

use crate::adapters::create_status_store;
use crate::cli::commands::connect_exit_code;
use crate::config::load_config;
use crate::domain::{ItemId, LifecycleStatus, RegionId};
use clap::Args;

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Item to look up
    #[arg(long, value_name = "ID")]
    pub item_id: String,

    /// Region to look the item up in (defaults to the configured region)
    #[arg(long, value_name = "ID")]
    pub region: Option<String>,
}

impl StatusArgs {
    /// Execute the status command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(item_id = %self.item_id, "Reading item status");

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Failed to load configuration: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        let item_id = match ItemId::new(self.item_id.clone()) {
            Ok(id) => id,
            Err(e) => {
                eprintln!("Invalid item ID: {e}");
                return Ok(2);
            }
        };
        let region = self
            .region
            .clone()
            .unwrap_or_else(|| config.store.region_id.clone());
        let region_id = match RegionId::new(region) {
            Ok(id) => id,
            Err(e) => {
                eprintln!("Invalid region ID: {e}");
                return Ok(2);
            }
        };

        let store = match create_status_store(&config.store).await {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Failed to connect to the status store: {e}");
                return Ok(connect_exit_code(&e));
            }
        };

        let code = match store.get_status(&item_id, &region_id).await {
            Ok(code) => code,
            Err(e) => {
                tracing::error!(error = %e, item_id = %item_id, "Status lookup failed");
                eprintln!("Failed to read status: {e}");
                return Ok(5); // Fatal error exit code
            }
        };

        println!("{}", describe_status(&item_id, &region_id, code));
        Ok(0)
    }
}

fn describe_status(item_id: &ItemId, region_id: &RegionId, code: u8) -> String {
    let name = LifecycleStatus::from_code(code)
        .map(|status| status.to_string())
        .unwrap_or_else(|| "Unknown".to_string());
    format!("Item {item_id} in region {region_id}: {name} ({code})")
}
