//! Run command implementation
//!
//! This module implements the `run` command: connect to the response queue
//! and the status store, drain the queue once and report what happened.

use crate::adapters::{create_message_source, create_status_store};
use crate::cli::commands::connect_exit_code;
use crate::config::{load_config, ImporterConfig};
use crate::core::drain::{DrainLoop, DrainSummary};
use crate::core::reconcile::StatusReconciler;
use crate::domain::RegionId;
use clap::Args;

/// Failures listed in the printed summary before truncating
const MAX_LISTED_FAILURES: usize = 10;

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Seconds to wait for a message before the queue counts as drained
    #[arg(long, value_name = "SECS")]
    pub receive_timeout: Option<u64>,

    /// Region the status updates are applied to
    #[arg(long, value_name = "ID")]
    pub region: Option<String>,
}

impl RunArgs {
    /// Execute the run command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Starting trade importer run");

        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Configuration error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        if let Err(e) = self.apply_overrides(&mut config) {
            tracing::error!(error = %e, "Invalid command line override");
            eprintln!("Configuration error: {e}");
            return Ok(2);
        }

        let region_id = match RegionId::new(config.store.region_id.clone()) {
            Ok(r) => r,
            Err(e) => {
                eprintln!("Configuration error: {e}");
                return Ok(2);
            }
        };

        let source = match create_message_source(&config.queue).await {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, "Failed to connect to the response queue");
                eprintln!("Failed to connect to the response queue: {e}");
                return Ok(connect_exit_code(&e));
            }
        };

        let store = match create_status_store(&config.store).await {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, "Failed to connect to the status store");
                eprintln!("Failed to connect to the status store: {e}");
                if let Err(close_error) = source.close().await {
                    tracing::warn!(error = %close_error, "Failed to close message source");
                }
                return Ok(connect_exit_code(&e));
            }
        };

        let drain = DrainLoop::new(
            source,
            StatusReconciler::new(store, region_id),
            config.queue.receive_timeout(),
        );

        let summary = match drain.run().await {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, "Drain failed");
                eprintln!("Drain failed: {e}");
                return Ok(5); // Fatal error exit code
            }
        };

        print_summary(&summary);
        Ok(0)
    }

    /// Applies the command line overrides and re-validates
    fn apply_overrides(&self, config: &mut ImporterConfig) -> Result<(), String> {
        if let Some(seconds) = self.receive_timeout {
            config.queue.receive_timeout_seconds = seconds;
        }
        if let Some(region) = &self.region {
            config.store.region_id = region.clone();
        }
        config.validate()
    }
}

fn print_summary(summary: &DrainSummary) {
    println!();
    println!("📊 Drain Summary:");
    println!("  Messages Received: {}", summary.messages_received);
    println!("  Messages Acknowledged: {}", summary.messages_acknowledged);
    println!("  Poison Messages: {}", summary.poison_messages);
    println!("  Acknowledgement Failures: {}", summary.ack_failures);
    println!("  Records Processed: {}", summary.records_processed);
    println!("  Updated: {}", summary.records_updated);
    println!("  Unchanged: {}", summary.records_unchanged);
    println!("  Not Updated: {}", summary.records_not_updated);
    println!("  Failed: {}", summary.records_failed);
    println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
    println!();

    if !summary.failures.is_empty() {
        println!("⚠️  Record failures:");
        for failure in summary.failures.iter().take(MAX_LISTED_FAILURES) {
            println!("  - {}: {}", failure.item_id, failure.message);
        }
        if summary.failures.len() > MAX_LISTED_FAILURES {
            println!(
                "  ... and {} more failures",
                summary.failures.len() - MAX_LISTED_FAILURES
            );
        }
        println!();
    }

    if summary.is_clean() {
        println!("✅ Queue drained");
    } else {
        println!("⚠️  Queue drained with problems, see the log for details");
    }
}
