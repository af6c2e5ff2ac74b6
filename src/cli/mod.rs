//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for the importer using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Trade importer - applies trade export results to item statuses
#[derive(Parser, Debug)]
#[command(name = "trade-importer")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(
        short,
        long,
        default_value = "trade-importer.toml",
        env = "TRADE_IMPORTER_CONFIG"
    )]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "TRADE_IMPORTER_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Drain the response queue and update item statuses
    Run(commands::run::RunArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Show the stored lifecycle status of one item
    Status(commands::status::StatusArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
