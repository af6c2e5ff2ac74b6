use clap::Parser;
use std::process;
use trade_importer::cli::{Cli, Commands};
use trade_importer::config::{load_config, LoggingConfig};
use trade_importer::log_error_with_context;
use trade_importer::logging::init_logging;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let (log_level, logging_config) = logging_settings(&cli);
    let guard = match init_logging(&log_level, &logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(5);
        }
    };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "Trade importer - export result status reconciliation"
    );

    let exit_code = match execute_command(&cli).await {
        Ok(code) => code,
        Err(e) => {
            log_error_with_context!(&e, "Command execution failed");
            eprintln!("Error: {e}");
            5 // Fatal error exit code
        }
    };

    // Flush buffered log lines before exiting
    drop(guard);
    process::exit(exit_code);
}

/// Log level and sinks for this invocation
///
/// `run` logs to files as configured. Other commands, and a `run` whose
/// configuration cannot be loaded, log to the console only; the command
/// itself reports the configuration error.
fn logging_settings(cli: &Cli) -> (String, LoggingConfig) {
    let console_only = LoggingConfig {
        local_enabled: false,
        ..LoggingConfig::default()
    };

    let (config_level, logging_config) = match &cli.command {
        Commands::Run(_) => match load_config(&cli.config) {
            Ok(config) => (Some(config.application.log_level), config.logging),
            Err(_) => (None, console_only),
        },
        _ => (None, console_only),
    };

    let log_level = cli
        .log_level
        .clone()
        .or(config_level)
        .unwrap_or_else(|| "info".to_string());
    (log_level, logging_config)
}

/// Execute the CLI command
async fn execute_command(cli: &Cli) -> anyhow::Result<i32> {
    match &cli.command {
        Commands::Run(args) => args.execute(&cli.config).await,
        Commands::ValidateConfig(args) => args.execute(&cli.config).await,
        Commands::Status(args) => args.execute(&cli.config).await,
        Commands::Init(args) => args.execute().await,
    }
}
