//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "trade-importer.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing trade importer configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2); // Configuration error exit code
        }

        match fs::write(&self.output, sample_config()) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Create a .env file with your credentials:");
                println!("     - Set AZURE_TENANT_ID, AZURE_CLIENT_ID and AZURE_CLIENT_SECRET");
                println!("     - Set TRADE_IMPORTER_DB_URL");
                println!("  3. Validate configuration: trade-importer validate-config");
                println!("  4. Drain the queue: trade-importer run");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(5) // Fatal error exit code
            }
        }
    }
}

/// Sample configuration with every setting and its default
pub fn sample_config() -> &'static str {
    r#"# Trade Importer Configuration File
# Applies trade export API results to item lifecycle statuses

[application]
log_level = "info"  # trace | debug | info | warn | error

[queue]
endpoint = "https://your-namespace.servicebus.windows.net"
queue_name = "trade-export-responses"
receive_timeout_seconds = 30
request_timeout_seconds = 30

# Authentication (azure_ad or sas_token)
auth_type = "azure_ad"
tenant_id = "${AZURE_TENANT_ID}"
client_id = "${AZURE_CLIENT_ID}"
client_secret = "${AZURE_CLIENT_SECRET}"
# sas_token = "SharedAccessSignature sr=...&sig=...&se=...&skn=..."

[store]
connection_string = "${TRADE_IMPORTER_DB_URL}"
region_id = "US"
get_status_procedure = "usp_tradedataexport_getstatus"
update_status_procedure = "usp_tradedataexport_updatestatus"
max_connections = 1
connection_timeout_seconds = 30
statement_timeout_seconds = 60
ssl_mode = "prefer"  # disable | prefer | require

[logging]
local_enabled = true
local_path = "/var/log/trade-importer"
local_rotation = "daily"  # daily | hourly
"#
}
