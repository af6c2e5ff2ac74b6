//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::ImporterConfig;
use super::secret::secret_string;
use crate::domain::errors::ImporterError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Prefix of environment variable overrides
pub const ENV_PREFIX: &str = "TRADE_IMPORTER";

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into ImporterConfig
/// 4. Applies environment variable overrides (TRADE_IMPORTER_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns [`ImporterError::Configuration`] if the file cannot be read,
/// a referenced variable is unset, the TOML is malformed or validation
/// fails.
///
/// # Examples
///
/// ```no_run
/// use trade_importer::config::loader::load_config;
///
/// let config = load_config("trade-importer.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<ImporterConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ImporterError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        ImporterError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    load_config_from_str(&contents)
}

/// Loads configuration from TOML text
///
/// Same pipeline as [`load_config`] without the file read.
///
/// # Errors
///
/// Returns [`ImporterError::Configuration`] on any failure.
pub fn load_config_from_str(contents: &str) -> Result<ImporterConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: ImporterConfig = toml::from_str(&contents)
        .map_err(|e| ImporterError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        ImporterError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left alone. Every missing variable is reported in one
/// error.
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| ImporterError::Other(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(ImporterError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

fn env_var(section: &str, key: &str) -> Option<String> {
    std::env::var(format!("{ENV_PREFIX}_{section}_{key}")).ok()
}

fn parse_env<T: std::str::FromStr>(section: &str, key: &str) -> Result<Option<T>> {
    match env_var(section, key) {
        None => Ok(None),
        Some(val) => val.parse().map(Some).map_err(|_| {
            ImporterError::Configuration(format!(
                "Invalid value '{val}' for {ENV_PREFIX}_{section}_{key}"
            ))
        }),
    }
}

/// Applies environment variable overrides using the TRADE_IMPORTER_* prefix
///
/// Environment variables follow the pattern: TRADE_IMPORTER_<SECTION>_<KEY>
/// For example: TRADE_IMPORTER_QUEUE_QUEUE_NAME, TRADE_IMPORTER_STORE_REGION_ID
fn apply_env_overrides(config: &mut ImporterConfig) -> Result<()> {
    // Application overrides
    if let Some(val) = env_var("APPLICATION", "LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Queue overrides
    let queue = &mut config.queue;
    if let Some(val) = env_var("QUEUE", "ENDPOINT") {
        queue.endpoint = val;
    }
    if let Some(val) = env_var("QUEUE", "QUEUE_NAME") {
        queue.queue_name = val;
    }
    if let Some(val) = parse_env("QUEUE", "RECEIVE_TIMEOUT_SECONDS")? {
        queue.receive_timeout_seconds = val;
    }
    if let Some(val) = parse_env("QUEUE", "REQUEST_TIMEOUT_SECONDS")? {
        queue.request_timeout_seconds = val;
    }
    if let Some(val) = env_var("QUEUE", "AUTH_TYPE") {
        queue.auth_type = val.parse().map_err(ImporterError::Configuration)?;
    }
    if let Some(val) = env_var("QUEUE", "TENANT_ID") {
        queue.tenant_id = Some(val);
    }
    if let Some(val) = env_var("QUEUE", "CLIENT_ID") {
        queue.client_id = Some(val);
    }
    if let Some(val) = env_var("QUEUE", "CLIENT_SECRET") {
        queue.client_secret = Some(secret_string(val));
    }
    if let Some(val) = env_var("QUEUE", "SAS_TOKEN") {
        queue.sas_token = Some(secret_string(val));
    }

    // Store overrides
    let store = &mut config.store;
    if let Some(val) = env_var("STORE", "CONNECTION_STRING") {
        store.connection_string = secret_string(val);
    }
    if let Some(val) = env_var("STORE", "REGION_ID") {
        store.region_id = val;
    }
    if let Some(val) = env_var("STORE", "GET_STATUS_PROCEDURE") {
        store.get_status_procedure = val;
    }
    if let Some(val) = env_var("STORE", "UPDATE_STATUS_PROCEDURE") {
        store.update_status_procedure = val;
    }
    if let Some(val) = parse_env("STORE", "MAX_CONNECTIONS")? {
        store.max_connections = val;
    }
    if let Some(val) = parse_env("STORE", "CONNECTION_TIMEOUT_SECONDS")? {
        store.connection_timeout_seconds = val;
    }
    if let Some(val) = parse_env("STORE", "STATEMENT_TIMEOUT_SECONDS")? {
        store.statement_timeout_seconds = val;
    }
    if let Some(val) = env_var("STORE", "SSL_MODE") {
        store.ssl_mode = val;
    }

    // Logging overrides
    if let Some(val) = parse_env("LOGGING", "LOCAL_ENABLED")? {
        config.logging.local_enabled = val;
    }
    if let Some(val) = env_var("LOGGING", "LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Some(val) = env_var("LOGGING", "LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::QueueAuthType;
    use secrecy::ExposeSecret;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const MINIMAL: &str = r#"
[queue]
endpoint = "https://trade.servicebus.windows.net"
queue_name = "export-responses"
auth_type = "sas_token"
sas_token = "SharedAccessSignature sr=a&sig=b&se=1&skn=listen"

[store]
connection_string = "postgresql://importer:pw@localhost/trade"
"#;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("LOADER_TEST_VAR", "test_value");
        let input = "password = \"${LOADER_TEST_VAR}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "password = \"test_value\"\n");
        std::env::remove_var("LOADER_TEST_VAR");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        std::env::remove_var("LOADER_MISSING_A");
        std::env::remove_var("LOADER_MISSING_B");
        let input = "a = \"${LOADER_MISSING_A}\"\nb = \"${LOADER_MISSING_B}\"";

        let err = substitute_env_vars(input).unwrap_err().to_string();
        assert!(err.contains("LOADER_MISSING_A"));
        assert!(err.contains("LOADER_MISSING_B"));
    }

    #[test]
    fn test_substitute_env_vars_skips_comments() {
        std::env::remove_var("LOADER_COMMENTED");
        let input = "# secret = \"${LOADER_COMMENTED}\"";
        assert!(substitute_env_vars(input).is_ok());
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent.toml");
        assert!(matches!(result, Err(ImporterError::Configuration(_))));
    }

    #[test]
    fn test_load_config_defaults() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(MINIMAL.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();

        assert_eq!(config.application.log_level, "info");
        assert_eq!(config.queue.queue_name, "export-responses");
        assert_eq!(config.queue.auth_type, QueueAuthType::SasToken);
        assert_eq!(config.queue.receive_timeout_seconds, 30);
        assert_eq!(config.store.region_id, "US");
        assert_eq!(config.store.max_connections, 1);
        assert_eq!(
            config.store.get_status_procedure,
            "usp_tradedataexport_getstatus"
        );
        assert!(config.logging.local_enabled);
        assert!(config
            .store
            .connection_string
            .expose_secret()
            .starts_with("postgresql://"));
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let result = load_config_from_str("[queue\nendpoint = ");
        assert!(matches!(result, Err(ImporterError::Configuration(_))));
    }

    #[test]
    fn test_load_config_validation_failure() {
        let contents = MINIMAL.replace("export-responses", "");
        let err = load_config_from_str(&contents).unwrap_err().to_string();
        assert!(err.contains("queue_name"));
    }
}
