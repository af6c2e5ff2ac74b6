//! PostgreSQL client implementation
//!
//! Owns the connection pool the status store draws from.

use crate::config::StoreConfig;
use crate::domain::{ImporterError, Result, StoreError};
use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod};
use postgres_native_tls::MakeTlsConnector;
use secrecy::ExposeSecret;
use std::time::Duration;
use tokio_postgres::config::SslMode;
use tokio_postgres::NoTls;

/// Pooled PostgreSQL client
pub struct PostgresClient {
    /// Connection pool
    pool: Pool,

    /// Redacted connection target for logs
    target: String,
}

impl PostgresClient {
    /// Create a new PostgreSQL client
    ///
    /// No connection is opened until [`PostgresClient::test_connection`] or
    /// the first query.
    ///
    /// # Errors
    ///
    /// Returns [`ImporterError::Configuration`] if the connection string or
    /// TLS settings are unusable.
    pub fn new(config: &StoreConfig) -> Result<Self> {
        let connection_string = config.connection_string.expose_secret().as_str();
        let mut pg_config: tokio_postgres::Config = connection_string.parse().map_err(|e| {
            ImporterError::Configuration(format!("Invalid PostgreSQL connection string: {}", e))
        })?;

        pg_config
            .ssl_mode(ssl_mode(&config.ssl_mode)?)
            .connect_timeout(Duration::from_secs(config.connection_timeout_seconds))
            .application_name("trade-importer");
        if config.statement_timeout_seconds > 0 {
            pg_config.options(&format!(
                "-c statement_timeout={}",
                config.statement_timeout_seconds * 1000
            ));
        }

        let manager_config = ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        };
        let manager = if config.ssl_mode == "disable" {
            Manager::from_config(pg_config, NoTls, manager_config)
        } else {
            let connector = native_tls::TlsConnector::builder().build().map_err(|e| {
                ImporterError::Configuration(format!("Failed to build TLS connector: {}", e))
            })?;
            Manager::from_config(pg_config, MakeTlsConnector::new(connector), manager_config)
        };

        let timeout = Some(Duration::from_secs(config.connection_timeout_seconds));
        let pool = Pool::builder(manager)
            .max_size(config.max_connections)
            .wait_timeout(timeout)
            .create_timeout(timeout)
            .recycle_timeout(timeout)
            .runtime(deadpool_postgres::Runtime::Tokio1)
            .build()
            .map_err(|e| {
                ImporterError::Configuration(format!("Failed to create connection pool: {}", e))
            })?;

        Ok(Self {
            pool,
            target: connection_string_safe(connection_string),
        })
    }

    /// Test the connection to PostgreSQL
    ///
    /// # Errors
    ///
    /// Returns [`ImporterError::Connection`] if no connection can be opened
    /// or `SELECT 1` fails.
    pub async fn test_connection(&self) -> Result<()> {
        let client = self
            .get_connection()
            .await
            .map_err(|e| ImporterError::Connection(e.to_string()))?;

        client
            .query_one("SELECT 1", &[])
            .await
            .map_err(|e| ImporterError::Connection(format!("Connection test failed: {}", e)))?;

        tracing::info!(target_db = %self.target, "PostgreSQL connection test successful");
        Ok(())
    }

    /// Get a connection from the pool
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ConnectionFailed`] if a connection cannot be obtained.
    pub async fn get_connection(
        &self,
    ) -> std::result::Result<deadpool_postgres::Object, StoreError> {
        self.pool.get().await.map_err(|e| {
            StoreError::ConnectionFailed(format!("Failed to get connection from pool: {}", e))
        })
    }

    /// Get the connection string (without credentials)
    pub fn connection_string_safe(&self) -> &str {
        &self.target
    }

    /// Get the pool statistics
    pub fn pool_status(&self) -> deadpool_postgres::Status {
        self.pool.status()
    }
}

fn ssl_mode(value: &str) -> Result<SslMode> {
    match value {
        "disable" => Ok(SslMode::Disable),
        "prefer" => Ok(SslMode::Prefer),
        "require" => Ok(SslMode::Require),
        other => Err(ImporterError::Configuration(format!(
            "store.ssl_mode must be one of: disable, prefer, require, got '{other}'"
        ))),
    }
}

/// Redacts everything before the host of a connection URL
pub fn connection_string_safe(connection_string: &str) -> String {
    connection_string
        .rsplit_once('@')
        .map(|(_, host)| format!("postgresql://***@{}", host))
        .unwrap_or_else(|| "postgresql://***".to_string())
}
