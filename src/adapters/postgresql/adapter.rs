//! PostgreSQL status store
//!
//! Status rows are owned by the catalogue database and are only reached
//! through two functions, called with named arguments:
//!
//! ```sql
//! SELECT usp_tradedataexport_getstatus(item_id => $1, region_id => $2);
//! SELECT usp_tradedataexport_updatestatus(item_id => $1, region_id => $2,
//!                                         export_status => $3, error_message => $4);
//! ```
//!
//! The first returns the stored status code (NULL when the item is
//! unknown), the second the number of rows it changed.

use crate::adapters::postgresql::client::PostgresClient;
use crate::adapters::traits::StatusStore;
use crate::config::schema::is_sql_identifier;
use crate::config::StoreConfig;
use crate::domain::{ImporterError, ItemId, LifecycleStatus, RegionId, Result, StoreError};
use async_trait::async_trait;
use std::sync::Arc;

/// Builds the status lookup statement
pub fn get_status_sql(procedure: &str) -> String {
    format!("SELECT {procedure}(item_id => $1::text, region_id => $2::text)::smallint")
}

/// Builds the status update statement
pub fn update_status_sql(procedure: &str) -> String {
    format!(
        "SELECT {procedure}(item_id => $1::text, region_id => $2::text, \
         export_status => $3::smallint, error_message => $4::text)::bigint"
    )
}

/// Status store backed by PostgreSQL functions
pub struct PostgresStatusStore {
    client: Arc<PostgresClient>,
    get_status_sql: String,
    update_status_sql: String,
}

impl PostgresStatusStore {
    /// Create a store over an existing client
    ///
    /// # Errors
    ///
    /// Returns [`ImporterError::Configuration`] if a procedure name is not
    /// a plain or schema-qualified identifier.
    pub fn new(client: Arc<PostgresClient>, config: &StoreConfig) -> Result<Self> {
        for name in [&config.get_status_procedure, &config.update_status_procedure] {
            if !is_sql_identifier(name) {
                return Err(ImporterError::Configuration(format!(
                    "Invalid stored procedure name '{name}'"
                )));
            }
        }

        Ok(Self {
            client,
            get_status_sql: get_status_sql(&config.get_status_procedure),
            update_status_sql: update_status_sql(&config.update_status_procedure),
        })
    }

    /// Connects and verifies the store with `SELECT 1`
    ///
    /// # Errors
    ///
    /// Returns [`ImporterError::Configuration`] for bad settings and
    /// [`ImporterError::Connection`] if the database cannot be reached.
    pub async fn connect(config: &StoreConfig) -> Result<Self> {
        let client = Arc::new(PostgresClient::new(config)?);
        let store = Self::new(client, config)?;
        store.client.test_connection().await?;

        tracing::info!(
            target_db = %store.client.connection_string_safe(),
            get_status = %config.get_status_procedure,
            update_status = %config.update_status_procedure,
            "Status store ready"
        );
        Ok(store)
    }

    /// Get a reference to the underlying client
    pub fn client(&self) -> &Arc<PostgresClient> {
        &self.client
    }
}

#[async_trait]
impl StatusStore for PostgresStatusStore {
    async fn get_status(
        &self,
        item_id: &ItemId,
        region_id: &RegionId,
    ) -> std::result::Result<u8, StoreError> {
        let client = self.client.get_connection().await?;

        let row = client
            .query_opt(
                self.get_status_sql.as_str(),
                &[&item_id.as_str(), &region_id.as_str()],
            )
            .await
            .map_err(|e| StoreError::QueryFailed(format!("Status lookup failed: {}", e)))?;

        let code: Option<i16> = match row {
            Some(row) => row
                .try_get(0)
                .map_err(|e| StoreError::QueryFailed(format!("Unexpected status column: {}", e)))?,
            None => None,
        };

        let code = code.ok_or_else(|| StoreError::ItemNotFound {
            item_id: item_id.to_string(),
            region_id: region_id.to_string(),
        })?;

        u8::try_from(code).map_err(|_| StoreError::InvalidStatusCode {
            item_id: item_id.to_string(),
            code: i64::from(code),
        })
    }

    async fn set_status(
        &self,
        item_id: &ItemId,
        region_id: &RegionId,
        status: LifecycleStatus,
        error_message: Option<&str>,
    ) -> std::result::Result<u64, StoreError> {
        let client = self.client.get_connection().await?;
        let code = i16::from(status.code());

        let row = client
            .query_one(
                self.update_status_sql.as_str(),
                &[&item_id.as_str(), &region_id.as_str(), &code, &error_message],
            )
            .await
            .map_err(|e| StoreError::UpdateFailed(format!("Status update failed: {}", e)))?;

        let rows_affected: Option<i64> = row
            .try_get(0)
            .map_err(|e| StoreError::UpdateFailed(format!("Unexpected update result: {}", e)))?;

        Ok(rows_affected.map_or(0, |n| u64::try_from(n).unwrap_or(0)))
    }
}
