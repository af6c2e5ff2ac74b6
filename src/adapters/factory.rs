//! Adapter factory
//!
//! Builds the queue and store capabilities the drain loop is injected with.

use crate::adapters::postgresql::PostgresStatusStore;
use crate::adapters::servicebus::ServiceBusReceiver;
use crate::adapters::traits::{MessageSource, StatusStore};
use crate::config::{QueueConfig, StoreConfig};
use crate::domain::Result;
use std::sync::Arc;

/// Create the message source for the configured queue
///
/// # Returns
///
/// Returns an Arc-wrapped trait object that implements MessageSource
///
/// # Errors
///
/// Returns an error if the queue cannot be reached or the credentials are
/// rejected.
pub async fn create_message_source(
    config: &QueueConfig,
) -> Result<Arc<dyn MessageSource + Send + Sync>> {
    tracing::info!(
        queue = %config.queue_name,
        auth_type = %config.auth_type,
        "Creating Service Bus receiver"
    );
    let receiver = ServiceBusReceiver::connect(config).await?;

    Ok(Arc::new(receiver) as Arc<dyn MessageSource + Send + Sync>)
}

/// Create the status store for the configured database
///
/// # Returns
///
/// Returns an Arc-wrapped trait object that implements StatusStore
///
/// # Errors
///
/// Returns an error if the database cannot be reached.
pub async fn create_status_store(
    config: &StoreConfig,
) -> Result<Arc<dyn StatusStore + Send + Sync>> {
    tracing::info!("Creating PostgreSQL status store");
    let store = PostgresStatusStore::connect(config).await?;

    Ok(Arc::new(store) as Arc<dyn StatusStore + Send + Sync>)
}
