//! Drain loop - receives, reconciles and acknowledges until the queue is idle
//!
//! One message is fully processed and acknowledged before the next receive.
//! The loop ends when a receive times out with nothing to deliver.

use crate::adapters::traits::{MessageSource, QueueMessage};
use crate::core::drain::summary::DrainSummary;
use crate::core::parser::parse_message;
use crate::core::reconcile::StatusReconciler;
use crate::domain::Result;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Drains the response queue into the status store
pub struct DrainLoop {
    source: Arc<dyn MessageSource + Send + Sync>,
    reconciler: StatusReconciler,
    receive_timeout: Duration,
}

impl DrainLoop {
    /// Create a new drain loop
    pub fn new(
        source: Arc<dyn MessageSource + Send + Sync>,
        reconciler: StatusReconciler,
        receive_timeout: Duration,
    ) -> Self {
        Self {
            source,
            reconciler,
            receive_timeout,
        }
    }

    /// Run the drain loop
    ///
    /// Returns once a receive comes back empty. The message source is
    /// closed before returning, on success and on failure.
    ///
    /// # Errors
    ///
    /// Returns an error if a receive fails. Parse failures, store failures
    /// and failed acknowledgements are counted in the summary instead.
    pub async fn run(&self) -> Result<DrainSummary> {
        let start_time = Instant::now();
        let mut summary = DrainSummary::new();

        tracing::info!(
            source = %self.source.describe(),
            region_id = %self.reconciler.region_id(),
            receive_timeout_secs = self.receive_timeout.as_secs(),
            "Starting queue drain"
        );

        let drained = self.drain(&mut summary).await;

        if let Err(e) = self.source.close().await {
            tracing::warn!(error = %e, "Failed to close message source");
        }

        drained?;

        let summary = summary.with_duration(start_time.elapsed());
        summary.log_summary();
        Ok(summary)
    }

    async fn drain(&self, summary: &mut DrainSummary) -> Result<()> {
        while let Some(message) = self.receive().await? {
            summary.messages_received += 1;
            self.process(&message, summary).await;
            self.acknowledge(&message, summary).await;
        }

        tracing::debug!(
            messages_received = summary.messages_received,
            "Receive timed out, queue drained"
        );
        Ok(())
    }

    async fn receive(&self) -> Result<Option<QueueMessage>> {
        self.source
            .receive(self.receive_timeout)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to receive message"))
    }

    async fn process(&self, message: &QueueMessage, summary: &mut DrainSummary) {
        let records = match parse_message(&message.body) {
            Ok(records) => records,
            Err(e) => {
                summary.poison_messages += 1;
                tracing::error!(
                    message_id = message.message_id.as_deref().unwrap_or("-"),
                    delivery_count = message.delivery_count,
                    body_bytes = message.body.len(),
                    error = %e,
                    "Discarding unparsable message"
                );
                return;
            }
        };

        tracing::debug!(
            message_id = message.message_id.as_deref().unwrap_or("-"),
            record_count = records.len(),
            "Processing message"
        );

        for record in &records {
            let outcome = self.reconciler.reconcile(record).await;
            summary.record(&record.item_id, &outcome);
        }
    }

    async fn acknowledge(&self, message: &QueueMessage, summary: &mut DrainSummary) {
        match self.source.acknowledge(&message.ack_token).await {
            Ok(()) => summary.messages_acknowledged += 1,
            Err(e) => {
                summary.ack_failures += 1;
                tracing::warn!(
                    message_id = message.message_id.as_deref().unwrap_or("-"),
                    error = %e,
                    "Failed to acknowledge message, it will be redelivered"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryQueue, InMemoryStatusStore};
    use crate::domain::{ImporterError, ItemId, LifecycleStatus, RegionId};

    const SUCCESSFUL: &str =
        r#"{"Lines":[{"StyleNo":"9780023381737","Status":"Successful","Error":null}]}"#;

    struct Fixture {
        queue: Arc<InMemoryQueue>,
        store: Arc<InMemoryStatusStore>,
        drain: DrainLoop,
    }

    fn fixture() -> Fixture {
        let queue = Arc::new(InMemoryQueue::new());
        let store = Arc::new(InMemoryStatusStore::new());
        let reconciler = StatusReconciler::new(store.clone(), region());
        let drain = DrainLoop::new(queue.clone(), reconciler, Duration::from_secs(1));
        Fixture {
            queue,
            store,
            drain,
        }
    }

    fn region() -> RegionId {
        RegionId::new("US").unwrap()
    }

    fn item(id: &str) -> ItemId {
        ItemId::new(id).unwrap()
    }

    #[tokio::test]
    async fn test_empty_queue_drains_immediately() {
        let f = fixture();

        let summary = f.drain.run().await.unwrap();

        assert_eq!(summary.messages_received, 0);
        assert!(f.queue.is_closed());
    }

    #[tokio::test]
    async fn test_message_is_reconciled_and_acknowledged() {
        let f = fixture();
        f.store.insert(
            &item("9780023381737"),
            &region(),
            LifecycleStatus::SentForCreation,
        );
        let token = f.queue.push(SUCCESSFUL);

        let summary = f.drain.run().await.unwrap();

        assert_eq!(summary.messages_received, 1);
        assert_eq!(summary.messages_acknowledged, 1);
        assert_eq!(summary.records_updated, 1);
        assert_eq!(f.queue.acknowledged(), vec![token]);
        assert_eq!(f.store.writes().len(), 1);
    }

    #[tokio::test]
    async fn test_poison_message_is_acknowledged() {
        let f = fixture();
        let poison = f.queue.push("not json");
        let good = f.queue.push(r#"{"Lines":[]}"#);

        let summary = f.drain.run().await.unwrap();

        assert_eq!(summary.messages_received, 2);
        assert_eq!(summary.poison_messages, 1);
        assert_eq!(f.queue.acknowledged(), vec![poison, good]);
    }

    #[tokio::test]
    async fn test_record_failure_does_not_stop_message() {
        let f = fixture();
        f.store
            .insert(&item("b"), &region(), LifecycleStatus::SentForUpdate);
        f.queue.push(
            r#"{"Lines":[
                {"StyleNo":"a","Status":"Successful","Error":null},
                {"StyleNo":"b","Status":"Error","Error":"Bad price"}
            ]}"#,
        );

        let summary = f.drain.run().await.unwrap();

        assert_eq!(summary.records_processed, 2);
        assert_eq!(summary.records_failed, 1);
        assert_eq!(summary.records_updated, 1);
        assert_eq!(summary.failures[0].item_id, item("a"));
        assert_eq!(summary.messages_acknowledged, 1);
        assert_eq!(
            f.store.status_of(&item("b"), &region()),
            Some(LifecycleStatus::FailedToUpdate)
        );
    }

    #[tokio::test]
    async fn test_ack_failure_is_counted_and_loop_continues() {
        let f = fixture();
        let first = f.queue.push(r#"{"Lines":[]}"#);
        let second = f.queue.push(r#"{"Lines":[]}"#);
        f.queue.fail_ack_for(&first);

        let summary = f.drain.run().await.unwrap();

        assert_eq!(summary.messages_received, 2);
        assert_eq!(summary.ack_failures, 1);
        assert_eq!(summary.messages_acknowledged, 1);
        assert_eq!(f.queue.acknowledged(), vec![second]);
    }

    #[tokio::test]
    async fn test_receive_failure_aborts_and_closes() {
        let f = fixture();
        f.queue.fail_next_receive();

        let err = f.drain.run().await.unwrap_err();

        assert!(matches!(err, ImporterError::Queue(_)));
        assert!(f.queue.is_closed());
    }

    #[tokio::test]
    async fn test_messages_processed_in_order() {
        let f = fixture();
        f.store
            .insert(&item("x"), &region(), LifecycleStatus::SentForCreation);
        f.queue
            .push(r#"{"Lines":[{"StyleNo":"x","Status":"Error","Error":"first"}]}"#);
        f.queue
            .push(r#"{"Lines":[{"StyleNo":"x","Status":"Successful","Error":null}]}"#);

        let summary = f.drain.run().await.unwrap();

        assert_eq!(summary.records_updated, 1);
        assert_eq!(summary.records_unchanged, 1);
        assert_eq!(
            f.store.status_of(&item("x"), &region()),
            Some(LifecycleStatus::FailedToCreate)
        );
    }
}
