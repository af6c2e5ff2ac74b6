//! Drain summary and reporting

use crate::core::reconcile::RecordOutcome;
use crate::domain::ItemId;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// A record whose reconciliation failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFailure {
    /// Item the record was about
    pub item_id: ItemId,

    /// Store error text
    pub message: String,
}

/// Counters for one drain run
#[derive(Debug, Clone)]
pub struct DrainSummary {
    /// When the run started
    pub started_at: DateTime<Utc>,

    /// Messages received from the queue
    pub messages_received: usize,

    /// Messages acknowledged successfully
    pub messages_acknowledged: usize,

    /// Messages whose body could not be parsed
    pub poison_messages: usize,

    /// Acknowledgements the queue rejected
    pub ack_failures: usize,

    /// Records reconciled, whatever the outcome
    pub records_processed: usize,

    /// Records whose status was written
    pub records_updated: usize,

    /// Records left as they were
    pub records_unchanged: usize,

    /// Records whose write affected no rows
    pub records_not_updated: usize,

    /// Records that failed against the store
    pub records_failed: usize,

    /// Wall time of the run
    pub duration: Duration,

    /// Details of every failed record
    pub failures: Vec<RecordFailure>,
}

impl DrainSummary {
    /// Creates an empty summary starting now
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            messages_received: 0,
            messages_acknowledged: 0,
            poison_messages: 0,
            ack_failures: 0,
            records_processed: 0,
            records_updated: 0,
            records_unchanged: 0,
            records_not_updated: 0,
            records_failed: 0,
            duration: Duration::from_secs(0),
            failures: Vec::new(),
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Counts one record outcome
    pub fn record(&mut self, item_id: &ItemId, outcome: &RecordOutcome) {
        self.records_processed += 1;
        match outcome {
            RecordOutcome::Unchanged { .. } => self.records_unchanged += 1,
            RecordOutcome::Updated { .. } => self.records_updated += 1,
            RecordOutcome::NotUpdated { .. } => self.records_not_updated += 1,
            RecordOutcome::Failed { error } => {
                self.records_failed += 1;
                self.failures.push(RecordFailure {
                    item_id: item_id.clone(),
                    message: error.clone(),
                });
            }
        }
    }

    /// Whether every message was parsed and acknowledged and every record reconciled
    pub fn is_clean(&self) -> bool {
        self.poison_messages == 0 && self.ack_failures == 0 && self.records_failed == 0
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            started_at = %self.started_at.to_rfc3339(),
            messages_received = self.messages_received,
            messages_acknowledged = self.messages_acknowledged,
            poison_messages = self.poison_messages,
            ack_failures = self.ack_failures,
            records_processed = self.records_processed,
            records_updated = self.records_updated,
            records_unchanged = self.records_unchanged,
            records_not_updated = self.records_not_updated,
            records_failed = self.records_failed,
            duration_ms = self.duration.as_millis() as u64,
            "Received {} message(s)",
            self.messages_received
        );

        if !self.failures.is_empty() {
            tracing::warn!(
                failure_count = self.failures.len(),
                "Drain completed with record failures"
            );
            for failure in &self.failures {
                tracing::warn!(
                    item_id = %failure.item_id,
                    message = %failure.message,
                    "Record failure"
                );
            }
        }
    }
}

impl Default for DrainSummary {
    fn default() -> Self {
        Self::new()
    }
}
