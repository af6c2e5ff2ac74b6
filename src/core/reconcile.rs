//! Per-record status reconciliation
//!
//! For each export record the reconciler reads the stored status, applies
//! the transition policy and writes back only when the status changes.
//! Store failures are contained in the returned [`RecordOutcome`]; they
//! never escape a single record.

use crate::adapters::traits::StatusStore;
use crate::core::transition::next_status;
use crate::domain::{ExportRecord, LifecycleStatus, RegionId, StoreError};
use std::sync::Arc;

/// What happened to one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    /// The item was not awaiting this result; nothing written
    Unchanged { status: LifecycleStatus },

    /// The new status was written
    Updated {
        from: LifecycleStatus,
        to: LifecycleStatus,
    },

    /// A write was issued but affected no rows
    NotUpdated {
        from: LifecycleStatus,
        to: LifecycleStatus,
    },

    /// The store failed for this record
    Failed { error: String },
}

impl RecordOutcome {
    /// Whether a status row was changed
    pub fn is_updated(&self) -> bool {
        matches!(self, RecordOutcome::Updated { .. })
    }
}

/// Reconciles export records against the status store
pub struct StatusReconciler {
    store: Arc<dyn StatusStore + Send + Sync>,
    region_id: RegionId,
}

impl StatusReconciler {
    /// Creates a reconciler for one region
    pub fn new(store: Arc<dyn StatusStore + Send + Sync>, region_id: RegionId) -> Self {
        Self { store, region_id }
    }

    /// Region every lookup is keyed on
    pub fn region_id(&self) -> &RegionId {
        &self.region_id
    }

    /// Reconciles one record
    ///
    /// One read and at most one write. Never fails; store errors become
    /// [`RecordOutcome::Failed`].
    pub async fn reconcile(&self, record: &ExportRecord) -> RecordOutcome {
        match self.try_reconcile(record).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(
                    item_id = %record.item_id,
                    region_id = %self.region_id,
                    result_status = %record.result_status,
                    error = %e,
                    "Failed to reconcile item status"
                );
                RecordOutcome::Failed {
                    error: e.to_string(),
                }
            }
        }
    }

    async fn try_reconcile(&self, record: &ExportRecord) -> Result<RecordOutcome, StoreError> {
        let current = self
            .store
            .current_status(&record.item_id, &self.region_id)
            .await?;
        let new_status = next_status(record, current);

        if new_status == current {
            tracing::trace!(
                item_id = %record.item_id,
                status = %current,
                result_status = %record.result_status,
                "Status unchanged"
            );
            return Ok(RecordOutcome::Unchanged { status: current });
        }

        let rows_affected = self
            .store
            .set_status(
                &record.item_id,
                &self.region_id,
                new_status,
                record.error_message.as_deref(),
            )
            .await?;

        if rows_affected == 0 {
            tracing::warn!(
                item_id = %record.item_id,
                region_id = %self.region_id,
                from = %current,
                to = %new_status,
                "Status update affected no rows"
            );
            return Ok(RecordOutcome::NotUpdated {
                from: current,
                to: new_status,
            });
        }

        crate::log_status_transition!(&record.item_id, current, new_status);
        if let Some(message) = record.error_message.as_deref().filter(|m| !m.is_empty()) {
            tracing::debug!(
                item_id = %record.item_id,
                error_message = %message,
                "Export reported an item error"
            );
        }

        Ok(RecordOutcome::Updated {
            from: current,
            to: new_status,
        })
    }
}
