//! End-to-end drain tests over the in-memory queue and status store

use std::sync::Arc;
use std::time::Duration;
use trade_importer::adapters::memory::{InMemoryQueue, InMemoryStatusStore};
use trade_importer::adapters::{MessageSource, StatusStore};
use trade_importer::core::drain::DrainLoop;
use trade_importer::core::reconcile::StatusReconciler;
use trade_importer::domain::{ItemId, LifecycleStatus, RegionId};

const ISBN13: &str = "9780023381737";

fn fixture(name: &str) -> Vec<u8> {
    let path = format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name);
    std::fs::read(&path).unwrap_or_else(|e| panic!("failed to read {path}: {e}"))
}

fn item(id: &str) -> ItemId {
    ItemId::new(id).unwrap()
}

fn us() -> RegionId {
    RegionId::new("US").unwrap()
}

fn drain_loop(queue: &Arc<InMemoryQueue>, store: &Arc<InMemoryStatusStore>) -> DrainLoop {
    DrainLoop::new(
        Arc::clone(queue) as Arc<dyn MessageSource + Send + Sync>,
        StatusReconciler::new(
            Arc::clone(store) as Arc<dyn StatusStore + Send + Sync>,
            us(),
        ),
        Duration::from_millis(10),
    )
}

#[tokio::test]
async fn test_successful_result_completes_creation() {
    let queue = Arc::new(InMemoryQueue::new());
    let store = Arc::new(InMemoryStatusStore::new());
    store.insert(&item(ISBN13), &us(), LifecycleStatus::SentForCreation);
    let token = queue.push(fixture("TestMessage.json"));

    let summary = drain_loop(&queue, &store).run().await.unwrap();

    assert_eq!(summary.messages_received, 1);
    assert_eq!(summary.records_updated, 1);
    assert!(summary.is_clean());
    assert_eq!(
        store.status_of(&item(ISBN13), &us()),
        Some(LifecycleStatus::ExportSuccessful)
    );
    assert_eq!(store.error_message_of(&item(ISBN13), &us()), None);
    assert_eq!(store.writes().len(), 1);
    assert_eq!(queue.acknowledged(), vec![token]);
    assert!(queue.is_closed());
}

#[tokio::test]
async fn test_error_result_stores_message() {
    let queue = Arc::new(InMemoryQueue::new());
    let store = Arc::new(InMemoryStatusStore::new());
    store.insert(&item(ISBN13), &us(), LifecycleStatus::SentForUpdate);
    queue.push(fixture("TestMessage_Error.json"));

    let summary = drain_loop(&queue, &store).run().await.unwrap();

    assert_eq!(summary.records_updated, 1);
    assert_eq!(
        store.status_of(&item(ISBN13), &us()),
        Some(LifecycleStatus::FailedToUpdate)
    );
    assert_eq!(
        store.error_message_of(&item(ISBN13), &us()).as_deref(),
        Some("Style 9780023381737 is missing a retail price")
    );
}

#[tokio::test]
async fn test_redelivered_message_writes_nothing() {
    let queue = Arc::new(InMemoryQueue::new());
    let store = Arc::new(InMemoryStatusStore::new());
    store.insert(&item(ISBN13), &us(), LifecycleStatus::ExportSuccessful);
    queue.push(fixture("TestMessage.json"));

    let summary = drain_loop(&queue, &store).run().await.unwrap();

    assert_eq!(summary.records_unchanged, 1);
    assert_eq!(summary.records_updated, 0);
    assert!(store.writes().is_empty());
    assert_eq!(queue.acknowledged().len(), 1);
}

#[tokio::test]
async fn test_same_message_twice_is_idempotent() {
    let queue = Arc::new(InMemoryQueue::new());
    let store = Arc::new(InMemoryStatusStore::new());
    store.insert(&item(ISBN13), &us(), LifecycleStatus::SentForCreation);
    queue.push(fixture("TestMessage.json"));
    queue.push(fixture("TestMessage.json"));

    let summary = drain_loop(&queue, &store).run().await.unwrap();

    assert_eq!(summary.messages_received, 2);
    assert_eq!(summary.records_updated, 1);
    assert_eq!(summary.records_unchanged, 1);
    assert_eq!(store.writes().len(), 1);
    assert_eq!(queue.acknowledged().len(), 2);
}

#[tokio::test]
async fn test_invalid_message_is_acknowledged_as_poison() {
    let queue = Arc::new(InMemoryQueue::new());
    let store = Arc::new(InMemoryStatusStore::new());
    store.insert(&item(ISBN13), &us(), LifecycleStatus::SentForCreation);
    let poison = queue.push(fixture("TestMessage_Invalid.json"));
    let valid = queue.push(fixture("TestMessage.json"));

    let summary = drain_loop(&queue, &store).run().await.unwrap();

    assert_eq!(summary.poison_messages, 1);
    assert_eq!(summary.records_updated, 1);
    assert!(!summary.is_clean());
    assert_eq!(queue.acknowledged(), vec![poison, valid]);
    assert_eq!(queue.pending_count(), 0);
}

#[tokio::test]
async fn test_batch_message_isolates_each_line() {
    let queue = Arc::new(InMemoryQueue::new());
    let store = Arc::new(InMemoryStatusStore::new());
    store.insert(&item(ISBN13), &us(), LifecycleStatus::SentForCreation);
    store.insert(&item("9780679783268"), &us(), LifecycleStatus::SentForUpdate);
    // 9780140449136 is not in the store
    queue.push(fixture("TestMessage_Batch.json"));

    let summary = drain_loop(&queue, &store).run().await.unwrap();

    assert_eq!(summary.records_processed, 3);
    assert_eq!(summary.records_updated, 1);
    assert_eq!(summary.records_failed, 1);
    assert_eq!(summary.records_unchanged, 1);
    assert_eq!(summary.failures[0].item_id, item("9780140449136"));
    assert_eq!(
        store.status_of(&item("9780679783268"), &us()),
        Some(LifecycleStatus::SentForUpdate)
    );
    assert_eq!(queue.acknowledged().len(), 1);
}

#[tokio::test]
async fn test_other_regions_are_untouched() {
    let queue = Arc::new(InMemoryQueue::new());
    let store = Arc::new(InMemoryStatusStore::new());
    let gb = RegionId::new("GB").unwrap();
    store.insert(&item(ISBN13), &us(), LifecycleStatus::SentForCreation);
    store.insert(&item(ISBN13), &gb, LifecycleStatus::SentForCreation);
    queue.push(fixture("TestMessage.json"));

    drain_loop(&queue, &store).run().await.unwrap();

    assert_eq!(
        store.status_of(&item(ISBN13), &us()),
        Some(LifecycleStatus::ExportSuccessful)
    );
    assert_eq!(
        store.status_of(&item(ISBN13), &gb),
        Some(LifecycleStatus::SentForCreation)
    );
}
