//! Bounded retry: counts climb by one, the record is dropped at the bound.

use serde_json::json;

use outbox_core::mutation::{MutationAction, NewMutation};
use outbox_core::traits::IMutationQueue;
use outbox_storage::QueueStorage;

fn budget() -> NewMutation {
    NewMutation::new(
        "budget",
        MutationAction::Update,
        "budgets",
        json!({"id": "b-1", "limit": 250}),
        "u1",
    )
}

#[tokio::test]
async fn retry_bound_drops_after_five_failures() {
    let store = QueueStorage::open_in_memory().unwrap();
    let queued = store.queue_mutation(budget()).await.unwrap();

    for expected in 1..=4u32 {
        assert!(store.increment_retry_count(&queued.id).await.unwrap());
        let current = store.get_mutation(&queued.id).await.unwrap().unwrap();
        assert_eq!(current.retry_count, expected);
        assert!(current.retry_count < current.max_retries);
    }

    assert!(!store.increment_retry_count(&queued.id).await.unwrap());
    assert!(store.get_mutation(&queued.id).await.unwrap().is_none());
    assert_eq!(store.get_queue_status().await.unwrap().pending_count, 0);
}

#[tokio::test]
async fn unknown_id_reports_no_retry() {
    let store = QueueStorage::open_in_memory().unwrap();
    assert!(!store.increment_retry_count("missing").await.unwrap());
}

#[tokio::test]
async fn custom_bound_is_stamped_on_new_records() {
    let store = QueueStorage::open_in_memory().unwrap().with_max_retries(2);
    let queued = store.queue_mutation(budget()).await.unwrap();
    assert_eq!(queued.max_retries, 2);

    assert!(store.increment_retry_count(&queued.id).await.unwrap());
    assert!(!store.increment_retry_count(&queued.id).await.unwrap());
    assert!(store.get_mutation(&queued.id).await.unwrap().is_none());
}

#[tokio::test]
async fn exhausting_one_record_leaves_others() {
    let store = QueueStorage::open_in_memory().unwrap().with_max_retries(1);
    let doomed = store.queue_mutation(budget()).await.unwrap();
    let other = store
        .queue_mutation(NewMutation::new("goal", MutationAction::Delete, "goals", json!({"id": "g"}), "u1"))
        .await
        .unwrap();

    assert!(!store.increment_retry_count(&doomed.id).await.unwrap());
    let pending = store.get_pending_mutations().await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, other.id);
    assert_eq!(pending[0].retry_count, 0);
}
