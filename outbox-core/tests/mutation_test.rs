use chrono::Utc;
use serde_json::json;

use outbox_core::mutation::{MutationAction, QueuedMutation};
use outbox_core::{OutboxError, QueueStatus};

#[test]
fn action_parses_wire_names() {
    assert_eq!("create".parse::<MutationAction>().unwrap(), MutationAction::Create);
    assert_eq!("update".parse::<MutationAction>().unwrap(), MutationAction::Update);
    assert_eq!("delete".parse::<MutationAction>().unwrap(), MutationAction::Delete);
    assert_eq!(MutationAction::Delete.to_string(), "delete");
}

#[test]
fn action_rejects_unknown_names() {
    let err = "patch".parse::<MutationAction>().unwrap_err();
    assert!(matches!(err, OutboxError::InvalidAction { value } if value == "patch"));
}

#[test]
fn queued_mutation_serializes_camel_case_with_type_key() {
    let mutation = QueuedMutation {
        id: "m-1".into(),
        mutation_type: "goal".into(),
        action: MutationAction::Create,
        endpoint: "/goals".into(),
        payload: json!({"name": "Emergency Fund"}),
        timestamp: Utc::now(),
        retry_count: 1,
        max_retries: 5,
        user_id: "u1".into(),
        signature: "sig".into(),
    };
    let value = serde_json::to_value(&mutation).unwrap();
    assert_eq!(value["type"], "goal");
    assert_eq!(value["action"], "create");
    assert_eq!(value["retryCount"], 1);
    assert_eq!(value["maxRetries"], 5);
    assert_eq!(value["userId"], "u1");
    assert_eq!(mutation.retries_remaining(), 4);
}

#[test]
fn queue_status_defaults_to_empty_idle() {
    let status = QueueStatus::default();
    assert!(status.is_empty());
    assert!(!status.is_syncing);
    assert!(status.oldest_mutation.is_none());
    let value = serde_json::to_value(&status).unwrap();
    assert_eq!(value["pendingCount"], 0);
    assert!(value["lastSyncSuccess"].is_null());
}
