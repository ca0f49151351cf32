use outbox_core::errors::*;

#[test]
fn config_error_carries_reason() {
    let err = OutboxError::ConfigError {
        reason: "expected a table".into(),
    };
    assert!(err.to_string().contains("expected a table"));
}

#[test]
fn invalid_action_carries_value() {
    let err = OutboxError::InvalidAction {
        value: "upsert".into(),
    };
    assert!(err.to_string().contains("upsert"));
}

// --- From impls ---

#[test]
fn storage_error_converts_to_outbox_error() {
    let storage_err = StorageError::SqliteError {
        message: "disk full".into(),
    };
    let outbox_err: OutboxError = storage_err.into();
    assert!(matches!(outbox_err, OutboxError::StorageError(_)));
    assert!(!outbox_err.is_remote());
}

#[test]
fn sync_error_converts_to_outbox_error() {
    let outbox_err: OutboxError = SyncError::AgentUnavailable.into();
    assert!(matches!(outbox_err, OutboxError::SyncError(_)));
}

#[test]
fn remote_error_converts_to_outbox_error() {
    let remote = RemoteError::RequestFailed {
        endpoint: "/rest/v1/goals".into(),
        status: 500,
        message: "internal".into(),
    };
    let outbox_err: OutboxError = remote.clone().into();
    assert!(outbox_err.is_remote());
    match outbox_err {
        OutboxError::RemoteError(inner) => assert_eq!(inner, remote),
        other => panic!("expected remote error, got {other:?}"),
    }
}

#[test]
fn serialization_error_converts_to_outbox_error() {
    let json_err = serde_json::from_str::<String>("not valid json").unwrap_err();
    let outbox_err: OutboxError = json_err.into();
    assert!(matches!(outbox_err, OutboxError::SerializationError(_)));
}

// --- Sub-error variants carry context ---

#[test]
fn storage_error_migration_failed_carries_version() {
    let err = StorageError::MigrationFailed {
        version: 1,
        reason: "syntax error".into(),
    };
    let msg = err.to_string();
    assert!(msg.contains('1'));
    assert!(msg.contains("syntax error"));
}

#[test]
fn storage_error_corrupt_record_carries_id() {
    let err = StorageError::CorruptRecord {
        id: "mut-42".into(),
        reason: "payload is not JSON".into(),
    };
    assert!(err.to_string().contains("mut-42"));
}

#[test]
fn remote_error_request_failed_carries_status_and_endpoint() {
    let err = RemoteError::RequestFailed {
        endpoint: "/rest/v1/budgets".into(),
        status: 409,
        message: "conflict".into(),
    };
    let msg = err.to_string();
    assert!(msg.contains("/rest/v1/budgets"));
    assert!(msg.contains("409"));
}

#[test]
fn sync_error_channel_closed_carries_reason() {
    let err = SyncError::ChannelClosed {
        reason: "agent exited".into(),
    };
    assert!(err.to_string().contains("agent exited"));
}
