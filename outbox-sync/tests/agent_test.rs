//! Background agent drain against a real in-memory queue.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tokio::sync::broadcast;
use tokio::time::timeout;

use outbox_core::errors::{OutboxResult, RemoteError};
use outbox_core::models::RemoteConfig;
use outbox_core::mutation::{MutationAction, NewMutation, QueuedMutation};
use outbox_core::traits::{IMutationQueue, IMutationReplayer};
use outbox_storage::QueueStorage;
use outbox_sync::{AgentEvent, AgentMessage, BackgroundAgent};

#[derive(Default)]
struct ScriptedReplayer {
    failing_types: HashSet<String>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedReplayer {
    fn failing(mutation_type: &str) -> Self {
        Self {
            failing_types: HashSet::from([mutation_type.to_string()]),
            ..Self::default()
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl IMutationReplayer for ScriptedReplayer {
    async fn replay(&self, mutation: &QueuedMutation, remote: &RemoteConfig) -> OutboxResult<()> {
        self.calls.lock().unwrap().push(mutation.id.clone());
        if self.failing_types.contains(&mutation.mutation_type) {
            return Err(RemoteError::RequestFailed {
                endpoint: format!("{}/{}", remote.url, mutation.endpoint),
                status: 503,
                message: "unavailable".into(),
            }
            .into());
        }
        Ok(())
    }
}

fn remote() -> RemoteConfig {
    RemoteConfig {
        url: "https://api.example.com".into(),
        anon_key: "anon".into(),
        access_token: None,
    }
}

async fn seed(store: &QueueStorage) -> Vec<QueuedMutation> {
    let goal = NewMutation::new(
        "goal",
        MutationAction::Create,
        "goals",
        json!({"name": "Emergency Fund", "amount": 5000}),
        "u1",
    );
    let budget = NewMutation::new(
        "budget",
        MutationAction::Update,
        "budgets",
        json!({"id": "b-1", "limit": 300}),
        "u1",
    );
    vec![
        store.queue_mutation(goal).await.unwrap(),
        store.queue_mutation(budget).await.unwrap(),
    ]
}

#[tokio::test]
async fn drain_without_config_reports_failure_and_keeps_queue() {
    let store = Arc::new(QueueStorage::open_in_memory().unwrap());
    seed(&store).await;
    let replayer = Arc::new(ScriptedReplayer::default());
    let mut agent = BackgroundAgent::new(store.clone(), replayer.clone());

    let event = agent.handle(AgentMessage::ManualSync).await;
    assert_eq!(
        event,
        Some(AgentEvent::SyncComplete {
            success: false,
            synced_count: 0
        })
    );
    assert!(replayer.calls().is_empty());
    assert_eq!(store.get_queue_status().await.unwrap().pending_count, 2);
}

#[tokio::test]
async fn successful_drain_empties_queue_in_order() {
    let store = Arc::new(QueueStorage::open_in_memory().unwrap());
    let seeded = seed(&store).await;
    let replayer = Arc::new(ScriptedReplayer::default());
    let mut agent = BackgroundAgent::new(store.clone(), replayer.clone());

    assert!(agent.handle(AgentMessage::SetSupabaseConfig(remote())).await.is_none());
    assert!(agent.has_remote_config());

    let event = agent
        .handle(AgentMessage::BackgroundSync {
            tag: "sync-mutations".into(),
        })
        .await;
    assert_eq!(
        event,
        Some(AgentEvent::SyncComplete {
            success: true,
            synced_count: 2
        })
    );

    let expected: Vec<_> = seeded.iter().map(|m| m.id.clone()).collect();
    assert_eq!(replayer.calls(), expected);

    let status = store.get_queue_status().await.unwrap();
    assert_eq!(status.pending_count, 0);
    assert!(!status.is_syncing);
    assert!(status.last_sync_success.is_some());
}

#[tokio::test]
async fn failed_replays_spend_retries_until_dropped() {
    let store = Arc::new(QueueStorage::open_in_memory().unwrap());
    let seeded = seed(&store).await;
    let budget_id = seeded[1].id.clone();
    let mut agent = BackgroundAgent::new(store.clone(), Arc::new(ScriptedReplayer::failing("budget")));
    agent.handle(AgentMessage::SetSupabaseConfig(remote())).await;

    let first = agent.drain().await.unwrap();
    assert_eq!(first.synced, 1);
    assert_eq!(first.failed, 1);
    assert!(!first.is_success());
    assert_eq!(store.get_mutation(&budget_id).await.unwrap().unwrap().retry_count, 1);
    assert!(store.get_queue_status().await.unwrap().last_sync_success.is_none());

    for _ in 0..4 {
        agent.drain().await.unwrap();
    }
    assert!(store.get_mutation(&budget_id).await.unwrap().is_none());

    let after = agent.drain().await.unwrap();
    assert_eq!(after.attempted, 0);
    assert!(after.is_success());
}

#[tokio::test]
async fn spawned_agent_reports_on_broadcast_and_exits_when_senders_drop() {
    let store = Arc::new(QueueStorage::open_in_memory().unwrap());
    seed(&store).await;
    let (events, mut completions) = broadcast::channel(8);
    let handle = BackgroundAgent::new(store.clone(), Arc::new(ScriptedReplayer::default()))
        .spawn(events, 8);

    let sender = handle.sender();
    sender.send(AgentMessage::SetSupabaseConfig(remote())).await.unwrap();
    sender.send(AgentMessage::ManualSync).await.unwrap();

    let event = timeout(Duration::from_secs(1), completions.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        event,
        AgentEvent::SyncComplete {
            success: true,
            synced_count: 2
        }
    );

    drop(sender);
    timeout(Duration::from_secs(1), handle.join()).await.unwrap();
}
