//! Property tests: dedup and ordering hold for arbitrary enqueue sequences.

use proptest::prelude::*;
use serde_json::json;

use outbox_core::mutation::{MutationAction, NewMutation};
use outbox_core::traits::IMutationQueue;
use outbox_storage::QueueStorage;

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn store_never_holds_two_records_with_one_signature(
        amounts in prop::collection::vec(0u32..8, 1..24),
        users in prop::collection::vec(prop::sample::select(vec!["u1", "u2", "u3"]), 24),
    ) {
        let rt = runtime();
        rt.block_on(async {
            let store = QueueStorage::open_in_memory().unwrap();
            for (amount, user) in amounts.iter().zip(users.iter()) {
                let m = NewMutation::new(
                    "transaction",
                    MutationAction::Create,
                    "transactions",
                    json!({"amount": amount}),
                    *user,
                );
                store.queue_mutation(m).await.unwrap();
            }

            let pending = store.get_pending_mutations().await.unwrap();
            let mut signatures: Vec<_> = pending.iter().map(|m| m.signature.clone()).collect();
            let total = signatures.len();
            signatures.sort();
            signatures.dedup();
            prop_assert_eq!(signatures.len(), total);

            let mut distinct = amounts.clone();
            distinct.sort();
            distinct.dedup();
            prop_assert_eq!(total, distinct.len());

            prop_assert!(pending.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
            Ok(())
        })?;
    }

    #[test]
    fn clearing_a_user_removes_exactly_their_records(
        owners in prop::collection::vec(prop::sample::select(vec!["u1", "u2"]), 1..16),
    ) {
        let rt = runtime();
        rt.block_on(async {
            let store = QueueStorage::open_in_memory().unwrap();
            for (i, owner) in owners.iter().enumerate() {
                let m = NewMutation::new("goal", MutationAction::Create, "goals", json!({"n": i}), *owner);
                store.queue_mutation(m).await.unwrap();
            }
            let expected_u1 = owners.iter().filter(|o| **o == "u1").count();

            let removed = store.clear_user_mutations("u1").await.unwrap();
            prop_assert_eq!(removed, expected_u1);

            let remaining = store.get_pending_mutations().await.unwrap();
            prop_assert_eq!(remaining.len(), owners.len() - expected_u1);
            prop_assert!(remaining.iter().all(|m| m.user_id == "u2"));
            Ok(())
        })?;
    }
}
