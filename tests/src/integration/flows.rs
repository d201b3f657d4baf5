//! # Integration Test Flows
//!
//! End-to-end sequences driven through the protocol surface exactly as a
//! consensus engine would: admit, finalize in order, commit, then query.
//! Both consistency policies are exercised, along with the
//! ownership-uniqueness property after mixed action sequences.

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use ledger_app::test_utils::{
        service_fixture, signed_delivery, signed_query, signed_send, MockContentStore,
    };
    use ledger_app::{LedgerConfig, LedgerProtocol, LedgerService};
    use shared_crypto::{Address, Ed25519KeyPair};
    use shared_types::{
        LedgerPolicy, OwnerLookup, QueryResult, TxAction, CODE_OK, CODE_UNAUTHORIZED,
    };
    use std::sync::Arc;

    fn open_node() -> (LedgerService, Arc<MockContentStore>) {
        service_fixture(LedgerConfig::default(), Utc::now())
    }

    fn single_slot_node() -> (LedgerService, Arc<MockContentStore>) {
        service_fixture(
            LedgerConfig {
                policy: LedgerPolicy::SingleSlot,
                ..LedgerConfig::default()
            },
            Utc::now(),
        )
    }

    fn encode<T: serde::Serialize>(value: &T) -> Vec<u8> {
        serde_json::to_vec(value).unwrap()
    }

    /// Drive a transaction the way an engine does: admit first, then
    /// finalize only what admission accepted.
    async fn deliver(node: &LedgerService, tx: &[u8]) -> u32 {
        let admitted = node.admit(tx).await;
        if !admitted.is_ok() {
            return admitted.code;
        }
        node.finalize(tx).await.code
    }

    fn owned_files(node: &LedgerService, key: &Ed25519KeyPair) -> Vec<String> {
        let addr = Address::from_public_key(&key.public_key());
        let q = signed_query(key, Utc::now(), None, Some(addr.to_string()));
        let outcome = node.query(&encode(&q));
        assert_eq!(outcome.code, CODE_OK, "query failed: {}", outcome.log);
        serde_json::from_slice::<QueryResult>(&outcome.value)
            .unwrap()
            .files
    }

    #[tokio::test]
    async fn test_add_then_query_returns_the_file() {
        let (node, content) = open_node();
        let k1 = Ed25519KeyPair::generate();
        let h1 = content.publish(b"document one");

        let tx = encode(&signed_delivery(&k1, TxAction::Add, &[h1.clone()]));
        assert_eq!(deliver(&node, &tx).await, CODE_OK);
        node.commit().unwrap();

        assert_eq!(owned_files(&node, &k1), vec![h1]);
    }

    #[tokio::test]
    async fn test_single_slot_rejects_multi_file_delivery() {
        let (node, content) = single_slot_node();
        let k1 = Ed25519KeyPair::generate();
        let h1 = content.publish(b"one");
        let h2 = content.publish(b"two");

        let tx = encode(&signed_delivery(&k1, TxAction::Add, &[h1, h2]));
        assert_eq!(deliver(&node, &tx).await, CODE_UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_single_slot_rejects_second_registration() {
        let (node, content) = single_slot_node();
        let k1 = Ed25519KeyPair::generate();
        let h1 = content.publish(b"one");
        let h2 = content.publish(b"two");

        let first = encode(&signed_delivery(&k1, TxAction::Add, &[h1]));
        assert_eq!(deliver(&node, &first).await, CODE_OK);

        let second = encode(&signed_delivery(&k1, TxAction::Add, &[h2]));
        assert_eq!(deliver(&node, &second).await, CODE_UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_transfer_moves_removal_rights() {
        let (node, content) = open_node();
        let k1 = Ed25519KeyPair::generate();
        let k2 = Ed25519KeyPair::generate();
        let h1 = content.publish(b"deed");

        let add = encode(&signed_delivery(&k1, TxAction::Add, &[h1.clone()]));
        assert_eq!(deliver(&node, &add).await, CODE_OK);

        let send = encode(&signed_send(&k1, Some(&k2), &[h1.clone()]));
        assert_eq!(deliver(&node, &send).await, CODE_OK);

        let remove_by_old_owner = encode(&signed_delivery(&k1, TxAction::Remove, &[h1.clone()]));
        assert_eq!(deliver(&node, &remove_by_old_owner).await, CODE_UNAUTHORIZED);

        let remove_by_new_owner = encode(&signed_delivery(&k2, TxAction::Remove, &[h1.clone()]));
        assert_eq!(deliver(&node, &remove_by_new_owner).await, CODE_OK);

        assert!(owned_files(&node, &k2).is_empty());
    }

    #[tokio::test]
    async fn test_query_past_tolerance_is_refused() {
        let config = LedgerConfig::default();
        let signed_at = Utc::now();
        let evaluated_at = signed_at + config.query_tolerance + Duration::seconds(1);
        let (node, content) = service_fixture(config, evaluated_at);

        let k1 = Ed25519KeyPair::generate();
        let h1 = content.publish(b"doc");
        let add = encode(&signed_delivery(&k1, TxAction::Add, &[h1]));
        assert_eq!(deliver(&node, &add).await, CODE_OK);

        let q = encode(&signed_query(&k1, signed_at, None, None));
        let outcome = node.query(&q);
        assert_eq!(outcome.code, CODE_UNAUTHORIZED);
        assert!(outcome.log.contains("passed its time"));
    }

    #[tokio::test]
    async fn test_ownership_stays_unique_across_mixed_sequence() {
        let (node, content) = open_node();
        let parties: Vec<Ed25519KeyPair> = (0..3).map(|_| Ed25519KeyPair::generate()).collect();
        let hashes: Vec<String> = (0..4)
            .map(|i| content.publish(format!("content-{i}").as_bytes()))
            .collect();

        // A mixed sequence: registrations, a transfer chain, a removal,
        // a re-registration by someone else.
        let steps: Vec<Vec<u8>> = vec![
            encode(&signed_delivery(
                &parties[0],
                TxAction::Add,
                &hashes[0..2],
            )),
            encode(&signed_delivery(&parties[1], TxAction::Add, &hashes[2..3])),
            encode(&signed_send(&parties[0], Some(&parties[2]), &hashes[0..1])),
            encode(&signed_send(&parties[2], Some(&parties[1]), &hashes[0..1])),
            encode(&signed_delivery(
                &parties[1],
                TxAction::Remove,
                &hashes[2..3],
            )),
            encode(&signed_delivery(&parties[2], TxAction::Add, &hashes[2..3])),
            encode(&signed_delivery(&parties[0], TxAction::Add, &hashes[3..4])),
        ];
        for step in &steps {
            assert_eq!(deliver(&node, step).await, CODE_OK);
        }
        node.commit().unwrap();

        // Every registered hash appears in exactly one owner's set.
        let mut seen = std::collections::HashMap::new();
        for party in &parties {
            for file in owned_files(&node, party) {
                let addr = Address::from_public_key(&party.public_key());
                assert!(
                    seen.insert(file.clone(), addr.clone()).is_none(),
                    "{file} owned by more than one address"
                );
            }
        }
        assert_eq!(seen.len(), hashes.len());
    }

    #[tokio::test]
    async fn test_single_slot_invariant_after_transfers() {
        let (node, content) = single_slot_node();
        let k1 = Ed25519KeyPair::generate();
        let k2 = Ed25519KeyPair::generate();
        let h1 = content.publish(b"slot");

        let add = encode(&signed_delivery(&k1, TxAction::Add, &[h1.clone()]));
        assert_eq!(deliver(&node, &add).await, CODE_OK);
        let send = encode(&signed_send(&k1, Some(&k2), &[h1.clone()]));
        assert_eq!(deliver(&node, &send).await, CODE_OK);

        // Receiver now occupies its slot; further transfers to it refuse.
        let h2 = content.publish(b"second");
        let k3 = Ed25519KeyPair::generate();
        let add2 = encode(&signed_delivery(&k3, TxAction::Add, &[h2.clone()]));
        assert_eq!(deliver(&node, &add2).await, CODE_OK);
        let send2 = encode(&signed_send(&k3, Some(&k2), &[h2]));
        assert_eq!(deliver(&node, &send2).await, CODE_UNAUTHORIZED);

        let lookup = encode(&OwnerLookup {
            from: k2.public_key().as_bytes().to_vec(),
        });
        let outcome = node.query(&lookup);
        assert_eq!(outcome.code, CODE_OK);
        let result: QueryResult = serde_json::from_slice(&outcome.value).unwrap();
        assert_eq!(result.files, vec![h1]);
    }

    #[tokio::test]
    async fn test_commit_digest_agrees_across_replicas() {
        // Two nodes fed the same delivery sequence must commit the same
        // digest at every height.
        let run_replica = |seed: u8| async move {
            let (node, content) = open_node();
            let k1 = Ed25519KeyPair::from_seed([seed; 32]);
            let k2 = Ed25519KeyPair::from_seed([seed.wrapping_add(1); 32]);
            let h1 = content.publish(b"replicated one");
            let h2 = content.publish(b"replicated two");

            let mut digests = Vec::new();
            let add = encode(&signed_delivery(&k1, TxAction::Add, &[h1.clone(), h2]));
            assert_eq!(deliver(&node, &add).await, CODE_OK);
            digests.push(node.commit().unwrap().data);

            let send = encode(&signed_send(&k1, Some(&k2), &[h1]));
            assert_eq!(deliver(&node, &send).await, CODE_OK);
            digests.push(node.commit().unwrap().data);
            digests
        };
        assert_eq!(run_replica(7).await, run_replica(7).await);
    }

    #[tokio::test]
    async fn test_content_daemon_outage_fails_validation_not_node() {
        let (node, content) = open_node();
        let k1 = Ed25519KeyPair::generate();
        let h1 = content.publish(b"doc");
        content.fail_lookups();

        let tx = encode(&signed_delivery(&k1, TxAction::Add, &[h1]));
        let outcome = node.admit(&tx).await;
        assert_eq!(outcome.code, shared_types::CODE_ENCODING_ERROR);
        assert!(!outcome.log.is_empty());
    }
}
