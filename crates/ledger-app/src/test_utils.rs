//! Test fixtures shared by this crate's unit tests and the workspace's
//! integration suite: signed-envelope builders and mock outbound adapters.

use crate::domain::codec::canonical_bytes;
use crate::domain::config::LedgerConfig;
use crate::domain::errors::ContentStoreError;
use crate::ports::outbound::{ContentStore, TimeSource};
use crate::service::LedgerService;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use shared_crypto::Ed25519KeyPair;
use shared_types::{SignedQuery, SignedQueryData, TxAction, TxData, TxEnvelope};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

/// Content store backed by a set of known hashes.
#[derive(Default)]
pub struct MockContentStore {
    known: RwLock<HashSet<String>>,
    failing: AtomicBool,
}

impl MockContentStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// "Upload" content and return its hash, like a real content daemon.
    pub fn publish(&self, content: &[u8]) -> String {
        let hash = hex::encode(Sha256::digest(content));
        self.known.write().unwrap().insert(hash.clone());
        hash
    }

    /// Make every subsequent lookup fail, simulating daemon outage.
    pub fn fail_lookups(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl ContentStore for MockContentStore {
    async fn exists(&self, hash: &str) -> Result<bool, ContentStoreError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(ContentStoreError::Request("daemon unreachable".into()));
        }
        Ok(self.known.read().unwrap().contains(hash))
    }
}

/// Clock frozen at a chosen instant.
pub struct FixedTimeSource(pub DateTime<Utc>);

impl TimeSource for FixedTimeSource {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Build and sign an Add or Remove envelope.
pub fn signed_delivery(keypair: &Ed25519KeyPair, action: TxAction, files: &[String]) -> TxEnvelope {
    assert!(
        action != TxAction::Send,
        "use signed_send for send envelopes"
    );
    let data = TxData {
        from: keypair.public_key().as_bytes().to_vec(),
        to: None,
        action,
        files: files.to_vec(),
    };
    sign_tx(keypair, data)
}

/// Build and sign a Send envelope; `to` may be omitted to exercise the
/// missing-receiver rejection.
pub fn signed_send(
    from: &Ed25519KeyPair,
    to: Option<&Ed25519KeyPair>,
    files: &[String],
) -> TxEnvelope {
    let data = TxData {
        from: from.public_key().as_bytes().to_vec(),
        to: to.map(|k| k.public_key().as_bytes().to_vec()),
        action: TxAction::Send,
        files: files.to_vec(),
    };
    sign_tx(from, data)
}

fn sign_tx(keypair: &Ed25519KeyPair, data: TxData) -> TxEnvelope {
    let bytes = canonical_bytes(&data).unwrap();
    TxEnvelope {
        signature: keypair.sign(&bytes).to_vec(),
        data,
    }
}

/// Build and sign a mode-A query.
pub fn signed_query(
    keypair: &Ed25519KeyPair,
    time: DateTime<Utc>,
    file: Option<String>,
    user_addr: Option<String>,
) -> SignedQuery {
    let data = SignedQueryData {
        from: keypair.public_key().as_bytes().to_vec(),
        nonce: "test-nonce".to_string(),
        time,
        file,
        user_addr,
    };
    let bytes = canonical_bytes(&data).unwrap();
    SignedQuery {
        signature: keypair.sign(&bytes).to_vec(),
        data,
    }
}

/// A service over fresh in-memory adapters plus handles to its mock
/// content store and a clock frozen at `now`.
pub fn service_fixture(
    config: LedgerConfig,
    now: DateTime<Utc>,
) -> (LedgerService, Arc<MockContentStore>) {
    let content = Arc::new(MockContentStore::new());
    let service = LedgerService::new(
        config,
        Arc::new(crate::adapters::memory_store::InMemoryStore::new()),
        content.clone(),
        Arc::new(FixedTimeSource(now)),
    )
    .expect("fresh store always loads");
    (service, content)
}
