//! # Ledger Service
//!
//! Application service that implements the [`LedgerProtocol`] inbound port:
//! decodes wire payloads at the boundary, delegates to the domain layer,
//! and translates every failure into an outcome code. No error escapes as
//! a panic.

use crate::domain::config::LedgerConfig;
use crate::domain::errors::{Rejection, StoreError};
use crate::domain::state::{ChainVersion, LedgerStore};
use crate::domain::{mutator, query, validator};
use crate::ports::inbound::LedgerProtocol;
use crate::ports::outbound::{ContentStore, KeyValueStore, TimeSource};
use async_trait::async_trait;
use shared_types::{
    CommitOutcome, LedgerPolicy, OwnerLookup, QueryOutcome, SignedQuery, TxEnvelope, TxOutcome,
};
use std::sync::{Arc, RwLock};
use tracing::{debug, info};

/// The ledger application behind the four protocol operations.
pub struct LedgerService {
    config: LedgerConfig,
    store: LedgerStore,
    content: Arc<dyn ContentStore>,
    time: Arc<dyn TimeSource>,
    version: RwLock<ChainVersion>,
}

impl LedgerService {
    /// Construct a service over the given adapters, resuming from the
    /// store's persisted version record if one exists.
    pub fn new(
        config: LedgerConfig,
        db: Arc<dyn KeyValueStore>,
        content: Arc<dyn ContentStore>,
        time: Arc<dyn TimeSource>,
    ) -> Result<Self, StoreError> {
        let store = LedgerStore::new(db);
        let version = store.load_version()?;
        info!(
            policy = %config.policy,
            height = version.height,
            "ledger service initialized"
        );
        Ok(Self {
            config,
            store,
            content,
            time,
            version: RwLock::new(version),
        })
    }

    /// Height of the last commit.
    pub fn height(&self) -> u64 {
        self.version.read().map(|v| v.height).unwrap_or(0)
    }

    fn decode_tx(tx: &[u8]) -> Result<TxEnvelope, Rejection> {
        serde_json::from_slice(tx)
            .map_err(|_| Rejection::encoding("the transaction envelope does not decode"))
    }
}

#[async_trait]
impl LedgerProtocol for LedgerService {
    async fn admit(&self, tx: &[u8]) -> TxOutcome {
        let envelope = match Self::decode_tx(tx) {
            Ok(env) => env,
            Err(rejection) => return rejection.into(),
        };
        match validator::validate(&envelope, &self.store, self.content.as_ref(), &self.config)
            .await
        {
            Ok(()) => TxOutcome::ok(),
            Err(rejection) => {
                debug!(%rejection, action = ?envelope.data.action, "transaction refused at admission");
                rejection.into()
            }
        }
    }

    async fn finalize(&self, tx: &[u8]) -> TxOutcome {
        let envelope = match Self::decode_tx(tx) {
            Ok(env) => env,
            Err(rejection) => return rejection.into(),
        };
        // Identical pipeline as admission, against the store as it stands
        // now in the delivery sequence.
        if let Err(rejection) =
            validator::validate(&envelope, &self.store, self.content.as_ref(), &self.config).await
        {
            debug!(%rejection, action = ?envelope.data.action, "transaction refused at finalization");
            return rejection.into();
        }
        match mutator::apply(&envelope.data, &self.store, &self.config) {
            Ok(()) => {
                info!(
                    action = ?envelope.data.action,
                    files = envelope.data.files.len(),
                    "transaction delivered"
                );
                TxOutcome::ok()
            }
            Err(rejection) => rejection.into(),
        }
    }

    fn commit(&self) -> Result<CommitOutcome, StoreError> {
        let (digest, size) = self.store.content_digest()?;
        let mut version = self.version.write().map_err(|_| StoreError::LockPoisoned)?;
        version.height += 1;
        version.size = size;
        version.app_hash = digest.to_vec();
        self.store.save_version(&version)?;
        info!(height = version.height, size, "state committed");
        Ok(CommitOutcome {
            data: version.app_hash.clone(),
        })
    }

    fn query(&self, request: &[u8]) -> QueryOutcome {
        let result = match self.config.policy {
            LedgerPolicy::Open => serde_json::from_slice::<SignedQuery>(request)
                .map_err(|_| Rejection::encoding("the query envelope does not decode"))
                .and_then(|q| {
                    query::answer_signed_query(&q, &self.store, &self.config, self.time.now())
                }),
            LedgerPolicy::SingleSlot => serde_json::from_slice::<OwnerLookup>(request)
                .map_err(|_| Rejection::encoding("the lookup request does not decode"))
                .and_then(|q| query::answer_owner_lookup(&q, &self.store)),
        };
        match result {
            Ok(payload) => match serde_json::to_vec(&payload) {
                Ok(value) => QueryOutcome::ok(value),
                Err(e) => QueryOutcome {
                    code: shared_types::CODE_ENCODING_ERROR,
                    value: Vec::new(),
                    log: format!("the result does not serialize: {e}"),
                },
            },
            Err(rejection) => {
                debug!(%rejection, "query refused");
                QueryOutcome {
                    code: rejection.code(),
                    value: Vec::new(),
                    log: rejection.to_string(),
                }
            }
        }
    }
}
