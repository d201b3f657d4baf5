//! # Inbound Port (Driving Port)
//!
//! The four operations a consensus engine drives the application through.

use crate::domain::errors::StoreError;
use async_trait::async_trait;
use shared_types::{CommitOutcome, QueryOutcome, TxOutcome};

/// The protocol surface of the ledger application.
///
/// Calling discipline (the engine's responsibility, mirrored by the server
/// adapter): `admit` may run concurrently and out of order; `finalize` and
/// `commit` must arrive strictly in delivery order, one at a time. That
/// ordering is the sole source of determinism across replicas.
#[async_trait]
pub trait LedgerProtocol: Send + Sync {
    /// Validate raw transaction bytes without mutating state.
    async fn admit(&self, tx: &[u8]) -> TxOutcome;

    /// Validate raw transaction bytes and, on success, apply the action.
    async fn finalize(&self, tx: &[u8]) -> TxOutcome;

    /// Recompute the state digest, bump the height, persist the version
    /// record, and return the digest as the commitment for the new height.
    fn commit(&self) -> Result<CommitOutcome, StoreError>;

    /// Answer opaque query bytes; the configured policy selects the
    /// dialect. Never mutates state.
    fn query(&self, request: &[u8]) -> QueryOutcome;
}
