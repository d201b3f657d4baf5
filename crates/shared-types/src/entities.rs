//! # Wire Entities
//!
//! Envelope and response shapes for the four protocol operations
//! (admit, finalize, commit, query).
//!
//! ## Clusters
//!
//! - **Transactions**: `TxEnvelope`, `TxData`, `TxAction`
//! - **Queries**: `SignedQuery`, `SignedQueryData`, `OwnerLookup`,
//!   `QueryResult`
//! - **Outcomes**: `TxOutcome`, `QueryOutcome`, `CommitOutcome`, code table
//! - **Policy**: `LedgerPolicy`

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{base64::Base64, serde_as};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// OUTCOME CODES
// =============================================================================

/// Success.
pub const CODE_OK: u32 = 0;
/// Malformed bytes, undecodable keys/signatures, or a referenced file that is
/// absent from the content store.
pub const CODE_ENCODING_ERROR: u32 = 1;
// Code 2 is reserved (bad-nonce slot in the historical code table).
/// Signature mismatch, ownership violation, policy violation, staleness, or
/// missing authorization.
pub const CODE_UNAUTHORIZED: u32 = 3;

// =============================================================================
// POLICY
// =============================================================================

/// Consistency policy for the ownership ledger.
///
/// Fixed at process startup; transactions cannot alter it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LedgerPolicy {
    /// No limit on the number of files an address may own.
    #[default]
    Open,
    /// An address may own at most one file at any time; a transaction may
    /// register at most one file.
    SingleSlot,
}

impl FromStr for LedgerPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(LedgerPolicy::Open),
            "single-slot" => Ok(LedgerPolicy::SingleSlot),
            other => Err(format!(
                "unknown ledger policy '{other}', expected 'open' or 'single-slot'"
            )),
        }
    }
}

impl fmt::Display for LedgerPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerPolicy::Open => write!(f, "open"),
            LedgerPolicy::SingleSlot => write!(f, "single-slot"),
        }
    }
}

// =============================================================================
// TRANSACTIONS
// =============================================================================

/// The closed set of ledger actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxAction {
    /// Register previously unowned files to the sender.
    Add,
    /// Unregister files currently owned by the sender.
    Remove,
    /// Transfer files from the sender to another address.
    Send,
}

/// The signed portion of a transaction envelope.
///
/// The signature in [`TxEnvelope`] covers the canonical serialization of this
/// struct, reconstructed independently by the verifier.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TxData {
    /// Sender's raw public key bytes.
    #[serde_as(as = "Base64")]
    pub from: Vec<u8>,
    /// Receiver's raw public key bytes; required for `Send`, absent otherwise.
    #[serde_as(as = "Option<Base64>")]
    #[serde(default)]
    pub to: Option<Vec<u8>>,
    /// The action to apply.
    pub action: TxAction,
    /// Content hashes the action operates on, in submission order.
    pub files: Vec<String>,
}

/// A signed transaction as submitted to admission and finalization.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TxEnvelope {
    /// Signature over the canonical bytes of `data`, under `data.from`.
    #[serde_as(as = "Base64")]
    pub signature: Vec<u8>,
    /// The signed payload.
    pub data: TxData,
}

// =============================================================================
// QUERIES
// =============================================================================

/// The signed portion of a freshness-checked (mode A) query.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SignedQueryData {
    /// Caller's raw public key bytes.
    #[serde_as(as = "Base64")]
    pub from: Vec<u8>,
    /// Client-chosen nonce; makes otherwise identical queries sign
    /// differently.
    pub nonce: String,
    /// Signing time (RFC 3339); checked against the responder's clock.
    pub time: DateTime<Utc>,
    /// Restrict the result to this single handle, if present.
    #[serde(default)]
    pub file: Option<String>,
    /// Query another address's files instead of the caller's own.
    #[serde(default)]
    pub user_addr: Option<String>,
}

/// A freshness-checked query envelope (mode A).
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SignedQuery {
    /// Signature over the canonical bytes of `data`, under `data.from`.
    #[serde_as(as = "Base64")]
    pub signature: Vec<u8>,
    /// The signed payload.
    pub data: SignedQueryData,
}

/// An unauthenticated single-owner lookup (mode B).
///
/// Carries no signature and undergoes no freshness check.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OwnerLookup {
    /// Raw public key bytes of the address to look up.
    #[serde_as(as = "Base64")]
    pub from: Vec<u8>,
}

/// The payload returned by both query dialects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct QueryResult {
    /// Owned file handles, in registration order.
    pub files: Vec<String>,
}

// =============================================================================
// OUTCOMES
// =============================================================================

/// Outcome of an admission or finalization call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxOutcome {
    /// One of the `CODE_*` constants.
    pub code: u32,
    /// Human-readable rejection reason; empty on success.
    pub log: String,
}

impl TxOutcome {
    /// Successful outcome.
    pub fn ok() -> Self {
        Self {
            code: CODE_OK,
            log: String::new(),
        }
    }

    /// Whether the call succeeded.
    pub fn is_ok(&self) -> bool {
        self.code == CODE_OK
    }
}

/// Outcome of a query call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryOutcome {
    /// One of the `CODE_*` constants.
    pub code: u32,
    /// Serialized [`QueryResult`] on success; empty on rejection.
    pub value: Vec<u8>,
    /// Human-readable rejection reason; empty on success.
    pub log: String,
}

impl QueryOutcome {
    /// Successful outcome carrying a result payload.
    pub fn ok(value: Vec<u8>) -> Self {
        Self {
            code: CODE_OK,
            value,
            log: String::new(),
        }
    }

    /// Whether the call succeeded.
    pub fn is_ok(&self) -> bool {
        self.code == CODE_OK
    }
}

/// Outcome of a commit call: the state commitment for the new height.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitOutcome {
    /// Deterministic digest of the committed store content.
    pub data: Vec<u8>,
}
