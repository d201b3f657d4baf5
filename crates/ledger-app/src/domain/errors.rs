//! Rejection taxonomy and store errors.
//!
//! Every failure inside the pipeline becomes a [`Rejection`]; nothing
//! panics across the protocol boundary. The two classes map onto the wire
//! outcome codes.

use shared_types::{TxOutcome, CODE_ENCODING_ERROR, CODE_UNAUTHORIZED};
use thiserror::Error;

/// Why a transaction or query was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    /// Malformed bytes, undecodable keys or signatures, or a referenced
    /// file missing from the content store.
    #[error("{0}")]
    Encoding(String),

    /// Signature mismatch, ownership violation, policy violation,
    /// staleness, or missing authorization.
    #[error("{0}")]
    Unauthorized(String),
}

impl Rejection {
    /// Build an encoding-class rejection.
    pub fn encoding(msg: impl Into<String>) -> Self {
        Rejection::Encoding(msg.into())
    }

    /// Build an unauthorized-class rejection.
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Rejection::Unauthorized(msg.into())
    }

    /// The wire outcome code for this rejection class.
    pub fn code(&self) -> u32 {
        match self {
            Rejection::Encoding(_) => CODE_ENCODING_ERROR,
            Rejection::Unauthorized(_) => CODE_UNAUTHORIZED,
        }
    }
}

impl From<Rejection> for TxOutcome {
    fn from(rejection: Rejection) -> Self {
        TxOutcome {
            code: rejection.code(),
            log: rejection.to_string(),
        }
    }
}

/// Errors from the key-value store port.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A lock guarding the store was poisoned by a panicking writer.
    #[error("Store lock poisoned")]
    LockPoisoned,

    /// A stored value failed to decode.
    #[error("Corrupt value under key {key}: {reason}")]
    Corrupt { key: String, reason: String },
}

impl From<StoreError> for Rejection {
    fn from(err: StoreError) -> Self {
        Rejection::Encoding(format!("ledger store failure: {err}"))
    }
}

/// Errors from the content-addressed store port.
///
/// A lookup failure is never a silent pass; it surfaces as an
/// encoding-class rejection of the transaction under validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentStoreError {
    /// The store daemon could not be reached or answered with an error.
    #[error("content store request failed: {0}")]
    Request(String),

    /// The bounded lookup timeout elapsed.
    #[error("content store request timed out")]
    Timeout,
}
