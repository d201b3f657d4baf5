//! # Shared Types Crate
//!
//! This crate contains the wire entities exchanged between the consensus
//! engine and the ledger application, plus the outcome codes every protocol
//! response carries.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: the envelope and response shapes live here
//!   and nowhere else; `ledger-app`, `node-runtime`, and the test suite all
//!   import them.
//! - **Field names are the compatibility surface**: the JSON field names
//!   (`Signature`, `Data`, `From`, ...) are fixed by the wire protocol and
//!   must never drift. Byte fields travel as base64 strings.

pub mod entities;

pub use entities::*;
