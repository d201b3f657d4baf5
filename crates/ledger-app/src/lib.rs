//! # Ledger Application
//!
//! The replicated state machine behind the Hashline ownership ledger. A
//! consensus engine drives it through four operations (admit, finalize,
//! commit, query) and every replica must answer them byte-for-byte
//! identically from the same transaction sequence.
//!
//! ## Architecture
//!
//! This crate follows hexagonal architecture:
//! - **Domain Layer** (`domain/`): validation pipeline, mutations, queries,
//!   store layout, canonical envelope codec. Deterministic, no I/O except
//!   through ports.
//! - **Ports Layer** (`ports/`): the inbound protocol API and the outbound
//!   `KeyValueStore` / `ContentStore` / `TimeSource` interfaces.
//! - **Adapters Layer** (`adapters/`): in-memory store and system clock.
//! - **Service Layer** (`service.rs`): wires domain logic to ports and
//!   implements the protocol surface.
//!
//! ## Determinism Notes
//!
//! - Wall-clock time enters only through the `TimeSource` port and only for
//!   query freshness; it is never persisted.
//! - The commit digest is derived from store content alone, iterated in key
//!   order.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;
pub mod test_utils;

// Re-export public API
pub use domain::config::LedgerConfig;
pub use domain::errors::{ContentStoreError, Rejection, StoreError};
pub use ports::inbound::LedgerProtocol;
pub use ports::outbound::{ContentStore, KeyValueStore, TimeSource};
pub use service::LedgerService;
