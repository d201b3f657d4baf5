//! # Outbound Ports (Driven Ports)
//!
//! Dependencies the ledger service requires the host application to
//! implement.

use crate::domain::errors::{ContentStoreError, StoreError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Abstract interface for the ledger's key-value store.
///
/// The store is the only mutable shared resource: admission checks and
/// queries read it concurrently while finalization writes it from a single
/// serialized stream. Implementations take `&self` and guard their state
/// internally (one writer / many readers is sufficient).
///
/// Production and testing: `InMemoryStore` (adapters/memory_store.rs).
pub trait KeyValueStore: Send + Sync {
    /// Get a value by key.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError>;

    /// Put a key-value pair.
    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError>;

    /// Delete a key. Deleting an absent key is not an error.
    fn delete(&self, key: &[u8]) -> Result<(), StoreError>;

    /// Check if a key exists.
    fn has(&self, key: &[u8]) -> Result<bool, StoreError>;

    /// All entries whose key starts with `prefix`, in ascending key order.
    ///
    /// Key order matters: the commit digest folds over this sequence.
    fn prefix_scan(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StoreError>;
}

/// Existence oracle for the external content-addressed store.
///
/// The core never stores or fetches file content; it only asks whether a
/// hash is known. Implementations must bound the lookup with a timeout and
/// report failures, never swallow them.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Whether `hash` refers to an object present in the store.
    async fn exists(&self, hash: &str) -> Result<bool, ContentStoreError>;
}

/// Clock abstraction for query freshness checks.
///
/// Time is read at query evaluation only and never persisted, keeping the
/// committed state independent of wall clocks.
pub trait TimeSource: Send + Sync {
    /// Current UTC time.
    fn now(&self) -> DateTime<Utc>;
}
