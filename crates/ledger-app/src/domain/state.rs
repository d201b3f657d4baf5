//! # Ledger Store Layout
//!
//! One logical key-value namespace holding:
//! - a reserved version record under [`VERSION_KEY`];
//! - `file:<hash>` → owner address (UTF-8 hex);
//! - `user:<address>` → JSON array of owned hashes, in registration order.
//!
//! Invariant: the two index families always agree. A file's owner entry
//! and its membership in exactly one user list are written together, and an
//! address whose list becomes empty loses its `user:` entry entirely
//! (empty containers are never stored).

use crate::domain::errors::StoreError;
use crate::ports::outbound::KeyValueStore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use shared_crypto::Address;
use std::sync::Arc;

/// Reserved key for the version record.
pub const VERSION_KEY: &[u8] = b"state";
/// Prefix of the file → owner index.
pub const FILE_KEY_PREFIX: &[u8] = b"file:";
/// Prefix of the owner → files index.
pub const USER_KEY_PREFIX: &[u8] = b"user:";

/// Store key of a file's owner entry.
pub fn file_key(hash: &str) -> Vec<u8> {
    let mut key = FILE_KEY_PREFIX.to_vec();
    key.extend_from_slice(hash.as_bytes());
    key
}

/// Store key of an address's owned-file list.
pub fn user_key(addr: &Address) -> Vec<u8> {
    let mut key = USER_KEY_PREFIX.to_vec();
    key.extend_from_slice(addr.as_str().as_bytes());
    key
}

/// The persisted version record: `{size, height, app_hash}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainVersion {
    /// Number of data entries at the last commit.
    pub size: u64,
    /// Commit height; increments by exactly one per commit.
    pub height: u64,
    /// Content digest at the last commit.
    pub app_hash: Vec<u8>,
}

/// Typed access to the ledger's key families over the raw store port.
#[derive(Clone)]
pub struct LedgerStore {
    db: Arc<dyn KeyValueStore>,
}

impl LedgerStore {
    /// Wrap a raw key-value store.
    pub fn new(db: Arc<dyn KeyValueStore>) -> Self {
        Self { db }
    }

    // -------------------------------------------------------------------------
    // Version record
    // -------------------------------------------------------------------------

    /// Load the version record, or a zero record if none was ever saved.
    pub fn load_version(&self) -> Result<ChainVersion, StoreError> {
        match self.db.get(VERSION_KEY)? {
            None => Ok(ChainVersion::default()),
            Some(bytes) => serde_json::from_slice(&bytes).map_err(|e| StoreError::Corrupt {
                key: "state".to_string(),
                reason: e.to_string(),
            }),
        }
    }

    /// Persist the version record.
    pub fn save_version(&self, version: &ChainVersion) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(version).map_err(|e| StoreError::Corrupt {
            key: "state".to_string(),
            reason: e.to_string(),
        })?;
        self.db.put(VERSION_KEY, &bytes)
    }

    // -------------------------------------------------------------------------
    // File → owner index
    // -------------------------------------------------------------------------

    /// Current owner of `hash`, if registered.
    pub fn owner_of(&self, hash: &str) -> Result<Option<Address>, StoreError> {
        match self.db.get(&file_key(hash))? {
            None => Ok(None),
            Some(bytes) => {
                let text = String::from_utf8(bytes).map_err(|e| StoreError::Corrupt {
                    key: format!("file:{hash}"),
                    reason: e.to_string(),
                })?;
                let addr = Address::parse(&text).map_err(|e| StoreError::Corrupt {
                    key: format!("file:{hash}"),
                    reason: e.to_string(),
                })?;
                Ok(Some(addr))
            }
        }
    }

    /// Whether `hash` is registered to anyone.
    pub fn has_file(&self, hash: &str) -> Result<bool, StoreError> {
        self.db.has(&file_key(hash))
    }

    /// Record `addr` as the owner of `hash`.
    pub fn set_owner(&self, hash: &str, addr: &Address) -> Result<(), StoreError> {
        self.db.put(&file_key(hash), addr.as_str().as_bytes())
    }

    /// Unregister `hash`.
    pub fn clear_owner(&self, hash: &str) -> Result<(), StoreError> {
        self.db.delete(&file_key(hash))
    }

    // -------------------------------------------------------------------------
    // Owner → files index
    // -------------------------------------------------------------------------

    /// Files owned by `addr`, in registration order; empty if none.
    pub fn files_of(&self, addr: &Address) -> Result<Vec<String>, StoreError> {
        match self.db.get(&user_key(addr))? {
            None => Ok(Vec::new()),
            Some(bytes) => serde_json::from_slice(&bytes).map_err(|e| StoreError::Corrupt {
                key: format!("user:{addr}"),
                reason: e.to_string(),
            }),
        }
    }

    /// Whether `addr` currently owns any file.
    pub fn owns_any(&self, addr: &Address) -> Result<bool, StoreError> {
        self.db.has(&user_key(addr))
    }

    /// Replace `addr`'s owned-file list; an empty list deletes the entry.
    pub fn write_files(&self, addr: &Address, files: &[String]) -> Result<(), StoreError> {
        if files.is_empty() {
            return self.db.delete(&user_key(addr));
        }
        let bytes = serde_json::to_vec(files).map_err(|e| StoreError::Corrupt {
            key: format!("user:{addr}"),
            reason: e.to_string(),
        })?;
        self.db.put(&user_key(addr), &bytes)
    }

    /// Append `files` to `addr`'s list, preserving registration order.
    pub fn append_files(&self, addr: &Address, files: &[String]) -> Result<(), StoreError> {
        let mut current = self.files_of(addr)?;
        current.extend(files.iter().cloned());
        self.write_files(addr, &current)
    }

    /// Remove `files` from `addr`'s list, deleting the entry if it empties.
    pub fn remove_files(&self, addr: &Address, files: &[String]) -> Result<(), StoreError> {
        let mut current = self.files_of(addr)?;
        current.retain(|f| !files.contains(f));
        self.write_files(addr, &current)
    }

    // -------------------------------------------------------------------------
    // Commitment
    // -------------------------------------------------------------------------

    /// Deterministic digest over all data entries, plus their count.
    ///
    /// SHA-256 over the key-sorted sequence of entries, each field
    /// length-prefixed; the version record itself is excluded so the digest
    /// reflects ledger content only. No wall-clock input, no map iteration
    /// order dependency.
    pub fn content_digest(&self) -> Result<([u8; 32], u64), StoreError> {
        let mut entries = self.db.prefix_scan(b"")?;
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        let mut hasher = Sha256::new();
        let mut size: u64 = 0;
        for (key, value) in &entries {
            if key.as_slice() == VERSION_KEY {
                continue;
            }
            hasher.update((key.len() as u64).to_le_bytes());
            hasher.update(key);
            hasher.update((value.len() as u64).to_le_bytes());
            hasher.update(value);
            size += 1;
        }
        Ok((hasher.finalize().into(), size))
    }
}
