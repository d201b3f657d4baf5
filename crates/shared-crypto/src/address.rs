//! # Addresses
//!
//! A principal is identified by the address derived from its public key:
//! the upper-case hex encoding of the first 20 bytes of the SHA-256 digest
//! of the raw key bytes. Derivation is the only way two replicas agree on
//! who a key is, so it must never change shape.

use crate::{CryptoError, Ed25519PublicKey};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Number of digest bytes kept in an address.
const ADDRESS_LEN: usize = 20;

/// A fixed-size identifier derived deterministically from a public key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address(String);

impl Address {
    /// Derive the address of a public key.
    pub fn from_public_key(key: &Ed25519PublicKey) -> Self {
        let digest = Sha256::digest(key.as_bytes());
        Self(hex::encode_upper(&digest[..ADDRESS_LEN]))
    }

    /// Parse an address supplied on the wire (e.g. a query's `UserAddr`).
    pub fn parse(s: &str) -> Result<Self, CryptoError> {
        let decoded =
            hex::decode(s).map_err(|_| CryptoError::InvalidAddress(s.to_string()))?;
        if decoded.len() != ADDRESS_LEN {
            return Err(CryptoError::InvalidAddress(s.to_string()));
        }
        Ok(Self(s.to_uppercase()))
    }

    /// The hex form used as a store key component.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
