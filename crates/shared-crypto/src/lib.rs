//! # Shared Crypto - Signing Primitives
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `signatures` | Ed25519 | Envelope signing and verification |
//! | `address` | SHA-256 truncation | Principal identifiers |
//!
//! ## Security Properties
//!
//! - **Ed25519**: deterministic nonces, no RNG dependency at signing time
//! - **Addresses**: fixed-size digest of the raw public key; any
//!   syntactically valid key is a valid principal, there is no registry

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod address;
pub mod errors;
pub mod signatures;

// Re-exports
pub use address::Address;
pub use errors::CryptoError;
pub use signatures::{Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature};
