//! Crypto error types.

use thiserror::Error;

/// Cryptographic operation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// Public key bytes do not decode to a valid Ed25519 point.
    #[error("Invalid public key")]
    InvalidPublicKey,

    /// Signature bytes have the wrong length or shape.
    #[error("Invalid signature format")]
    InvalidSignatureFormat,

    /// Signature does not verify against the message and key.
    #[error("Signature verification failed")]
    SignatureVerificationFailed,

    /// Address string is not a valid hex-encoded digest prefix.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),
}
