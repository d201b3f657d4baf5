//! # Signed-Envelope Codec
//!
//! Canonicalizes and verifies signed payloads. The verifier reconstructs
//! the signed bytes independently of the signer, so serialization must be
//! canonical: identical logical content always produces identical bytes.
//!
//! This workspace does not enable serde_json's `preserve_order` feature,
//! so JSON objects are backed by a sorted map and always render with keys
//! in lexicographic order. `canonical_bytes` routes every payload through a
//! `serde_json::Value` tree to pin that property down, independent of
//! struct field declaration order.

use crate::domain::errors::Rejection;
use serde::Serialize;
use shared_crypto::{Ed25519PublicKey, Ed25519Signature};

/// Serialize a payload to its canonical signing bytes.
pub fn canonical_bytes<T: Serialize>(payload: &T) -> Result<Vec<u8>, Rejection> {
    let tree = serde_json::to_value(payload)
        .map_err(|e| Rejection::encoding(format!("payload does not serialize: {e}")))?;
    serde_json::to_vec(&tree)
        .map_err(|e| Rejection::encoding(format!("payload does not serialize: {e}")))
}

/// Verify `signature` over the canonical bytes of `payload` under the
/// public key `key_bytes`.
///
/// Returns the decoded key so callers can derive the signer's address
/// without decoding twice. Malformed key or signature bytes reject as
/// Encoding; a verification mismatch rejects as Unauthorized.
pub fn verify_envelope<T: Serialize>(
    payload: &T,
    signature: &[u8],
    key_bytes: &[u8],
) -> Result<Ed25519PublicKey, Rejection> {
    let key = Ed25519PublicKey::from_slice(key_bytes)
        .map_err(|_| Rejection::encoding("the sender public key is not correct"))?;
    let sig = Ed25519Signature::from_slice(signature)
        .map_err(|_| Rejection::encoding("the signature is not correct"))?;
    let message = canonical_bytes(payload)?;
    key.verify(&message, &sig)
        .map_err(|_| Rejection::unauthorized("the signature does not validate the data"))?;
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;
    use shared_crypto::Ed25519KeyPair;
    use shared_types::{TxAction, TxData};

    #[test]
    fn test_canonical_bytes_sorted_keys() {
        // Fields declared out of alphabetical order on purpose.
        #[derive(Serialize)]
        struct Scrambled {
            zeta: u32,
            alpha: u32,
            mid: u32,
        }

        let bytes = canonical_bytes(&Scrambled {
            zeta: 1,
            alpha: 2,
            mid: 3,
        })
        .unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            r#"{"alpha":2,"mid":3,"zeta":1}"#
        );
    }

    #[test]
    fn test_canonical_bytes_stable() {
        let data = TxData {
            from: vec![1, 2, 3],
            to: None,
            action: TxAction::Add,
            files: vec!["h1".to_string(), "h2".to_string()],
        };
        assert_eq!(
            canonical_bytes(&data).unwrap(),
            canonical_bytes(&data.clone()).unwrap()
        );
    }

    #[test]
    fn test_verify_envelope_accepts_valid() {
        let keypair = Ed25519KeyPair::generate();
        let data = TxData {
            from: keypair.public_key().as_bytes().to_vec(),
            to: None,
            action: TxAction::Add,
            files: vec!["h1".to_string()],
        };
        let sig = keypair.sign(&canonical_bytes(&data).unwrap());

        let result = verify_envelope(&data, &sig.to_vec(), &data.from);
        assert!(result.is_ok());
    }

    #[test]
    fn test_verify_envelope_rejects_tampered_payload() {
        let keypair = Ed25519KeyPair::generate();
        let mut data = TxData {
            from: keypair.public_key().as_bytes().to_vec(),
            to: None,
            action: TxAction::Add,
            files: vec!["h1".to_string()],
        };
        let sig = keypair.sign(&canonical_bytes(&data).unwrap());

        // Sneak in a file after signing.
        data.files.push("h2".to_string());

        let result = verify_envelope(&data, &sig.to_vec(), &data.from);
        assert!(matches!(result, Err(Rejection::Unauthorized(_))));
    }

    #[test]
    fn test_verify_envelope_rejects_garbage_key() {
        let data = TxData {
            from: vec![0u8; 3],
            to: None,
            action: TxAction::Add,
            files: vec![],
        };
        let result = verify_envelope(&data, &[0u8; 64], &data.from);
        assert!(matches!(result, Err(Rejection::Encoding(_))));
    }

    #[test]
    fn test_verify_envelope_rejects_short_signature() {
        let keypair = Ed25519KeyPair::generate();
        let data = TxData {
            from: keypair.public_key().as_bytes().to_vec(),
            to: None,
            action: TxAction::Add,
            files: vec![],
        };
        let result = verify_envelope(&data, &[0u8; 10], &data.from);
        assert!(matches!(result, Err(Rejection::Encoding(_))));
    }
}
