//! # Transaction Validator
//!
//! The validation pipeline shared by admission and finalization. It is
//! side-effect free, so a transaction admitted successfully is guaranteed
//! to finalize successfully unless another transaction claimed one of its
//! file handles in between.
//!
//! Pipeline order, short-circuiting on the first failure:
//! 1. decode the sender key and verify the envelope signature;
//! 2. confirm every referenced hash exists in the content store;
//! 3. action-specific authorization against the ledger store.
//!
//! (Step 0, decoding the envelope bytes themselves, happens at the
//! protocol boundary in the service.)

use crate::domain::codec;
use crate::domain::config::LedgerConfig;
use crate::domain::errors::Rejection;
use crate::domain::state::LedgerStore;
use crate::ports::outbound::ContentStore;
use shared_crypto::{Address, Ed25519PublicKey};
use shared_types::{LedgerPolicy, TxAction, TxData, TxEnvelope};

/// Run the full pipeline against the current store. Never mutates.
pub async fn validate(
    envelope: &TxEnvelope,
    store: &LedgerStore,
    content: &dyn ContentStore,
    config: &LedgerConfig,
) -> Result<(), Rejection> {
    let key = codec::verify_envelope(&envelope.data, &envelope.signature, &envelope.data.from)?;
    let from_addr = Address::from_public_key(&key);

    for hash in &envelope.data.files {
        let exists = content
            .exists(hash)
            .await
            .map_err(|e| Rejection::encoding(format!("lookup of {hash} failed: {e}")))?;
        if !exists {
            return Err(Rejection::encoding(format!(
                "the file {hash} does not exist in the content store"
            )));
        }
    }

    match envelope.data.action {
        TxAction::Add => validate_add(store, config, &from_addr, &envelope.data.files),
        TxAction::Remove => validate_remove(store, &from_addr, &envelope.data.files),
        TxAction::Send => validate_send(store, config, &envelope.data, &from_addr),
    }
}

fn validate_add(
    store: &LedgerStore,
    config: &LedgerConfig,
    from_addr: &Address,
    files: &[String],
) -> Result<(), Rejection> {
    if config.policy == LedgerPolicy::SingleSlot {
        if files.len() > 1 {
            return Err(Rejection::unauthorized(
                "a single-slot ledger accepts at most one file per delivery",
            ));
        }
        if store.owns_any(from_addr)? {
            return Err(Rejection::unauthorized(
                "this address already owns a file on a single-slot ledger",
            ));
        }
    }
    for hash in files {
        if store.has_file(hash)? {
            return Err(Rejection::unauthorized(format!(
                "the hash {hash} already has an owner"
            )));
        }
    }
    Ok(())
}

fn validate_remove(
    store: &LedgerStore,
    from_addr: &Address,
    files: &[String],
) -> Result<(), Rejection> {
    for hash in files {
        match store.owner_of(hash)? {
            None => {
                return Err(Rejection::unauthorized(format!(
                    "the hash {hash} is not registered"
                )))
            }
            Some(owner) if owner != *from_addr => {
                return Err(Rejection::unauthorized(format!(
                    "the hash {hash} is not owned by you"
                )))
            }
            Some(_) => {}
        }
    }
    Ok(())
}

fn validate_send(
    store: &LedgerStore,
    config: &LedgerConfig,
    data: &TxData,
    from_addr: &Address,
) -> Result<(), Rejection> {
    let to_bytes = data
        .to
        .as_ref()
        .ok_or_else(|| Rejection::unauthorized("the receiver public key is missing"))?;
    let to_key = Ed25519PublicKey::from_slice(to_bytes)
        .map_err(|_| Rejection::encoding("the receiver public key is not correct"))?;
    let to_addr = Address::from_public_key(&to_key);

    if to_addr == *from_addr {
        return Err(Rejection::unauthorized(
            "the receiver is the same as the sender",
        ));
    }
    if config.policy == LedgerPolicy::SingleSlot && store.owns_any(&to_addr)? {
        return Err(Rejection::unauthorized(
            "the receiver already owns a file on a single-slot ledger",
        ));
    }
    for hash in &data.files {
        match store.owner_of(hash)? {
            Some(owner) if owner == *from_addr => {}
            _ => {
                return Err(Rejection::unauthorized(format!(
                    "you do not own the hash {hash}"
                )))
            }
        }
    }
    Ok(())
}
