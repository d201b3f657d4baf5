//! # Transaction Mutator
//!
//! Applies a validated transaction to the ledger store. Only the
//! finalization path calls this, strictly in delivery order, after the
//! validator has passed, so every write here is authorized and the
//! multi-file actions apply in full or not at all.

use crate::domain::config::LedgerConfig;
use crate::domain::errors::Rejection;
use crate::domain::state::LedgerStore;
use shared_crypto::{Address, Ed25519PublicKey};
use shared_types::{LedgerPolicy, TxAction, TxData};

/// Apply the action of a validated transaction.
pub fn apply(data: &TxData, store: &LedgerStore, config: &LedgerConfig) -> Result<(), Rejection> {
    let from_addr = derive(&data.from, "sender")?;
    match data.action {
        TxAction::Add => apply_add(store, &from_addr, &data.files),
        TxAction::Remove => apply_remove(store, &from_addr, &data.files),
        TxAction::Send => {
            let to_bytes = data
                .to
                .as_ref()
                .ok_or_else(|| Rejection::unauthorized("the receiver public key is missing"))?;
            let to_addr = derive(to_bytes, "receiver")?;
            apply_send(store, config, &from_addr, &to_addr, &data.files)
        }
    }
}

fn derive(key_bytes: &[u8], who: &str) -> Result<Address, Rejection> {
    let key = Ed25519PublicKey::from_slice(key_bytes)
        .map_err(|_| Rejection::encoding(format!("the {who} public key is not correct")))?;
    Ok(Address::from_public_key(&key))
}

fn apply_add(store: &LedgerStore, from: &Address, files: &[String]) -> Result<(), Rejection> {
    store.append_files(from, files)?;
    for hash in files {
        store.set_owner(hash, from)?;
    }
    Ok(())
}

fn apply_remove(store: &LedgerStore, from: &Address, files: &[String]) -> Result<(), Rejection> {
    store.remove_files(from, files)?;
    for hash in files {
        store.clear_owner(hash)?;
    }
    Ok(())
}

fn apply_send(
    store: &LedgerStore,
    config: &LedgerConfig,
    from: &Address,
    to: &Address,
    files: &[String],
) -> Result<(), Rejection> {
    store.remove_files(from, files)?;
    store.append_files(to, files)?;

    if config.policy == LedgerPolicy::SingleSlot {
        // Hard single-slot guarantee: the receiver ends up with exactly the
        // transferred set and the sender with nothing, even if the generic
        // list surgery above ever diverges.
        store.write_files(to, files)?;
        store.write_files(from, &[])?;
    }
    for hash in files {
        store.set_owner(hash, to)?;
    }
    Ok(())
}
