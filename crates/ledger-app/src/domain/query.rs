//! # Query Engine
//!
//! Two read-only dialects over the ownership indices, selected by the
//! configured policy:
//!
//! - **Signed query** (open ledger): signature-verified and
//!   freshness-checked, with an authorization gate for inspecting other
//!   users' files.
//! - **Owner lookup** (single-slot ledger): unauthenticated. Anyone who
//!   knows an address's public key bytes can enumerate its files without
//!   proving possession of the private key. This is a deliberate relaxation of
//!   the single-slot deployment, preserved here and called out so
//!   operators understand the exposure.
//!
//! Neither dialect mutates state.

use crate::domain::codec;
use crate::domain::config::LedgerConfig;
use crate::domain::errors::Rejection;
use crate::domain::state::LedgerStore;
use chrono::{DateTime, Utc};
use shared_crypto::{Address, Ed25519PublicKey};
use shared_types::{OwnerLookup, QueryResult, SignedQuery};

/// Answer a freshness-checked signed query (mode A).
pub fn answer_signed_query(
    query: &SignedQuery,
    store: &LedgerStore,
    config: &LedgerConfig,
    now: DateTime<Utc>,
) -> Result<QueryResult, Rejection> {
    let key = codec::verify_envelope(&query.data, &query.signature, &query.data.from)?;

    if now.signed_duration_since(query.data.time) > config.query_tolerance {
        return Err(Rejection::unauthorized("the query passed its time"));
    }

    let caller = Address::from_public_key(&key);
    let target = match &query.data.user_addr {
        None => caller,
        Some(raw) => {
            let target = Address::parse(raw)
                .map_err(|_| Rejection::encoding("the requested address is not correct"))?;
            if target != caller && !config.is_authorized(&caller) {
                return Err(Rejection::unauthorized(
                    "you are not authorized to check other users' files",
                ));
            }
            target
        }
    };

    let files = store.files_of(&target)?;
    let files = match &query.data.file {
        None => files,
        Some(wanted) if files.contains(wanted) => vec![wanted.clone()],
        Some(_) => Vec::new(),
    };
    Ok(QueryResult { files })
}

/// Answer an unauthenticated owner lookup (mode B).
pub fn answer_owner_lookup(
    lookup: &OwnerLookup,
    store: &LedgerStore,
) -> Result<QueryResult, Rejection> {
    let key = Ed25519PublicKey::from_slice(&lookup.from)
        .map_err(|_| Rejection::encoding("the public key is not correct"))?;
    let files = store.files_of(&Address::from_public_key(&key))?;
    Ok(QueryResult { files })
}
