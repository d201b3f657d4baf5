//! Ledger configuration.
//!
//! Injected into the service at construction so multiple instances (e.g. in
//! tests) never interfere; nothing here is process-global or mutable after
//! startup.

use chrono::Duration;
use shared_crypto::Address;
use shared_types::LedgerPolicy;
use std::collections::HashSet;

/// Configuration of one ledger instance.
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// Consistency policy; also selects the query dialect.
    pub policy: LedgerPolicy,
    /// How far in the past a signed query's `Time` may lie.
    pub query_tolerance: Duration,
    /// Addresses allowed to inspect other users' files via signed queries.
    pub authorized: HashSet<Address>,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            policy: LedgerPolicy::Open,
            query_tolerance: Duration::seconds(5),
            authorized: HashSet::new(),
        }
    }
}

impl LedgerConfig {
    /// Whether `addr` may query other users' files.
    pub fn is_authorized(&self, addr: &Address) -> bool {
        self.authorized.contains(addr)
    }
}
