//! # Runtime Configuration
//!
//! CLI surface and derived runtime parameters. The ledger's own
//! configuration (`LedgerConfig`) is assembled from these options at
//! startup, after the authorized list has been fetched.

use clap::Parser;
use ledger_app::LedgerConfig;
use shared_types::LedgerPolicy;

/// Command-line options for the node process.
#[derive(Debug, Parser)]
#[command(name = "hashline-node", about = "Content-ownership ledger state machine")]
pub struct NodeOptions {
    /// Base URL of the content daemon's HTTP API.
    #[arg(long = "content-api", default_value = "http://127.0.0.1:5001")]
    pub content_api: String,

    /// TCP address the protocol server listens on for a consensus engine.
    #[arg(long = "listen", default_value = "0.0.0.0:46658")]
    pub listen: String,

    /// Content hash of a JSON list of addresses authorized to query other
    /// users' files. Empty means nobody is.
    #[arg(long = "auth", default_value = "")]
    pub authorized_hash: String,

    /// Seconds a signed query stays acceptable after its signing time.
    #[arg(long = "wait", default_value_t = 5)]
    pub query_tolerance_secs: i64,

    /// Consistency policy: "open" or "single-slot".
    #[arg(long = "policy", default_value_t = LedgerPolicy::Open)]
    pub policy: LedgerPolicy,
}

/// Everything the process needs beyond the ledger's own configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Content daemon API base URL.
    pub content_api: String,
    /// Protocol server listen address.
    pub listen: String,
    /// Authorized-list content hash; empty when unset.
    pub authorized_hash: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            content_api: "http://127.0.0.1:5001".to_string(),
            listen: "0.0.0.0:46658".to_string(),
            authorized_hash: String::new(),
        }
    }
}

impl NodeOptions {
    /// Split the parsed options into process-level and ledger-level
    /// configuration. The authorized set starts empty; the caller fills
    /// it in once the list has been fetched.
    pub fn into_configs(self) -> (RuntimeConfig, LedgerConfig) {
        let runtime = RuntimeConfig {
            content_api: self.content_api,
            listen: self.listen,
            authorized_hash: self.authorized_hash,
        };
        let ledger = LedgerConfig {
            policy: self.policy,
            query_tolerance: chrono::Duration::seconds(self.query_tolerance_secs),
            ..LedgerConfig::default()
        };
        (runtime, ledger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_the_documented_surface() {
        let opts = NodeOptions::parse_from(["hashline-node"]);
        assert_eq!(opts.content_api, "http://127.0.0.1:5001");
        assert_eq!(opts.listen, "0.0.0.0:46658");
        assert!(opts.authorized_hash.is_empty());
        assert_eq!(opts.query_tolerance_secs, 5);
        assert_eq!(opts.policy, LedgerPolicy::Open);
    }

    #[test]
    fn test_policy_flag_parses_both_modes() {
        let opts = NodeOptions::parse_from(["hashline-node", "--policy", "single-slot"]);
        assert_eq!(opts.policy, LedgerPolicy::SingleSlot);
    }

    #[test]
    fn test_unknown_policy_aborts_parsing() {
        assert!(NodeOptions::try_parse_from(["hashline-node", "--policy", "spb"]).is_err());
    }

    #[test]
    fn test_into_configs_carries_tolerance() {
        let opts = NodeOptions::parse_from(["hashline-node", "--wait", "30"]);
        let (_, ledger) = opts.into_configs();
        assert_eq!(ledger.query_tolerance, chrono::Duration::seconds(30));
    }
}
