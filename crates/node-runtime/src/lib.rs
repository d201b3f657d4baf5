//! # Hashline Node Runtime
//!
//! Process bootstrap around the ledger application: CLI parsing, the
//! content-daemon gateway, and the TCP protocol server a consensus
//! engine connects to.

pub mod adapters;
pub mod config;
pub mod server;

pub use adapters::HttpContentGateway;
pub use config::{NodeOptions, RuntimeConfig};
pub use server::ProtocolServer;
