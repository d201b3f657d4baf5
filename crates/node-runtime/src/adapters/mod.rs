//! Outbound adapters owned by the node process.

pub mod content_gateway;

pub use content_gateway::HttpContentGateway;
