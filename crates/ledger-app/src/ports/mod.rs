//! Ports layer: trait definitions for inbound and outbound interfaces.

pub mod inbound;
pub mod outbound;
