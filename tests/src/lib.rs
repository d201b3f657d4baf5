//! # Hashline Test Suite
//!
//! Unified test crate for cross-crate flows driven through the protocol
//! surface, the way a consensus engine would drive a node.
//!
//! ```bash
//! cargo test -p hashline-tests
//! ```

#![allow(dead_code)]

pub mod integration;
