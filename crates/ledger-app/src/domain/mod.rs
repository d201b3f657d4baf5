//! Domain layer: deterministic ledger logic.

pub mod codec;
pub mod config;
pub mod errors;
pub mod mutator;
pub mod query;
pub mod state;
pub mod validator;
