//! Adapters layer: concrete implementations of the outbound ports.

pub mod memory_store;
pub mod time;

pub use memory_store::InMemoryStore;
pub use time::SystemTimeSource;
