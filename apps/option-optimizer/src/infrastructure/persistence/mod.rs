//! Persistence Adapters
//!
//! Implementations of `PositionStorePort`.

pub mod in_memory;

pub use in_memory::InMemoryPositionStore;
