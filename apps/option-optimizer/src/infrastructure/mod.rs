//! Infrastructure Layer
//!
//! Adapters for the ports defined in the application layer:
//!
//! - `market_data/`: option chains and live prices (in-memory, JSON snapshot)
//! - `persistence/`: position storage (in-memory)

pub mod market_data;
pub mod persistence;

pub use market_data::{InMemoryMarketData, JsonFileChainSource};
pub use persistence::InMemoryPositionStore;
