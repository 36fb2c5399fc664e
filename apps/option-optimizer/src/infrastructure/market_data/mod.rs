//! Market Data Adapters
//!
//! Implementations of `ChainSourcePort` and `PriceLookupPort`.

mod in_memory;
mod json_file;

pub use in_memory::InMemoryMarketData;
pub use json_file::JsonFileChainSource;
