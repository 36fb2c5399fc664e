//! Application Ports (Driven)
//!
//! Ports define interfaces for the external systems the optimizer talks to.
//! Adapters live in [`crate::infrastructure`].

mod chain_source_port;
mod position_store_port;
mod price_lookup_port;

pub use chain_source_port::{ChainSourceError, ChainSourcePort};
pub use position_store_port::{PositionStoreError, PositionStorePort};
pub use price_lookup_port::{PriceLookupError, PriceLookupPort};

#[cfg(test)]
pub use chain_source_port::MockChainSourcePort;
#[cfg(test)]
pub use position_store_port::MockPositionStorePort;
#[cfg(test)]
pub use price_lookup_port::MockPriceLookupPort;
