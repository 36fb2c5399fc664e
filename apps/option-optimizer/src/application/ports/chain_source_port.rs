//! Chain Source Port (Driven Port)
//!
//! Interface for loading the option chain of an underlying.

use async_trait::async_trait;

use crate::options::Contract;

/// Chain source error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChainSourceError {
    /// Underlying not known to the source.
    #[error("Underlying not found: {underlying}")]
    UnderlyingNotFound {
        /// The unknown underlying.
        underlying: String,
    },

    /// Chain data unavailable or unreadable.
    #[error("Option chain unavailable: {message}")]
    DataUnavailable {
        /// Error details.
        message: String,
    },

    /// Chain data could not be decoded into contracts.
    #[error("Invalid option chain data: {message}")]
    InvalidData {
        /// Error details.
        message: String,
    },
}

/// Port for loading option chains.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChainSourcePort: Send + Sync {
    /// Every contract listed on `underlying`.
    async fn option_chain(&self, underlying: &str) -> Result<Vec<Contract>, ChainSourceError>;
}
