//! Price Lookup Port (Driven Port)
//!
//! Interface for fetching the latest traded price of contracts.

use std::collections::HashMap;

use async_trait::async_trait;
use rust_decimal::Decimal;

/// Price lookup error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PriceLookupError {
    /// Connection error.
    #[error("Price lookup connection error: {message}")]
    ConnectionError {
        /// Error details.
        message: String,
    },

    /// Rate limited.
    #[error("Rate limited, retry after {retry_after_secs} seconds")]
    RateLimited {
        /// Seconds to wait before retrying.
        retry_after_secs: u64,
    },

    /// API error.
    #[error("Price lookup API error: {message}")]
    ApiError {
        /// Error details.
        message: String,
    },
}

/// Port for fetching live prices.
///
/// Symbols without a price are left out of the returned map; callers fall
/// back to the entry price for them.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PriceLookupPort: Send + Sync {
    /// Latest price for each symbol that has one.
    async fn latest_prices(
        &self,
        symbols: &[String],
    ) -> Result<HashMap<String, Decimal>, PriceLookupError>;
}
