//! In-memory market data for testing and demos.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::application::ports::{
    ChainSourceError, ChainSourcePort, PriceLookupError, PriceLookupPort,
};
use crate::options::Contract;

/// In-memory implementation of `ChainSourcePort` and `PriceLookupPort`.
///
/// Suitable for testing and development. Not for production use.
#[derive(Debug, Default)]
pub struct InMemoryMarketData {
    chains: RwLock<HashMap<String, Vec<Contract>>>,
    prices: RwLock<HashMap<String, Decimal>>,
}

impl InMemoryMarketData {
    /// Create an empty market.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// List a contract on its underlying's chain.
    pub fn add_contract(&self, contract: Contract) {
        let mut chains = self.chains.write().unwrap_or_else(PoisonError::into_inner);
        chains
            .entry(contract.underlying().to_string())
            .or_default()
            .push(contract);
    }

    /// Set the latest price of a symbol.
    pub fn set_price(&self, symbol: &str, price: Decimal) {
        let mut prices = self.prices.write().unwrap_or_else(PoisonError::into_inner);
        prices.insert(symbol.to_string(), price);
    }

    /// Number of contracts listed on `underlying`.
    #[must_use]
    pub fn chain_len(&self, underlying: &str) -> usize {
        self.chains
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(underlying)
            .map_or(0, Vec::len)
    }
}

#[async_trait]
impl ChainSourcePort for InMemoryMarketData {
    async fn option_chain(&self, underlying: &str) -> Result<Vec<Contract>, ChainSourceError> {
        let chains = self.chains.read().unwrap_or_else(PoisonError::into_inner);
        chains
            .get(underlying)
            .cloned()
            .ok_or_else(|| ChainSourceError::UnderlyingNotFound {
                underlying: underlying.to_string(),
            })
    }
}

#[async_trait]
impl PriceLookupPort for InMemoryMarketData {
    async fn latest_prices(
        &self,
        symbols: &[String],
    ) -> Result<HashMap<String, Decimal>, PriceLookupError> {
        let prices = self.prices.read().unwrap_or_else(PoisonError::into_inner);
        Ok(symbols
            .iter()
            .filter_map(|s| prices.get(s).map(|p| (s.clone(), *p)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn contract(symbol: &str, underlying: &str) -> Contract {
        Contract::call(
            symbol,
            underlying,
            dec!(100),
            NaiveDate::from_ymd_opt(2026, 12, 18).unwrap(),
            dec!(2),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_chain_by_underlying() {
        let market = InMemoryMarketData::new();
        market.add_contract(contract("A C100", "A"));
        market.add_contract(contract("B C100", "B"));
        market.add_contract(contract("A C100 2", "A"));

        assert_eq!(market.option_chain("A").await.unwrap().len(), 2);
        assert_eq!(market.chain_len("B"), 1);
        assert!(matches!(
            market.option_chain("C").await,
            Err(ChainSourceError::UnderlyingNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_prices_skip_unknown_symbols() {
        let market = InMemoryMarketData::new();
        market.set_price("A", dec!(1.5));

        let prices = market
            .latest_prices(&["A".to_string(), "Z".to_string()])
            .await
            .unwrap();
        assert_eq!(prices.len(), 1);
        assert_eq!(prices["A"], dec!(1.5));
    }
}
