//! Quote lookup abstractions for watched currencies and stocks.

use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait CurrencyRateProvider: Send + Sync {
    /// Current rate of `currency` against the configured base currency.
    async fn get_rate(&self, currency: &str) -> Result<f64>;
}

#[async_trait]
pub trait StockPriceProvider: Send + Sync {
    /// Current price of the stock identified by `symbol`.
    async fn get_price(&self, symbol: &str) -> Result<f64>;
}
