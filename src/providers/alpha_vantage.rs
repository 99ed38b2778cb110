use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::core::quote::{CurrencyRateProvider, StockPriceProvider};

/// Conservative per-request timeout; a slow quote is treated as unavailable.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Alpha Vantage quote provider for both currency rates and stock prices.
///
/// Currency rates are resolved against the configured base currency. All
/// failures surface as errors; callers decide whether to omit the symbol.
pub struct AlphaVantageProvider {
    base_url: String,
    api_key: String,
    base_currency: String,
    client: reqwest::Client,
}

impl AlphaVantageProvider {
    pub fn new(base_url: &str, api_key: &str, base_currency: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("finsight/0.1")
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(AlphaVantageProvider {
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
            base_currency: base_currency.to_string(),
            client,
        })
    }

    fn query_url(&self) -> String {
        format!("{}/query", self.base_url)
    }
}

#[derive(Deserialize, Debug)]
struct ExchangeRateResponse {
    #[serde(rename = "Realtime Currency Exchange Rate")]
    exchange_rate: Option<ExchangeRateData>,
}

#[derive(Deserialize, Debug)]
struct ExchangeRateData {
    #[serde(rename = "5. Exchange Rate")]
    rate: Option<String>,
}

#[derive(Deserialize, Debug)]
struct GlobalQuoteResponse {
    #[serde(rename = "Global Quote")]
    global_quote: Option<GlobalQuoteData>,
}

#[derive(Deserialize, Debug)]
struct GlobalQuoteData {
    #[serde(rename = "05. price")]
    price: Option<String>,
}

fn parse_quote_field(raw: &str, what: &str, symbol: &str) -> Result<f64> {
    raw.trim()
        .parse::<f64>()
        .map_err(|e| anyhow!("Invalid {what} {raw:?} for {symbol}: {e}"))
}

#[async_trait]
impl CurrencyRateProvider for AlphaVantageProvider {
    #[instrument(
        name = "CurrencyRateFetch",
        skip(self),
        fields(currency = %currency)
    )]
    async fn get_rate(&self, currency: &str) -> Result<f64> {
        let url = self.query_url();
        debug!("Requesting currency rate from {url}");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("function", "CURRENCY_EXCHANGE_RATE"),
                ("from_currency", currency),
                ("to_currency", self.base_currency.as_str()),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {e} for currency: {currency}"))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for currency: {currency}",
                response.status()
            ));
        }

        let data = response
            .json::<ExchangeRateResponse>()
            .await
            .map_err(|e| anyhow!("Failed to parse response for {currency}: {e}"))?;

        let rate = data
            .exchange_rate
            .and_then(|d| d.rate)
            .ok_or_else(|| anyhow!("No exchange rate found for currency: {currency}"))?;

        parse_quote_field(&rate, "exchange rate", currency)
    }
}

#[async_trait]
impl StockPriceProvider for AlphaVantageProvider {
    #[instrument(
        name = "StockPriceFetch",
        skip(self),
        fields(symbol = %symbol)
    )]
    async fn get_price(&self, symbol: &str) -> Result<f64> {
        let url = self.query_url();
        debug!("Requesting stock price from {url}");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("function", "GLOBAL_QUOTE"),
                ("symbol", symbol),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {e} for symbol: {symbol}"))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for symbol: {symbol}",
                response.status()
            ));
        }

        let data = response
            .json::<GlobalQuoteResponse>()
            .await
            .map_err(|e| anyhow!("Failed to parse response for {symbol}: {e}"))?;

        let price = data
            .global_quote
            .and_then(|d| d.price)
            .ok_or_else(|| anyhow!("No price found for symbol: {symbol}"))?;

        parse_quote_field(&price, "price", symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mock_provider(mock_server: &MockServer) -> AlphaVantageProvider {
        AlphaVantageProvider::new(&mock_server.uri(), "test-key", "RUB")
            .expect("Failed to build provider")
    }

    async fn mount_currency_response(mock_server: &MockServer, body: &str) {
        Mock::given(method("GET"))
            .and(path("/query"))
            .and(query_param("function", "CURRENCY_EXCHANGE_RATE"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(mock_server)
            .await;
    }

    async fn mount_stock_response(mock_server: &MockServer, body: &str) {
        Mock::given(method("GET"))
            .and(path("/query"))
            .and(query_param("function", "GLOBAL_QUOTE"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(mock_server)
            .await;
    }

    #[tokio::test]
    async fn test_successful_rate_fetch() {
        let mock_server = MockServer::start().await;
        let mock_response = r#"{
            "Realtime Currency Exchange Rate": {
                "1. From_Currency Code": "USD",
                "3. To_Currency Code": "RUB",
                "5. Exchange Rate": "75.50"
            }
        }"#;
        mount_currency_response(&mock_server, mock_response).await;

        let provider = mock_provider(&mock_server).await;
        let rate = provider.get_rate("USD").await.expect("Failed to get rate");
        assert_eq!(rate, 75.5);
    }

    #[tokio::test]
    async fn test_successful_price_fetch() {
        let mock_server = MockServer::start().await;
        let mock_response = r#"{
            "Global Quote": {
                "01. symbol": "AAPL",
                "05. price": "150.6500"
            }
        }"#;
        mount_stock_response(&mock_server, mock_response).await;

        let provider = mock_provider(&mock_server).await;
        let price = provider.get_price("AAPL").await.expect("Failed to get price");
        assert_eq!(price, 150.65);
    }

    #[tokio::test]
    async fn test_missing_rate_field() {
        let mock_server = MockServer::start().await;
        mount_currency_response(&mock_server, "{}").await;

        let provider = mock_provider(&mock_server).await;
        let result = provider.get_rate("USD").await;
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().to_string(),
            "No exchange rate found for currency: USD"
        );
    }

    #[tokio::test]
    async fn test_missing_price_field() {
        let mock_server = MockServer::start().await;
        mount_stock_response(&mock_server, r#"{"Global Quote": {}}"#).await;

        let provider = mock_provider(&mock_server).await;
        let result = provider.get_price("AAPL").await;
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().to_string(),
            "No price found for symbol: AAPL"
        );
    }

    #[tokio::test]
    async fn test_api_error_response() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/query"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let provider = mock_provider(&mock_server).await;
        let result = provider.get_rate("USD").await;
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().to_string(),
            "HTTP error: 500 Internal Server Error for currency: USD"
        );
    }

    #[tokio::test]
    async fn test_malformed_response() {
        let mock_server = MockServer::start().await;
        mount_currency_response(&mock_server, "not json at all").await;

        let provider = mock_provider(&mock_server).await;
        let result = provider.get_rate("USD").await;
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to parse response for USD")
        );
    }

    #[tokio::test]
    async fn test_non_numeric_rate() {
        let mock_server = MockServer::start().await;
        let mock_response = r#"{
            "Realtime Currency Exchange Rate": {
                "5. Exchange Rate": "unavailable"
            }
        }"#;
        mount_currency_response(&mock_server, mock_response).await;

        let provider = mock_provider(&mock_server).await;
        let result = provider.get_rate("USD").await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid exchange rate"));
    }
}
