//! HTTP client for the ECB daily reference-rate feed.

use tracing::debug;

use super::feed::{ExchangeRateTable, parse_rate_feed};
use crate::core::{EndpointConfig, RequestExecutor, Result, parse_url};

/// The ECB's published daily euro reference rates.
pub const DEFAULT_RATES_URL: &str = "https://www.ecb.europa.eu/stats/eurofxref/eurofxref-daily.xml";

/// Fetches the reference-rate table. Nothing is cached between calls.
#[derive(Debug, Clone)]
pub struct RateFeedClient {
    config: EndpointConfig,
    executor: RequestExecutor,
}

impl RateFeedClient {
    pub fn new(config: EndpointConfig) -> Result<Self> {
        let executor = RequestExecutor::new(config.timeout)?;
        Ok(Self { config, executor })
    }

    /// Client for [`DEFAULT_RATES_URL`] with the default timeout.
    pub fn with_defaults() -> Result<Self> {
        Self::new(EndpointConfig::new(DEFAULT_RATES_URL))
    }

    pub fn config(&self) -> &EndpointConfig {
        &self.config
    }

    /// Fetch and parse the current rate table.
    ///
    /// # Errors
    ///
    /// `ServiceUnreachable` on transport failure or timeout, `ResponseRead`
    /// on a truncated body, `MalformedResponse` if the body is not the feed.
    pub async fn fetch_rates(&self) -> Result<ExchangeRateTable> {
        let url = parse_url(&self.config.url)?;
        let body = self.executor.get(url).await?;
        let table = parse_rate_feed(&body)?;
        debug!(currencies = table.len(), date = ?table.date(), "parsed rate feed");
        Ok(table)
    }

    /// Convert `value` between two currencies using a freshly fetched table.
    ///
    /// # Errors
    ///
    /// Any [`fetch_rates`](Self::fetch_rates) error, or `UnknownCurrency`
    /// if either code is missing from the table.
    pub async fn convert_rate(&self, value: f64, from: &str, to: &str) -> Result<f64> {
        self.fetch_rates().await?.convert(value, from, to)
    }
}
