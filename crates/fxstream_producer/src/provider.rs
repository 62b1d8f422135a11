//! Alpha Vantage exchange-rate provider.
//!
//! Uses the `CURRENCY_EXCHANGE_RATE` function, which returns one realtime
//! quote for a currency pair as a flat object of numbered labels:
//!
//! ```text
//! "1. From_Currency Code": "USD",
//! "5. Exchange Rate": "0.91500000",
//! "6. Last Refreshed": "2024-01-15 10:00:00",
//! ```

use crate::config::Config;
use async_trait::async_trait;
use fxstream_common::{Error, Result, models::CurrencyPair};
use reqwest::Client;
use serde::Deserialize;
use std::{collections::BTreeMap, time::Duration};
use tracing::{debug, warn};

/// Source of current exchange rates.
#[async_trait]
pub trait ExchangeRateProvider: Send + Sync {
    /// Fetch the current rate for `pair` as the provider's labeled fields.
    async fn current_exchange_rate(&self, pair: &CurrencyPair) -> Result<BTreeMap<String, String>>;
}

#[derive(Debug, Deserialize)]
struct ExchangeRateResponse {
    #[serde(rename = "Realtime Currency Exchange Rate")]
    rate: Option<BTreeMap<String, serde_json::Value>>,
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
    #[serde(rename = "Note")]
    note: Option<String>,
    #[serde(rename = "Information")]
    information: Option<String>,
}

/// Alpha Vantage HTTP client.
pub struct AlphaVantageClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl AlphaVantageClient {
    /// Create a client for the endpoint and timeout in `config`.
    pub fn new(api_key: String, config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| Error::ExternalService(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.alpha_vantage_base_url.clone(),
            api_key,
        })
    }

    async fn fetch(&self, params: &[(&str, &str)]) -> Result<String> {
        let mut all_params: Vec<(&str, &str)> = params.to_vec();
        all_params.push(("apikey", &self.api_key));

        let url = reqwest::Url::parse_with_params(&self.base_url, &all_params)
            .map_err(|e| Error::Config(format!("Invalid Alpha Vantage URL: {}", e)))?;

        debug!(
            "Alpha Vantage request: {}",
            url.as_str().replace(&self.api_key, "***")
        );

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::ExternalService(format!("Alpha Vantage request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::ExternalService(format!(
                "Alpha Vantage returned HTTP {}",
                status
            )));
        }

        response
            .text()
            .await
            .map_err(|e| Error::ExternalService(format!("Failed to read Alpha Vantage response: {}", e)))
    }
}

#[async_trait]
impl ExchangeRateProvider for AlphaVantageClient {
    async fn current_exchange_rate(&self, pair: &CurrencyPair) -> Result<BTreeMap<String, String>> {
        let params = [
            ("function", "CURRENCY_EXCHANGE_RATE"),
            ("from_currency", pair.from.as_str()),
            ("to_currency", pair.to.as_str()),
        ];

        let text = self.fetch(&params).await?;
        parse_exchange_rate(&text, pair)
    }
}

/// Extract the labeled fields from a `CURRENCY_EXCHANGE_RATE` response body.
pub fn parse_exchange_rate(text: &str, pair: &CurrencyPair) -> Result<BTreeMap<String, String>> {
    let response: ExchangeRateResponse = serde_json::from_str(text)?;

    check_api_error(&response)?;

    let rate = response.rate.ok_or_else(|| {
        Error::ExternalService(format!("No exchange rate returned for {}", pair.ticker()))
    })?;

    Ok(rate
        .into_iter()
        .map(|(label, value)| {
            let value = match value {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
            (label, value)
        })
        .collect())
}

/// Turn API-level failures reported in a 200 body into errors.
fn check_api_error(response: &ExchangeRateResponse) -> Result<()> {
    if let Some(msg) = &response.error_message {
        return Err(Error::ExternalService(format!("Alpha Vantage error: {}", msg)));
    }

    for msg in [&response.note, &response.information].into_iter().flatten() {
        if msg.contains("API call frequency") || msg.contains("rate limit") {
            return Err(Error::ExternalService(format!(
                "Alpha Vantage rate limit: {}",
                msg
            )));
        }
        warn!("Alpha Vantage note: {}", msg);
    }

    Ok(())
}
