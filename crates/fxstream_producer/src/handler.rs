use crate::{producer::StreamPublisher, provider::ExchangeRateProvider};
use fxstream_common::{
    Result,
    codec::encode_record,
    models::{CurrencyPair, InvocationResponse, QuoteRecord},
    utils::{current_timestamp, normalize_fields},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

/// Invocation input: the pair to convert.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConversionRequest {
    pub conversion: CurrencyPair,
}

/// Body of a successful invocation.
#[derive(Debug, Serialize, Deserialize)]
pub struct ProducerResponse {
    pub message: String,
    pub last_refreshed: String,
    pub from_symbol: String,
    pub to_symbol: String,
}

/// Fetches one quote, normalizes it and publishes it to the stream.
pub struct QuoteProducer {
    provider: Arc<dyn ExchangeRateProvider>,
    publisher: Arc<dyn StreamPublisher>,
    stream_name: String,
}

impl QuoteProducer {
    pub fn new(
        provider: Arc<dyn ExchangeRateProvider>,
        publisher: Arc<dyn StreamPublisher>,
        stream_name: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            publisher,
            stream_name: stream_name.into(),
        }
    }

    /// Fetch the current rate for `pair` and build the normalized record.
    pub async fn fetch_quote(&self, pair: &CurrencyPair) -> Result<QuoteRecord> {
        let fields = self.provider.current_exchange_rate(pair).await?;
        let mut record = normalize_fields(&fields);

        record.insert("timestamp", current_timestamp());
        record.insert("from_symbol", pair.from.as_str());
        record.insert("to_symbol", pair.to.as_str());
        record.insert("ticker", pair.ticker());

        Ok(record)
    }

    /// Fetch, normalize and publish one quote. Returns the published record.
    pub async fn produce(&self, pair: &CurrencyPair) -> Result<QuoteRecord> {
        let record = self.fetch_quote(pair).await?;
        let partition_key = record.partition_key()?;
        let data = encode_record(&record)?;

        let sequence_number = self
            .publisher
            .put_record(&self.stream_name, data, &partition_key)
            .await?;

        info!(
            ticker = %pair.ticker(),
            partition_key = %partition_key,
            sequence_number = %sequence_number,
            "Published quote to {}",
            self.stream_name
        );

        Ok(record)
    }

    /// Handle one invocation.
    pub async fn handle(&self, request: ConversionRequest) -> Result<InvocationResponse> {
        let pair = request.conversion;
        info!("Producing quote for {}", pair.ticker());

        let record = self.produce(&pair).await.inspect_err(|e| {
            error!("Failed to produce quote for {}: {}", pair.ticker(), e);
        })?;

        InvocationResponse::ok(&ProducerResponse {
            message: "Data sent to Kinesis stream successfully!".to_string(),
            last_refreshed: record.last_refreshed()?,
            from_symbol: pair.from,
            to_symbol: pair.to,
        })
    }
}
