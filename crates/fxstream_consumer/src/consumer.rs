use crate::{
    acknowledger::RecordAcknowledger,
    event::{KinesisEvent, KinesisEventRecord},
    repository::QuoteRepository,
};
use fxstream_common::{Result, codec::decode_payload, models::InvocationResponse};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Body of a successful invocation.
#[derive(Debug, Serialize, Deserialize)]
pub struct ConsumerResponse {
    pub message: String,
}

/// Stores stream records in the quote table and acknowledges them.
pub struct QuoteConsumer {
    /// Destination repository
    repository: Arc<dyn QuoteRepository>,

    /// Acknowledgment target
    acknowledger: Arc<dyn RecordAcknowledger>,

    /// Source stream name
    stream_name: String,
}

impl QuoteConsumer {
    pub fn new(
        repository: Arc<dyn QuoteRepository>,
        acknowledger: Arc<dyn RecordAcknowledger>,
        stream_name: impl Into<String>,
    ) -> Self {
        Self {
            repository,
            acknowledger,
            stream_name: stream_name.into(),
        }
    }

    /// Decode, store and acknowledge a single envelope.
    pub async fn process_record(&self, record: &KinesisEventRecord) -> Result<()> {
        let quote = decode_payload(&record.kinesis.data)?;
        debug!("Decoded quote record with {} fields", quote.len());

        self.repository.put(&quote).await?;

        let sequence_number = record.sequence_number()?;
        self.acknowledger
            .delete_record(&self.stream_name, sequence_number)
            .await
    }

    /// Process every envelope in order. The first failure aborts the batch.
    pub async fn process_batch(&self, event: &KinesisEvent) -> Result<usize> {
        for (index, record) in event.records.iter().enumerate() {
            if let Err(e) = self.process_record(record).await {
                error!("Failed to process record {} of {}: {}", index + 1, event.records.len(), e);
                return Err(e);
            }
        }

        Ok(event.records.len())
    }

    /// Handle one invocation.
    pub async fn handle(&self, event: KinesisEvent) -> Result<InvocationResponse> {
        info!("Processing batch of {} stream records", event.records.len());

        let processed = self.process_batch(&event).await?;
        info!("Stored and acknowledged {} records", processed);

        InvocationResponse::ok(&ConsumerResponse {
            message: "Records processed successfully".to_string(),
        })
    }
}
