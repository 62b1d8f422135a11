use async_trait::async_trait;
use aws_sdk_kinesis::{Client, error::DisplayErrorContext, primitives::Blob};
use fxstream_common::{Error, Result};
use tracing::{debug, info};

/// Destination for encoded quote records.
#[async_trait]
pub trait StreamPublisher: Send + Sync {
    /// Append `data` to `stream_name` under `partition_key`.
    ///
    /// Returns the sequence number assigned by the stream.
    async fn put_record(&self, stream_name: &str, data: Vec<u8>, partition_key: &str) -> Result<String>;
}

/// Kinesis producer for sending quote records to a stream.
pub struct KinesisPublisher {
    /// The underlying Kinesis client
    client: Client,
}

impl KinesisPublisher {
    /// Create a new Kinesis publisher.
    pub fn new(client: Client) -> Self {
        info!("Initializing Kinesis publisher");
        Self { client }
    }
}

#[async_trait]
impl StreamPublisher for KinesisPublisher {
    async fn put_record(&self, stream_name: &str, data: Vec<u8>, partition_key: &str) -> Result<String> {
        debug!(
            "Putting {} bytes to stream {} with partition key {}",
            data.len(),
            stream_name,
            partition_key
        );

        let output = self
            .client
            .put_record()
            .stream_name(stream_name)
            .data(Blob::new(data))
            .partition_key(partition_key)
            .send()
            .await
            .map_err(|e| {
                Error::ExternalService(format!(
                    "Failed to send record to Kinesis: {}",
                    DisplayErrorContext(&e)
                ))
            })?;

        Ok(output.sequence_number().to_string())
    }
}
