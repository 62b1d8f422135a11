use fxstream_common::{Error, Result};
use serde::{Deserialize, Serialize};

/// A batch of stream envelopes delivered to the consumer.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct KinesisEvent {
    #[serde(rename = "Records", default)]
    pub records: Vec<KinesisEventRecord>,
}

/// One stream envelope: an encoded record plus its acknowledgment handle.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KinesisEventRecord {
    pub kinesis: KinesisData,

    #[serde(rename = "SequenceNumber", default, skip_serializing_if = "Option::is_none")]
    pub sequence_number: Option<String>,
}

/// The `kinesis` section of an envelope.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KinesisData {
    /// Base64-encoded record payload
    pub data: String,

    /// Sequence number as placed by the Lambda event source mapping
    #[serde(rename = "sequenceNumber", default, skip_serializing_if = "Option::is_none")]
    pub sequence_number: Option<String>,
}

impl KinesisEventRecord {
    /// The envelope's sequence number.
    ///
    /// The top-level `SequenceNumber` wins; `kinesis.sequenceNumber` is the
    /// fallback.
    pub fn sequence_number(&self) -> Result<&str> {
        self.sequence_number
            .as_deref()
            .or(self.kinesis.sequence_number.as_deref())
            .ok_or_else(|| Error::Validation("Stream record has no sequence number".to_string()))
    }
}
