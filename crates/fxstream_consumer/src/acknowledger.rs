use async_trait::async_trait;
use fxstream_common::Result;
use tracing::info;

/// Acknowledges stream records once they are stored.
///
/// The shipped [`CheckpointAcknowledger`] only logs a checkpoint; it does not
/// remove anything from the stream.
#[async_trait]
pub trait RecordAcknowledger: Send + Sync {
    /// Delete the record identified by `sequence_number` from `stream_name`.
    async fn delete_record(&self, stream_name: &str, sequence_number: &str) -> Result<()>;
}

/// Acknowledger for Kinesis-backed event sources.
///
/// Kinesis has no per-record delete. Records are retired when the event
/// source mapping checkpoints after a successful invocation, so this records
/// the acknowledged position and returns.
#[derive(Debug, Default)]
pub struct CheckpointAcknowledger;

#[async_trait]
impl RecordAcknowledger for CheckpointAcknowledger {
    async fn delete_record(&self, stream_name: &str, sequence_number: &str) -> Result<()> {
        info!(
            stream = stream_name,
            sequence_number = sequence_number,
            "Acknowledged stream record"
        );
        Ok(())
    }
}
