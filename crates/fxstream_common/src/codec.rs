//! Stream payload encoding.
//!
//! Records travel as JSON. On the consumer side the stream delivers the
//! payload base64-encoded; numbers are read back through serde_json's
//! arbitrary-precision representation so their decimal text is preserved.

use crate::{Result, models::QuoteRecord};
use base64::{Engine, engine::general_purpose::STANDARD};
use tracing::debug;

/// Encode a record as the JSON bytes published to the stream.
pub fn encode_record(record: &QuoteRecord) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(record)?)
}

/// Decode a base64 stream payload into a record.
pub fn decode_payload(data: &str) -> Result<QuoteRecord> {
    let bytes = STANDARD.decode(data)?;
    let text = String::from_utf8(bytes)?;
    debug!("Decoded payload of {} bytes", text.len());

    Ok(serde_json::from_str(&text)?)
}

/// Base64-encode raw payload bytes, as the stream does on delivery.
pub fn encode_payload(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}
