use async_trait::async_trait;
use fxstream_common::{
    Error, Result,
    codec::{encode_payload, encode_record},
    models::{FieldValue, QuoteRecord},
};
use fxstream_consumer::{
    acknowledger::RecordAcknowledger,
    consumer::QuoteConsumer,
    event::KinesisEvent,
    repository::QuoteRepository,
};
use rust_decimal::Decimal;
use std::{
    str::FromStr,
    sync::{Arc, Mutex},
};

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Put(QuoteRecord),
    Delete { stream: String, sequence_number: String },
}

/// Shared, ordered log of repository and acknowledger calls.
#[derive(Default)]
struct CallLog {
    calls: Mutex<Vec<Call>>,
}

impl CallLog {
    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn puts(&self) -> usize {
        self.calls().iter().filter(|c| matches!(c, Call::Put(_))).count()
    }

    fn deletes(&self) -> usize {
        self.calls().iter().filter(|c| matches!(c, Call::Delete { .. })).count()
    }
}

struct RecordingRepository {
    log: Arc<CallLog>,
    fail: bool,
}

#[async_trait]
impl QuoteRepository for RecordingRepository {
    async fn put(&self, record: &QuoteRecord) -> Result<()> {
        if self.fail {
            return Err(Error::Storage("table unavailable".to_string()));
        }
        self.log.calls.lock().unwrap().push(Call::Put(record.clone()));
        Ok(())
    }
}

struct RecordingAcknowledger {
    log: Arc<CallLog>,
}

#[async_trait]
impl RecordAcknowledger for RecordingAcknowledger {
    async fn delete_record(&self, stream_name: &str, sequence_number: &str) -> Result<()> {
        self.log.calls.lock().unwrap().push(Call::Delete {
            stream: stream_name.to_string(),
            sequence_number: sequence_number.to_string(),
        });
        Ok(())
    }
}

fn consumer(log: &Arc<CallLog>, fail_puts: bool) -> QuoteConsumer {
    QuoteConsumer::new(
        Arc::new(RecordingRepository { log: Arc::clone(log), fail: fail_puts }),
        Arc::new(RecordingAcknowledger { log: Arc::clone(log) }),
        "fx-stream",
    )
}

fn quote(rate: &str, last_refreshed: &str) -> QuoteRecord {
    let mut record = QuoteRecord::new();
    record.insert("exchange_rate", Decimal::from_str(rate).unwrap());
    record.insert("last_refreshed", last_refreshed);
    record.insert("ticker", "USD/EUR");
    record
}

fn envelope(data: String, sequence_number: &str) -> serde_json::Value {
    serde_json::json!({ "kinesis": { "data": data }, "SequenceNumber": sequence_number })
}

fn encoded(record: &QuoteRecord) -> String {
    encode_payload(&encode_record(record).unwrap())
}

fn event(records: Vec<serde_json::Value>) -> KinesisEvent {
    serde_json::from_value(serde_json::json!({ "Records": records })).unwrap()
}

#[tokio::test]
async fn test_stores_then_acknowledges_each_record() {
    let log = Arc::new(CallLog::default());
    let first = quote("0.91500000", "2024-01-15 10:00:00");
    let second = quote("0.91600000", "2024-01-15 10:05:00");

    let response = consumer(&log, false)
        .handle(event(vec![
            envelope(encoded(&first), "1"),
            envelope(encoded(&second), "2"),
        ]))
        .await
        .unwrap();

    assert_eq!(response.status_code, 200);
    let body: serde_json::Value = serde_json::from_str(&response.body).unwrap();
    assert_eq!(body["message"], "Records processed successfully");

    assert_eq!(
        log.calls(),
        vec![
            Call::Put(first),
            Call::Delete { stream: "fx-stream".to_string(), sequence_number: "1".to_string() },
            Call::Put(second),
            Call::Delete { stream: "fx-stream".to_string(), sequence_number: "2".to_string() },
        ]
    );
}

#[tokio::test]
async fn test_stored_numbers_keep_exact_decimal_text() {
    let log = Arc::new(CallLog::default());
    let data = encode_payload(br#"{"exchange_rate":1.10000000,"ticker":"EUR/USD"}"#);

    consumer(&log, false)
        .handle(event(vec![envelope(data, "7")]))
        .await
        .unwrap();

    match &log.calls()[0] {
        Call::Put(record) => {
            assert_eq!(record.text("exchange_rate").as_deref(), Some("1.10000000"));
            assert_eq!(record.get("ticker"), Some(&FieldValue::from("EUR/USD")));
        }
        other => panic!("expected a put, got {:?}", other),
    }
}

#[tokio::test]
async fn test_invalid_payload_aborts_rest_of_batch() {
    let log = Arc::new(CallLog::default());
    let first = quote("0.91500000", "2024-01-15 10:00:00");
    let third = quote("0.91700000", "2024-01-15 10:10:00");

    let result = consumer(&log, false)
        .handle(event(vec![
            envelope(encoded(&first), "1"),
            envelope("%%% not base64 %%%".to_string(), "2"),
            envelope(encoded(&third), "3"),
        ]))
        .await;

    assert!(matches!(result, Err(Error::Encoding(_))));
    assert_eq!(log.puts(), 1);
    assert_eq!(log.deletes(), 1);
    assert_eq!(
        log.calls(),
        vec![
            Call::Put(first),
            Call::Delete { stream: "fx-stream".to_string(), sequence_number: "1".to_string() },
        ]
    );
}

#[tokio::test]
async fn test_malformed_json_aborts_batch() {
    let log = Arc::new(CallLog::default());

    let result = consumer(&log, false)
        .handle(event(vec![envelope(encode_payload(b"{\"rate\":"), "1")]))
        .await;

    assert!(matches!(result, Err(Error::Serialization(_))));
    assert!(log.calls().is_empty());
}

#[tokio::test]
async fn test_storage_failure_skips_acknowledgment() {
    let log = Arc::new(CallLog::default());
    let record = quote("0.91500000", "2024-01-15 10:00:00");

    let result = consumer(&log, true)
        .handle(event(vec![envelope(encoded(&record), "1")]))
        .await;

    assert!(matches!(result, Err(Error::Storage(_))));
    assert_eq!(log.deletes(), 0);
}

#[tokio::test]
async fn test_empty_batch() {
    let log = Arc::new(CallLog::default());

    let response = consumer(&log, false).handle(KinesisEvent::default()).await.unwrap();

    assert_eq!(response.status_code, 200);
    assert!(log.calls().is_empty());
}
