use async_trait::async_trait;
use aws_sdk_dynamodb::{Client, error::DisplayErrorContext, types::AttributeValue};
use fxstream_common::{
    Error, Result,
    models::{FieldValue, QuoteRecord},
};
use std::collections::HashMap;
use tracing::debug;

/// Repository for quote records.
#[async_trait]
pub trait QuoteRepository: Send + Sync {
    /// Store a record as a full item, replacing any item with the same key.
    async fn put(&self, record: &QuoteRecord) -> Result<()>;
}

/// DynamoDB implementation of the quote repository.
pub struct DynamoQuoteRepository {
    /// DynamoDB client
    client: Client,

    /// Destination table
    table_name: String,
}

impl DynamoQuoteRepository {
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }
}

#[async_trait]
impl QuoteRepository for DynamoQuoteRepository {
    async fn put(&self, record: &QuoteRecord) -> Result<()> {
        debug!("Storing quote record with {} fields in {}", record.len(), self.table_name);

        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(to_item(record)))
            .send()
            .await
            .map_err(|e| {
                Error::Storage(format!(
                    "Failed to store quote record: {}",
                    DisplayErrorContext(&e)
                ))
            })?;

        Ok(())
    }
}

/// Map a record onto DynamoDB attributes.
///
/// Numbers are sent as their decimal text, so the stored value is exactly the
/// one read from the stream.
pub fn to_item(record: &QuoteRecord) -> HashMap<String, AttributeValue> {
    record
        .iter()
        .map(|(key, value)| {
            let attribute = match value {
                FieldValue::Number(d) => AttributeValue::N(d.to_string()),
                FieldValue::Text(s) => AttributeValue::S(s.clone()),
            };
            (key.clone(), attribute)
        })
        .collect()
}
