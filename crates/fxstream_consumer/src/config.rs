use bon::Builder;
use config::Map;
use fxstream_common::{Error, Result, settings};
use serde::{Deserialize, Serialize};

/// Configuration for the Consumer function.
#[derive(Clone, Debug, Serialize, Deserialize, Builder)]
pub struct Config {
    /// Destination table (`DYNAMODB_TABLE_NAME`)
    #[serde(default)]
    #[builder(into)]
    pub dynamodb_table_name: Option<String>,

    /// Source stream, used when acknowledging records (`KINESIS_STREAM_NAME`)
    #[serde(default)]
    #[builder(into)]
    pub kinesis_stream_name: Option<String>,
}

impl Config {
    /// Load configuration from files and environment variables.
    pub fn load() -> Result<Self> {
        settings::load(None)
    }

    /// Load configuration with `env` standing in for the process environment.
    pub fn load_from(env: Map<String, String>) -> Result<Self> {
        settings::load(Some(env))
    }

    /// The destination table name.
    pub fn table_name(&self) -> Result<&str> {
        self.dynamodb_table_name.as_deref().ok_or_else(|| {
            Error::Config("DYNAMODB_TABLE_NAME environment variable is not set".to_string())
        })
    }

    /// The source stream name, empty when unset.
    pub fn stream_name(&self) -> &str {
        self.kinesis_stream_name.as_deref().unwrap_or_default()
    }
}
