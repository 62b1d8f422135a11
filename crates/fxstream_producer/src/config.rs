use bon::Builder;
use config::Map;
use fxstream_common::{Error, Result, settings};
use serde::{Deserialize, Serialize};

/// Configuration for the Producer function.
#[derive(Clone, Debug, Serialize, Deserialize, Builder)]
pub struct Config {
    /// Destination stream (`STREAM_NAME`)
    #[serde(default = "default_stream_name")]
    #[builder(default = default_stream_name(), into)]
    pub stream_name: String,

    /// Secrets Manager id of the Alpha Vantage key (`ALPHA_VANTAGE_SECRET_ARN`)
    #[serde(default)]
    #[builder(into)]
    pub alpha_vantage_secret_arn: Option<String>,

    /// Alpha Vantage endpoint (`ALPHA_VANTAGE_BASE_URL`)
    #[serde(default = "default_base_url")]
    #[builder(default = default_base_url(), into)]
    pub alpha_vantage_base_url: String,

    /// Provider HTTP timeout in seconds (`REQUEST_TIMEOUT_SECS`)
    #[serde(default = "default_request_timeout_secs")]
    #[builder(default = default_request_timeout_secs())]
    pub request_timeout_secs: u64,
}

fn default_stream_name() -> String {
    "default_stream_name".to_string()
}

fn default_base_url() -> String {
    "https://www.alphavantage.co/query".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
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

    /// The credential secret id; required before anything touches the network.
    pub fn secret_arn(&self) -> Result<&str> {
        self.alpha_vantage_secret_arn.as_deref().ok_or_else(|| {
            Error::Config("ALPHA_VANTAGE_SECRET_ARN environment variable is not set".to_string())
        })
    }
}
