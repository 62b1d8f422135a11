use crate::config::Config;
use async_trait::async_trait;
use aws_sdk_secretsmanager::{Client, error::DisplayErrorContext};
use fxstream_common::{Error, Result};
use tracing::info;

/// Source of secret strings.
#[async_trait]
pub trait SecretSource: Send + Sync {
    /// Fetch the string payload of a secret.
    async fn secret_string(&self, secret_id: &str) -> Result<String>;
}

/// AWS Secrets Manager implementation of the secret source.
pub struct SecretsManagerSource {
    client: Client,
}

impl SecretsManagerSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SecretSource for SecretsManagerSource {
    async fn secret_string(&self, secret_id: &str) -> Result<String> {
        let output = self
            .client
            .get_secret_value()
            .secret_id(secret_id)
            .send()
            .await
            .map_err(|e| {
                Error::ExternalService(format!(
                    "Failed to read secret {}: {}",
                    secret_id,
                    DisplayErrorContext(&e)
                ))
            })?;

        output
            .secret_string()
            .map(ToString::to_string)
            .ok_or_else(|| Error::Config(format!("Secret {} has no string value", secret_id)))
    }
}

/// Resolve the provider API key.
///
/// Fails with a configuration error before calling `source` when no secret id
/// is configured.
pub async fn resolve_api_key(config: &Config, source: &dyn SecretSource) -> Result<String> {
    let secret_id = config.secret_arn()?;
    info!("Resolving Alpha Vantage API key");
    source.secret_string(secret_id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSource {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl SecretSource for CountingSource {
        async fn secret_string(&self, secret_id: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("key-for-{}", secret_id))
        }
    }

    #[tokio::test]
    async fn test_resolve_api_key() {
        let source = CountingSource { calls: AtomicUsize::new(0) };
        let config = Config::builder().alpha_vantage_secret_arn("av-secret").build();

        let key = resolve_api_key(&config, &source).await.unwrap();
        assert_eq!(key, "key-for-av-secret");
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_resolve_api_key_fails_before_fetch() {
        let source = CountingSource { calls: AtomicUsize::new(0) };
        let config = Config::builder().build();

        let result = resolve_api_key(&config, &source).await;
        assert!(matches!(result, Err(Error::Config(_))));
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }
}
