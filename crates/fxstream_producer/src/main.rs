use fxstream_producer::{
    config::Config,
    handler::{ConversionRequest, QuoteProducer},
    producer::KinesisPublisher,
    provider::AlphaVantageClient,
    secrets::{SecretsManagerSource, resolve_api_key},
};
use lambda_runtime::{LambdaEvent, service_fn};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, filter::LevelFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Initialize logging; Lambda stamps each line itself
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with_target(false)
        .without_time()
        .init();
    info!("Starting fxstream producer");

    let config = Config::load()?;
    info!("Configuration loaded, publishing to {}", config.stream_name);
    // Missing credential config fails here, before any AWS client is built
    let _secret_arn = config.secret_arn()?;

    // Resolve the API key once per cold start
    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let secrets = SecretsManagerSource::new(aws_sdk_secretsmanager::Client::new(&aws_config));
    let api_key = resolve_api_key(&config, &secrets).await?;

    let provider = AlphaVantageClient::new(api_key, &config)?;
    let publisher = KinesisPublisher::new(aws_sdk_kinesis::Client::new(&aws_config));
    let producer = Arc::new(QuoteProducer::new(
        Arc::new(provider),
        Arc::new(publisher),
        config.stream_name.clone(),
    ));

    lambda_runtime::run(service_fn(move |event: LambdaEvent<ConversionRequest>| {
        let producer = Arc::clone(&producer);
        async move {
            info!(request_id = %event.context.request_id, "Received conversion request");
            producer
                .handle(event.payload)
                .await
                .map_err(lambda_runtime::Error::from)
        }
    }))
    .await
    .map_err(|e| anyhow::anyhow!(e))
}
