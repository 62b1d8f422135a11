use fxstream_consumer::{
    acknowledger::CheckpointAcknowledger,
    config::Config,
    consumer::QuoteConsumer,
    event::KinesisEvent,
    repository::DynamoQuoteRepository,
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
    info!("Starting fxstream consumer");

    let config = Config::load()?;
    let table_name = config.table_name()?.to_string();
    info!("Configuration loaded, storing quotes in {}", table_name);

    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let repository = DynamoQuoteRepository::new(aws_sdk_dynamodb::Client::new(&aws_config), table_name);
    let consumer = Arc::new(QuoteConsumer::new(
        Arc::new(repository),
        Arc::new(CheckpointAcknowledger),
        config.stream_name(),
    ));

    lambda_runtime::run(service_fn(move |event: LambdaEvent<KinesisEvent>| {
        let consumer = Arc::clone(&consumer);
        async move {
            info!(request_id = %event.context.request_id, "Received stream batch");
            consumer
                .handle(event.payload)
                .await
                .map_err(lambda_runtime::Error::from)
        }
    }))
    .await
    .map_err(|e| anyhow::anyhow!(e))
}
