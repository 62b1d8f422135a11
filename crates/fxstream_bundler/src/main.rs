use fxstream_bundler::{
    bundler::{LAYERS_DIR, LayerBundler},
    installer::PipInstaller,
};
use tracing::info;
use tracing_subscriber::{EnvFilter, filter::LevelFilter};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let report = LayerBundler::new(LAYERS_DIR, PipInstaller::default()).run()?;
    info!(
        "Built {} layers, skipped {}",
        report.built.len(),
        report.skipped.len()
    );

    Ok(())
}
