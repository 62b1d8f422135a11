use crate::{Error, Result};
use config::{Config as ConfigLib, ConfigError, Environment, File, Map};
use serde::de::DeserializeOwned;
use std::path::Path;

/// Load layered configuration into `T`.
///
/// Sources, later ones winning: `$CONFIG_DIR/base.toml`,
/// `$CONFIG_DIR/$RUN_ENV.toml`, `$CONFIG_DIR/local.toml`, then environment
/// variables without prefix (`STREAM_NAME` becomes `stream_name`). Empty
/// variables are ignored. `env` replaces the process environment when given.
pub fn load<T: DeserializeOwned>(env: Option<Map<String, String>>) -> Result<T> {
    let mut config_builder = ConfigLib::builder();

    let config_dir = std::env::var("CONFIG_DIR").unwrap_or_else(|_| "./config".to_string());

    // Base configuration
    let base_config = Path::new(&config_dir).join("base.toml");
    if base_config.exists() {
        config_builder = config_builder.add_source(File::from(base_config));
    }

    // Environment-specific configuration
    let run_env = std::env::var("RUN_ENV").unwrap_or_else(|_| "development".to_string());
    let env_config = Path::new(&config_dir).join(format!("{}.toml", run_env));
    if env_config.exists() {
        config_builder = config_builder.add_source(File::from(env_config));
    }

    // Local overrides (gitignored)
    let local_config = Path::new(&config_dir).join("local.toml");
    if local_config.exists() {
        config_builder = config_builder.add_source(File::from(local_config));
    }

    config_builder = config_builder.add_source(
        Environment::default()
            .ignore_empty(true)
            .try_parsing(true)
            .source(env),
    );

    let config = config_builder
        .build()
        .map_err(|e: ConfigError| Error::Config(e.to_string()))?;

    config
        .try_deserialize()
        .map_err(|e| Error::Config(e.to_string()))
}
