pub mod config;
pub mod handler;
pub mod producer;
pub mod provider;
pub mod secrets;

// Re-export error handling
pub use fxstream_common::{Error, Result};
