pub mod acknowledger;
pub mod config;
pub mod consumer;
pub mod event;
pub mod repository;

// Re-export error handling
pub use fxstream_common::{Error, Result};
