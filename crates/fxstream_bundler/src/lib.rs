pub mod bundler;
pub mod installer;

// Re-export error handling
pub use fxstream_common::{Error, Result};
