pub mod codec;
pub mod error;
pub mod models;
pub mod settings;
pub mod utils;

pub use error::{Error, Result};
