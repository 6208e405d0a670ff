//! Core configuration and logging bootstrap for the console client.

mod config;
mod logging;

pub use config::{Config, ConfigError, ConfigResult, DEFAULT_API_URL, DEFAULT_LOG_LEVEL};
pub use logging::init_logging;
