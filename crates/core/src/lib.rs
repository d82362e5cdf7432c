//! Shared foundation for the skillrouter workspace: error types,
//! configuration loading, and the logging bootstrap.

pub mod config;
pub mod error;
pub mod logging;

pub use config::{Config, ExecutorConfig, LoggingConfig, SKILLS_DIR_ENV};
pub use error::{Error, Result};
pub use logging::{LogFormat, init_logging};
