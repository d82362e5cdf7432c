use thiserror::Error;

/// Result type alias for skillrouter-core
pub type Result<T> = std::result::Result<T, Error>;

/// Error types shared across the skillrouter workspace
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error for file operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Skill discovery, parsing, or execution errors
    #[error("skill error: {0}")]
    Skill(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}
