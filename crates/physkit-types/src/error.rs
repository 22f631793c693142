//! Error types for the physkit toolkit.
//!
//! All crates return `PhysResult<T>` from fallible operations.

use thiserror::Error;

/// Unified error type for the physkit toolkit.
#[derive(Debug, Error)]
pub enum PhysError {
    /// File name does not have the expected format or suffix.
    #[error("Format error: {0}")]
    Format(String),

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A line of a text format could not be parsed.
    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Configuration value is invalid or a required strategy is missing.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Simulation state became non-finite or violated a constraint.
    #[error("Numeric error: {0}")]
    Numeric(String),

    /// Mesh data is malformed or inconsistent.
    #[error("Invalid mesh: {0}")]
    InvalidMesh(String),

    /// Serialization/deserialization failure.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A plugin raised a fatal condition and stopped the run.
    #[error("Plugin '{plugin}' aborted the run: {message}")]
    PluginAbort { plugin: String, message: String },
}

impl PhysError {
    /// Builds a parse error for a 1-based line number.
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }
}

/// Convenience alias for `Result<T, PhysError>`.
pub type PhysResult<T> = Result<T, PhysError>;
