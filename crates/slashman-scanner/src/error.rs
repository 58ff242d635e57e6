//! Error types for the slash command scanner

use thiserror::Error;

/// Result type for scanner operations
pub type ScanResult<T> = Result<T, ScanError>;

/// Errors that can occur while parsing, classifying or discovering command files
#[derive(Error, Debug)]
pub enum ScanError {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A TOML command file could not be decoded
    #[error("Invalid command file format: {0}")]
    InvalidFormat(String),

    /// Frontmatter decoded, but a field has a shape authors must fix
    #[error("Invalid prompt metadata: {0}")]
    SchemaViolation(String),

    /// Agent key is not in the registry
    #[error("Unsupported agent: {0}")]
    UnknownAgent(String),

    /// A command file could not be serialized
    #[error("Failed to render command file: {0}")]
    Render(String),

    /// Failed to produce JSON output
    #[error("Failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),
}
