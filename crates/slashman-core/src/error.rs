//! Error types for generation and cleanup

use crate::util::PathError;
use slashman_scanner::ScanError;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for core operations
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur while loading prompts or writing command files
#[derive(Debug, Error)]
pub enum CoreError {
    /// Parsing or registry error
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// File I/O error
    #[error("I/O error for {}: {message}", path.display())]
    Io { path: PathBuf, message: String },

    /// Explicit prompts directory is absent
    #[error("Prompts directory does not exist: {}", .0.display())]
    PromptsDirMissing(PathBuf),

    /// The user declined to overwrite existing files
    #[error("Cancelled by user")]
    Cancelled,

    /// Destination path failed validation
    #[error("Path security error: {0}")]
    Path(#[from] PathError),

    /// A command file could not be rendered
    #[error("Failed to render '{name}' for {agent}: {message}")]
    Render {
        name: String,
        agent: String,
        message: String,
    },
}

impl CoreError {
    /// I/O error tagged with the path it concerns
    pub fn io(path: impl AsRef<Path>, err: &std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            message: err.to_string(),
        }
    }

    /// Get the error code for CLI responses
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Scan(ScanError::SchemaViolation(_)) => "VALIDATION_ERROR",
            Self::Scan(ScanError::UnknownAgent(_)) => "UNKNOWN_AGENT",
            Self::Scan(ScanError::InvalidFormat(_)) => "PARSE_ERROR",
            Self::Scan(_) => "SCANNER_ERROR",
            Self::Io { .. } => "IO_ERROR",
            Self::PromptsDirMissing(_) => "NOT_FOUND",
            Self::Cancelled => "CANCELLED",
            Self::Path(_) => "PATH_ERROR",
            Self::Render { .. } => "RENDER_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(CoreError::Cancelled.code(), "CANCELLED");
        let err: CoreError = ScanError::UnknownAgent("x".into()).into();
        assert_eq!(err.code(), "UNKNOWN_AGENT");
        assert_eq!(err.to_string(), "Unsupported agent: x");
    }

    #[test]
    fn test_io_carries_path() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = CoreError::io("/tmp/x.md", &io);
        assert!(err.to_string().contains("/tmp/x.md"));
    }
}
