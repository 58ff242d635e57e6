//! Error types for GitHub fetching

use thiserror::Error;

/// Errors that can occur while fetching prompts from GitHub
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error(
        "Invalid GitHub URL format: {0}. Expected https://github.com/<owner>/<repo>/tree/<branch>/<path>"
    )]
    InvalidUrl(String),

    #[error("Repository must be in format owner/repo, got: {0}. Example: acme/prompt-library")]
    InvalidRepo(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Access denied: {0}. Set GITHUB_TOKEN for private repositories or higher rate limits")]
    Forbidden(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response from {url}: {message}")]
    InvalidResponse { url: String, message: String },

    #[error("File too large: {name} is {size} bytes (limit {limit})")]
    FileTooLarge { name: String, size: u64, limit: u64 },
}

impl FetchError {
    /// Whether another attempt could succeed
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

/// Result type for fetch operations
pub type FetchResult<T> = Result<T, FetchError>;
