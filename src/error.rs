use thiserror::Error;

/// Errors that can occur while scraping a repository's documentation
#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("GitHub token not found. Make sure {var} is set in your environment or .env file.")]
    MissingToken { var: String },

    #[error("Authentication rejected: {message}")]
    Unauthorized { message: String },

    #[error("Invalid repository identifier '{input}': expected 'owner/repo'")]
    InvalidRepository { input: String },

    #[error("Repository '{repository}' not found. Please check the repository name and your access rights.")]
    RepositoryNotFound { repository: String },

    #[error("Content not found: {path}")]
    NotFound { path: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Rate limited by remote service: {message}")]
    RateLimited { message: String },

    #[error("{message} (status {status})")]
    Api { status: u16, message: String },

    #[error("Invalid remote structure: {message}")]
    InvalidStructure { message: String },

    #[error("Failed to decode {path}: {message}")]
    Decode { path: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Coarse grouping of errors, used to pick how a failure is reported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Credential or configuration problem, checked before any scrape
    Startup,
    /// The requested repository cannot be used
    Target,
    /// A path inside the repository is absent
    Path,
    /// A single document could not be decoded
    Document,
    /// The remote API failed for another reason
    Remote,
    Unexpected,
}

impl ScrapeError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ScrapeError::MissingToken { .. }
            | ScrapeError::Unauthorized { .. }
            | ScrapeError::InvalidConfig { .. } => ErrorCategory::Startup,
            ScrapeError::InvalidRepository { .. } | ScrapeError::RepositoryNotFound { .. } => {
                ErrorCategory::Target
            }
            ScrapeError::NotFound { .. } => ErrorCategory::Path,
            ScrapeError::Decode { .. } => ErrorCategory::Document,
            ScrapeError::Network(_)
            | ScrapeError::RateLimited { .. }
            | ScrapeError::Api { .. }
            | ScrapeError::InvalidStructure { .. }
            | ScrapeError::Serialization(_) => ErrorCategory::Remote,
            ScrapeError::Io(_) => ErrorCategory::Unexpected,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ScrapeError::NotFound { .. })
    }
}

/// Result type alias for scrape operations
pub type Result<T> = std::result::Result<T, ScrapeError>;
