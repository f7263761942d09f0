// src/error.rs
// =============================================================================
// The error taxonomy for the whole pipeline.
//
// Every stage returns `error::Result<T>`. Variants carry a message only;
// main.rs prints it and maps the error to an exit code.
//
// Rust concepts:
// - thiserror: derives Display and std::error::Error from attributes
// - Type aliases: `Result<T>` saves repeating the error type everywhere
// =============================================================================

use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, EditorialError>;

#[derive(Error, Debug, Clone)]
pub enum EditorialError {
    /// The input is not a recognized Codeforces problem URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Codeforces answered 404 for the problem (or another resource)
    #[error("Problem not found: {0}")]
    ProblemNotFound(String),

    /// No editorial could be located, or it has no section for the problem
    #[error("Editorial not found: {0}")]
    EditorialNotFound(String),

    /// The LLM API rejected or failed the request
    #[error("API error: {0}")]
    Api(String),

    /// Transport-level failures and non-404 HTTP errors
    #[error("Network error: {0}")]
    Network(String),

    /// Reading or writing the local cache failed
    #[error("Cache error: {0}")]
    Cache(String),

    /// A page or document could not be turned into text
    #[error("Parsing error: {0}")]
    Parsing(String),

    /// The model call for extraction failed
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// Malformed settings, or a client that could not be built
    #[error("Configuration error: {0}")]
    Config(String),

    /// A completion was needed but no API key was configured
    #[error("Configuration error: OPENAI_API_KEY is not set")]
    MissingApiKey,
}

impl EditorialError {
    // Short label used in log fields
    pub fn kind(&self) -> &'static str {
        match self {
            EditorialError::InvalidUrl(_) => "invalid_url",
            EditorialError::ProblemNotFound(_) => "problem_not_found",
            EditorialError::EditorialNotFound(_) => "editorial_not_found",
            EditorialError::Api(_) => "api",
            EditorialError::Network(_) => "network",
            EditorialError::Cache(_) => "cache",
            EditorialError::Parsing(_) => "parsing",
            EditorialError::Extraction(_) => "extraction",
            EditorialError::Config(_) => "config",
            EditorialError::MissingApiKey => "missing_api_key",
        }
    }
}
