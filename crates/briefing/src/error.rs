use thiserror::Error;

/// Briefing-specific error types
#[derive(Debug, Error)]
pub enum BriefingError {
    #[error("OpenRouter API error: {message}")]
    Api {
        message: String,
        status_code: Option<u16>,
    },

    #[error("OpenRouter rate limited, retry after {retry_after:?}s")]
    RateLimited { retry_after: Option<u64> },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Generation failed: {0}")]
    GenerationFailed(String),
}

/// Result type alias for briefing operations
pub type BriefingResult<T> = Result<T, BriefingError>;
