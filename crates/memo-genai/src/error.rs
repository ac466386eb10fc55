//! Gemini client error types.

use thiserror::Error;

/// Result type for Gemini operations.
pub type GenAiResult<T> = Result<T, GenAiError>;

/// Errors that can occur talking to the generative model.
#[derive(Debug, Error)]
pub enum GenAiError {
    #[error("GEMINI_API_KEY not configured")]
    MissingApiKey,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Model request failed: {0}")]
    RequestFailed(String),

    #[error("No content in model response")]
    NoContent,

    #[error("Malformed model response: {0}")]
    MalformedResponse(String),

    #[error("File upload failed: {0}")]
    UploadFailed(String),

    #[error("File {name} failed to process (state: {state})")]
    FileFailed { name: String, state: String },

    #[error("Upstream processing timeout: file {name} not active after {waited_secs}s")]
    ProcessingTimeout { name: String, waited_secs: u64 },

    #[error("Description count mismatch: {expected} assets, {actual} descriptions")]
    DescriptionCountMismatch { expected: usize, actual: usize },

    #[error("Invalid base64 buffer: {0}")]
    InvalidBuffer(#[from] base64::DecodeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
