//! Vision sidecar error types.

use thiserror::Error;

/// Result type for vision operations.
pub type VisionResult<T> = Result<T, VisionError>;

/// Errors that can occur talking to the vision sidecar.
#[derive(Debug, Error)]
pub enum VisionError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Vision request failed: {0}")]
    RequestFailed(String),

    #[error("Malformed sidecar response: {0}")]
    MalformedResponse(String),
}

impl VisionError {
    /// Whether a retry could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            VisionError::Network(e) => e.is_timeout() || e.is_connect(),
            VisionError::RequestFailed(_) => false,
            VisionError::MalformedResponse(_) => false,
        }
    }
}
