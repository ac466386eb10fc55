//! Error types for media operations.

use thiserror::Error;

/// Result type for media operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// Errors that can occur during image processing.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Empty image batch")]
    EmptyBatch,

    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Failed to encode image: {0}")]
    Encode(String),

    #[error("Invalid base64 buffer: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Face box out of bounds: {0}")]
    BoxOutOfBounds(String),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}
