//! TTS error types.

use thiserror::Error;

/// Result type for TTS operations.
pub type VoiceResult<T> = Result<T, VoiceError>;

/// Errors that can occur during speech synthesis.
#[derive(Debug, Error)]
pub enum VoiceError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("TTS request failed: {0}")]
    RequestFailed(String),

    #[error("Voice clone failed: {0}")]
    CloneFailed(String),

    #[error("Synthesis job did not produce an audio URL")]
    NoAudioUrl,

    #[error("Synthesis job timed out after {0} polls")]
    JobTimeout(u32),

    #[error("File host upload failed: {0}")]
    HostUploadFailed(String),

    #[error("Invalid base64 audio sample: {0}")]
    InvalidSample(#[from] base64::DecodeError),

    #[error("Invalid URL from file host: {0}")]
    InvalidUrl(#[from] url::ParseError),
}
