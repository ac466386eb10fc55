//! Pipeline error types.
//!
//! Every stage surfaces with a stage-identifying prefix; nothing recovers
//! silently except the TTS fallback inside `memo-voice`.

use thiserror::Error;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Errors that can abort a script request.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Collage stage failed: {0}")]
    Media(#[from] memo_media::MediaError),

    #[error("Generative model stage failed: {0}")]
    GenAi(#[from] memo_genai::GenAiError),

    #[error("Background image stage failed: {0}")]
    Search(#[from] memo_search::SearchError),

    #[error("Narration stage failed: {0}")]
    Voice(#[from] memo_voice::VoiceError),

    #[error("Annotations stage failed: {0}")]
    Vision(#[from] memo_vision::VisionError),

    #[error("Scene alignment error: narrative returned {actual} scenes for {expected} collage groups")]
    SceneCountMismatch { expected: usize, actual: usize },

    #[error("Video group {ordinal} has no hosted file URI")]
    MissingVideoUri { ordinal: usize },

    #[error("Background task failed: {0}")]
    Task(String),
}
