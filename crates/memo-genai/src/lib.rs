//! Gemini client for the MemoMosaic pipeline.
//!
//! Two operations against the generative model:
//! - batched per-asset description (multimodal, order-preserving)
//! - narrative generation over the simplified collage payload
//!
//! plus the file-hosting flow videos go through before they can be referenced
//! in a prompt (upload, then poll until ACTIVE with a bounded attempt count).

pub mod client;
pub mod error;
pub mod files;
mod wire;

pub use client::{DescribedAssets, GenAiClient, GenAiConfig};
pub use error::{GenAiError, GenAiResult};
pub use files::{FileManager, HostedFile};
