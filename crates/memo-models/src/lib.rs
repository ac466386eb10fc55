//! Shared data models for the MemoMosaic backend.
//!
//! This crate provides Serde-serializable types for:
//! - Media assets and their wire representation
//! - Collage groups and the simplified model payload
//! - Narrative output and the final script
//! - HTTP request/response bodies

pub mod asset;
pub mod collage;
pub mod request;
pub mod script;
pub mod timestamp;

// Re-export common types
pub use asset::{Asset, MediaType};
pub use collage::{AssetMeta, CollageGroup, CollageMeta, FileData, InlineData, PromptPart, SimplifiedPayload};
pub use request::{CreateScriptRequest, ExtractFacesRequest, ExtractFacesResponse, PlayHtCredentials, ScriptType};
pub use script::{NarrativeScene, NarrativeScript, Scene, Script};
pub use timestamp::parse_creation_time;
