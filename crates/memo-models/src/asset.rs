//! Media asset models.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Kind of media carried by an asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MediaType {
    Image,
    Video,
}

impl MediaType {
    pub fn is_image(&self) -> bool {
        matches!(self, MediaType::Image)
    }

    pub fn is_video(&self) -> bool {
        matches!(self, MediaType::Video)
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaType::Image => write!(f, "IMAGE"),
            MediaType::Video => write!(f, "VIDEO"),
        }
    }
}

/// A single uploaded photo or video.
///
/// `buffer` holds the raw media bytes as base64, exactly as received on the
/// wire. `description` and `file_uri` start empty and are attached during
/// description enrichment; once attached the asset is not mutated again.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Asset {
    /// Raw media bytes, base64-encoded
    pub buffer: String,

    /// Original mime type (e.g. "image/jpeg", "video/mp4")
    #[serde(rename = "mimeType")]
    pub mime_type: String,

    /// IMAGE or VIDEO
    #[serde(rename = "type")]
    pub media_type: MediaType,

    /// Free-text location the asset was captured at
    pub location: String,

    /// Capture timestamp as provided by the client (best-effort parseable)
    pub creation_time: String,

    /// Model-generated description, attached during enrichment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Hosted file URI for videos uploaded to the model's file store.
    /// Attached during enrichment; never part of the client payload.
    #[serde(default, skip_serializing)]
    pub file_uri: Option<String>,
}

impl Asset {
    /// Description text, empty string when enrichment produced none.
    pub fn description_or_empty(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> &'static str {
        r#"{
            "buffer": "aGVsbG8=",
            "mimeType": "image/jpeg",
            "type": "IMAGE",
            "location": "Paris",
            "creation_time": "2024-05-01T10:00:00Z"
        }"#
    }

    #[test]
    fn test_asset_wire_format() {
        let asset: Asset = serde_json::from_str(sample_json()).unwrap();
        assert_eq!(asset.media_type, MediaType::Image);
        assert_eq!(asset.mime_type, "image/jpeg");
        assert!(asset.description.is_none());
        assert!(asset.file_uri.is_none());
    }

    #[test]
    fn test_media_type_roundtrip() {
        assert_eq!(serde_json::to_string(&MediaType::Video).unwrap(), "\"VIDEO\"");
        let t: MediaType = serde_json::from_str("\"IMAGE\"").unwrap();
        assert!(t.is_image());
    }

    #[test]
    fn test_file_uri_not_serialized() {
        let mut asset: Asset = serde_json::from_str(sample_json()).unwrap();
        asset.file_uri = Some("https://files.example/abc".to_string());
        let out = serde_json::to_string(&asset).unwrap();
        assert!(!out.contains("file_uri"));
    }
}
