//! Collage group and simplified model-payload types.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::asset::{Asset, MediaType};

/// One scene-backing unit: a rendered image collage or a pass-through video.
///
/// Invariants:
/// - an IMAGE group holds 1..=4 source assets and `buffer` is the rendered
///   PNG collage of those assets;
/// - a VIDEO group holds exactly one asset and `buffer` is that asset's raw
///   buffer, unmodified.
///
/// `ordinal` is the group's position in the final flattened sequence and is
/// the identifier every downstream enrichment is keyed by.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CollageGroup {
    /// Stable position in the scene sequence (0-based)
    pub ordinal: usize,

    /// Location shared by all assets in the group
    pub location: String,

    /// IMAGE (collage) or VIDEO (pass-through)
    #[serde(rename = "type")]
    pub media_type: MediaType,

    /// Collage PNG or raw video bytes, base64-encoded
    pub buffer: String,

    /// Source assets, in their post-sort order
    pub assets: Vec<Asset>,
}

impl CollageGroup {
    /// Mime type of the scene media: collages are always PNG, videos keep
    /// their original mime type.
    pub fn scene_mime_type(&self) -> String {
        match self.media_type {
            MediaType::Image => "image/png".to_string(),
            MediaType::Video => self
                .assets
                .first()
                .map(|a| a.mime_type.clone())
                .unwrap_or_default(),
        }
    }
}

/// Per-asset projection included in the narrative prompt.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AssetMeta {
    pub description: String,
    pub creation_time: String,
    #[serde(rename = "type")]
    pub media_type: MediaType,
}

/// Prompt-facing metadata for one collage group.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CollageMeta {
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub location: String,
    /// The collage/video buffer, base64-encoded
    pub collage: String,
    pub assets: Vec<AssetMeta>,
}

/// Inline media block consumed by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct InlineData {
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    /// Base64 payload
    pub data: String,
}

/// Reference to a file previously uploaded to the model's file store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FileData {
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    #[serde(rename = "fileUri")]
    pub file_uri: String,
}

/// One multimodal prompt part, in the model's wire shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum PromptPart {
    Text {
        text: String,
    },
    Inline {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
    File {
        #[serde(rename = "fileData")]
        file_data: FileData,
    },
}

impl PromptPart {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn inline(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self::Inline {
            inline_data: InlineData {
                mime_type: mime_type.into(),
                data: data.into(),
            },
        }
    }

    pub fn file(mime_type: impl Into<String>, file_uri: impl Into<String>) -> Self {
        Self::File {
            file_data: FileData {
                mime_type: mime_type.into(),
                file_uri: file_uri.into(),
            },
        }
    }
}

/// Read-only projection of `Vec<CollageGroup>` handed to the narrative model.
///
/// Invariant: `collage` and `buffers` have equal length and `buffers[i]`
/// describes the same logical group as `collage[i]`. The constructor in the
/// pipeline is the only place these arrays are built; nothing downstream may
/// reorder or filter one without the other.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SimplifiedPayload {
    pub collage: Vec<CollageMeta>,
    pub buffers: Vec<PromptPart>,
}

impl SimplifiedPayload {
    pub fn len(&self) -> usize {
        self.collage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collage.is_empty()
    }
}
