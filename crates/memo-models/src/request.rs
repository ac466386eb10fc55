//! HTTP request/response body models.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::asset::Asset;

/// Kind of script to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScriptType {
    Album,
    Vlog,
}

impl std::fmt::Display for ScriptType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScriptType::Album => write!(f, "ALBUM"),
            ScriptType::Vlog => write!(f, "VLOG"),
        }
    }
}

/// Per-request PlayHT credentials and the user's voice-clone sample.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PlayHtCredentials {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "secretKey")]
    pub secret_key: String,
    /// "MALE" / "FEMALE", lowercased before hitting the provider
    pub gender: String,
    /// Voice sample bytes, base64-encoded
    pub audio: String,
}

/// Body of `POST /create`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, JsonSchema)]
pub struct CreateScriptRequest {
    #[validate(length(min = 1, message = "at least one asset is required"))]
    pub assets: Vec<Asset>,

    #[serde(rename = "type")]
    pub script_type: ScriptType,

    #[serde(rename = "memorableMoments", default)]
    pub memorable_moments: Option<String>,

    #[serde(rename = "playHTCred")]
    pub play_ht_cred: PlayHtCredentials,

    /// Template data for the annotations reference image (faces + labels),
    /// forwarded verbatim to the render sidecar.
    pub annotations: serde_json::Value,
}

/// Body of `POST /extractFaces`.
///
/// `images` is optional so a missing field can be rejected with a 400 rather
/// than a deserialization failure.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ExtractFacesRequest {
    pub images: Option<Vec<String>>,
}

/// Response of `POST /extractFaces`.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct ExtractFacesResponse {
    pub success: bool,
    /// Base64 JPEG crops, one per detected face, across all input images
    pub faces: Vec<String>,
}
