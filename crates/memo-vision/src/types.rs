//! Vision sidecar wire types.

use serde::{Deserialize, Serialize};

/// One detected face bounding box, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectedFace {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Serialize)]
pub(crate) struct DetectRequest<'a> {
    pub image: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DetectResponse {
    #[serde(default)]
    pub faces: Vec<DetectedFace>,
}

#[derive(Debug, Serialize)]
pub(crate) struct RenderRequest<'a> {
    pub annotations: &'a serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RenderResponse {
    /// Base64 PNG of the rendered template
    pub image: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct HealthResponse {
    pub status: String,
}
