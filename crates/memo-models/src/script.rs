//! Narrative output and final script models.

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

use crate::asset::MediaType;

/// One narrated scene as returned by the narrative model, before enrichment.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct NarrativeScene {
    /// 1-based scene number. The model emits this as a string ("1"), so
    /// deserialization tolerates both forms.
    #[serde(deserialize_with = "scene_number")]
    pub scene: u32,

    /// Short first-person, past-tense narrative
    pub narrative: String,
}

/// Raw narrative model output: title/caption/hashtags plus one scene per
/// collage group, index-aligned with the simplified payload.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct NarrativeScript {
    pub title: String,
    pub caption: String,
    #[serde(default)]
    pub hashtags: Vec<String>,
    pub scenes: Vec<NarrativeScene>,
}

/// A fully-assembled scene in the response payload.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Scene {
    /// 1-based scene number
    pub scene: u32,

    /// Narrative text for this scene
    pub narrative: String,

    /// Collage PNG or raw video bytes, base64-encoded
    pub collage: String,

    /// IMAGE or VIDEO
    #[serde(rename = "type")]
    pub media_type: MediaType,

    /// "image/png" for collages, the source mime type for videos
    #[serde(rename = "mimeType")]
    pub mime_type: String,

    /// Location shared by the scene's assets
    pub location: String,

    /// Location-themed background image URL
    pub background_image: String,

    /// Synthesized narration audio URL
    pub audio: String,
}

/// The final response payload.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Script {
    pub title: String,
    pub caption: String,
    pub hashtags: Vec<String>,
    pub scenes: Vec<Scene>,
}

/// Accept a scene number as either a JSON number or a numeric string.
fn scene_number<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(u32),
        String(String),
    }

    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::String(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid scene number: {s:?}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_number_from_string() {
        let scene: NarrativeScene =
            serde_json::from_str(r#"{"scene": "3", "narrative": "We walked."}"#).unwrap();
        assert_eq!(scene.scene, 3);
    }

    #[test]
    fn test_scene_number_from_number() {
        let scene: NarrativeScene =
            serde_json::from_str(r#"{"scene": 7, "narrative": "We ate."}"#).unwrap();
        assert_eq!(scene.scene, 7);
    }

    #[test]
    fn test_scene_number_rejects_garbage() {
        let result: Result<NarrativeScene, _> =
            serde_json::from_str(r#"{"scene": "one", "narrative": "x"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_narrative_script_missing_hashtags_defaults_empty() {
        let script: NarrativeScript = serde_json::from_str(
            r#"{"title": "T", "caption": "C", "scenes": []}"#,
        )
        .unwrap();
        assert!(script.hashtags.is_empty());
    }
}
