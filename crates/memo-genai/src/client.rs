//! Gemini client: asset description and narrative generation.

use std::collections::HashMap;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use memo_models::{Asset, PromptPart, NarrativeScript, ScriptType, SimplifiedPayload};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::error::{GenAiError, GenAiResult};
use crate::files::FileManager;
use crate::wire::{Content, DescriptionResult, GenerateRequest, GenerateResponse, GenerationConfig};

const DESCRIBE_SYSTEM_PROMPT: &str = r#"Describe the given set of images or videos.
Include essential information like what is being spoken, the location, scenery etc.
Return the detailed descriptions of each asset as a JSON array of objects in the below given format and ensure that the order of files is maintained.

OUTPUT FORMAT:
{
    "result": [
        {
            "description": "A detailed description of the provided image or video."
        }
    ]
}"#;

const NARRATIVE_SYSTEM_PROMPT: &str = r#"You are an expert in creating memorable albums or travel vlogs.
Given a JSON object containing a collection of assets and their descriptions, you can intelligently script a short narrative under 300 characters based on the metadata provided such as the creation time of the images, location, etc and the type of script needed - album or vlog (specified in the "type" key of the input JSON object).
The images have been sorted in chronological order based on their creation timestamp and grouped by their location.
Generate a scene for each element of the input "collage" array.
The generated collage is provided along with descriptions of each individual image used to generate the collage.
Each element of the collage array corresponds to an individual collage which will be placed in a scene.
At most one collage will be present in each scene and either a collage or a video can be present in a scene.
Ensure that the length of the output "scenes" array is equal to the length of the input "collage" array and is in order (essentially map each collage element to the corresponding scene).
For better context on the genealogy, we've included an image titled 'Annotations'. This image features all the characters' faces and their annotations (which may include their name, relationship with the user, etc as the case may be).
The short narrative should include any memorable moments (if provided in the input JSON object) and narrated in first person, past tense.
Create a narrative for each array element in the provided JSON array of objects.
Return the script in the below given JSON format.

OUTPUT FORMAT:

{
    "title": "A catchy title for the album / vlog without hashtags",
    "caption": "A short caption for the album / vlog",
    "hashtags": ["Hashtags for the album / vlog"],
    "scenes": [
        {
            "scene": "1",
            "narrative": "A short narrative under 200 characters"
        }
    ]
}"#;

/// Gemini client configuration.
#[derive(Debug, Clone)]
pub struct GenAiConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
    pub temperature: f32,
    /// Fixed interval between file-readiness polls
    pub poll_interval: Duration,
    /// Upper bound on readiness polls before surfacing a timeout
    pub poll_max_attempts: u32,
}

impl Default for GenAiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            model: "gemini-1.5-pro".to_string(),
            timeout: Duration::from_secs(300),
            temperature: 1.0,
            poll_interval: Duration::from_secs(10),
            poll_max_attempts: 30,
        }
    }
}

impl GenAiConfig {
    /// Create config from environment variables.
    pub fn from_env() -> GenAiResult<Self> {
        let api_key = std::env::var("GEMINI_API_KEY").map_err(|_| GenAiError::MissingApiKey)?;
        let defaults = Self::default();
        Ok(Self {
            api_key,
            base_url: std::env::var("GENAI_BASE_URL").unwrap_or(defaults.base_url),
            model: std::env::var("GENAI_MODEL").unwrap_or(defaults.model),
            timeout: Duration::from_secs(
                std::env::var("GENAI_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(300),
            ),
            temperature: defaults.temperature,
            poll_interval: Duration::from_secs(
                std::env::var("GENAI_POLL_INTERVAL_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(10),
            ),
            poll_max_attempts: std::env::var("GENAI_POLL_ATTEMPTS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
        })
    }
}

/// Result of batched asset description.
#[derive(Debug, Clone)]
pub struct DescribedAssets {
    /// One description per input asset, index-aligned
    pub descriptions: Vec<String>,
    /// Hosted URI for each video asset, keyed by asset index
    pub video_uris: HashMap<usize, String>,
}

/// Client for the generative model.
pub struct GenAiClient {
    http: Client,
    config: GenAiConfig,
    files: FileManager,
}

impl GenAiClient {
    /// Create a new client.
    pub fn new(config: GenAiConfig) -> GenAiResult<Self> {
        let http = Client::builder().timeout(config.timeout).build()?;
        let files = FileManager::new(
            http.clone(),
            config.base_url.clone(),
            config.api_key.clone(),
            config.poll_interval,
            config.poll_max_attempts,
        );
        Ok(Self { http, config, files })
    }

    /// Create from environment variables.
    pub fn from_env() -> GenAiResult<Self> {
        Self::new(GenAiConfig::from_env()?)
    }

    /// Describe a batch of assets in one multimodal call.
    ///
    /// Images go inline; videos are uploaded to the file store and referenced
    /// by URI once active. Output descriptions are index-aligned with the
    /// input and the count is validated before returning.
    pub async fn describe_assets(&self, assets: &[Asset]) -> GenAiResult<DescribedAssets> {
        if assets.is_empty() {
            return Ok(DescribedAssets {
                descriptions: Vec::new(),
                video_uris: HashMap::new(),
            });
        }

        let mut parts = Vec::with_capacity(assets.len());
        let mut video_uris = HashMap::new();

        for (index, asset) in assets.iter().enumerate() {
            if asset.media_type.is_image() {
                parts.push(PromptPart::inline(&asset.mime_type, &asset.buffer));
            } else {
                let bytes = BASE64.decode(&asset.buffer)?;
                let display_name = format!(
                    "asset-{index}.{}",
                    asset.mime_type.rsplit('/').next().unwrap_or("bin")
                );
                let uploaded = self.files.upload(bytes, &asset.mime_type, &display_name).await?;
                let active = self.files.wait_until_active(&uploaded).await?;
                parts.push(PromptPart::file(&asset.mime_type, &active.uri));
                video_uris.insert(index, active.uri);
            }
        }

        let text = self.generate(DESCRIBE_SYSTEM_PROMPT, parts).await?;
        let parsed: DescriptionResult = parse_json(&text)?;

        if parsed.result.len() != assets.len() {
            return Err(GenAiError::DescriptionCountMismatch {
                expected: assets.len(),
                actual: parsed.result.len(),
            });
        }

        info!(assets = assets.len(), videos = video_uris.len(), "Described assets");

        Ok(DescribedAssets {
            descriptions: parsed.result.into_iter().map(|e| e.description).collect(),
            video_uris,
        })
    }

    /// Generate the narrative script for a simplified collage payload.
    pub async fn generate_narrative(
        &self,
        payload: &SimplifiedPayload,
        memorable_moments: Option<&str>,
        script_type: ScriptType,
        annotations_png: &str,
    ) -> GenAiResult<NarrativeScript> {
        let prompt_object = serde_json::json!({
            "collage": payload.collage,
            "memorableMoments": memorable_moments.unwrap_or(""),
            "type": script_type.to_string(),
        });

        let mut parts = Vec::with_capacity(payload.buffers.len() + 2);
        parts.push(PromptPart::text(prompt_object.to_string()));
        parts.extend(payload.buffers.iter().cloned());
        parts.push(PromptPart::inline("image/png", annotations_png));

        let text = self.generate(NARRATIVE_SYSTEM_PROMPT, parts).await?;
        let script: NarrativeScript = parse_json(&text)?;

        info!(
            scenes = script.scenes.len(),
            title = %script.title,
            "Generated narrative"
        );

        Ok(script)
    }

    /// One `generateContent` call with a system instruction and mixed parts,
    /// JSON-constrained output.
    async fn generate(&self, system: &str, parts: Vec<PromptPart>) -> GenAiResult<String> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.config.base_url, self.config.model, self.config.api_key
        );

        let request = GenerateRequest {
            contents: vec![Content { parts }],
            system_instruction: Some(Content {
                parts: vec![PromptPart::text(system)],
            }),
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
                response_mime_type: "application/json".to_string(),
            },
        };

        debug!(model = %self.config.model, "Calling generateContent");

        let response = self.http.post(&url).json(&request).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GenAiError::RequestFailed(format!(
                "model returned {}: {}",
                status, body
            )));
        }

        let generated: GenerateResponse = response
            .json()
            .await
            .map_err(|e| GenAiError::MalformedResponse(format!("response envelope: {e}")))?;

        let text = generated.text().ok_or(GenAiError::NoContent)?;
        Ok(strip_code_fences(text).to_string())
    }
}

/// Strip a markdown ```json fence if the model wrapped its output in one.
fn strip_code_fences(text: &str) -> &str {
    let text = text.trim();
    let text = text.strip_prefix("```json").unwrap_or(text);
    let text = text.strip_prefix("```").unwrap_or(text);
    text.strip_suffix("```").unwrap_or(text).trim()
}

fn parse_json<T: DeserializeOwned>(text: &str) -> GenAiResult<T> {
    serde_json::from_str(text).map_err(|e| GenAiError::MalformedResponse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use memo_models::MediaType;
    use wiremock::matchers::{method, path_regex};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn image_asset(buffer: &str) -> Asset {
        Asset {
            buffer: buffer.to_string(),
            mime_type: "image/jpeg".to_string(),
            media_type: MediaType::Image,
            location: "Lisbon".to_string(),
            creation_time: "2024-05-01T10:00:00Z".to_string(),
            description: None,
            file_uri: None,
        }
    }

    fn client(base_url: &str) -> GenAiClient {
        GenAiClient::new(GenAiConfig {
            api_key: "test-key".to_string(),
            base_url: base_url.to_string(),
            poll_interval: Duration::from_millis(5),
            poll_max_attempts: 2,
            ..GenAiConfig::default()
        })
        .unwrap()
    }

    fn model_text_response(text: &str) -> serde_json::Value {
        serde_json::json!({
            "candidates": [{ "content": { "parts": [{ "text": text }] } }]
        })
    }

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("{\"a\":1}"), "{\"a\":1}");
    }

    #[test]
    fn test_config_defaults() {
        let config = GenAiConfig::default();
        assert_eq!(config.model, "gemini-1.5-pro");
        assert_eq!(config.poll_interval, Duration::from_secs(10));
        assert_eq!(config.poll_max_attempts, 30);
    }

    #[tokio::test]
    async fn test_describe_assets_preserves_order() {
        let server = MockServer::start().await;
        let body = model_text_response(
            r#"{"result": [{"description": "first"}, {"description": "second"}]}"#,
        );
        Mock::given(method("POST"))
            .and(path_regex(r"/v1beta/models/.+:generateContent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let described = client(&server.uri())
            .describe_assets(&[image_asset("QQ=="), image_asset("Qg==")])
            .await
            .unwrap();

        assert_eq!(described.descriptions, vec!["first", "second"]);
        assert!(described.video_uris.is_empty());
    }

    #[tokio::test]
    async fn test_describe_assets_count_mismatch() {
        let server = MockServer::start().await;
        let body = model_text_response(r#"{"result": [{"description": "only one"}]}"#);
        Mock::given(method("POST"))
            .and(path_regex(r"/v1beta/models/.+:generateContent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let err = client(&server.uri())
            .describe_assets(&[image_asset("QQ=="), image_asset("Qg==")])
            .await
            .unwrap_err();
        assert!(matches!(err, GenAiError::DescriptionCountMismatch { expected: 2, actual: 1 }));
    }

    #[tokio::test]
    async fn test_generate_narrative_parses_fenced_json() {
        let server = MockServer::start().await;
        let script = "```json\n{\"title\": \"T\", \"caption\": \"C\", \"hashtags\": [\"#t\"], \"scenes\": [{\"scene\": \"1\", \"narrative\": \"We arrived.\"}]}\n```";
        Mock::given(method("POST"))
            .and(path_regex(r"/v1beta/models/.+:generateContent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(model_text_response(script)))
            .mount(&server)
            .await;

        let payload = SimplifiedPayload {
            collage: vec![],
            buffers: vec![],
        };
        let narrative = client(&server.uri())
            .generate_narrative(&payload, Some("the sunset"), ScriptType::Vlog, "UE5H")
            .await
            .unwrap();

        assert_eq!(narrative.title, "T");
        assert_eq!(narrative.scenes.len(), 1);
        assert_eq!(narrative.scenes[0].scene, 1);
    }

    #[tokio::test]
    async fn test_malformed_model_output_is_typed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path_regex(r"/v1beta/models/.+:generateContent"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(model_text_response("not json at all")),
            )
            .mount(&server)
            .await;

        let err = client(&server.uri())
            .describe_assets(&[image_asset("QQ==")])
            .await
            .unwrap_err();
        assert!(matches!(err, GenAiError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_upstream_error_surfaces_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path_regex(r"/v1beta/models/.+:generateContent"))
            .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
            .mount(&server)
            .await;

        let err = client(&server.uri())
            .describe_assets(&[image_asset("QQ==")])
            .await
            .unwrap_err();
        assert!(matches!(err, GenAiError::RequestFailed(_)));
    }
}
