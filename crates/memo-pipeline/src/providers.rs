//! Provider seams for the pipeline.
//!
//! Each external service the pipeline talks to sits behind a trait so the
//! orchestration can be exercised with mocks. The concrete clients implement
//! these by delegating to their inherent methods.

use async_trait::async_trait;
use memo_genai::{DescribedAssets, GenAiClient};
use memo_models::{Asset, NarrativeScript, PlayHtCredentials, ScriptType, SimplifiedPayload};
use memo_search::SearchClient;
use memo_vision::VisionClient;
use memo_voice::VoiceClient;

use crate::error::PipelineResult;

/// Multimodal model: asset descriptions plus narrative generation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    async fn describe_assets(&self, assets: &[Asset]) -> PipelineResult<DescribedAssets>;

    async fn generate_narrative(
        &self,
        payload: &SimplifiedPayload,
        memorable_moments: Option<String>,
        script_type: ScriptType,
        annotations_png: &str,
    ) -> PipelineResult<NarrativeScript>;
}

/// Stock-photo lookup for location banners.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageSearch: Send + Sync {
    async fn location_banner(&self, location: &str) -> PipelineResult<String>;
}

/// Text-to-speech with per-request credentials.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str, cred: &PlayHtCredentials) -> PipelineResult<String>;
}

/// Renders the annotations document to a PNG for the narrative prompt.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnnotationsRenderer: Send + Sync {
    async fn render_annotations(&self, annotations: &serde_json::Value) -> PipelineResult<String>;
}

#[async_trait]
impl GenerativeModel for GenAiClient {
    async fn describe_assets(&self, assets: &[Asset]) -> PipelineResult<DescribedAssets> {
        Ok(GenAiClient::describe_assets(self, assets).await?)
    }

    async fn generate_narrative(
        &self,
        payload: &SimplifiedPayload,
        memorable_moments: Option<String>,
        script_type: ScriptType,
        annotations_png: &str,
    ) -> PipelineResult<NarrativeScript> {
        Ok(GenAiClient::generate_narrative(
            self,
            payload,
            memorable_moments.as_deref(),
            script_type,
            annotations_png,
        )
        .await?)
    }
}

#[async_trait]
impl ImageSearch for SearchClient {
    async fn location_banner(&self, location: &str) -> PipelineResult<String> {
        Ok(SearchClient::location_banner(self, location).await?)
    }
}

#[async_trait]
impl SpeechSynthesizer for VoiceClient {
    async fn synthesize(&self, text: &str, cred: &PlayHtCredentials) -> PipelineResult<String> {
        Ok(VoiceClient::synthesize(self, text, cred).await?)
    }
}

#[async_trait]
impl AnnotationsRenderer for VisionClient {
    async fn render_annotations(&self, annotations: &serde_json::Value) -> PipelineResult<String> {
        Ok(VisionClient::render_annotations(self, annotations).await?)
    }
}
