//! End-to-end script generation pipeline.

use std::sync::Arc;

use memo_models::{CreateScriptRequest, Script};
use tracing::info;

use crate::assemble::assemble_scenes;
use crate::collage::build_collage_groups;
use crate::error::PipelineResult;
use crate::grouper::group_by_location;
use crate::providers::{AnnotationsRenderer, GenerativeModel, ImageSearch, SpeechSynthesizer};
use crate::simplify::simplify;

/// Default cap on concurrent per-scene enrichment calls.
pub const DEFAULT_MAX_CONCURRENCY: usize = 4;

/// Orchestrates the full request-to-script flow. Providers are injected so
/// the pipeline is testable without live services.
pub struct ScriptPipeline {
    model: Arc<dyn GenerativeModel>,
    search: Arc<dyn ImageSearch>,
    voice: Arc<dyn SpeechSynthesizer>,
    renderer: Arc<dyn AnnotationsRenderer>,
    max_concurrency: usize,
}

impl ScriptPipeline {
    pub fn new(
        model: Arc<dyn GenerativeModel>,
        search: Arc<dyn ImageSearch>,
        voice: Arc<dyn SpeechSynthesizer>,
        renderer: Arc<dyn AnnotationsRenderer>,
    ) -> Self {
        Self {
            model,
            search,
            voice,
            renderer,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }

    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    /// Run the pipeline: describe assets, group by location, build collages,
    /// generate the narrative, then enrich each scene with a background image
    /// and narration audio.
    pub async fn generate(&self, request: CreateScriptRequest) -> PipelineResult<Script> {
        let CreateScriptRequest {
            mut assets,
            script_type,
            memorable_moments,
            play_ht_cred,
            annotations,
        } = request;

        info!(assets = assets.len(), %script_type, "Starting script generation");

        let described = self.model.describe_assets(&assets).await?;
        for (index, asset) in assets.iter_mut().enumerate() {
            if let Some(description) = described.descriptions.get(index) {
                asset.description = Some(description.clone());
            }
            if let Some(uri) = described.video_uris.get(&index) {
                asset.file_uri = Some(uri.clone());
            }
        }

        let location_groups = group_by_location(assets);
        let collage_groups = build_collage_groups(location_groups).await?;
        let payload = simplify(&collage_groups)?;

        let annotations_png = self.renderer.render_annotations(&annotations).await?;

        let narrative = self
            .model
            .generate_narrative(&payload, memorable_moments, script_type, &annotations_png)
            .await?;

        info!(
            scenes = narrative.scenes.len(),
            title = %narrative.title,
            "Narrative generated, assembling scenes"
        );

        assemble_scenes(
            narrative,
            &collage_groups,
            &play_ht_cred,
            self.search.as_ref(),
            self.voice.as_ref(),
            self.max_concurrency,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{
        MockAnnotationsRenderer, MockGenerativeModel, MockImageSearch, MockSpeechSynthesizer,
    };
    use base64::engine::general_purpose::STANDARD as BASE64;
    use base64::Engine;
    use image::{DynamicImage, ImageOutputFormat, RgbaImage};
    use memo_genai::DescribedAssets;
    use memo_models::{
        Asset, MediaType, NarrativeScene, NarrativeScript, PlayHtCredentials, ScriptType,
    };
    use std::collections::HashMap;

    fn png_base64() -> String {
        let img = DynamicImage::ImageRgba8(RgbaImage::new(16, 16));
        let mut out = std::io::Cursor::new(Vec::new());
        img.write_to(&mut out, ImageOutputFormat::Png).unwrap();
        BASE64.encode(out.into_inner())
    }

    fn image_asset(location: &str, creation_time: &str) -> Asset {
        Asset {
            buffer: png_base64(),
            mime_type: "image/png".to_string(),
            media_type: MediaType::Image,
            location: location.to_string(),
            creation_time: creation_time.to_string(),
            description: None,
            file_uri: None,
        }
    }

    fn request(assets: Vec<Asset>) -> CreateScriptRequest {
        CreateScriptRequest {
            assets,
            script_type: ScriptType::Album,
            memorable_moments: Some("the sunset".to_string()),
            play_ht_cred: PlayHtCredentials {
                user_id: "u".to_string(),
                secret_key: "s".to_string(),
                gender: "FEMALE".to_string(),
                audio: "UklGRg==".to_string(),
            },
            annotations: serde_json::json!({"faces": []}),
        }
    }

    #[tokio::test]
    async fn test_full_pipeline_two_locations() {
        // Five images in two locations, one with no usable timestamp, should
        // yield two collage groups and two enriched scenes.
        let assets = vec![
            image_asset("Rome", "2024-05-01T09:00:00Z"),
            image_asset("Rome", "2024-05-01T10:00:00Z"),
            image_asset("Paris", "2024-05-02T09:00:00Z"),
            image_asset("Paris", "2024-05-02T10:00:00Z"),
            image_asset("Paris", "not a timestamp"),
        ];

        let mut model = MockGenerativeModel::new();
        model.expect_describe_assets().returning(|assets| {
            Ok(DescribedAssets {
                descriptions: (0..assets.len()).map(|i| format!("photo {i}")).collect(),
                video_uris: HashMap::new(),
            })
        });
        model
            .expect_generate_narrative()
            .returning(|payload, moments, _, _| {
                assert_eq!(moments.as_deref(), Some("the sunset"));
                Ok(NarrativeScript {
                    title: "A Week Away".to_string(),
                    caption: "So many memories".to_string(),
                    hashtags: vec!["#memories".to_string()],
                    scenes: (0..payload.len())
                        .map(|i| NarrativeScene {
                            scene: (i + 1) as u32,
                            narrative: format!("Scene {} of our trip.", i + 1),
                        })
                        .collect(),
                })
            });

        let mut search = MockImageSearch::new();
        search
            .expect_location_banner()
            .returning(|location| Ok(format!("https://images.example/{location}")));

        let mut voice = MockSpeechSynthesizer::new();
        voice
            .expect_synthesize()
            .returning(|_, _| Ok("https://audio.example/narration.mp3".to_string()));

        let mut renderer = MockAnnotationsRenderer::new();
        renderer
            .expect_render_annotations()
            .returning(|_| Ok("QU5OT1RBVElPTlM=".to_string()));

        let pipeline = ScriptPipeline::new(
            Arc::new(model),
            Arc::new(search),
            Arc::new(voice),
            Arc::new(renderer),
        );

        let script = pipeline.generate(request(assets)).await.unwrap();

        assert_eq!(script.title, "A Week Away");
        assert_eq!(script.scenes.len(), 2);
        for scene in &script.scenes {
            assert!(!scene.background_image.is_empty());
            assert!(!scene.audio.is_empty());
            assert_eq!(scene.mime_type, "image/png");
            assert_eq!(scene.media_type, MediaType::Image);
        }
        // Paris has the newest asset so it leads.
        assert_eq!(script.scenes[0].location, "Paris");
        assert_eq!(script.scenes[1].location, "Rome");
    }

    #[tokio::test]
    async fn test_full_pipeline_one_location_splits_batches() {
        // Five images at one location, one with no usable timestamp, should
        // split 4+1 into two collage groups and two enriched scenes.
        let assets = vec![
            image_asset("Rome", "2024-05-01T09:00:00Z"),
            image_asset("Rome", "2024-05-01T10:00:00Z"),
            image_asset("Rome", "2024-05-01T11:00:00Z"),
            image_asset("Rome", "2024-05-01T12:00:00Z"),
            image_asset("Rome", "not a timestamp"),
        ];

        let mut model = MockGenerativeModel::new();
        model.expect_describe_assets().returning(|assets| {
            Ok(DescribedAssets {
                descriptions: (0..assets.len()).map(|i| format!("photo {i}")).collect(),
                video_uris: HashMap::new(),
            })
        });
        model
            .expect_generate_narrative()
            .returning(|payload, _, _, _| {
                let batch_sizes: Vec<usize> =
                    payload.collage.iter().map(|c| c.assets.len()).collect();
                assert_eq!(batch_sizes, vec![4, 1]);
                Ok(NarrativeScript {
                    title: "Roman Holiday".to_string(),
                    caption: "All of it".to_string(),
                    hashtags: vec![],
                    scenes: (0..payload.len())
                        .map(|i| NarrativeScene {
                            scene: (i + 1) as u32,
                            narrative: format!("Part {}.", i + 1),
                        })
                        .collect(),
                })
            });

        let mut search = MockImageSearch::new();
        search
            .expect_location_banner()
            .returning(|location| Ok(format!("https://images.example/{location}")));

        let mut voice = MockSpeechSynthesizer::new();
        voice
            .expect_synthesize()
            .returning(|_, _| Ok("https://audio.example/narration.mp3".to_string()));

        let mut renderer = MockAnnotationsRenderer::new();
        renderer
            .expect_render_annotations()
            .returning(|_| Ok("QU5OT1RBVElPTlM=".to_string()));

        let pipeline = ScriptPipeline::new(
            Arc::new(model),
            Arc::new(search),
            Arc::new(voice),
            Arc::new(renderer),
        );

        let script = pipeline.generate(request(assets)).await.unwrap();

        assert_eq!(script.scenes.len(), 2);
        for scene in &script.scenes {
            assert_eq!(scene.location, "Rome");
            assert!(!scene.background_image.is_empty());
            assert!(!scene.audio.is_empty());
        }
    }

    #[tokio::test]
    async fn test_describe_failure_short_circuits() {
        let mut model = MockGenerativeModel::new();
        model
            .expect_describe_assets()
            .returning(|_| Err(crate::error::PipelineError::Task("model down".to_string())));
        model.expect_generate_narrative().never();

        let mut renderer = MockAnnotationsRenderer::new();
        renderer.expect_render_annotations().never();

        let pipeline = ScriptPipeline::new(
            Arc::new(model),
            Arc::new(MockImageSearch::new()),
            Arc::new(MockSpeechSynthesizer::new()),
            Arc::new(renderer),
        );

        let result = pipeline
            .generate(request(vec![image_asset("Rome", "2024-05-01T09:00:00Z")]))
            .await;
        assert!(result.is_err());
    }
}
