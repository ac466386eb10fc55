//! Scene assembly: pair narrative scenes with their collage groups and
//! enrich each with a background image and narration audio.

use std::sync::Arc;

use memo_models::{CollageGroup, NarrativeScript, PlayHtCredentials, Scene, Script};
use tokio::sync::Semaphore;
use tracing::debug;

use crate::error::{PipelineError, PipelineResult};
use crate::providers::{ImageSearch, SpeechSynthesizer};

/// Zip the narrative's scenes with the collage groups by position, then
/// fetch each scene's background image and synthesize its narration under a
/// concurrency cap. Output order matches the collage-group order regardless
/// of task completion order.
pub async fn assemble_scenes(
    narrative: NarrativeScript,
    groups: &[CollageGroup],
    cred: &PlayHtCredentials,
    search: &dyn ImageSearch,
    voice: &dyn SpeechSynthesizer,
    max_concurrency: usize,
) -> PipelineResult<Script> {
    if narrative.scenes.len() != groups.len() {
        return Err(PipelineError::SceneCountMismatch {
            expected: groups.len(),
            actual: narrative.scenes.len(),
        });
    }

    let semaphore = Arc::new(Semaphore::new(max_concurrency.max(1)));

    let futures = narrative
        .scenes
        .iter()
        .zip(groups.iter())
        .map(|(ns, group)| {
            let semaphore = Arc::clone(&semaphore);
            async move {
                let _permit = semaphore
                    .acquire()
                    .await
                    .map_err(|e| PipelineError::Task(e.to_string()))?;

                let (background_image, audio) = tokio::try_join!(
                    search.location_banner(&group.location),
                    voice.synthesize(&ns.narrative, cred),
                )?;

                debug!(ordinal = group.ordinal, location = %group.location, "Assembled scene");

                Ok::<Scene, PipelineError>(Scene {
                    scene: ns.scene,
                    narrative: ns.narrative.clone(),
                    collage: group.buffer.clone(),
                    media_type: group.media_type,
                    mime_type: group.scene_mime_type(),
                    location: group.location.clone(),
                    background_image,
                    audio,
                })
            }
        });

    let scenes = futures_util::future::try_join_all(futures).await?;

    Ok(Script {
        title: narrative.title,
        caption: narrative.caption,
        hashtags: narrative.hashtags,
        scenes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{MockImageSearch, MockSpeechSynthesizer};
    use memo_models::{Asset, MediaType, NarrativeScene};

    fn cred() -> PlayHtCredentials {
        PlayHtCredentials {
            user_id: "user".to_string(),
            secret_key: "secret".to_string(),
            gender: "FEMALE".to_string(),
            audio: "UklGRg==".to_string(),
        }
    }

    fn group(ordinal: usize, location: &str) -> CollageGroup {
        CollageGroup {
            ordinal,
            location: location.to_string(),
            media_type: MediaType::Image,
            buffer: format!("collage-{ordinal}"),
            assets: vec![Asset {
                buffer: String::new(),
                mime_type: "image/jpeg".to_string(),
                media_type: MediaType::Image,
                location: location.to_string(),
                creation_time: String::new(),
                description: None,
                file_uri: None,
            }],
        }
    }

    fn narrative(scene_count: usize) -> NarrativeScript {
        NarrativeScript {
            title: "Our Trip".to_string(),
            caption: "What a week".to_string(),
            hashtags: vec!["#travel".to_string()],
            scenes: (0..scene_count)
                .map(|i| NarrativeScene {
                    scene: (i + 1) as u32,
                    narrative: format!("We visited place {i}."),
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn test_scene_count_mismatch_is_rejected() {
        let search = MockImageSearch::new();
        let voice = MockSpeechSynthesizer::new();
        let groups = vec![group(0, "Rome"), group(1, "Paris")];

        let result =
            assemble_scenes(narrative(3), &groups, &cred(), &search, &voice, 4).await;

        match result {
            Err(PipelineError::SceneCountMismatch { expected, actual }) => {
                assert_eq!(expected, 2);
                assert_eq!(actual, 3);
            }
            other => panic!("expected SceneCountMismatch, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_scenes_preserve_group_order() {
        let mut search = MockImageSearch::new();
        search
            .expect_location_banner()
            .returning(|location| Ok(format!("https://images.example/{location}")));
        let mut voice = MockSpeechSynthesizer::new();
        voice
            .expect_synthesize()
            .returning(|text, _| Ok(format!("https://audio.example/{}", text.len())));

        let groups = vec![group(0, "Rome"), group(1, "Paris"), group(2, "Oslo")];
        let script =
            assemble_scenes(narrative(3), &groups, &cred(), &search, &voice, 2)
                .await
                .unwrap();

        assert_eq!(script.title, "Our Trip");
        assert_eq!(script.scenes.len(), 3);
        let locations: Vec<&str> =
            script.scenes.iter().map(|s| s.location.as_str()).collect();
        assert_eq!(locations, vec!["Rome", "Paris", "Oslo"]);
        assert_eq!(script.scenes[1].collage, "collage-1");
        assert_eq!(
            script.scenes[2].background_image,
            "https://images.example/Oslo"
        );
        assert_eq!(script.scenes[0].mime_type, "image/png");
    }

    #[tokio::test]
    async fn test_enrichment_failure_propagates() {
        let mut search = MockImageSearch::new();
        search
            .expect_location_banner()
            .returning(|_| Err(PipelineError::Task("search down".to_string())));
        let mut voice = MockSpeechSynthesizer::new();
        voice
            .expect_synthesize()
            .returning(|_, _| Ok("https://audio.example/a".to_string()));

        let groups = vec![group(0, "Rome")];
        let result =
            assemble_scenes(narrative(1), &groups, &cred(), &search, &voice, 4).await;
        assert!(result.is_err());
    }
}
