//! Reduce collage groups to the compact payload sent to the narrative model.

use memo_models::{AssetMeta, CollageGroup, CollageMeta, MediaType, PromptPart, SimplifiedPayload};

use crate::error::{PipelineError, PipelineResult};

/// Project each group into its metadata entry and the prompt part carrying
/// its media. Image groups attach the collage PNG inline; video groups
/// reference the uploaded file by URI. Both sides stay index-aligned with
/// the group ordinals.
pub fn simplify(groups: &[CollageGroup]) -> PipelineResult<SimplifiedPayload> {
    let mut collage = Vec::with_capacity(groups.len());
    let mut buffers = Vec::with_capacity(groups.len());

    for group in groups {
        collage.push(CollageMeta {
            location: group.location.clone(),
            media_type: group.media_type,
            collage: group.buffer.clone(),
            assets: group
                .assets
                .iter()
                .map(|a| AssetMeta {
                    description: a.description_or_empty().to_string(),
                    creation_time: a.creation_time.clone(),
                    media_type: a.media_type,
                })
                .collect(),
        });

        let part = match group.media_type {
            MediaType::Image => PromptPart::inline("image/png", &group.buffer),
            MediaType::Video => {
                let asset = group
                    .assets
                    .first()
                    .ok_or(PipelineError::MissingVideoUri { ordinal: group.ordinal })?;
                let uri = asset
                    .file_uri
                    .as_deref()
                    .ok_or(PipelineError::MissingVideoUri { ordinal: group.ordinal })?;
                PromptPart::file(&asset.mime_type, uri)
            }
        };
        buffers.push(part);
    }

    if collage.len() != buffers.len() {
        return Err(PipelineError::Task(format!(
            "simplified payload misaligned: {} meta entries, {} media parts",
            collage.len(),
            buffers.len()
        )));
    }

    Ok(SimplifiedPayload { collage, buffers })
}

#[cfg(test)]
mod tests {
    use super::*;
    use memo_models::Asset;

    fn asset(media_type: MediaType, file_uri: Option<&str>) -> Asset {
        Asset {
            buffer: "AAAA".to_string(),
            mime_type: if media_type.is_video() {
                "video/mp4".to_string()
            } else {
                "image/jpeg".to_string()
            },
            media_type,
            location: "Rome".to_string(),
            creation_time: "2024-05-01T08:00:00Z".to_string(),
            description: Some("a sunny plaza".to_string()),
            file_uri: file_uri.map(str::to_string),
        }
    }

    fn group(ordinal: usize, media_type: MediaType, file_uri: Option<&str>) -> CollageGroup {
        CollageGroup {
            ordinal,
            location: "Rome".to_string(),
            media_type,
            buffer: "Q09MTEFHRQ==".to_string(),
            assets: vec![asset(media_type, file_uri)],
        }
    }

    #[test]
    fn test_meta_and_parts_stay_aligned() {
        let groups = vec![
            group(0, MediaType::Image, None),
            group(1, MediaType::Video, Some("files/abc")),
            group(2, MediaType::Image, None),
        ];

        let payload = simplify(&groups).unwrap();
        assert_eq!(payload.len(), 3);

        match &payload.buffers[0] {
            PromptPart::Inline { inline_data } => {
                assert_eq!(inline_data.mime_type, "image/png");
                assert_eq!(inline_data.data, "Q09MTEFHRQ==");
            }
            other => panic!("expected inline part, got {other:?}"),
        }
        match &payload.buffers[1] {
            PromptPart::File { file_data } => {
                assert_eq!(file_data.mime_type, "video/mp4");
                assert_eq!(file_data.file_uri, "files/abc");
            }
            other => panic!("expected file part, got {other:?}"),
        }

        assert_eq!(payload.collage[1].media_type, MediaType::Video);
        assert_eq!(payload.collage[0].collage, "Q09MTEFHRQ==");
        assert_eq!(payload.collage[0].assets[0].description, "a sunny plaza");
    }

    #[test]
    fn test_video_without_uri_is_an_error() {
        let groups = vec![group(0, MediaType::Video, None)];
        match simplify(&groups) {
            Err(PipelineError::MissingVideoUri { ordinal }) => assert_eq!(ordinal, 0),
            other => panic!("expected MissingVideoUri, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_description_serializes_empty() {
        let mut g = group(0, MediaType::Image, None);
        g.assets[0].description = None;
        let payload = simplify(&[g]).unwrap();
        assert_eq!(payload.collage[0].assets[0].description, "");
    }
}
