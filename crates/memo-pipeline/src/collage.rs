//! Collage group construction.

use memo_media::{render_collage_base64, COLLAGE_WIDTH};
use memo_models::{CollageGroup, MediaType};
use tracing::debug;

use crate::error::{PipelineError, PipelineResult};
use crate::grouper::LocationGroup;

/// Images per collage; the last batch of a location may be smaller.
pub const COLLAGE_BATCH_SIZE: usize = 4;

/// Build the ordered collage-group sequence from location groups.
///
/// Per location: image batches of up to four are composited into PNG
/// collages (on the blocking pool), then each video passes through as its
/// own group with its buffer untouched. Ordinals are assigned over the final
/// flattened sequence and identify the group from here on.
pub async fn build_collage_groups(
    groups: Vec<LocationGroup>,
) -> PipelineResult<Vec<CollageGroup>> {
    let mut out: Vec<CollageGroup> = Vec::new();

    for group in groups {
        for batch in group.images.chunks(COLLAGE_BATCH_SIZE) {
            let buffers: Vec<String> = batch.iter().map(|a| a.buffer.clone()).collect();
            let rendered = tokio::task::spawn_blocking(move || {
                render_collage_base64(&buffers, COLLAGE_WIDTH)
            })
            .await
            .map_err(|e| PipelineError::Task(e.to_string()))??;

            out.push(CollageGroup {
                ordinal: out.len(),
                location: group.location.clone(),
                media_type: MediaType::Image,
                buffer: rendered,
                assets: batch.to_vec(),
            });
        }

        for video in group.videos {
            out.push(CollageGroup {
                ordinal: out.len(),
                location: group.location.clone(),
                media_type: MediaType::Video,
                buffer: video.buffer.clone(),
                assets: vec![video],
            });
        }
    }

    debug!(groups = out.len(), "Built collage groups");

    Ok(out)
}
