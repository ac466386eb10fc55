//! Location/time grouping.

use memo_models::{parse_creation_time, Asset, MediaType};

/// Assets at one location, split by media type. Order within each list is
/// the post-sort (reverse-chronological) order.
#[derive(Debug, Clone)]
pub struct LocationGroup {
    pub location: String,
    pub images: Vec<Asset>,
    pub videos: Vec<Asset>,
}

/// Partition assets into location groups.
///
/// Assets are stably sorted by creation timestamp descending; unparseable
/// timestamps sort as least-recent. Groups appear in post-sort first-seen
/// order of their location, and each group is sub-partitioned by media type.
pub fn group_by_location(assets: Vec<Asset>) -> Vec<LocationGroup> {
    let mut sorted = assets;
    sorted.sort_by_key(|a| {
        std::cmp::Reverse(
            parse_creation_time(&a.creation_time)
                .map(|dt| dt.timestamp_millis())
                .unwrap_or(i64::MIN),
        )
    });

    let mut groups: Vec<LocationGroup> = Vec::new();
    for asset in sorted {
        let index = match groups.iter().position(|g| g.location == asset.location) {
            Some(i) => i,
            None => {
                groups.push(LocationGroup {
                    location: asset.location.clone(),
                    images: Vec::new(),
                    videos: Vec::new(),
                });
                groups.len() - 1
            }
        };
        match asset.media_type {
            MediaType::Image => groups[index].images.push(asset),
            MediaType::Video => groups[index].videos.push(asset),
        }
    }

    groups
}
