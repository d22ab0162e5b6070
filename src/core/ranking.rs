//! Popularity ranking of channel uploads

use crate::core::models::VideoRecord;
use std::cmp::Reverse;
use std::ops::Range;

/// Sort by view count, highest first. The sort is stable, so videos with
/// equal views keep their playlist (recency) order.
pub fn rank_by_views(mut videos: Vec<VideoRecord>) -> Vec<VideoRecord> {
    videos.sort_by_key(|video| Reverse(video.view_count()));
    videos
}

/// Index ranges of the most- and least-popular windows over a ranked list
/// of `total` videos.
///
/// The least-popular window is empty whenever the two windows would
/// overlap (`total <= popular + least`), so no video lands in both.
pub fn popularity_windows(total: usize, popular: usize, least: usize) -> (Range<usize>, Range<usize>) {
    let most = 0..popular.min(total);
    let least = if total <= popular.saturating_add(least) {
        total..total
    } else {
        total - least..total
    };
    (most, least)
}
