//! # Filter & Classify
//!
//! Applies the minimum-duration threshold and tags survivors with the
//! category inferred for their channel.

use tracing::{debug, info};

use crate::duration;
use crate::model::{CandidateItem, ChannelCategoryMap, QualifiedVideo};

/// Keep candidates strictly longer than `min_secs`, in input order, and
/// attach each one's channel category when the map knows it.
///
/// Durations that fail to decode count as zero and are always dropped.
pub fn qualify(
    candidates: Vec<CandidateItem>,
    min_secs: u64,
    categories: &ChannelCategoryMap,
) -> Vec<QualifiedVideo> {
    candidates
        .into_iter()
        .filter_map(|candidate| {
            let duration_secs = duration::decode(&candidate.raw_duration);

            if duration_secs <= min_secs {
                info!(
                    video_id = %candidate.video_id,
                    title = %candidate.title,
                    channel = %candidate.channel_title,
                    duration = %candidate.raw_duration,
                    "Skipped: too short"
                );
                return None;
            }

            let category = categories
                .get(&candidate.channel_title)
                .map(str::to_string);
            if category.is_none() {
                debug!(channel = %candidate.channel_title, "No category known for channel");
            }

            Some(QualifiedVideo {
                video_id: candidate.video_id,
                title: candidate.title,
                channel_title: candidate.channel_title,
                published_at: candidate.published_at,
                duration_secs,
                category,
            })
        })
        .collect()
}
