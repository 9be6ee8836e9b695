//! # Source Lister
//!
//! Finds new, in-window uploads for one channel while spending as little
//! platform quota as possible:
//!
//! 1. resolve the channel's uploads feed and read one bounded page of it
//! 2. scan the page newest-first, dropping stale and already-recorded items
//! 3. look up durations for the survivors in a single batched call
//!
//! Under [`ScanPolicy::StopAtFirstStale`] the scan ends at the first item
//! older than the window, trusting the feed's newest-first order.

use bridge_traits::source::{FeedItem, VideoPlatform};
use bridge_traits::time::Clock;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use core_runtime::config::ScanPolicy;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::error::Result;
use crate::model::{CandidateItem, SeenIdSet};

/// A feed item that survived the scan, still waiting for its duration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedItem {
    pub video_id: String,
    pub title: String,
    pub channel_title: String,
    pub published_at: DateTime<Utc>,
}

/// Scan a newest-first feed page.
///
/// Items published before `cutoff` are stale. Items whose timestamp does not
/// parse are skipped. Ids in `seen`, and repeats within the page, are skipped
/// without ending the scan.
pub fn scan_feed(
    items: Vec<FeedItem>,
    seen: &SeenIdSet,
    cutoff: DateTime<Utc>,
    policy: ScanPolicy,
) -> Vec<ScannedItem> {
    let mut collected = Vec::new();
    let mut collected_ids = HashSet::new();

    for item in items {
        let published_at = match DateTime::parse_from_rfc3339(&item.published_at) {
            Ok(ts) => ts.with_timezone(&Utc),
            Err(e) => {
                info!(
                    video_id = %item.video_id,
                    title = %item.title,
                    raw = %item.published_at,
                    error = %e,
                    "Skipped: unparseable publish time"
                );
                continue;
            }
        };

        if published_at < cutoff {
            match policy {
                ScanPolicy::StopAtFirstStale => {
                    debug!(
                        video_id = %item.video_id,
                        published_at = %published_at,
                        "Reached item outside the window, stopping scan"
                    );
                    break;
                }
                ScanPolicy::Exhaustive => {
                    debug!(video_id = %item.video_id, "Skipped: outside the window");
                    continue;
                }
            }
        }

        if seen.contains(&item.video_id) {
            info!(
                video_id = %item.video_id,
                title = %item.title,
                channel = %item.channel_title,
                "Skipped: already recorded"
            );
            continue;
        }

        if !collected_ids.insert(item.video_id.clone()) {
            debug!(video_id = %item.video_id, "Skipped: repeated in feed page");
            continue;
        }

        collected.push(ScannedItem {
            video_id: item.video_id,
            title: item.title,
            channel_title: item.channel_title,
            published_at,
        });
    }

    collected
}

/// Per-channel candidate discovery
pub struct SourceLister {
    platform: Arc<dyn VideoPlatform>,
    clock: Arc<dyn Clock>,
    window: ChronoDuration,
    feed_page_size: u32,
    scan_policy: ScanPolicy,
}

impl SourceLister {
    pub fn new(
        platform: Arc<dyn VideoPlatform>,
        clock: Arc<dyn Clock>,
        window_hours: u32,
        feed_page_size: u32,
        scan_policy: ScanPolicy,
    ) -> Self {
        Self {
            platform,
            clock,
            window: ChronoDuration::hours(i64::from(window_hours)),
            feed_page_size,
            scan_policy,
        }
    }

    /// New in-window uploads of `channel_id` that are not in `seen`, with
    /// their raw durations attached, newest first.
    ///
    /// A channel without an uploads feed yields an empty list. Remote failures
    /// are returned to the caller.
    #[instrument(skip(self, seen), fields(channel_id = %channel_id))]
    pub async fn list_candidates(
        &self,
        channel_id: &str,
        seen: &SeenIdSet,
    ) -> Result<Vec<CandidateItem>> {
        let Some(feed) = self.platform.uploads_feed(channel_id).await? else {
            info!("No uploads feed for channel, nothing to list");
            return Ok(Vec::new());
        };

        let items = self
            .platform
            .recent_uploads(&feed, self.feed_page_size)
            .await?;
        let fetched = items.len();

        let cutoff = self
            .clock
            .now()
            .checked_sub_signed(self.window)
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        let scanned = scan_feed(items, seen, cutoff, self.scan_policy);

        debug!(fetched, scanned = scanned.len(), "Scanned uploads feed");

        if scanned.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<String> = scanned.iter().map(|s| s.video_id.clone()).collect();
        let mut durations: HashMap<String, String> = self
            .platform
            .video_details(&ids)
            .await?
            .into_iter()
            .map(|d| (d.video_id, d.duration))
            .collect();

        let candidates = scanned
            .into_iter()
            .filter_map(|item| match durations.remove(&item.video_id) {
                Some(raw_duration) => Some(CandidateItem {
                    video_id: item.video_id,
                    title: item.title,
                    channel_title: item.channel_title,
                    published_at: item.published_at,
                    raw_duration,
                }),
                None => {
                    info!(
                        video_id = %item.video_id,
                        title = %item.title,
                        channel = %item.channel_title,
                        "Skipped: no details returned"
                    );
                    None
                }
            })
            .collect();

        Ok(candidates)
    }
}
