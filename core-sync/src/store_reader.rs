//! # Record Store Reader
//!
//! Builds the two run-scoped lookups from the record store before any channel
//! is processed:
//!
//! - [`StoreReader::fetch_seen_ids`] walks every record and extracts the video
//!   id embedded in its URL
//! - [`StoreReader::fetch_category_map`] walks the recent, categorised slice
//!   of history and maps channel names to their category
//!
//! Both walk the store with cursor pagination. A failed page ends the walk and
//! whatever was collected up to that point is returned.

use bridge_traits::store::{RecordQuery, RecordStore, StoredRecord};
use bridge_traits::time::Clock;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::model::{ChannelCategoryMap, SeenIdSet};

/// An 11-character video id following one of the known URL shapes
static VIDEO_ID_PATTERN: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(r"(?:[?&]v=|youtu\.be/|/shorts/|/embed/|/live/)([0-9A-Za-z_-]{11})(?:[^0-9A-Za-z_-]|$)")
        .ok()
});

/// Extract the video id from a stored URL.
///
/// Returns `None` for URLs that carry no recognisable id.
pub fn extract_video_id(url: &str) -> Option<String> {
    VIDEO_ID_PATTERN
        .as_ref()?
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Paginating reader over the record store
pub struct StoreReader {
    store: Arc<dyn RecordStore>,
    clock: Arc<dyn Clock>,
    page_size: u32,
}

impl StoreReader {
    pub fn new(store: Arc<dyn RecordStore>, clock: Arc<dyn Clock>, page_size: u32) -> Self {
        Self {
            store,
            clock,
            page_size,
        }
    }

    /// Every video id already recorded in the store.
    ///
    /// Records without a parseable URL are skipped.
    #[instrument(skip(self))]
    pub async fn fetch_seen_ids(&self) -> SeenIdSet {
        let mut seen = SeenIdSet::new();
        let mut unparsed = 0usize;

        let pages = self
            .walk(&RecordQuery::all(self.page_size), |record| {
                match record.url.as_deref().and_then(extract_video_id) {
                    Some(id) => {
                        seen.insert(id);
                    }
                    None => unparsed += 1,
                }
            })
            .await;

        if unparsed > 0 {
            debug!(unparsed, "Skipped records without a recognisable video URL");
        }
        info!(ids = seen.len(), pages, "Loaded recorded video ids");

        seen
    }

    /// Channel name to category over the last `lookback_days` of records.
    ///
    /// When a channel appears more than once the record read last wins.
    #[instrument(skip(self))]
    pub async fn fetch_category_map(&self, lookback_days: u32) -> ChannelCategoryMap {
        let since = self
            .clock
            .now()
            .checked_sub_signed(ChronoDuration::days(i64::from(lookback_days)))
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
            .date_naive();
        let query = RecordQuery {
            since: Some(since),
            require_category: true,
            require_channel: true,
            page_size: self.page_size,
        };

        let mut pairs = Vec::new();
        let pages = self
            .walk(&query, |record| {
                if let (Some(channel), Some(category)) = (record.channel, record.category) {
                    pairs.push((channel, category));
                }
            })
            .await;

        let map: ChannelCategoryMap = pairs.into_iter().collect();
        info!(
            channels = map.len(),
            pages,
            since = %since,
            "Loaded channel categories"
        );

        map
    }

    /// Visit every record matching `query`, page by page. Returns the number
    /// of pages read.
    async fn walk<F>(&self, query: &RecordQuery, mut visit: F) -> usize
    where
        F: FnMut(StoredRecord),
    {
        let mut cursor: Option<String> = None;
        let mut returned_cursors = HashSet::new();
        let mut pages = 0usize;

        loop {
            let page = match self.store.query_records(query, cursor.clone()).await {
                Ok(page) => page,
                Err(e) => {
                    warn!(
                        error = %e,
                        pages_read = pages,
                        "Record store query failed, continuing with partial results"
                    );
                    break;
                }
            };
            pages += 1;

            for record in page.records {
                visit(record);
            }

            match page.next_cursor {
                Some(next) if returned_cursors.insert(next.clone()) => cursor = Some(next),
                Some(next) => {
                    warn!(
                        cursor = %next,
                        pages_read = pages,
                        "Record store returned a cursor it already returned, stopping pagination"
                    );
                    break;
                }
                None => break,
            }
        }

        pages
    }
}
