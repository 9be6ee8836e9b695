//! # Record Store Writer
//!
//! Writes qualified videos one record at a time. A failed write is logged and
//! counted; the rest of the batch is still attempted. Nothing is retried.

use bridge_traits::store::RecordStore;
use std::sync::Arc;
use tracing::{info, warn};

use crate::model::{QualifiedVideo, SeenIdSet};

/// Outcome of one batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Ids written successfully, in write order
    pub written_ids: Vec<String>,
    pub failures: usize,
    /// Already in the seen set when their turn came
    pub skipped: usize,
    /// Would have been written, had this not been a dry run
    pub previewed: usize,
}

impl BatchReport {
    pub fn success_count(&self) -> usize {
        self.written_ids.len()
    }
}

pub struct RecordWriter {
    store: Arc<dyn RecordStore>,
    dry_run: bool,
}

impl RecordWriter {
    pub fn new(store: Arc<dyn RecordStore>, dry_run: bool) -> Self {
        Self { store, dry_run }
    }

    /// Write `videos` in order, skipping any id already in `seen`.
    ///
    /// `seen` is consulted before every write and never modified here; the
    /// caller merges [`BatchReport::written_ids`] once the batch is done.
    pub async fn write_batch(&self, videos: &[QualifiedVideo], seen: &SeenIdSet) -> BatchReport {
        let mut report = BatchReport::default();

        for video in videos {
            if seen.contains(&video.video_id) || report.written_ids.contains(&video.video_id) {
                info!(
                    video_id = %video.video_id,
                    title = %video.title,
                    channel = %video.channel_title,
                    "Skipped: already recorded"
                );
                report.skipped += 1;
                continue;
            }

            if self.dry_run {
                info!(
                    video_id = %video.video_id,
                    title = %video.title,
                    channel = %video.channel_title,
                    category = video.category.as_deref().unwrap_or("-"),
                    "Dry run: would add"
                );
                report.previewed += 1;
                continue;
            }

            match self.store.create_record(&video.to_record()).await {
                Ok(()) => {
                    info!(
                        video_id = %video.video_id,
                        title = %video.title,
                        channel = %video.channel_title,
                        category = video.category.as_deref().unwrap_or("-"),
                        "Added"
                    );
                    report.written_ids.push(video.video_id.clone());
                }
                Err(e) => {
                    warn!(
                        video_id = %video.video_id,
                        title = %video.title,
                        channel = %video.channel_title,
                        error = %e,
                        "Failed"
                    );
                    report.failures += 1;
                }
            }
        }

        report
    }
}
