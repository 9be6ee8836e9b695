//! # Sync Coordinator
//!
//! Runs one sync pass over a list of channels.
//!
//! ## Workflow
//!
//! 1. **Prefetch**: load the seen set and the channel category map from the
//!    record store, once
//! 2. **Channels**: for each channel, in order
//!    - list new in-window candidates (one feed read, one batched detail call)
//!    - qualify them by duration and attach categories
//!    - write them one by one
//!    - merge the written ids into the seen set
//! 3. **Summary**: log and return the per-channel counters
//!
//! A flat delay separates consecutive channels. A failing channel is logged
//! and recorded in the summary; the loop moves on. Dedup through the seen set
//! makes re-running a failed pass safe.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use core_sync::SyncCoordinator;
//!
//! let coordinator = SyncCoordinator::new(platform, store, clock, settings);
//! let summary = coordinator.run(&channel_ids).await?;
//! println!("added {}, failed {}", summary.added(), summary.failed());
//! ```

use bridge_traits::source::VideoPlatform;
use bridge_traits::store::RecordStore;
use bridge_traits::time::Clock;
use core_runtime::config::SyncSettings;
use std::fmt;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::classify::qualify;
use crate::lister::SourceLister;
use crate::model::{ChannelCategoryMap, ChannelReport, RunSummary, SeenIdSet};
use crate::store_reader::StoreReader;
use crate::writer::RecordWriter;
use crate::{Result, SyncError};

/// Phase of a sync pass. Phases only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RunPhase {
    Init,
    Prefetch,
    Channels,
    Summary,
}

impl RunPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunPhase::Init => "init",
            RunPhase::Prefetch => "prefetch",
            RunPhase::Channels => "channels",
            RunPhase::Summary => "summary",
        }
    }

    /// Move to `to`, which must be the phase directly after this one.
    pub fn advance(self, to: RunPhase) -> Result<RunPhase> {
        let valid = matches!(
            (self, to),
            (RunPhase::Init, RunPhase::Prefetch)
                | (RunPhase::Prefetch, RunPhase::Channels)
                | (RunPhase::Channels, RunPhase::Summary)
        );

        if !valid {
            return Err(SyncError::InvalidPhaseTransition {
                from: self.as_str().to_string(),
                to: to.as_str().to_string(),
                reason: format!("Cannot go from {} to {}", self.as_str(), to.as_str()),
            });
        }

        Ok(to)
    }
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sync coordinator
pub struct SyncCoordinator {
    reader: StoreReader,
    lister: SourceLister,
    writer: RecordWriter,
    settings: SyncSettings,
}

impl SyncCoordinator {
    /// Create a coordinator over the given platform and store.
    ///
    /// The same store instance serves both the reads and the writes.
    pub fn new(
        platform: Arc<dyn VideoPlatform>,
        store: Arc<dyn RecordStore>,
        clock: Arc<dyn Clock>,
        settings: SyncSettings,
    ) -> Self {
        let reader = StoreReader::new(store.clone(), clock.clone(), settings.store_page_size);
        let lister = SourceLister::new(
            platform,
            clock,
            settings.window_hours,
            settings.feed_page_size,
            settings.scan_policy,
        );
        let writer = RecordWriter::new(store, settings.dry_run);

        Self {
            reader,
            lister,
            writer,
            settings,
        }
    }

    /// Run one pass over `channels`.
    ///
    /// An empty channel list makes no remote calls at all. Per-channel
    /// failures are isolated and reported in the summary; the only errors
    /// returned are phase-ordering violations.
    #[instrument(skip(self, channels), fields(channels = channels.len(), dry_run = self.settings.dry_run))]
    pub async fn run(&self, channels: &[String]) -> Result<RunSummary> {
        let mut phase = RunPhase::Init;
        let mut summary = RunSummary {
            dry_run: self.settings.dry_run,
            ..RunSummary::default()
        };

        if channels.is_empty() {
            warn!("No channels to sync, skipping run");
            return Ok(summary);
        }

        phase = phase.advance(RunPhase::Prefetch)?;
        info!(phase = %phase, "Loading record store state");
        let mut seen = self.reader.fetch_seen_ids().await;
        let categories = self
            .reader
            .fetch_category_map(self.settings.category_lookback_days)
            .await;
        summary.prefetched_ids = seen.len();
        summary.known_categories = categories.len();

        phase = phase.advance(RunPhase::Channels)?;
        for (index, channel_id) in channels.iter().enumerate() {
            if index > 0 && !self.settings.channel_delay.is_zero() {
                tokio::time::sleep(self.settings.channel_delay).await;
            }

            let report = match self.sync_channel(channel_id, &mut seen, &categories).await {
                Ok(report) => report,
                Err(e) => {
                    warn!(channel_id = %channel_id, error = %e, "Channel failed, moving on");
                    ChannelReport {
                        error: Some(e.to_string()),
                        ..ChannelReport::new(channel_id.as_str())
                    }
                }
            };
            summary.channels.push(report);
        }

        phase = phase.advance(RunPhase::Summary)?;
        for report in &summary.channels {
            info!(
                channel_id = %report.channel_id,
                candidates = report.candidates,
                qualified = report.qualified,
                added = report.added,
                failed = report.failed,
                previewed = report.previewed,
                error = report.error.as_deref().unwrap_or("-"),
                "Channel summary"
            );
        }
        info!(
            phase = %phase,
            channels = summary.channels.len(),
            added = summary.added(),
            failed = summary.failed(),
            failed_channels = summary.failed_channels(),
            dry_run = summary.dry_run,
            "Sync finished"
        );

        Ok(summary)
    }

    /// List, qualify and write one channel, then merge what was written into
    /// `seen`.
    async fn sync_channel(
        &self,
        channel_id: &str,
        seen: &mut SeenIdSet,
        categories: &ChannelCategoryMap,
    ) -> Result<ChannelReport> {
        let mut report = ChannelReport::new(channel_id);

        let candidates = self.lister.list_candidates(channel_id, seen).await?;
        report.candidates = candidates.len();

        let qualified = qualify(candidates, self.settings.min_duration_secs, categories);
        report.qualified = qualified.len();

        if qualified.is_empty() {
            return Ok(report);
        }

        let batch = self.writer.write_batch(&qualified, seen).await;
        report.added = batch.success_count();
        report.failed = batch.failures;
        report.previewed = batch.previewed;

        seen.merge(batch.written_ids);

        Ok(report)
    }
}
