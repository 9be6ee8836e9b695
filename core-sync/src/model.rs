//! # Run Model
//!
//! Values that flow between the sync stages, plus the two run-scoped lookups
//! (seen set and category map) and the run summary.

use bridge_traits::store::NewRecord;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};

use crate::duration;

/// Canonical watch URL for a video id
pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", video_id)
}

/// An in-window, not-yet-recorded feed item with its raw duration attached
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateItem {
    pub video_id: String,
    pub title: String,
    pub channel_title: String,
    pub published_at: DateTime<Utc>,
    /// Compact duration encoding as returned by the detail lookup
    pub raw_duration: String,
}

/// A candidate that passed the duration filter
#[derive(Debug, Clone, PartialEq)]
pub struct QualifiedVideo {
    pub video_id: String,
    pub title: String,
    pub channel_title: String,
    pub published_at: DateTime<Utc>,
    pub duration_secs: u64,
    pub category: Option<String>,
}

impl QualifiedVideo {
    pub fn url(&self) -> String {
        watch_url(&self.video_id)
    }

    /// The record written to the store for this video
    pub fn to_record(&self) -> NewRecord {
        NewRecord {
            title: self.title.clone(),
            url: self.url(),
            channel: self.channel_title.clone(),
            published_at: self.published_at,
            duration_minutes: duration::encode_numeric(self.duration_secs),
            duration_display: duration::encode_display(self.duration_secs),
            category: self.category.clone(),
        }
    }
}

/// Ids already present in, or written to, the record store during this run.
///
/// Only ever grows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeenIdSet {
    ids: HashSet<String>,
}

impl SeenIdSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, video_id: &str) -> bool {
        self.ids.contains(video_id)
    }

    /// Add an id; returns `false` if it was already present.
    pub fn insert(&mut self, video_id: impl Into<String>) -> bool {
        self.ids.insert(video_id.into())
    }

    /// Add every id, returning how many were new.
    pub fn merge<I>(&mut self, video_ids: I) -> usize
    where
        I: IntoIterator<Item = String>,
    {
        video_ids
            .into_iter()
            .filter(|id| self.ids.insert(id.clone()))
            .count()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl FromIterator<String> for SeenIdSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

/// Channel display name to category label, fixed once built
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelCategoryMap {
    categories: HashMap<String, String>,
}

impl ChannelCategoryMap {
    pub fn get(&self, channel_title: &str) -> Option<&str> {
        self.categories.get(channel_title).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ChannelCategoryMap {
    /// Later pairs overwrite earlier ones for the same channel.
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            categories: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Outcome of one channel
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelReport {
    pub channel_id: String,
    /// Candidates returned by the lister
    pub candidates: usize,
    /// Candidates that passed the duration filter
    pub qualified: usize,
    pub added: usize,
    pub failed: usize,
    /// Dry run only: videos that would have been added
    pub previewed: usize,
    /// Set when the channel was abandoned part way
    pub error: Option<String>,
}

impl ChannelReport {
    pub fn new(channel_id: impl Into<String>) -> Self {
        Self {
            channel_id: channel_id.into(),
            ..Self::default()
        }
    }
}

/// Aggregate counters for one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub channels: Vec<ChannelReport>,
    /// Size of the seen set after prefetch
    pub prefetched_ids: usize,
    /// Channels in the category map
    pub known_categories: usize,
    pub dry_run: bool,
}

impl RunSummary {
    pub fn added(&self) -> usize {
        self.channels.iter().map(|c| c.added).sum()
    }

    pub fn failed(&self) -> usize {
        self.channels.iter().map(|c| c.failed).sum()
    }

    /// Channels that were abandoned with an error
    pub fn failed_channels(&self) -> usize {
        self.channels.iter().filter(|c| c.error.is_some()).count()
    }
}
