//! Video Platform Abstraction
//!
//! The three remote operations the source lister needs, kept separate so the
//! lister can decide how many of them to spend per channel.

use async_trait::async_trait;

use crate::error::Result;

/// One entry from a channel's recent-uploads feed, as delivered by the
/// platform. Timestamps stay raw; the caller decides how to treat values it
/// cannot parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedItem {
    /// Platform video identifier (fixed-length token)
    pub video_id: String,
    pub title: String,
    /// Display name of the publishing channel
    pub channel_title: String,
    /// Publish timestamp (RFC 3339)
    pub published_at: String,
}

/// Per-video detail returned by the batched lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoDetail {
    pub video_id: String,
    /// Compact duration encoding, e.g. `PT1H2M3S`
    pub duration: String,
}

/// Video platform trait
///
/// Implementations map onto the platform's feed listing and batched detail
/// endpoints. Each method is one billed remote call.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::source::VideoPlatform;
///
/// async fn newest(platform: &dyn VideoPlatform, channel_id: &str) -> Result<Vec<FeedItem>> {
///     match platform.uploads_feed(channel_id).await? {
///         Some(feed) => platform.recent_uploads(&feed, 10).await,
///         None => Ok(Vec::new()),
///     }
/// }
/// ```
#[async_trait]
pub trait VideoPlatform: Send + Sync {
    /// Resolve a channel to the handle of its recent-uploads feed.
    ///
    /// Returns `Ok(None)` when the platform knows no such channel or the
    /// channel exposes no uploads feed.
    async fn uploads_feed(&self, channel_id: &str) -> Result<Option<String>>;

    /// Fetch up to `max_items` of the newest entries in a feed, newest first.
    async fn recent_uploads(&self, feed: &str, max_items: u32) -> Result<Vec<FeedItem>>;

    /// Look up durations for a batch of videos in a single call.
    ///
    /// The result may contain fewer entries than requested and is not
    /// guaranteed to follow the request order.
    async fn video_details(&self, video_ids: &[String]) -> Result<Vec<VideoDetail>>;
}
