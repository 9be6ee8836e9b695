//! YouTube Data API connector implementation
//!
//! Implements the `VideoPlatform` trait for YouTube Data API v3.

use async_trait::async_trait;
use bridge_traits::error::Result;
use bridge_traits::http::{HttpClient, HttpRequest, HttpResponse};
use bridge_traits::source::{FeedItem, VideoDetail, VideoPlatform};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::error::YouTubeError;
use crate::types::{
    ApiErrorResponse, ChannelListResponse, PlaylistItem, PlaylistItemListResponse,
    VideoListResponse,
};

/// YouTube Data API base URL
const YOUTUBE_API_BASE: &str = "https://www.googleapis.com/youtube/v3";

/// Maximum ids per `videos.list` call and items per `playlistItems.list` page
pub const MAX_BATCH_SIZE: usize = 50;

/// Quota cost of every list call this connector makes
const LIST_CALL_COST: u64 = 1;

/// YouTube Data API connector
///
/// Implements `VideoPlatform` for YouTube Data API v3, authenticating with an
/// API key query parameter. Keeps a running total of quota units spent.
///
/// # Example
///
/// ```ignore
/// use provider_youtube::YouTubeConnector;
/// use bridge_traits::source::VideoPlatform;
///
/// let connector = YouTubeConnector::new(http_client, api_key);
/// if let Some(feed) = connector.uploads_feed("UC_x5XG1OV2P6uZZ5FSM9Ttw").await? {
///     let items = connector.recent_uploads(&feed, 10).await?;
/// }
/// ```
pub struct YouTubeConnector {
    /// HTTP client for API requests
    http_client: Arc<dyn HttpClient>,

    /// Data API key
    api_key: String,

    /// Quota units spent by this connector
    units_spent: AtomicU64,
}

impl YouTubeConnector {
    /// Create a new YouTube connector
    ///
    /// # Arguments
    ///
    /// * `http_client` - HTTP client implementation
    /// * `api_key` - Data API key with YouTube Data API v3 enabled
    pub fn new(http_client: Arc<dyn HttpClient>, api_key: String) -> Self {
        Self {
            http_client,
            api_key,
            units_spent: AtomicU64::new(0),
        }
    }

    /// Quota units spent since construction
    pub fn units_spent(&self) -> u64 {
        self.units_spent.load(Ordering::Relaxed)
    }

    fn endpoint(&self, resource: &str, params: &[(&str, &str)]) -> String {
        let mut url = format!("{}/{}?key={}", YOUTUBE_API_BASE, resource, self.api_key);
        for (name, value) in params {
            url.push('&');
            url.push_str(name);
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }
        url
    }

    /// Execute a GET against the API, charging the quota counter.
    ///
    /// Non-2xx responses become [`YouTubeError::ApiError`] or
    /// [`YouTubeError::QuotaExceeded`]. No retries.
    async fn get(&self, url: String) -> std::result::Result<HttpResponse, YouTubeError> {
        let request = HttpRequest::get(url)
            .header("Accept", "application/json")
            .timeout(Duration::from_secs(30));

        let response = self.http_client.execute(request).await?;
        let spent = self.units_spent.fetch_add(LIST_CALL_COST, Ordering::Relaxed) + LIST_CALL_COST;
        debug!(status = response.status, units_spent = spent, "YouTube API call");

        if response.is_success() {
            return Ok(response);
        }

        let status_code = response.status;
        match response.json::<ApiErrorResponse>() {
            Ok(envelope) if envelope.error.is_quota_exceeded() => {
                warn!("YouTube API quota exceeded");
                Err(YouTubeError::QuotaExceeded(envelope.error.message))
            }
            Ok(envelope) => Err(YouTubeError::ApiError {
                status_code,
                message: envelope.error.message,
            }),
            Err(_) => Err(YouTubeError::ApiError {
                status_code,
                message: response.text_lossy(),
            }),
        }
    }

    /// Convert a playlist entry into a feed item. Entries without a video id
    /// are dropped.
    fn convert_item(item: PlaylistItem) -> Option<FeedItem> {
        let details = item.content_details?;
        let snippet = item.snippet;

        let published_at = details
            .video_published_at
            .or_else(|| snippet.as_ref().and_then(|s| s.published_at.clone()))
            .unwrap_or_default();
        let (title, channel_title) = snippet
            .map(|s| (s.title, s.channel_title))
            .unwrap_or_default();

        Some(FeedItem {
            video_id: details.video_id,
            title,
            channel_title,
            published_at,
        })
    }
}

#[async_trait]
impl VideoPlatform for YouTubeConnector {
    #[instrument(skip(self), fields(channel_id = %channel_id))]
    async fn uploads_feed(&self, channel_id: &str) -> Result<Option<String>> {
        let url = self.endpoint("channels", &[("part", "contentDetails"), ("id", channel_id)]);
        let response = self.get(url).await?;

        let channels: ChannelListResponse = response.json().map_err(|e| {
            YouTubeError::ParseError(format!("Failed to parse channel list: {}", e))
        })?;

        let uploads = channels
            .items
            .into_iter()
            .find_map(|c| c.content_details.and_then(|d| d.related_playlists.uploads));

        match &uploads {
            Some(playlist) => debug!(playlist = %playlist, "Resolved uploads playlist"),
            None => info!("Channel has no uploads playlist"),
        }

        Ok(uploads)
    }

    #[instrument(skip(self), fields(feed = %feed))]
    async fn recent_uploads(&self, feed: &str, max_items: u32) -> Result<Vec<FeedItem>> {
        let max_results = max_items.clamp(1, MAX_BATCH_SIZE as u32).to_string();
        let url = self.endpoint(
            "playlistItems",
            &[
                ("part", "snippet,contentDetails"),
                ("playlistId", feed),
                ("maxResults", &max_results),
            ],
        );
        let response = self.get(url).await?;

        let list: PlaylistItemListResponse = response.json().map_err(|e| {
            YouTubeError::ParseError(format!("Failed to parse playlist items: {}", e))
        })?;

        let items: Vec<FeedItem> = list
            .items
            .into_iter()
            .filter_map(Self::convert_item)
            .collect();

        debug!("Listed {} feed items", items.len());

        Ok(items)
    }

    #[instrument(skip(self, video_ids), fields(count = video_ids.len()))]
    async fn video_details(&self, video_ids: &[String]) -> Result<Vec<VideoDetail>> {
        if video_ids.is_empty() {
            return Ok(Vec::new());
        }

        if video_ids.len() > MAX_BATCH_SIZE {
            return Err(YouTubeError::BatchTooLarge {
                requested: video_ids.len(),
                limit: MAX_BATCH_SIZE,
            }
            .into());
        }

        let ids = video_ids.join(",");
        let url = self.endpoint("videos", &[("part", "contentDetails"), ("id", &ids)]);
        let response = self.get(url).await?;

        let list: VideoListResponse = response.json().map_err(|e| {
            YouTubeError::ParseError(format!("Failed to parse video list: {}", e))
        })?;

        let details: Vec<VideoDetail> = list
            .items
            .into_iter()
            .filter_map(|v| {
                let duration = v.content_details.and_then(|d| d.duration)?;
                Some(VideoDetail {
                    video_id: v.id,
                    duration,
                })
            })
            .collect();

        if details.len() < video_ids.len() {
            debug!(
                requested = video_ids.len(),
                returned = details.len(),
                "Detail lookup returned fewer videos than requested"
            );
        }

        Ok(details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::error::BridgeError;
    use bytes::Bytes;
    use mockall::mock;
    use std::collections::HashMap;

    mock! {
        HttpClient {}

        #[async_trait]
        impl HttpClient for HttpClient {
            async fn execute(&self, request: HttpRequest) -> Result<HttpResponse>;
        }
    }

    fn ok(body: &'static str) -> Result<HttpResponse> {
        Ok(HttpResponse {
            status: 200,
            headers: HashMap::new(),
            body: Bytes::from(body),
        })
    }

    #[tokio::test]
    async fn test_uploads_feed_success() {
        let mut mock_http = MockHttpClient::new();

        mock_http.expect_execute().times(1).returning(|req| {
            assert!(req.url.starts_with("https://www.googleapis.com/youtube/v3/channels?"));
            assert!(req.url.contains("key=test_key"));
            assert!(req.url.contains("id=UCfoo"));
            ok(r#"{
                "items": [
                    { "id": "UCfoo", "contentDetails": { "relatedPlaylists": { "uploads": "UUfoo" } } }
                ]
            }"#)
        });

        let connector = YouTubeConnector::new(Arc::new(mock_http), "test_key".to_string());
        let feed = connector.uploads_feed("UCfoo").await.unwrap();

        assert_eq!(feed, Some("UUfoo".to_string()));
        assert_eq!(connector.units_spent(), 1);
    }

    #[tokio::test]
    async fn test_uploads_feed_unknown_channel() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .times(1)
            .returning(|_| ok(r#"{ "pageInfo": { "totalResults": 0 } }"#));

        let connector = YouTubeConnector::new(Arc::new(mock_http), "test_key".to_string());
        assert_eq!(connector.uploads_feed("UCnobody").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_recent_uploads_converts_items() {
        let mut mock_http = MockHttpClient::new();

        mock_http.expect_execute().times(1).returning(|req| {
            assert!(req.url.contains("/playlistItems?"));
            assert!(req.url.contains("playlistId=UUfoo"));
            assert!(req.url.contains("maxResults=10"));
            assert!(req.url.contains("part=snippet%2CcontentDetails"));
            ok(r#"{
                "items": [
                    {
                        "snippet": { "publishedAt": "2024-03-01T10:05:00Z", "title": "Newest", "channelTitle": "Foo" },
                        "contentDetails": { "videoId": "aaaaaaaaaaa", "videoPublishedAt": "2024-03-01T10:00:00Z" }
                    },
                    {
                        "snippet": { "publishedAt": "2024-02-28T08:00:00Z", "title": "Older", "channelTitle": "Foo" },
                        "contentDetails": { "videoId": "bbbbbbbbbbb" }
                    },
                    {
                        "snippet": { "publishedAt": "2024-02-27T08:00:00Z", "title": "Broken", "channelTitle": "Foo" }
                    }
                ]
            }"#)
        });

        let connector = YouTubeConnector::new(Arc::new(mock_http), "test_key".to_string());
        let items = connector.recent_uploads("UUfoo", 10).await.unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].video_id, "aaaaaaaaaaa");
        assert_eq!(items[0].published_at, "2024-03-01T10:00:00Z");
        assert_eq!(items[0].channel_title, "Foo");
        // falls back to the snippet timestamp
        assert_eq!(items[1].published_at, "2024-02-28T08:00:00Z");
    }

    #[tokio::test]
    async fn test_video_details_single_batched_call() {
        let mut mock_http = MockHttpClient::new();

        mock_http.expect_execute().times(1).returning(|req| {
            assert!(req.url.contains("/videos?"));
            assert!(req.url.contains("id=aaaaaaaaaaa%2Cbbbbbbbbbbb%2Cccccccccccc"));
            ok(r#"{
                "items": [
                    { "id": "aaaaaaaaaaa", "contentDetails": { "duration": "PT5M30S" } },
                    { "id": "ccccccccccc", "contentDetails": { "duration": "PT1H2M3S" } }
                ]
            }"#)
        });

        let connector = YouTubeConnector::new(Arc::new(mock_http), "test_key".to_string());
        let ids = vec![
            "aaaaaaaaaaa".to_string(),
            "bbbbbbbbbbb".to_string(),
            "ccccccccccc".to_string(),
        ];
        let details = connector.video_details(&ids).await.unwrap();

        assert_eq!(details.len(), 2);
        assert_eq!(details[0].duration, "PT5M30S");
        assert_eq!(details[1].video_id, "ccccccccccc");
        assert_eq!(connector.units_spent(), 1);
    }

    #[tokio::test]
    async fn test_video_details_empty_batch_makes_no_call() {
        let mut mock_http = MockHttpClient::new();
        mock_http.expect_execute().times(0);

        let connector = YouTubeConnector::new(Arc::new(mock_http), "test_key".to_string());
        assert!(connector.video_details(&[]).await.unwrap().is_empty());
        assert_eq!(connector.units_spent(), 0);
    }

    #[tokio::test]
    async fn test_video_details_rejects_oversized_batch() {
        let mut mock_http = MockHttpClient::new();
        mock_http.expect_execute().times(0);

        let connector = YouTubeConnector::new(Arc::new(mock_http), "test_key".to_string());
        let ids: Vec<String> = (0..51).map(|i| format!("{:011}", i)).collect();

        assert!(connector.video_details(&ids).await.is_err());
    }

    #[tokio::test]
    async fn test_quota_exceeded_maps_to_status_error() {
        let mut mock_http = MockHttpClient::new();
        mock_http.expect_execute().times(1).returning(|_| {
            Ok(HttpResponse {
                status: 403,
                headers: HashMap::new(),
                body: Bytes::from(
                    r#"{ "error": { "code": 403, "message": "quota", "errors": [ { "reason": "quotaExceeded" } ] } }"#,
                ),
            })
        });

        let connector = YouTubeConnector::new(Arc::new(mock_http), "test_key".to_string());
        let result = connector.uploads_feed("UCfoo").await;

        match result {
            Err(BridgeError::Status { status, message }) => {
                assert_eq!(status, 403);
                assert!(message.contains("quota"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_api_error_handling() {
        let mut mock_http = MockHttpClient::new();
        mock_http.expect_execute().times(1).returning(|_| {
            Ok(HttpResponse {
                status: 500,
                headers: HashMap::new(),
                body: Bytes::from("backend error"),
            })
        });

        let connector = YouTubeConnector::new(Arc::new(mock_http), "test_key".to_string());
        let result = connector.recent_uploads("UUfoo", 10).await;

        assert!(matches!(
            result,
            Err(BridgeError::Status { status: 500, .. })
        ));
    }

    #[tokio::test]
    async fn test_transport_error_propagates() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .times(1)
            .returning(|_| Err(BridgeError::OperationFailed("Connection failed".to_string())));

        let connector = YouTubeConnector::new(Arc::new(mock_http), "test_key".to_string());
        let result = connector.uploads_feed("UCfoo").await;

        assert!(matches!(result, Err(BridgeError::OperationFailed(_))));
        assert_eq!(connector.units_spent(), 0);
    }
}
