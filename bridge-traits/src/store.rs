//! Record Store Abstraction
//!
//! Paginated query and single-record create against the external store that
//! holds one record per recorded video.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::error::Result;

/// Server-side filters for a record query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordQuery {
    /// Only records dated on or after this day
    pub since: Option<NaiveDate>,
    /// Only records with a category set
    pub require_category: bool,
    /// Only records with a channel name set
    pub require_channel: bool,
    /// Records per page
    pub page_size: u32,
}

impl RecordQuery {
    /// Unfiltered query over every record
    pub fn all(page_size: u32) -> Self {
        Self {
            page_size,
            ..Self::default()
        }
    }
}

/// The subset of a stored record the sync engine reads back
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoredRecord {
    pub url: Option<String>,
    pub channel: Option<String>,
    pub category: Option<String>,
}

/// One page of query results
#[derive(Debug, Clone, Default)]
pub struct RecordPage {
    pub records: Vec<StoredRecord>,
    /// Cursor for the following page, `None` on the last page
    pub next_cursor: Option<String>,
}

/// A record to create
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecord {
    pub title: String,
    pub url: String,
    pub channel: String,
    pub published_at: DateTime<Utc>,
    /// Duration in minutes, two decimal places
    pub duration_minutes: f64,
    /// Duration as `M:SS` / `H:MM:SS`
    pub duration_display: String,
    /// Omitted from the write entirely when `None`
    pub category: Option<String>,
}

/// Record store trait
///
/// The store offers no multi-record create; callers write one record per call.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetch one page of records matching `query`, starting at `cursor`.
    async fn query_records(
        &self,
        query: &RecordQuery,
        cursor: Option<String>,
    ) -> Result<RecordPage>;

    /// Create a single record.
    async fn create_record(&self, record: &NewRecord) -> Result<()>;
}
