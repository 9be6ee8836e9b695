//! # Core Configuration Module
//!
//! Configuration management for the channel sync job.
//!
//! ## Overview
//!
//! A builder assembles a [`CoreConfig`] from the process environment (or any
//! key lookup), lets the CLI override individual values, and validates the
//! result before any network call is made. Missing credentials are reported
//! as [`Error::MissingCredential`] so the process can exit with a diagnostic.
//!
//! ## Environment
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `YOUTUBE_API_KEY` | required | Video platform API key |
//! | `NOTION_TOKEN` | required | Record store bearer token |
//! | `NOTION_DB_ID` | required | Record store database id |
//! | `CHANNELS_FILE` | `channels.txt` | Newline-delimited channel ids |
//! | `SYNC_WINDOW_HOURS` | 24 | Recency window |
//! | `SYNC_MIN_DURATION_SECS` | 300 | Strict minimum duration |
//! | `SYNC_CATEGORY_LOOKBACK_DAYS` | 7 | History slice for category inference |
//! | `SYNC_FEED_PAGE_SIZE` | 10 | Feed items fetched per channel (max 50) |
//! | `SYNC_STORE_PAGE_SIZE` | 100 | Records per query page (max 100) |
//! | `SYNC_CHANNEL_DELAY_MS` | 1000 | Pause before every channel but the first |
//! | `SYNC_EXHAUSTIVE_SCAN` | false | Scan the whole feed page instead of stopping at the first stale item |
//! | `SYNC_DRY_RUN` | false | List and qualify without writing |
//! | `NOTION_PROP_TITLE` … `NOTION_PROP_CATEGORY` | see [`StoreSchema`] | Property names |
//! | `NOTION_DURATION_FORMAT` | `minutes` | `minutes` (number) or `text` (`M:SS`) |
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::CoreConfig;
//!
//! let config = CoreConfig::builder()
//!     .from_env()?
//!     .dry_run(true)
//!     .build()?;
//! ```

use crate::error::{Error, Result};
use crate::logging::redact_if_sensitive;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

/// Largest page the video platform serves for feed listings and batched
/// detail lookups.
pub const MAX_FEED_PAGE_SIZE: u32 = 50;

/// Largest page the record store serves per query.
pub const MAX_STORE_PAGE_SIZE: u32 = 100;

/// Longest accepted recency window, one year.
pub const MAX_WINDOW_HOURS: u32 = 8_760;

/// Longest accepted category lookback, ten years.
pub const MAX_LOOKBACK_DAYS: u32 = 3_650;

/// How the feed scan treats an item older than the recency window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanPolicy {
    /// Stop scanning at the first stale item. Relies on the feed being
    /// ordered newest-first; items after a stale one are never evaluated.
    #[default]
    StopAtFirstStale,
    /// Skip stale items and keep scanning the rest of the fetched page.
    Exhaustive,
}

/// How the duration column is written to the record store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DurationFormat {
    /// Number of minutes, two decimal places
    #[default]
    Minutes,
    /// `M:SS` or `H:MM:SS` text
    Text,
}

impl FromStr for DurationFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "minutes" | "number" | "numeric" => Ok(Self::Minutes),
            "text" | "display" => Ok(Self::Text),
            other => Err(format!("expected 'minutes' or 'text', got '{}'", other)),
        }
    }
}

/// Record store property names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSchema {
    pub title: String,
    pub url: String,
    pub channel: String,
    pub date: String,
    pub duration: String,
    pub category: String,
    pub duration_format: DurationFormat,
}

impl Default for StoreSchema {
    fn default() -> Self {
        Self {
            title: "Title".to_string(),
            url: "Link".to_string(),
            channel: "Channel".to_string(),
            date: "Date".to_string(),
            duration: "Length".to_string(),
            category: "Type".to_string(),
            duration_format: DurationFormat::Minutes,
        }
    }
}

/// Knobs of the sync engine itself
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncSettings {
    /// Items older than this many hours are out of window
    pub window_hours: u32,
    /// Videos must be strictly longer than this
    pub min_duration_secs: u64,
    /// History slice used to infer channel categories
    pub category_lookback_days: u32,
    /// Feed items fetched per channel
    pub feed_page_size: u32,
    /// Records per query page
    pub store_page_size: u32,
    /// Flat pause before every channel except the first
    pub channel_delay: Duration,
    pub scan_policy: ScanPolicy,
    /// List and qualify, but never write
    pub dry_run: bool,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            window_hours: 24,
            min_duration_secs: 300,
            category_lookback_days: 7,
            feed_page_size: 10,
            store_page_size: MAX_STORE_PAGE_SIZE,
            channel_delay: Duration::from_secs(1),
            scan_policy: ScanPolicy::StopAtFirstStale,
            dry_run: false,
        }
    }
}

impl SyncSettings {
    /// Validates the settings
    pub fn validate(&self) -> Result<()> {
        if self.window_hours == 0 || self.window_hours > MAX_WINDOW_HOURS {
            return Err(Error::Config(format!(
                "Recency window must be between 1 and {} hours",
                MAX_WINDOW_HOURS
            )));
        }

        if self.category_lookback_days == 0 || self.category_lookback_days > MAX_LOOKBACK_DAYS {
            return Err(Error::Config(format!(
                "Category lookback must be between 1 and {} days",
                MAX_LOOKBACK_DAYS
            )));
        }

        if self.feed_page_size == 0 || self.feed_page_size > MAX_FEED_PAGE_SIZE {
            return Err(Error::Config(format!(
                "Feed page size must be between 1 and {}",
                MAX_FEED_PAGE_SIZE
            )));
        }

        if self.store_page_size == 0 || self.store_page_size > MAX_STORE_PAGE_SIZE {
            return Err(Error::Config(format!(
                "Store page size must be between 1 and {}",
                MAX_STORE_PAGE_SIZE
            )));
        }

        if self.channel_delay > Duration::from_secs(60) {
            return Err(Error::Config(
                "Channel delay exceeds maximum of 60 seconds".to_string(),
            ));
        }

        Ok(())
    }
}

/// Remote credentials. `Debug` never prints the secret values.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub youtube_api_key: String,
    pub notion_token: String,
    pub notion_database_id: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field(
                "youtube_api_key",
                &redact_if_sensitive("api_key", &self.youtube_api_key),
            )
            .field(
                "notion_token",
                &redact_if_sensitive("token", &self.notion_token),
            )
            .field("notion_database_id", &self.notion_database_id)
            .finish()
    }
}

/// Complete configuration for one sync run
#[derive(Debug, Clone)]
pub struct CoreConfig {
    pub credentials: Credentials,
    /// Newline-delimited channel id list
    pub channels_path: PathBuf,
    pub sync: SyncSettings,
    pub schema: StoreSchema,
}

impl CoreConfig {
    /// Creates a new builder for constructing a `CoreConfig`.
    pub fn builder() -> CoreConfigBuilder {
        CoreConfigBuilder::default()
    }

    /// Log the effective configuration with secrets redacted.
    pub fn log_summary(&self) {
        info!(
            channels = %self.channels_path.display(),
            database_id = %self.credentials.notion_database_id,
            api_key = %redact_if_sensitive("api_key", &self.credentials.youtube_api_key),
            window_hours = self.sync.window_hours,
            min_duration_secs = self.sync.min_duration_secs,
            lookback_days = self.sync.category_lookback_days,
            scan_policy = ?self.sync.scan_policy,
            dry_run = self.sync.dry_run,
            "Configuration loaded"
        );
    }
}

/// Builder for [`CoreConfig`]
#[derive(Debug, Default)]
pub struct CoreConfigBuilder {
    youtube_api_key: Option<String>,
    notion_token: Option<String>,
    notion_database_id: Option<String>,
    channels_path: Option<PathBuf>,
    sync: SyncSettings,
    schema: StoreSchema,
}

impl CoreConfigBuilder {
    /// Populate the builder from the process environment.
    pub fn from_env(self) -> Result<Self> {
        self.from_lookup(|key| std::env::var(key).ok())
    }

    /// Populate the builder from an arbitrary key lookup.
    ///
    /// Unset keys leave the current value untouched; set but unparseable
    /// keys are an [`Error::InvalidValue`].
    pub fn from_lookup<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("YOUTUBE_API_KEY") {
            self.youtube_api_key = Some(v);
        }
        if let Some(v) = get("NOTION_TOKEN") {
            self.notion_token = Some(v);
        }
        if let Some(v) = get("NOTION_DB_ID") {
            self.notion_database_id = Some(v);
        }
        if let Some(v) = get("CHANNELS_FILE") {
            self.channels_path = Some(PathBuf::from(v));
        }

        if let Some(v) = parse_value(&get, "SYNC_WINDOW_HOURS")? {
            self.sync.window_hours = v;
        }
        if let Some(v) = parse_value(&get, "SYNC_MIN_DURATION_SECS")? {
            self.sync.min_duration_secs = v;
        }
        if let Some(v) = parse_value(&get, "SYNC_CATEGORY_LOOKBACK_DAYS")? {
            self.sync.category_lookback_days = v;
        }
        if let Some(v) = parse_value(&get, "SYNC_FEED_PAGE_SIZE")? {
            self.sync.feed_page_size = v;
        }
        if let Some(v) = parse_value(&get, "SYNC_STORE_PAGE_SIZE")? {
            self.sync.store_page_size = v;
        }
        if let Some(ms) = parse_value::<u64, _>(&get, "SYNC_CHANNEL_DELAY_MS")? {
            self.sync.channel_delay = Duration::from_millis(ms);
        }
        if let Some(exhaustive) = parse_flag(&get, "SYNC_EXHAUSTIVE_SCAN")? {
            self.sync.scan_policy = if exhaustive {
                ScanPolicy::Exhaustive
            } else {
                ScanPolicy::StopAtFirstStale
            };
        }
        if let Some(v) = parse_flag(&get, "SYNC_DRY_RUN")? {
            self.sync.dry_run = v;
        }

        let properties = [
            ("NOTION_PROP_TITLE", &mut self.schema.title),
            ("NOTION_PROP_URL", &mut self.schema.url),
            ("NOTION_PROP_CHANNEL", &mut self.schema.channel),
            ("NOTION_PROP_DATE", &mut self.schema.date),
            ("NOTION_PROP_DURATION", &mut self.schema.duration),
            ("NOTION_PROP_CATEGORY", &mut self.schema.category),
        ];
        for (key, slot) in properties {
            if let Some(v) = get(key) {
                *slot = v.trim().to_string();
            }
        }
        if let Some(v) = parse_value(&get, "NOTION_DURATION_FORMAT")? {
            self.schema.duration_format = v;
        }

        Ok(self)
    }

    pub fn youtube_api_key(mut self, key: impl Into<String>) -> Self {
        self.youtube_api_key = Some(key.into());
        self
    }

    pub fn notion_token(mut self, token: impl Into<String>) -> Self {
        self.notion_token = Some(token.into());
        self
    }

    pub fn notion_database_id(mut self, id: impl Into<String>) -> Self {
        self.notion_database_id = Some(id.into());
        self
    }

    pub fn channels_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.channels_path = Some(path.into());
        self
    }

    pub fn window_hours(mut self, hours: u32) -> Self {
        self.sync.window_hours = hours;
        self
    }

    pub fn min_duration_secs(mut self, secs: u64) -> Self {
        self.sync.min_duration_secs = secs;
        self
    }

    pub fn category_lookback_days(mut self, days: u32) -> Self {
        self.sync.category_lookback_days = days;
        self
    }

    pub fn feed_page_size(mut self, size: u32) -> Self {
        self.sync.feed_page_size = size;
        self
    }

    pub fn channel_delay(mut self, delay: Duration) -> Self {
        self.sync.channel_delay = delay;
        self
    }

    pub fn scan_policy(mut self, policy: ScanPolicy) -> Self {
        self.sync.scan_policy = policy;
        self
    }

    pub fn dry_run(mut self, enabled: bool) -> Self {
        self.sync.dry_run = enabled;
        self
    }

    pub fn schema(mut self, schema: StoreSchema) -> Self {
        self.schema = schema;
        self
    }

    /// Builds the final `CoreConfig` instance.
    ///
    /// # Errors
    ///
    /// - [`Error::MissingCredential`] when any credential is absent
    /// - [`Error::Config`] when a setting is out of range
    pub fn build(self) -> Result<CoreConfig> {
        let credentials = Credentials {
            youtube_api_key: require(self.youtube_api_key, "YOUTUBE_API_KEY")?,
            notion_token: require(self.notion_token, "NOTION_TOKEN")?,
            notion_database_id: require(self.notion_database_id, "NOTION_DB_ID")?,
        };

        self.sync.validate()?;

        let schema_names = [
            &self.schema.title,
            &self.schema.url,
            &self.schema.channel,
            &self.schema.date,
            &self.schema.duration,
            &self.schema.category,
        ];
        if schema_names.iter().any(|name| name.trim().is_empty()) {
            return Err(Error::Config(
                "Record store property names cannot be empty".to_string(),
            ));
        }

        Ok(CoreConfig {
            credentials,
            channels_path: self
                .channels_path
                .unwrap_or_else(|| PathBuf::from("channels.txt")),
            sync: self.sync,
            schema: self.schema,
        })
    }
}

fn require(value: Option<String>, name: &str) -> Result<String> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(Error::MissingCredential {
            name: name.to_string(),
            message: format!("set {} in the environment or a .env file", name),
        }),
    }
}

fn parse_value<T, G>(get: &G, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    get(key)
        .map(|raw| {
            raw.trim().parse::<T>().map_err(|e| Error::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            })
        })
        .transpose()
}

fn parse_flag<G>(get: &G, key: &str) -> Result<Option<bool>>
where
    G: Fn(&str) -> Option<String>,
{
    get(key)
        .map(|raw| match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => Err(Error::InvalidValue {
                key: key.to_string(),
                message: format!("expected a boolean, got '{}'", other),
            }),
        })
        .transpose()
}
