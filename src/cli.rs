use clap::Parser;
use core_runtime::config::{CoreConfigBuilder, ScanPolicy};
use core_runtime::logging::{LogFormat, LogLevel};
use std::path::PathBuf;
use std::time::Duration;

/// Record newly published channel uploads in a Notion database.
///
/// Credentials and defaults come from the environment (or a `.env` file);
/// flags given here take precedence.
#[derive(Parser, Debug)]
#[command(name = "tubesync", version, about)]
pub struct Cli {
    /// Newline-delimited file of channel ids
    #[arg(short, long, value_name = "PATH")]
    pub channels: Option<PathBuf>,

    /// Only consider uploads from the last N hours
    #[arg(long, value_name = "HOURS")]
    pub window_hours: Option<u32>,

    /// Only record videos strictly longer than this many seconds
    #[arg(long, value_name = "SECS")]
    pub min_duration: Option<u64>,

    /// Days of history used to infer channel categories
    #[arg(long, value_name = "DAYS")]
    pub lookback_days: Option<u32>,

    /// Feed items fetched per channel (1-50)
    #[arg(long, value_name = "N")]
    pub feed_page_size: Option<u32>,

    /// Pause between channels, in milliseconds
    #[arg(long, value_name = "MS")]
    pub channel_delay_ms: Option<u64>,

    /// Scan the whole feed page instead of stopping at the first old item
    #[arg(long)]
    pub exhaustive_scan: bool,

    /// List and qualify videos without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Log output format: pretty, json or compact
    #[arg(long, env = "TUBESYNC_LOG_FORMAT", value_name = "FORMAT")]
    pub log_format: Option<LogFormat>,

    /// Log level for workspace crates
    #[arg(long, env = "TUBESYNC_LOG_LEVEL", default_value = "info", value_name = "LEVEL")]
    pub log_level: LogLevel,
}

impl Cli {
    /// Layer the flags that were given on top of `builder`.
    pub fn apply(&self, mut builder: CoreConfigBuilder) -> CoreConfigBuilder {
        if let Some(path) = &self.channels {
            builder = builder.channels_path(path.clone());
        }
        if let Some(hours) = self.window_hours {
            builder = builder.window_hours(hours);
        }
        if let Some(secs) = self.min_duration {
            builder = builder.min_duration_secs(secs);
        }
        if let Some(days) = self.lookback_days {
            builder = builder.category_lookback_days(days);
        }
        if let Some(size) = self.feed_page_size {
            builder = builder.feed_page_size(size);
        }
        if let Some(ms) = self.channel_delay_ms {
            builder = builder.channel_delay(Duration::from_millis(ms));
        }
        if self.exhaustive_scan {
            builder = builder.scan_policy(ScanPolicy::Exhaustive);
        }
        if self.dry_run {
            builder = builder.dry_run(true);
        }
        builder
    }
}
