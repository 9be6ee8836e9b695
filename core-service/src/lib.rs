//! Core service façade and bootstrap helpers.
//!
//! This crate wires the remote bridges (HTTP client, video platform, record
//! store, clock) into the sync engine. The binary enables the default
//! `desktop-shims` feature, which builds the reqwest-backed HTTP client and
//! the YouTube and Notion connectors from a [`CoreConfig`]. Tests and other
//! hosts can hand in their own implementations through [`CoreDependencies`].

pub mod error;

pub use error::{CoreError, Result};

use std::sync::Arc;

use bridge_traits::{source::VideoPlatform, store::RecordStore, time::Clock};
use core_runtime::config::CoreConfig;
use core_sync::{load_channel_ids, RunSummary, SyncCoordinator};

#[cfg(feature = "desktop-shims")]
use bridge_desktop::ReqwestHttpClient;
#[cfg(feature = "desktop-shims")]
use bridge_traits::{http::HttpClient, time::SystemClock};
#[cfg(feature = "desktop-shims")]
use provider_notion::NotionConnector;
#[cfg(feature = "desktop-shims")]
use provider_youtube::YouTubeConnector;
#[cfg(feature = "desktop-shims")]
use tracing::info;

/// Aggregated handle to all bridge dependencies the core requires.
pub struct CoreDependencies {
    pub platform: Arc<dyn VideoPlatform>,
    pub store: Arc<dyn RecordStore>,
    pub clock: Arc<dyn Clock>,
}

impl CoreDependencies {
    /// Construct a dependency bundle from explicit bridge handles.
    pub fn new(
        platform: Arc<dyn VideoPlatform>,
        store: Arc<dyn RecordStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            platform,
            store,
            clock,
        }
    }
}

/// Primary façade used by the binary.
pub struct CoreService {
    config: CoreConfig,
    coordinator: SyncCoordinator,
    #[cfg(feature = "desktop-shims")]
    youtube: Option<Arc<YouTubeConnector>>,
}

impl CoreService {
    /// Create a new service from the provided dependencies.
    pub fn new(config: CoreConfig, deps: CoreDependencies) -> Self {
        let coordinator =
            SyncCoordinator::new(deps.platform, deps.store, deps.clock, config.sync.clone());

        Self {
            config,
            coordinator,
            #[cfg(feature = "desktop-shims")]
            youtube: None,
        }
    }

    /// Build the production bridges from `config`: one shared reqwest client
    /// behind both connectors, and the system clock.
    #[cfg(feature = "desktop-shims")]
    pub fn bootstrap(config: CoreConfig) -> Result<Self> {
        let http_client: Arc<dyn HttpClient> = Arc::new(ReqwestHttpClient::new()?);

        let youtube = Arc::new(YouTubeConnector::new(
            http_client.clone(),
            config.credentials.youtube_api_key.clone(),
        ));
        let notion = Arc::new(NotionConnector::new(
            http_client,
            config.credentials.notion_token.clone(),
            config.credentials.notion_database_id.clone(),
            config.schema.clone(),
        ));

        let deps = CoreDependencies::new(youtube.clone(), notion, Arc::new(SystemClock));
        let mut service = Self::new(config, deps);
        service.youtube = Some(youtube);

        Ok(service)
    }

    /// The configuration this service was built from.
    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    /// Channel ids from the configured channel list.
    pub fn load_channels(&self) -> Result<Vec<String>> {
        Ok(load_channel_ids(&self.config.channels_path)?)
    }

    /// Load the channel list and run one sync pass over it.
    pub async fn run_once(&self) -> Result<RunSummary> {
        let channels = self.load_channels()?;
        self.run_channels(&channels).await
    }

    /// Run one sync pass over an explicit channel list.
    pub async fn run_channels(&self, channels: &[String]) -> Result<RunSummary> {
        let summary = self.coordinator.run(channels).await?;

        #[cfg(feature = "desktop-shims")]
        if let Some(youtube) = &self.youtube {
            info!(units = youtube.units_spent(), "YouTube quota spent this run");
        }

        Ok(summary)
    }
}
