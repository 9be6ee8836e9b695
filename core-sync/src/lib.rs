//! # Incremental Sync Engine
//!
//! Records newly published channel uploads in an external record store,
//! exactly once each.
//!
//! ## Overview
//!
//! A run reads the store once up front to learn which videos are already
//! recorded and which category each channel usually gets, then walks the
//! channel list. For each channel it reads one bounded page of the uploads
//! feed, fetches durations for the unseen in-window items in one batched
//! call, keeps the ones above the duration threshold, and writes them one by
//! one.
//!
//! ## Components
//!
//! - **Duration Codec** (`duration`): compact duration ⇄ seconds, display and numeric forms
//! - **Record Store Reader** (`store_reader`): seen-id set and channel category map
//! - **Source Lister** (`lister`): quota-aware candidate discovery per channel
//! - **Filter & Classify** (`classify`): duration threshold and category tagging
//! - **Record Store Writer** (`writer`): one write per video, failures counted
//! - **Sync Coordinator** (`coordinator`): phase-ordered run over all channels
//! - **Channel List** (`channels`): newline-delimited channel id loader

pub mod channels;
pub mod classify;
pub mod coordinator;
pub mod duration;
pub mod error;
pub mod lister;
pub mod model;
pub mod store_reader;
pub mod writer;

pub use channels::load_channel_ids;
pub use classify::qualify;
pub use coordinator::{RunPhase, SyncCoordinator};
pub use error::{Result, SyncError};
pub use lister::{scan_feed, ScannedItem, SourceLister};
pub use model::{
    CandidateItem, ChannelCategoryMap, ChannelReport, QualifiedVideo, RunSummary, SeenIdSet,
};
pub use store_reader::{extract_video_id, StoreReader};
pub use writer::{BatchReport, RecordWriter};
