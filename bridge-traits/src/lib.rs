//! # Host Bridge Traits
//!
//! Seams between the sync engine and everything remote.
//!
//! ## Overview
//!
//! The core never talks to a concrete HTTP library, video platform, or record
//! store. It is handed implementations of the traits below, which lets the
//! engine run against in-memory fakes in tests and against real connectors in
//! the binary.
//!
//! ## Traits
//!
//! - [`HttpClient`](http::HttpClient) - Single-attempt async HTTP
//! - [`VideoPlatform`](source::VideoPlatform) - Uploads feed resolution, feed listing, batched details
//! - [`RecordStore`](store::RecordStore) - Paginated query and single-record create
//! - [`Clock`](time::Clock) - Time source for deterministic testing
//!
//! ## Error Handling
//!
//! All bridge traits use [`BridgeError`](error::BridgeError). Connector crates
//! convert their own error enums into it at the trait boundary.
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` so implementations can sit behind
//! `Arc<dyn Trait>` and be shared by every component of a run.

pub mod error;
pub mod http;
pub mod source;
pub mod store;
pub mod time;

pub use error::BridgeError;

// Re-export commonly used types
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
pub use source::{FeedItem, VideoDetail, VideoPlatform};
pub use store::{NewRecord, RecordPage, RecordQuery, RecordStore, StoredRecord};
pub use time::{Clock, FixedClock, SystemClock};
