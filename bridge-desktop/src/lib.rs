//! # Desktop Bridge Implementations
//!
//! Default implementations of bridge traits for desktop and server hosts.
//!
//! ## Overview
//!
//! - `HttpClient` using `reqwest`, one pooled client shared by every connector
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::ReqwestHttpClient;
//! use std::sync::Arc;
//!
//! let http_client = Arc::new(ReqwestHttpClient::new()?);
//! let youtube = YouTubeConnector::new(http_client.clone(), api_key);
//! let notion = NotionConnector::new(http_client, token, database_id, schema);
//! ```

mod http;

pub use http::ReqwestHttpClient;
