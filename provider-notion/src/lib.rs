//! # Notion Provider
//!
//! Notion API implementation of the `RecordStore` trait.
//!
//! ## Overview
//!
//! Every recorded video is one page in a Notion database. This crate queries
//! that database page by page with server-side filters and creates new pages
//! one at a time; the API has no multi-page create.
//!
//! Property names and the duration column format come from
//! [`StoreSchema`](core_runtime::StoreSchema), so the connector works against
//! databases whose columns are not named exactly `Title`, `Link`, and so on.

pub mod connector;
pub mod error;
pub mod types;

pub use connector::NotionConnector;
pub use error::{NotionError, Result};
