//! # YouTube Provider
//!
//! Implements the `VideoPlatform` trait for the YouTube Data API v3.
//!
//! ## Overview
//!
//! This module provides:
//! - Channel to uploads-playlist resolution (`channels.list`, 1 quota unit)
//! - Newest-first uploads listing (`playlistItems.list`, 1 quota unit)
//! - Batched duration lookup for up to 50 videos (`videos.list`, 1 quota unit)
//!
//! `search.list` costs 100 units per call and is deliberately not used.

pub mod connector;
pub mod error;
pub mod types;

pub use connector::YouTubeConnector;
pub use error::{Result, YouTubeError};
