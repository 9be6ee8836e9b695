//! # Core Runtime Module
//!
//! Foundational runtime infrastructure shared by every crate in the sync
//! pipeline:
//! - Configuration loading and validation
//! - Logging and tracing initialisation
//!
//! ## Overview
//!
//! Configuration is assembled once at process start and handed explicitly to
//! the connectors and the coordinator. Nothing here keeps global mutable
//! state beyond the tracing subscriber itself.

pub mod config;
pub mod error;
pub mod logging;

pub use config::{
    CoreConfig, CoreConfigBuilder, Credentials, DurationFormat, ScanPolicy, StoreSchema,
    SyncSettings,
};
pub use error::{Error, Result};
