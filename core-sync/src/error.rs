use bridge_traits::error::BridgeError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Remote call failed: {0}")]
    Bridge(#[from] BridgeError),

    #[error("Failed to read channel list {path}: {message}")]
    ChannelList { path: PathBuf, message: String },

    #[error("Invalid phase transition from {from} to {to}: {reason}")]
    InvalidPhaseTransition {
        from: String,
        to: String,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, SyncError>;
