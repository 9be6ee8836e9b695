use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Bridge capability not available: {0}")]
    NotAvailable(String),

    #[error("Bridge operation failed: {0}")]
    OperationFailed(String),

    #[error("Remote returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Malformed remote response: {0}")]
    Decode(String),
}

impl BridgeError {
    /// Whether the failure came from the remote side rejecting the request,
    /// as opposed to the request never completing.
    pub fn is_status(&self) -> bool {
        matches!(self, BridgeError::Status { .. })
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;
