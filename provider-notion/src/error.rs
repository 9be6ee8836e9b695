//! Error types for the Notion provider

use thiserror::Error;

/// Notion provider errors
#[derive(Error, Debug)]
pub enum NotionError {
    /// API request returned an error
    #[error("Notion API error (status {status_code}, {code}): {message}")]
    ApiError {
        status_code: u16,
        code: String,
        message: String,
    },

    /// Failed to parse API response
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Bridge error
    #[error(transparent)]
    BridgeError(#[from] bridge_traits::error::BridgeError),
}

/// Result type for Notion operations
pub type Result<T> = std::result::Result<T, NotionError>;

impl From<NotionError> for bridge_traits::error::BridgeError {
    fn from(error: NotionError) -> Self {
        use bridge_traits::error::BridgeError;

        match error {
            NotionError::ApiError {
                status_code,
                code,
                message,
            } => BridgeError::Status {
                status: status_code,
                message: format!("{}: {}", code, message),
            },
            NotionError::ParseError(msg) => BridgeError::Decode(msg),
            NotionError::BridgeError(e) => e,
        }
    }
}
