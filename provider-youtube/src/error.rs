//! Error types for the YouTube provider

use thiserror::Error;

/// YouTube provider errors
#[derive(Error, Debug)]
pub enum YouTubeError {
    /// API request returned an error
    #[error("YouTube API error (status {status_code}): {message}")]
    ApiError { status_code: u16, message: String },

    /// Daily quota used up
    #[error("YouTube API quota exceeded: {0}")]
    QuotaExceeded(String),

    /// Too many ids for one batched lookup
    #[error("Batch of {requested} ids exceeds the limit of {limit}")]
    BatchTooLarge { requested: usize, limit: usize },

    /// Failed to parse API response
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Bridge error
    #[error(transparent)]
    BridgeError(#[from] bridge_traits::error::BridgeError),
}

/// Result type for YouTube operations
pub type Result<T> = std::result::Result<T, YouTubeError>;

impl From<YouTubeError> for bridge_traits::error::BridgeError {
    fn from(error: YouTubeError) -> Self {
        use bridge_traits::error::BridgeError;

        match error {
            YouTubeError::ApiError {
                status_code,
                message,
            } => BridgeError::Status {
                status: status_code,
                message,
            },
            YouTubeError::QuotaExceeded(message) => BridgeError::Status {
                status: 403,
                message: format!("quota exceeded: {}", message),
            },
            YouTubeError::BatchTooLarge { requested, limit } => BridgeError::OperationFailed(
                format!("Batch of {} ids exceeds the limit of {}", requested, limit),
            ),
            YouTubeError::ParseError(msg) => BridgeError::Decode(msg),
            YouTubeError::BridgeError(e) => e,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::error::BridgeError;

    #[test]
    fn test_error_display() {
        let error = YouTubeError::ApiError {
            status_code: 404,
            message: "channelNotFound".to_string(),
        };

        assert_eq!(
            error.to_string(),
            "YouTube API error (status 404): channelNotFound"
        );
    }

    #[test]
    fn test_error_conversion() {
        let bridge_error: BridgeError = YouTubeError::ParseError("bad json".to_string()).into();
        assert!(matches!(bridge_error, BridgeError::Decode(_)));

        let bridge_error: BridgeError = YouTubeError::QuotaExceeded("daily".to_string()).into();
        assert!(matches!(bridge_error, BridgeError::Status { status: 403, .. }));
    }
}
