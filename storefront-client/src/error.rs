//! Client error types

use thiserror::Error;

/// Fallback when a failed response carries no usable message.
pub const GENERIC_REQUEST_ERROR: &str = "Unable to complete request";

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP transport failed (connect, TLS, body read, ...)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-2xx status
    #[error("{message}")]
    Api { status: u16, message: String },

    /// Success status but the body is not usable
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Request could not be built (bad header, bad URL, ...)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    /// HTTP status of an API error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether the backend rejected the request as a duplicate.
    pub fn is_conflict(&self) -> bool {
        self.status() == Some(409)
    }

    /// Message suitable for showing to a customer, without the variant prefix
    /// where the inner message already says enough.
    pub fn user_message(&self) -> String {
        let message = match self {
            Self::Api { message, .. } => message.clone(),
            Self::InvalidResponse(message) => message.clone(),
            other => other.to_string(),
        };
        if message.trim().is_empty() {
            GENERIC_REQUEST_ERROR.to_string()
        } else {
            message
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_detection() {
        let conflict = ClientError::Api {
            status: 409,
            message: "Receipt code already exists".into(),
        };
        assert!(conflict.is_conflict());
        assert_eq!(conflict.status(), Some(409));
        assert!(!ClientError::InvalidResponse("x".into()).is_conflict());
    }

    #[test]
    fn test_user_message_drops_variant_prefix() {
        let invalid = ClientError::InvalidResponse("Invalid response from server".into());
        assert_eq!(invalid.to_string(), "Invalid response: Invalid response from server");
        assert_eq!(invalid.user_message(), "Invalid response from server");

        let blank = ClientError::Api {
            status: 500,
            message: "  ".into(),
        };
        assert_eq!(blank.user_message(), GENERIC_REQUEST_ERROR);

        let request = ClientError::InvalidRequest("bearer token".into());
        assert_eq!(request.user_message(), "Invalid request: bearer token");
    }
}
