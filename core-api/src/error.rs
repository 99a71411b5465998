//! Error types for the backend API client

use bridge_traits::error::BridgeError;
use thiserror::Error;

/// Shown when the transport gave up waiting for a response.
pub const TIMEOUT_MESSAGE: &str = "Request timed out. Please check your connection.";

/// Shown when the backend host could not be reached at all.
pub const NETWORK_MESSAGE: &str = "Cannot connect to server. Please check your internet connection.";

/// Backend API errors
///
/// Transport failures carry the rewritten, user-readable `message` plus the
/// original `cause`. HTTP failures keep the status code and the raw body.
#[derive(Error, Debug)]
pub enum ApiError {
    /// No response within the request timeout
    #[error("{message}")]
    Timeout { message: String, cause: String },

    /// Backend unreachable (DNS, refused connection, no route)
    #[error("{message}")]
    Network { message: String, cause: String },

    /// Backend answered with a non-2xx status
    #[error("API error (status {status}): {}", detail.as_deref().unwrap_or("no detail"))]
    Status {
        status: u16,
        /// `detail` field of the JSON error body, when present
        detail: Option<String>,
        body: String,
    },

    /// 2xx response whose body did not match the expected shape
    #[error("Failed to decode response from {path}: {reason}")]
    Decode { path: String, reason: String },

    /// Rejected locally before any request was made
    #[error("{0}")]
    InvalidRequest(String),

    /// Any other bridge failure, passed through unchanged
    #[error(transparent)]
    Bridge(BridgeError),
}

/// Result type for API operations
pub type Result<T> = std::result::Result<T, ApiError>;

impl From<BridgeError> for ApiError {
    /// Rewrites timeout and connection failures into friendly messages;
    /// everything else passes through.
    fn from(error: BridgeError) -> Self {
        match error {
            BridgeError::Timeout(cause) => ApiError::Timeout {
                message: TIMEOUT_MESSAGE.to_string(),
                cause,
            },
            BridgeError::ConnectionFailed(cause) => ApiError::Network {
                message: NETWORK_MESSAGE.to_string(),
                cause,
            },
            other => ApiError::Bridge(other),
        }
    }
}

impl ApiError {
    /// HTTP status, if the backend answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// `detail` string from the backend error body
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Status { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// Timeout or unreachable host
    pub fn is_connectivity(&self) -> bool {
        matches!(self, ApiError::Timeout { .. } | ApiError::Network { .. })
    }

    /// The backend rejected the bearer token
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    pub fn is_client_error(&self) -> bool {
        matches!(self.status(), Some(status) if (400..500).contains(&status))
    }

    /// Build a `Status` error from a raw response body.
    pub(crate) fn from_status(status: u16, body: &[u8]) -> Self {
        let body = String::from_utf8_lossy(body).into_owned();
        let detail = serde_json::from_str::<crate::types::ErrorBody>(&body)
            .ok()
            .and_then(|parsed| parsed.detail_text());

        ApiError::Status {
            status,
            detail,
            body,
        }
    }
}
