//! User-facing alert derived from an API failure
//!
//! Screens show one modal per failed action. The mapping is:
//!
//! | Failure | Title | Message | Kind |
//! |---|---|---|---|
//! | timeout / unreachable | `Connection Issue` | rewritten message | error |
//! | HTTP 401 | `Session Expired` | `Please log in again to continue.` | warning |
//! | HTTP 4xx with `detail` | caller title | detail verbatim | error |
//! | local validation | `Missing Information` | validation message | warning |
//! | anything else | caller title | caller fallback | error |

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

pub const CONNECTION_ISSUE_TITLE: &str = "Connection Issue";
pub const SESSION_EXPIRED_TITLE: &str = "Session Expired";
pub const SESSION_EXPIRED_MESSAGE: &str = "Please log in again to continue.";
pub const MISSING_INFORMATION_TITLE: &str = "Missing Information";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub title: String,
    pub message: String,
    pub kind: AlertKind,
}

impl Alert {
    pub fn new(title: impl Into<String>, message: impl Into<String>, kind: AlertKind) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            kind,
        }
    }

    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(title, message, AlertKind::Success)
    }

    /// Classify `error` for display.
    ///
    /// `title` and `fallback` describe the action that failed, e.g.
    /// `("Login Failed", "Invalid credentials. Please try again.")`.
    pub fn from_error(error: &ApiError, title: &str, fallback: &str) -> Self {
        match error {
            ApiError::Timeout { message, .. } | ApiError::Network { message, .. } => {
                Self::new(CONNECTION_ISSUE_TITLE, message.as_str(), AlertKind::Error)
            }
            ApiError::Status { status: 401, .. } => Self::new(
                SESSION_EXPIRED_TITLE,
                SESSION_EXPIRED_MESSAGE,
                AlertKind::Warning,
            ),
            ApiError::Status {
                status,
                detail: Some(detail),
                ..
            } if (400..500).contains(status) => Self::new(title, detail.as_str(), AlertKind::Error),
            ApiError::InvalidRequest(message) => Self::new(
                MISSING_INFORMATION_TITLE,
                message.as_str(),
                AlertKind::Warning,
            ),
            _ => Self::new(title, fallback, AlertKind::Error),
        }
    }
}

impl ApiError {
    /// Shorthand for [`Alert::from_error`].
    pub fn to_alert(&self, title: &str, fallback: &str) -> Alert {
        Alert::from_error(self, title, fallback)
    }
}
