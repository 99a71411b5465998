use core_api::error::ApiError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Secure storage unavailable: {0}")]
    SecureStorageUnavailable(String),

    /// The backend call behind a session operation failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The token was accepted locally but the profile fetch rejected it;
    /// the session has been signed out.
    #[error("Sign-in failed: {0}")]
    ProfileUnavailable(#[source] ApiError),

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Not authenticated")]
    NotAuthenticated,
}

impl AuthError {
    /// Underlying backend failure, for alert mapping
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            AuthError::Api(e) | AuthError::ProfileUnavailable(e) => Some(e),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, AuthError>;
