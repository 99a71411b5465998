use core_api::alert::{Alert, AlertKind};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Core initialization failed: {0}")]
    InitializationFailed(String),

    #[error("Configuration error: {0}")]
    Runtime(#[from] core_runtime::Error),

    #[error("API error: {0}")]
    Api(#[from] core_api::ApiError),

    #[error("Authentication error: {0}")]
    Auth(#[from] core_auth::AuthError),

    #[error("Localization error: {0}")]
    I18n(#[from] core_i18n::I18nError),
}

impl CoreError {
    /// Map any core failure onto the alert a screen shows for it.
    ///
    /// Backend failures use the shared classification; everything else is
    /// an error alert titled after the failed action.
    pub fn to_alert(&self, title: &str, fallback: &str) -> Alert {
        match self {
            CoreError::Api(e) => e.to_alert(title, fallback),
            CoreError::Auth(e) => match e.api_error() {
                Some(api) => api.to_alert(title, fallback),
                None => Alert::new(title, fallback, AlertKind::Error),
            },
            CoreError::I18n(e) => Alert::new(title, e.to_string(), AlertKind::Error),
            CoreError::InitializationFailed(_) | CoreError::Runtime(_) => {
                Alert::new(title, fallback, AlertKind::Error)
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
