//! Core service façade and bootstrap helpers.
//!
//! [`AppState`] is the explicit application-state handle host UIs hold in
//! place of global contexts. It wires the host-provided bridges from a
//! [`CoreConfig`] into:
//!
//! - the shared [`ApiClient`] (base URL, default headers, bearer token),
//! - the [`SessionManager`] (token, user, `is_loading`),
//! - the [`LanguageManager`] (language, RTL flag, `t`).
//!
//! Logging is process-global and stays with the host: call
//! [`init_logging`] once before bootstrapping.
//!
//! ```no_run
//! use core_service::{AppState, CoreConfig};
//!
//! # async fn example() -> core_service::Result<()> {
//! let config = CoreConfig::builder()
//!     .api_base_url("http://192.168.1.122:8000")
//!     .build()?;
//! let app = AppState::bootstrap(config).await?;
//!
//! if app.session().session().await.is_signed_in() {
//!     let plan = app.api().generate_plan().await?;
//!     println!("{} kcal", plan.daily_calories);
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;

pub use error::{CoreError, Result};

pub use core_api::{Alert, AlertKind, ApiClient, ApiError};
pub use core_auth::{AuthStatus, Session, SessionManager};
pub use core_i18n::{Language, LanguageManager, LanguagePreference, Translator};
pub use core_runtime::config::CoreConfig;
pub use core_runtime::events::{CoreEvent, EventBus, EventStream};
pub use core_runtime::logging::{init_logging, LogFormat, LoggingConfig};

#[cfg(all(feature = "desktop-shims", not(target_arch = "wasm32")))]
pub use bridge_desktop::{DesktopLayoutController, KeyringSecureStore, ReqwestHttpClient};

use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// Primary façade exposed to host applications.
///
/// Cloning is cheap; clones share every manager.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: CoreConfig,
    event_bus: EventBus,
    api: ApiClient,
    session: SessionManager,
    language: LanguageManager,
}

/// Everything a root view needs to pick its screen and layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppSnapshot {
    pub status: AuthStatus,
    pub user_id: Option<i64>,
    pub language: LanguagePreference,
}

impl AppState {
    /// Wire the managers without touching storage or the network.
    ///
    /// The session starts in the loading state; call
    /// [`restore`](Self::restore) (or use [`bootstrap`](Self::bootstrap)).
    pub fn new(config: CoreConfig) -> Result<Self> {
        config.validate()?;

        let event_bus = EventBus::new(config.event_buffer_size);
        let api = ApiClient::from_config(&config);
        let session = SessionManager::from_config(&config, api.clone(), event_bus.clone());
        let language = LanguageManager::from_config(&config, event_bus.clone());

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                event_bus,
                api,
                session,
                language,
            }),
        })
    }

    /// [`new`](Self::new) followed by [`restore`](Self::restore).
    pub async fn bootstrap(config: CoreConfig) -> Result<Self> {
        let state = Self::new(config)?;
        state.restore().await;
        Ok(state)
    }

    /// Restore the persisted session and language concurrently.
    pub async fn restore(&self) {
        let ((), language) = tokio::join!(self.inner.session.load(), self.inner.language.load());

        info!(
            signed_in = self.inner.session.session().await.is_signed_in(),
            language = language.code(),
            "Application state restored"
        );
    }

    pub fn config(&self) -> &CoreConfig {
        &self.inner.config
    }

    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    pub fn session(&self) -> &SessionManager {
        &self.inner.session
    }

    pub fn language(&self) -> &LanguageManager {
        &self.inner.language
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.inner.event_bus
    }

    /// Every core event, unfiltered
    pub fn events(&self) -> EventStream {
        EventStream::new(self.inner.event_bus.subscribe())
    }

    pub async fn snapshot(&self) -> AppSnapshot {
        let session = self.inner.session.session().await;
        AppSnapshot {
            status: session.status(),
            user_id: session.user_id(),
            language: self.inner.language.preference().await,
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}
