//! # Language Manager
//!
//! Holds the process-wide language preference.
//!
//! The preference is persisted under a secure storage key (`language` by
//! default) and restored at start-up. Switching between a left-to-right and
//! a right-to-left language also flips the platform layout direction; most
//! platforms only apply that after an app restart, which is reported back
//! as `restart_required`.

use bridge_traits::layout::LayoutDirectionController;
use bridge_traits::storage::SecureStore;
use core_runtime::config::CoreConfig;
use core_runtime::events::{CoreEvent, EventBus, EventStream, LanguageEvent};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use crate::error::{I18nError, Result};
use crate::language::Language;
use crate::translations;

/// Current language and its layout direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LanguagePreference {
    pub language: Language,
    pub is_rtl: bool,
}

impl LanguagePreference {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            is_rtl: language.is_rtl(),
        }
    }

    pub fn code(&self) -> &'static str {
        self.language.code()
    }
}

impl Default for LanguagePreference {
    fn default() -> Self {
        Self::new(Language::default())
    }
}

/// Outcome of [`LanguageManager::set_language`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LanguageChange {
    pub preference: LanguagePreference,
    /// The platform layout direction was changed and only fully applies
    /// after the app restarts.
    pub restart_required: bool,
}

/// Lookup handle bound to one language; cheap to copy into UI code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Translator {
    language: Language,
}

impl Translator {
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Translated string, or `key` itself when unknown.
    pub fn t<'a>(&self, key: &'a str) -> &'a str {
        translations::translate(self.language, key)
    }
}

pub struct LanguageManager {
    store: Arc<dyn SecureStore>,
    key: String,
    layout: Arc<dyn LayoutDirectionController>,
    event_bus: EventBus,
    state: Arc<RwLock<LanguagePreference>>,
}

impl LanguageManager {
    pub fn new(
        store: Arc<dyn SecureStore>,
        key: impl Into<String>,
        layout: Arc<dyn LayoutDirectionController>,
        event_bus: EventBus,
    ) -> Self {
        Self {
            store,
            key: key.into(),
            layout,
            event_bus,
            state: Arc::new(RwLock::new(LanguagePreference::default())),
        }
    }

    pub fn from_config(config: &CoreConfig, event_bus: EventBus) -> Self {
        Self::new(
            config.secure_store.clone(),
            config.language_key.as_str(),
            config.layout_controller.clone(),
            event_bus,
        )
    }

    pub async fn preference(&self) -> LanguagePreference {
        *self.state.read().await
    }

    pub async fn language(&self) -> Language {
        self.state.read().await.language
    }

    pub async fn is_rtl(&self) -> bool {
        self.state.read().await.is_rtl
    }

    pub async fn translator(&self) -> Translator {
        Translator::new(self.language().await)
    }

    /// Translate `key` in the current language; unknown keys come back
    /// unchanged.
    pub async fn t<'a>(&self, key: &'a str) -> &'a str {
        translations::translate(self.language().await, key)
    }

    /// Stream of language events only
    pub fn events(&self) -> EventStream {
        EventStream::new(self.event_bus.subscribe())
            .filter(|event| matches!(event, CoreEvent::Language(_)))
    }

    /// Restore the persisted preference.
    ///
    /// Missing or unknown codes keep the default; storage failures are
    /// logged. Returns the preference in effect afterwards.
    #[instrument(skip(self))]
    pub async fn load(&self) -> LanguagePreference {
        let stored = match self.store.get_string(&self.key).await {
            Ok(stored) => stored,
            Err(e) => {
                warn!(error = %e, "Failed to load language preference");
                return self.preference().await;
            }
        };

        let Some(language) = stored.as_deref().and_then(Language::parse) else {
            debug!(stored = ?stored, "No usable stored language, keeping default");
            return self.preference().await;
        };

        let preference = LanguagePreference::new(language);
        *self.state.write().await = preference;

        info!(code = language.code(), "Language preference restored");
        let _ = self.event_bus.emit(CoreEvent::Language(LanguageEvent::Restored {
            code: language.code().to_string(),
            is_rtl: preference.is_rtl,
        }));

        preference
    }

    /// Persist and apply `language`.
    ///
    /// The preference is written to storage first; if that fails nothing
    /// changes and [`I18nError::Storage`] is returned. A failing platform
    /// layout toggle is only logged.
    #[instrument(skip(self))]
    pub async fn set_language(&self, language: Language) -> Result<LanguageChange> {
        self.store
            .set_secret(&self.key, language.code().as_bytes())
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to save language preference");
                I18nError::Storage(e.to_string())
            })?;

        let preference = LanguagePreference::new(language);
        *self.state.write().await = preference;

        let direction = language.direction();
        let restart_required = if self.layout.current() != direction {
            match self.layout.force_direction(direction).await {
                Ok(restart_required) => restart_required,
                Err(e) => {
                    warn!(error = %e, "Failed to switch layout direction");
                    false
                }
            }
        } else {
            false
        };

        info!(code = language.code(), restart_required, "Language changed");
        let _ = self.event_bus.emit(CoreEvent::Language(LanguageEvent::Changed {
            code: language.code().to_string(),
            is_rtl: preference.is_rtl,
            restart_required,
        }));

        Ok(LanguageChange {
            preference,
            restart_required,
        })
    }
}

impl std::fmt::Debug for LanguageManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LanguageManager")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}
