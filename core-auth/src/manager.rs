//! # Session Manager
//!
//! Process-wide owner of the signed-in session.
//!
//! ## Overview
//!
//! The `SessionManager` keeps three things in step:
//!
//! - the token persisted in the secure store,
//! - the default `Authorization` header of the shared [`ApiClient`],
//! - the in-memory [`Session`] (token, user, `is_loading`).
//!
//! Every transition replaces the whole `Session` under one write lock, so
//! readers never see a token without its user. Transitions are broadcast on
//! the [`EventBus`] as `CoreEvent::Auth`.
//!
//! ## Usage
//!
//! ```no_run
//! use core_auth::SessionManager;
//! # async fn example(manager: SessionManager) -> core_auth::Result<()> {
//! // App start: restore whatever was persisted.
//! manager.load().await;
//!
//! if !manager.session().await.is_signed_in() {
//!     let user = manager.login("sam@example.com", "secret").await?;
//!     println!("Welcome {:?}", user.username);
//! }
//!
//! manager.sign_out().await;
//! # Ok(())
//! # }
//! ```

use crate::error::{AuthError, Result};
use crate::token_store::TokenStore;
use crate::types::{AuthStatus, Session};
use bridge_traits::SecureStore;
use bytes::Bytes;
use core_api::error::ApiError;
use core_api::types::{ProfilePictureUpload, ProfileUpdate, RegisterRequest, UserProfile};
use core_api::ApiClient;
use core_runtime::config::CoreConfig;
use core_runtime::events::{AuthEvent, CoreEvent, EventBus, EventStream};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, instrument, warn};

/// Owner of the session state.
///
/// Cheap to share behind an `Arc`; all methods take `&self`.
pub struct SessionManager {
    api: ApiClient,
    token_store: TokenStore,
    event_bus: EventBus,
    state: Arc<RwLock<Session>>,
    /// Serialises `load`, `sign_in` and `sign_out` so a restore never
    /// overwrites a session established while it was in flight.
    transition: Mutex<()>,
}

impl SessionManager {
    /// Creates a manager in the loading state.
    ///
    /// # Arguments
    ///
    /// * `api` - Shared backend client whose default headers this manager owns
    /// * `secure_store` - Platform secure storage for the token
    /// * `token_key` - Storage key the token is persisted under
    /// * `event_bus` - Bus for `CoreEvent::Auth` events
    pub fn new(
        api: ApiClient,
        secure_store: Arc<dyn SecureStore>,
        token_key: impl Into<String>,
        event_bus: EventBus,
    ) -> Self {
        Self {
            api,
            token_store: TokenStore::new(secure_store, token_key),
            event_bus,
            state: Arc::new(RwLock::new(Session::loading())),
            transition: Mutex::new(()),
        }
    }

    pub fn from_config(config: &CoreConfig, api: ApiClient, event_bus: EventBus) -> Self {
        Self::new(
            api,
            config.secure_store.clone(),
            config.token_key.as_str(),
            event_bus,
        )
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn token_store(&self) -> &TokenStore {
        &self.token_store
    }

    // ------------------------------------------------------------------
    // State accessors
    // ------------------------------------------------------------------

    /// Consistent snapshot of the whole session
    pub async fn session(&self) -> Session {
        self.state.read().await.clone()
    }

    pub async fn token(&self) -> Option<String> {
        self.state.read().await.token.clone()
    }

    pub async fn user(&self) -> Option<UserProfile> {
        self.state.read().await.user.clone()
    }

    pub async fn is_loading(&self) -> bool {
        self.state.read().await.is_loading
    }

    pub async fn status(&self) -> AuthStatus {
        self.state.read().await.status()
    }

    /// Stream of auth events only
    pub fn events(&self) -> EventStream {
        EventStream::new(self.event_bus.subscribe())
            .filter(|event| matches!(event, CoreEvent::Auth(_)))
    }

    fn emit(&self, event: AuthEvent) {
        let _ = self.event_bus.emit(CoreEvent::Auth(event));
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Restores the persisted session at app start.
    ///
    /// A stored token is applied to the client and validated with
    /// `/auth/me`. Any storage or network failure leaves a signed-out
    /// session. `is_loading` becomes false when the first call finishes;
    /// later calls return immediately. A session signed in before the
    /// restore ran is kept as is.
    #[instrument(skip(self))]
    pub async fn load(&self) {
        let _guard = self.transition.lock().await;

        {
            let mut state = self.state.write().await;
            if !state.is_loading {
                debug!("Session already restored");
                return;
            }
            if state.is_signed_in() {
                state.is_loading = false;
                drop(state);
                info!(signed_in = true, "Session established before restore");
                self.emit(AuthEvent::SessionRestored { signed_in: true });
                return;
            }
        }

        let restored = self.restore().await;
        let signed_in = restored.is_some();

        {
            let mut state = self.state.write().await;
            *state = match restored {
                Some((token, user)) => Session::signed_in(token, user, false),
                None => Session::signed_out(false),
            };
        }

        info!(signed_in, "Session restore finished");
        self.emit(AuthEvent::SessionRestored { signed_in });
    }

    async fn restore(&self) -> Option<(String, UserProfile)> {
        let token = match self.token_store.load().await {
            Ok(Some(token)) => token,
            Ok(None) => return None,
            Err(e) => {
                warn!(error = %e, "Error loading token");
                return None;
            }
        };

        self.api.set_auth_token(&token).await;

        match self.api.me().await {
            Ok(user) => Some((token, user)),
            Err(e) => {
                warn!(error = %e, "Stored token did not produce a profile");
                if e.is_unauthorized() {
                    self.emit(AuthEvent::SessionExpired);
                }
                self.clear_credentials().await;
                None
            }
        }
    }

    /// Accepts a fresh token: persists it, applies it to the client and
    /// fetches the profile.
    ///
    /// # Errors
    ///
    /// - [`AuthError::InvalidToken`] / [`AuthError::SecureStorageUnavailable`]
    ///   if the token could not be persisted; the session is unchanged.
    /// - [`AuthError::ProfileUnavailable`] if `/auth/me` failed; the session
    ///   has been signed out.
    #[instrument(skip(self, token))]
    pub async fn sign_in(&self, token: &str) -> Result<UserProfile> {
        let _guard = self.transition.lock().await;
        self.emit(AuthEvent::SigningIn);

        if let Err(e) = self.token_store.save(token).await {
            self.emit(AuthEvent::AuthError {
                message: e.to_string(),
                recoverable: true,
            });
            return Err(e);
        }

        self.api.set_auth_token(token).await;

        let user = match self.api.me().await {
            Ok(user) => user,
            Err(e) => {
                warn!(error = %e, "Profile fetch failed after sign-in");
                self.sign_out_locked().await;
                self.emit(AuthEvent::AuthError {
                    message: e.to_string(),
                    recoverable: e.is_connectivity(),
                });
                return Err(AuthError::ProfileUnavailable(e));
            }
        };

        {
            let mut state = self.state.write().await;
            let is_loading = state.is_loading;
            *state = Session::signed_in(token.to_string(), user.clone(), is_loading);
        }

        info!(user_id = ?user.id, "Signed in");
        self.emit(AuthEvent::SignedIn {
            user_id: user.id,
            username: user.username.clone(),
        });

        Ok(user)
    }

    /// Clears the persisted token, the `Authorization` header and the
    /// in-memory session.
    ///
    /// Never fails: a storage error is logged and the in-memory session is
    /// cleared anyway.
    #[instrument(skip(self))]
    pub async fn sign_out(&self) {
        let _guard = self.transition.lock().await;
        self.sign_out_locked().await;
    }

    async fn sign_out_locked(&self) {
        self.clear_credentials().await;

        {
            let mut state = self.state.write().await;
            let is_loading = state.is_loading;
            *state = Session::signed_out(is_loading);
        }

        info!("Signed out");
        self.emit(AuthEvent::SignedOut);
    }

    /// The client stops reading the stored token even when the delete
    /// fails, so a leftover entry is never sent.
    async fn clear_credentials(&self) {
        self.api.clear_auth_token().await;
        if let Err(e) = self.token_store.clear().await {
            warn!(error = %e, "Failed to delete stored token during sign-out");
        }
    }

    // ------------------------------------------------------------------
    // Account operations
    // ------------------------------------------------------------------

    /// `/auth/login` followed by [`sign_in`](Self::sign_in).
    #[instrument(skip(self, email, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<UserProfile> {
        let token = self.api.login(email, password).await?;
        self.sign_in(&token.access_token).await
    }

    /// `/auth/register` followed by [`sign_in`](Self::sign_in).
    #[instrument(skip(self, request))]
    pub async fn register(&self, request: &RegisterRequest) -> Result<UserProfile> {
        let token = self.api.register(request).await?;
        self.sign_in(&token.access_token).await
    }

    /// Refetches `/auth/me` for the current token.
    ///
    /// A 401 means the token is no longer valid: the session is signed out
    /// and `SessionExpired` is emitted.
    #[instrument(skip(self))]
    pub async fn refresh_user(&self) -> Result<UserProfile> {
        let token = self.token().await.ok_or(AuthError::NotAuthenticated)?;

        let user = match self.api.me().await {
            Ok(user) => user,
            Err(e) => return Err(self.handle_api_failure(e).await),
        };

        {
            let mut state = self.state.write().await;
            // A sign-out or new sign-in raced this refresh; keep theirs.
            if state.token.as_deref() != Some(token.as_str()) {
                return Err(AuthError::NotAuthenticated);
            }
            let is_loading = state.is_loading;
            *state = Session::signed_in(token, user.clone(), is_loading);
        }

        debug!(user_id = ?user.id, "Profile refreshed");
        self.emit(AuthEvent::ProfileRefreshed { user_id: user.id });
        Ok(user)
    }

    /// Sends the changed profile fields, then refreshes the cached user.
    #[instrument(skip(self, update))]
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<UserProfile> {
        if let Err(e) = self.api.update_profile(update).await {
            return Err(self.handle_api_failure(e).await);
        }
        self.refresh_user().await
    }

    /// Uploads a new profile picture, then refreshes the cached user.
    #[instrument(skip(self, data))]
    pub async fn upload_profile_picture(
        &self,
        image_uri: &str,
        data: Bytes,
    ) -> Result<ProfilePictureUpload> {
        let upload = match self.api.upload_profile_picture(image_uri, data).await {
            Ok(upload) => upload,
            Err(e) => return Err(self.handle_api_failure(e).await),
        };

        if let Err(e) = self.refresh_user().await {
            warn!(error = %e, "Profile refresh after picture upload failed");
        }
        Ok(upload)
    }

    async fn handle_api_failure(&self, error: ApiError) -> AuthError {
        if error.is_unauthorized() {
            warn!("Token rejected by backend");
            self.emit(AuthEvent::SessionExpired);
            self.sign_out().await;
        }
        AuthError::Api(error)
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("api", &self.api)
            .field("token_key", &self.token_store.key())
            .finish_non_exhaustive()
    }
}
