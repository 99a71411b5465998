//! Secure Token Storage
//!
//! Persists the bearer token as a plain UTF-8 string under a single secure
//! storage key (`userToken` by default). Token values are never logged.

use crate::error::{AuthError, Result};
use bridge_traits::storage::SecureStore;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Secure storage for the session token
#[derive(Clone)]
pub struct TokenStore {
    secure_store: Arc<dyn SecureStore>,
    key: String,
}

impl TokenStore {
    pub fn new(secure_store: Arc<dyn SecureStore>, key: impl Into<String>) -> Self {
        let key = key.into();
        debug!(key = %key, "Initializing TokenStore");
        Self { secure_store, key }
    }

    /// Storage key the token lives under
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Store the token, overwriting any previous one.
    pub async fn save(&self, token: &str) -> Result<()> {
        if token.trim().is_empty() {
            return Err(AuthError::InvalidToken("token is empty".to_string()));
        }

        self.secure_store
            .set_secret(&self.key, token.as_bytes())
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to store token in secure storage");
                AuthError::SecureStorageUnavailable(e.to_string())
            })?;

        info!("Token stored securely");
        Ok(())
    }

    /// Load the stored token.
    ///
    /// An unreadable (non UTF-8 or blank) entry is deleted and reported as
    /// no token.
    pub async fn load(&self) -> Result<Option<String>> {
        let bytes = self
            .secure_store
            .get_secret(&self.key)
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to read token from secure storage");
                AuthError::SecureStorageUnavailable(e.to_string())
            })?;

        let Some(bytes) = bytes else {
            debug!("No stored token");
            return Ok(None);
        };

        match String::from_utf8(bytes) {
            Ok(token) if !token.trim().is_empty() => Ok(Some(token)),
            _ => {
                warn!("Stored token is corrupted, deleting");
                if let Err(e) = self.clear().await {
                    warn!(error = %e, "Failed to delete corrupted token");
                }
                Ok(None)
            }
        }
    }

    /// Delete the stored token. Deleting a missing token succeeds.
    pub async fn clear(&self) -> Result<()> {
        self.secure_store
            .delete_secret(&self.key)
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to delete token from secure storage");
                AuthError::SecureStorageUnavailable(e.to_string())
            })?;

        debug!("Token deleted");
        Ok(())
    }
}
