//! Secure Storage Abstraction
//!
//! Provides a platform-agnostic trait for persisting small secrets such as
//! the session token and the selected language code.

use async_trait::async_trait;

use crate::error::Result;

/// Secure credential storage trait
///
/// Abstracts secure storage mechanisms:
/// - macOS/iOS: Keychain
/// - Android: Keystore (hardware-backed when available)
/// - Windows: Credential Manager
/// - Linux: Secret Service / libsecret
///
/// # Security Requirements
///
/// Implementations MUST:
/// - Use platform-provided secure storage when available
/// - Never log or expose stored values
///
/// # Example
///
/// ```ignore
/// use bridge_traits::storage::SecureStore;
///
/// async fn store_token(store: &dyn SecureStore, token: &str) -> Result<()> {
///     store.set_secret("userToken", token.as_bytes()).await?;
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait SecureStore: Send + Sync {
    /// Store a secret value, replacing any previous value under `key`.
    async fn set_secret(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Retrieve a secret value
    ///
    /// # Returns
    ///
    /// Returns `Ok(None)` if the key doesn't exist.
    async fn get_secret(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Delete a secret. Deleting a missing key is not an error.
    async fn delete_secret(&self, key: &str) -> Result<()>;

    /// Check if a secret exists without retrieving it
    async fn has_secret(&self, key: &str) -> Result<bool> {
        Ok(self.get_secret(key).await?.is_some())
    }

    /// Retrieve a secret as UTF-8 text.
    ///
    /// Values that are not valid UTF-8 are reported as `OperationFailed`.
    async fn get_string(&self, key: &str) -> Result<Option<String>> {
        match self.get_secret(key).await? {
            Some(bytes) => String::from_utf8(bytes).map(Some).map_err(|e| {
                crate::error::BridgeError::OperationFailed(format!(
                    "Stored value for '{}' is not UTF-8: {}",
                    key, e
                ))
            }),
            None => Ok(None),
        }
    }
}
