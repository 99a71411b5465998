//! # Core Configuration Module
//!
//! Provides configuration management for the keepItFit client core.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a `CoreConfig`
//! instance that holds every bridge and setting the core needs. It enforces
//! fail-fast validation so a misconfigured host fails at start-up rather than
//! on the first request.
//!
//! ## Required Dependencies
//!
//! - `SecureStore` - token and language persistence
//! - `HttpClient` - transport for the backend REST API
//! - `LayoutDirectionController` - platform RTL toggle
//!
//! When the `desktop-shims` feature is enabled, desktop-ready defaults for all
//! three are injected automatically if not provided.
//!
//! ## API Base URL
//!
//! Resolved in order: explicit [`CoreConfigBuilder::api_base_url`], the
//! `KEEPITFIT_API_BASE_URL` environment variable, then
//! [`DEFAULT_API_BASE_URL`].
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::CoreConfig;
//! use std::sync::Arc;
//!
//! let config = CoreConfig::builder()
//!     .api_base_url("https://api.keepitfit.app")
//!     .secure_store(Arc::new(MySecureStore))
//!     .http_client(Arc::new(MyHttpClient))
//!     .layout_controller(Arc::new(MyLayoutController))
//!     .build()?;
//! ```

use crate::error::{Error, Result};
use crate::events::DEFAULT_EVENT_BUFFER_SIZE;
use bridge_traits::{HttpClient, LayoutDirectionController, SecureStore};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Environment variable consulted when no base URL is set explicitly.
pub const API_BASE_URL_ENV: &str = "KEEPITFIT_API_BASE_URL";

/// Development backend address used by the mobile client.
pub const DEFAULT_API_BASE_URL: &str = "http://192.168.1.122:8000";

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Upper bound for the request timeout; anything longer is a typo.
pub const MAX_REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Secure storage key holding the bearer token.
pub const DEFAULT_TOKEN_KEY: &str = "userToken";

/// Secure storage key holding the language code.
pub const DEFAULT_LANGUAGE_KEY: &str = "language";

/// Core configuration for the keepItFit client core.
///
/// Use [`CoreConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct CoreConfig {
    /// Backend root, without a trailing slash
    pub api_base_url: String,

    /// Fixed per-request timeout
    pub request_timeout: Duration,

    pub secure_store: Arc<dyn SecureStore>,

    pub http_client: Arc<dyn HttpClient>,

    pub layout_controller: Arc<dyn LayoutDirectionController>,

    /// Key the session manager persists the token under
    pub token_key: String,

    /// Key the request interceptor reads the bearer token from
    pub interceptor_token_key: String,

    /// Key the language manager persists the language code under
    pub language_key: String,

    /// Event bus buffer per subscriber
    pub event_buffer_size: usize,
}

impl std::fmt::Debug for CoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoreConfig")
            .field("api_base_url", &self.api_base_url)
            .field("request_timeout", &self.request_timeout)
            .field("secure_store", &"SecureStore { ... }")
            .field("http_client", &"HttpClient { ... }")
            .field("layout_controller", &"LayoutDirectionController { ... }")
            .field("token_key", &self.token_key)
            .field("interceptor_token_key", &self.interceptor_token_key)
            .field("language_key", &self.language_key)
            .field("event_buffer_size", &self.event_buffer_size)
            .finish()
    }
}

impl CoreConfig {
    /// Creates a new builder for constructing a `CoreConfig`.
    pub fn builder() -> CoreConfigBuilder {
        CoreConfigBuilder::default()
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - The base URL parses and uses http or https
    /// - The request timeout is non-zero and at most five minutes
    /// - Storage keys are non-empty and the token and language keys differ
    /// - The event buffer can hold at least one event
    pub fn validate(&self) -> Result<()> {
        validate_base_url(&self.api_base_url)?;

        if self.request_timeout.is_zero() {
            return Err(Error::Config(
                "Request timeout must be greater than zero".to_string(),
            ));
        }

        if self.request_timeout > MAX_REQUEST_TIMEOUT {
            return Err(Error::Config(format!(
                "Request timeout exceeds maximum of {} seconds",
                MAX_REQUEST_TIMEOUT.as_secs()
            )));
        }

        for (name, key) in [
            ("token_key", &self.token_key),
            ("interceptor_token_key", &self.interceptor_token_key),
            ("language_key", &self.language_key),
        ] {
            if key.trim().is_empty() {
                return Err(Error::Config(format!("{} cannot be empty", name)));
            }
        }

        if self.token_key == self.language_key {
            return Err(Error::Config(
                "token_key and language_key must be different storage keys".to_string(),
            ));
        }

        if self.event_buffer_size == 0 {
            return Err(Error::Config(
                "Event buffer size must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

fn validate_base_url(raw: &str) -> Result<()> {
    let url = Url::parse(raw)
        .map_err(|e| Error::Config(format!("Invalid API base URL '{}': {}", raw, e)))?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(Error::Config(format!(
            "API base URL must use http or https, got '{}'",
            other
        ))),
    }
}

/// Picks the explicit value, then the environment value, then the default,
/// and strips trailing slashes so paths can be appended verbatim.
fn resolve_api_base_url(explicit: Option<String>, from_env: Option<String>) -> String {
    explicit
        .or(from_env)
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty())
        .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string())
        .trim_end_matches('/')
        .to_string()
}

#[cfg(not(feature = "desktop-shims"))]
fn capability_missing(capability: &str, message: &str) -> Error {
    Error::CapabilityMissing {
        capability: capability.to_string(),
        message: message.to_string(),
    }
}

#[cfg(feature = "desktop-shims")]
fn provide_default_secure_store() -> Result<Arc<dyn SecureStore>> {
    use bridge_desktop::KeyringSecureStore;

    let store: Arc<dyn SecureStore> = Arc::new(KeyringSecureStore::new());
    Ok(store)
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_secure_store() -> Result<Arc<dyn SecureStore>> {
    Err(capability_missing(
        "SecureStore",
        "SecureStore implementation is required to persist the session token and language. \
         Desktop: enable the 'desktop-shims' feature to use the default KeyringSecureStore. \
         Mobile: inject platform-native secure storage (Keychain/Keystore).",
    ))
}

#[cfg(feature = "desktop-shims")]
fn provide_default_http_client(timeout: Duration) -> Result<Arc<dyn HttpClient>> {
    use bridge_desktop::ReqwestHttpClient;

    let client = ReqwestHttpClient::with_timeout(timeout)
        .map_err(|e| Error::Internal(format!("Failed to create default HttpClient: {}", e)))?;
    let client: Arc<dyn HttpClient> = Arc::new(client);
    Ok(client)
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_http_client(_timeout: Duration) -> Result<Arc<dyn HttpClient>> {
    Err(capability_missing(
        "HttpClient",
        "HttpClient implementation is required to reach the backend API. \
         Desktop: enable the 'desktop-shims' feature to use the default ReqwestHttpClient. \
         Mobile: inject a client backed by URLSession/OkHttp.",
    ))
}

#[cfg(feature = "desktop-shims")]
fn provide_default_layout_controller() -> Result<Arc<dyn LayoutDirectionController>> {
    use bridge_desktop::DesktopLayoutController;

    let controller: Arc<dyn LayoutDirectionController> = Arc::new(DesktopLayoutController::new());
    Ok(controller)
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_layout_controller() -> Result<Arc<dyn LayoutDirectionController>> {
    Err(capability_missing(
        "LayoutDirectionController",
        "LayoutDirectionController implementation is required to switch right-to-left layout \
         for Arabic. Desktop: enable the 'desktop-shims' feature. \
         Mobile: inject a controller wrapping the platform's forceRTL switch.",
    ))
}

/// Builder for constructing [`CoreConfig`] instances.
#[derive(Default)]
pub struct CoreConfigBuilder {
    api_base_url: Option<String>,
    ignore_env: bool,
    request_timeout: Option<Duration>,
    secure_store: Option<Arc<dyn SecureStore>>,
    http_client: Option<Arc<dyn HttpClient>>,
    layout_controller: Option<Arc<dyn LayoutDirectionController>>,
    token_key: Option<String>,
    interceptor_token_key: Option<String>,
    language_key: Option<String>,
    event_buffer_size: Option<usize>,
}

impl CoreConfigBuilder {
    /// Sets the backend base URL, overriding `KEEPITFIT_API_BASE_URL`.
    ///
    /// ```
    /// use core_runtime::config::CoreConfig;
    ///
    /// let builder = CoreConfig::builder().api_base_url("https://api.keepitfit.app");
    /// ```
    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = Some(url.into());
        self
    }

    /// Skip the environment lookup; useful in tests.
    pub fn ignore_env(mut self) -> Self {
        self.ignore_env = true;
        self
    }

    /// Sets the per-request timeout. Default: 30 seconds.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Sets the secure store implementation (required).
    pub fn secure_store(mut self, store: Arc<dyn SecureStore>) -> Self {
        self.secure_store = Some(store);
        self
    }

    /// Sets the HTTP client implementation (required).
    ///
    /// The client should honor [`HttpRequest::timeout`](bridge_traits::HttpRequest);
    /// the core sets it to the configured request timeout on every call.
    pub fn http_client(mut self, client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Sets the layout direction controller (required).
    pub fn layout_controller(mut self, controller: Arc<dyn LayoutDirectionController>) -> Self {
        self.layout_controller = Some(controller);
        self
    }

    /// Storage key for the session token. Default: `userToken`.
    ///
    /// The interceptor key follows this value unless set separately.
    pub fn token_key(mut self, key: impl Into<String>) -> Self {
        self.token_key = Some(key.into());
        self
    }

    /// Storage key the request interceptor reads. Default: the token key.
    pub fn interceptor_token_key(mut self, key: impl Into<String>) -> Self {
        self.interceptor_token_key = Some(key.into());
        self
    }

    /// Storage key for the language code. Default: `language`.
    pub fn language_key(mut self, key: impl Into<String>) -> Self {
        self.language_key = Some(key.into());
        self
    }

    pub fn event_buffer_size(mut self, size: usize) -> Self {
        self.event_buffer_size = Some(size);
        self
    }

    /// Builds the final `CoreConfig` instance.
    ///
    /// # Errors
    ///
    /// - `Error::CapabilityMissing` when a required bridge is absent and no
    ///   desktop default is available
    /// - `Error::Config` when a value fails [`CoreConfig::validate`]
    pub fn build(self) -> Result<CoreConfig> {
        let from_env = if self.ignore_env {
            None
        } else {
            std::env::var(API_BASE_URL_ENV).ok()
        };
        let api_base_url = resolve_api_base_url(self.api_base_url, from_env);
        let request_timeout = self.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT);

        let secure_store = match self.secure_store {
            Some(store) => store,
            None => provide_default_secure_store()?,
        };

        let http_client = match self.http_client {
            Some(client) => client,
            None => provide_default_http_client(request_timeout)?,
        };

        let layout_controller = match self.layout_controller {
            Some(controller) => controller,
            None => provide_default_layout_controller()?,
        };

        let token_key = self
            .token_key
            .unwrap_or_else(|| DEFAULT_TOKEN_KEY.to_string());
        let interceptor_token_key = self
            .interceptor_token_key
            .unwrap_or_else(|| token_key.clone());

        let config = CoreConfig {
            api_base_url,
            request_timeout,
            secure_store,
            http_client,
            layout_controller,
            token_key,
            interceptor_token_key,
            language_key: self
                .language_key
                .unwrap_or_else(|| DEFAULT_LANGUAGE_KEY.to_string()),
            event_buffer_size: self.event_buffer_size.unwrap_or(DEFAULT_EVENT_BUFFER_SIZE),
        };

        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_traits::{
        BridgeError, HttpRequest, HttpResponse, LayoutDirection,
    };

    struct MockSecureStore;

    #[async_trait]
    impl SecureStore for MockSecureStore {
        async fn set_secret(&self, _key: &str, _value: &[u8]) -> std::result::Result<(), BridgeError> {
            Ok(())
        }

        async fn get_secret(&self, _key: &str) -> std::result::Result<Option<Vec<u8>>, BridgeError> {
            Ok(None)
        }

        async fn delete_secret(&self, _key: &str) -> std::result::Result<(), BridgeError> {
            Ok(())
        }
    }

    struct MockHttpClient;

    #[async_trait]
    impl HttpClient for MockHttpClient {
        async fn execute(
            &self,
            _request: HttpRequest,
        ) -> std::result::Result<HttpResponse, BridgeError> {
            Err(BridgeError::NotAvailable("offline".to_string()))
        }
    }

    struct MockLayout;

    #[async_trait]
    impl LayoutDirectionController for MockLayout {
        fn current(&self) -> LayoutDirection {
            LayoutDirection::Ltr
        }

        async fn force_direction(
            &self,
            _direction: LayoutDirection,
        ) -> std::result::Result<bool, BridgeError> {
            Ok(true)
        }
    }

    fn builder_with_bridges() -> CoreConfigBuilder {
        CoreConfig::builder()
            .ignore_env()
            .secure_store(Arc::new(MockSecureStore))
            .http_client(Arc::new(MockHttpClient))
            .layout_controller(Arc::new(MockLayout))
    }

    #[test]
    fn test_defaults() {
        let config = builder_with_bridges().build().unwrap();

        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.token_key, "userToken");
        assert_eq!(config.interceptor_token_key, "userToken");
        assert_eq!(config.language_key, "language");
        assert_eq!(config.event_buffer_size, DEFAULT_EVENT_BUFFER_SIZE);
    }

    #[test]
    fn test_resolve_api_base_url_precedence() {
        assert_eq!(
            resolve_api_base_url(
                Some("https://explicit.example/".to_string()),
                Some("https://env.example".to_string())
            ),
            "https://explicit.example"
        );
        assert_eq!(
            resolve_api_base_url(None, Some("https://env.example//".to_string())),
            "https://env.example"
        );
        assert_eq!(
            resolve_api_base_url(None, Some("   ".to_string())),
            DEFAULT_API_BASE_URL
        );
        assert_eq!(resolve_api_base_url(None, None), DEFAULT_API_BASE_URL);
    }

    #[test]
    fn test_interceptor_key_follows_token_key() {
        let config = builder_with_bridges().token_key("sessionToken").build().unwrap();
        assert_eq!(config.interceptor_token_key, "sessionToken");

        let config = builder_with_bridges()
            .interceptor_token_key("token")
            .build()
            .unwrap();
        assert_eq!(config.token_key, "userToken");
        assert_eq!(config.interceptor_token_key, "token");
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        let result = builder_with_bridges().api_base_url("not a url").build();
        assert!(matches!(result, Err(Error::Config(_))));

        let result = builder_with_bridges().api_base_url("ftp://files.example").build();
        assert!(matches!(result, Err(Error::Config(msg)) if msg.contains("http or https")));
    }

    #[test]
    fn test_rejects_bad_timeouts() {
        let zero = builder_with_bridges().request_timeout(Duration::ZERO).build();
        assert!(zero.is_err());

        let huge = builder_with_bridges()
            .request_timeout(Duration::from_secs(3600))
            .build();
        assert!(huge.is_err());
    }

    #[test]
    fn test_rejects_colliding_or_empty_keys() {
        let same = builder_with_bridges().language_key("userToken").build();
        assert!(matches!(same, Err(Error::Config(msg)) if msg.contains("different")));

        let empty = builder_with_bridges().token_key("  ").build();
        assert!(empty.is_err());
    }

    #[test]
    fn test_rejects_zero_event_buffer() {
        let result = builder_with_bridges().event_buffer_size(0).build();
        assert!(result.is_err());
    }

    #[cfg(not(feature = "desktop-shims"))]
    #[test]
    fn test_missing_capabilities_are_reported() {
        let result = CoreConfig::builder()
            .ignore_env()
            .http_client(Arc::new(MockHttpClient))
            .layout_controller(Arc::new(MockLayout))
            .build();
        assert!(matches!(
            result,
            Err(Error::CapabilityMissing { capability, .. }) if capability == "SecureStore"
        ));

        let result = CoreConfig::builder()
            .ignore_env()
            .secure_store(Arc::new(MockSecureStore))
            .layout_controller(Arc::new(MockLayout))
            .build();
        assert!(matches!(
            result,
            Err(Error::CapabilityMissing { capability, .. }) if capability == "HttpClient"
        ));
    }

    #[test]
    fn test_debug_hides_bridges() {
        let config = builder_with_bridges().build().unwrap();
        let debug = format!("{:?}", config);
        assert!(debug.contains("SecureStore { ... }"));
        assert!(debug.contains("192.168.1.122"));
    }
}
