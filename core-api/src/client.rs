//! Shared backend client
//!
//! [`ApiClient`] is the single configured HTTP client every screen talks
//! through. It owns the base URL, the fixed request timeout and a map of
//! default headers, and runs two interceptors around the [`HttpClient`]
//! bridge:
//!
//! - **request**: reads the bearer token fresh from the [`SecureStore`] on
//!   every call. A stored token overrides the default `Authorization` header;
//!   a storage read failure is logged and the header is simply not added.
//!   After [`ApiClient::clear_auth_token`] the store is not consulted until
//!   the next [`ApiClient::set_auth_token`], so a token that could not be
//!   deleted is never sent again.
//! - **error**: transport timeouts and unreachable hosts are rewritten into
//!   user-readable messages (see [`ApiError`]); non-2xx responses become
//!   [`ApiError::Status`] with the status code and body untouched.

use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest, HttpResponse, MultipartFile};
use bridge_traits::storage::SecureStore;
use core_runtime::config::{CoreConfig, DEFAULT_REQUEST_TIMEOUT, DEFAULT_TOKEN_KEY};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::error::{ApiError, Result};

pub const AUTHORIZATION: &str = "Authorization";
pub const CONTENT_TYPE: &str = "Content-Type";
const JSON_CONTENT_TYPE: &str = "application/json";

/// Cheaply cloneable handle to the shared backend client.
///
/// Clones share the default-header map, so a header set through one handle
/// (e.g. by the session manager) applies to requests made through all of
/// them.
#[derive(Clone)]
pub struct ApiClient {
    base_url: Arc<str>,
    http: Arc<dyn HttpClient>,
    store: Arc<dyn SecureStore>,
    token_key: Arc<str>,
    timeout: Duration,
    default_headers: Arc<RwLock<HashMap<String, String>>>,
    /// Set while signed out; the interceptor skips the stored token.
    signed_out: Arc<AtomicBool>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("token_key", &self.token_key)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client for `base_url` with the default timeout and token key.
    pub fn new(
        base_url: impl AsRef<str>,
        http: Arc<dyn HttpClient>,
        store: Arc<dyn SecureStore>,
    ) -> Self {
        let mut headers = HashMap::new();
        headers.insert(CONTENT_TYPE.to_string(), JSON_CONTENT_TYPE.to_string());

        Self {
            base_url: Arc::from(base_url.as_ref().trim_end_matches('/')),
            http,
            store,
            token_key: Arc::from(DEFAULT_TOKEN_KEY),
            timeout: DEFAULT_REQUEST_TIMEOUT,
            default_headers: Arc::new(RwLock::new(headers)),
            signed_out: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Create a client from a validated [`CoreConfig`].
    pub fn from_config(config: &CoreConfig) -> Self {
        Self::new(
            &config.api_base_url,
            config.http_client.clone(),
            config.secure_store.clone(),
        )
        .with_timeout(config.request_timeout)
        .with_token_key(config.interceptor_token_key.as_str())
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Storage key the request interceptor reads the bearer token from.
    pub fn with_token_key(mut self, key: impl AsRef<str>) -> Self {
        self.token_key = Arc::from(key.as_ref());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    // ------------------------------------------------------------------
    // Default headers
    // ------------------------------------------------------------------

    pub async fn set_default_header(&self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let mut headers = self.default_headers.write().await;
        headers.retain(|key, _| !key.eq_ignore_ascii_case(&name));
        headers.insert(name, value.into());
    }

    pub async fn remove_default_header(&self, name: &str) {
        self.default_headers
            .write()
            .await
            .retain(|key, _| !key.eq_ignore_ascii_case(name));
    }

    pub async fn default_header(&self, name: &str) -> Option<String> {
        self.default_headers
            .read()
            .await
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.clone())
    }

    /// Set `Authorization: Bearer <token>` on every subsequent request.
    pub async fn set_auth_token(&self, token: &str) {
        self.set_default_header(AUTHORIZATION, format!("Bearer {}", token))
            .await;
        self.signed_out.store(false, Ordering::SeqCst);
    }

    /// Drop the `Authorization` header and stop attaching the stored token
    /// until [`set_auth_token`](Self::set_auth_token) is called again.
    pub async fn clear_auth_token(&self) {
        self.signed_out.store(true, Ordering::SeqCst);
        self.remove_default_header(AUTHORIZATION).await;
    }

    /// Whether the stored token is currently ignored by the interceptor.
    pub fn is_signed_out(&self) -> bool {
        self.signed_out.load(Ordering::SeqCst)
    }

    /// Current default `Authorization` header value
    pub async fn auth_header(&self) -> Option<String> {
        self.default_header(AUTHORIZATION).await
    }

    // ------------------------------------------------------------------
    // Requests
    // ------------------------------------------------------------------

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// Apply default headers and the freshly read bearer token.
    async fn intercept(&self, mut request: HttpRequest) -> HttpRequest {
        {
            let defaults = self.default_headers.read().await;
            for (name, value) in defaults.iter() {
                if request.header_value(name).is_none() {
                    request.headers.insert(name.clone(), value.clone());
                }
            }
        }

        if request.multipart.is_some() {
            request.remove_header(CONTENT_TYPE);
        }

        if self.is_signed_out() {
            request.remove_header(AUTHORIZATION);
            return request.timeout(self.timeout);
        }

        match self.store.get_string(&self.token_key).await {
            Ok(Some(token)) if !token.is_empty() => {
                request.remove_header(AUTHORIZATION);
                request = request.bearer_token(token);
            }
            Ok(_) => {}
            Err(e) => {
                warn!(error = %e, "Could not read stored token; sending request without it");
            }
        }

        request.timeout(self.timeout)
    }

    /// Execute `request` against the backend.
    ///
    /// Returns the raw response for 2xx statuses; everything else is an
    /// [`ApiError`].
    pub async fn send(&self, path: &str, request: HttpRequest) -> Result<HttpResponse> {
        let method = request.method;
        let request = self.intercept(request).await;

        debug!(method = method.as_str(), path, "API request");

        let response = match self.http.execute(request).await {
            Ok(response) => response,
            Err(e) => {
                let error = ApiError::from(e);
                warn!(method = method.as_str(), path, error = %error, "API request failed");
                return Err(error);
            }
        };

        debug!(
            method = method.as_str(),
            path,
            status = response.status,
            "API response"
        );

        if !response.is_success() {
            return Err(ApiError::from_status(response.status, &response.body));
        }

        Ok(response)
    }

    fn decode<T: DeserializeOwned>(path: &str, response: &HttpResponse) -> Result<T> {
        serde_json::from_slice(&response.body).map_err(|e| ApiError::Decode {
            path: path.to_string(),
            reason: e.to_string(),
        })
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let request = HttpRequest::new(HttpMethod::Get, self.url(path));
        let response = self.send(path, request).await?;
        Self::decode(path, &response)
    }

    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let request = HttpRequest::new(HttpMethod::Post, self.url(path)).json(body)?;
        let response = self.send(path, request).await?;
        Self::decode(path, &response)
    }

    /// POST without a body
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let request = HttpRequest::new(HttpMethod::Post, self.url(path));
        let response = self.send(path, request).await?;
        Self::decode(path, &response)
    }

    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        file: MultipartFile,
    ) -> Result<T> {
        let request = HttpRequest::new(HttpMethod::Post, self.url(path)).multipart(file);
        let response = self.send(path, request).await?;
        Self::decode(path, &response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{NETWORK_MESSAGE, TIMEOUT_MESSAGE};
    use async_trait::async_trait;
    use bridge_traits::error::{BridgeError, Result as BridgeResult};
    use bytes::Bytes;
    use mockall::mock;
    use std::sync::Mutex;

    mock! {
        HttpClient {}

        #[async_trait]
        impl HttpClient for HttpClient {
            async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse>;
        }
    }

    #[derive(Default)]
    struct MemoryStore {
        values: Mutex<HashMap<String, Vec<u8>>>,
        fail_reads: bool,
    }

    impl MemoryStore {
        fn with_token(key: &str, token: &str) -> Self {
            let store = Self::default();
            store
                .values
                .lock()
                .unwrap()
                .insert(key.to_string(), token.as_bytes().to_vec());
            store
        }
    }

    #[async_trait]
    impl SecureStore for MemoryStore {
        async fn set_secret(&self, key: &str, value: &[u8]) -> BridgeResult<()> {
            self.values
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_vec());
            Ok(())
        }

        async fn get_secret(&self, key: &str) -> BridgeResult<Option<Vec<u8>>> {
            if self.fail_reads {
                return Err(BridgeError::OperationFailed("keychain locked".to_string()));
            }
            Ok(self.values.lock().unwrap().get(key).cloned())
        }

        async fn delete_secret(&self, key: &str) -> BridgeResult<()> {
            self.values.lock().unwrap().remove(key);
            Ok(())
        }
    }

    fn ok_json(body: &str) -> BridgeResult<HttpResponse> {
        Ok(HttpResponse {
            status: 200,
            headers: HashMap::new(),
            body: Bytes::from(body.to_string()),
        })
    }

    fn client(http: MockHttpClient, store: MemoryStore) -> ApiClient {
        ApiClient::new("http://localhost:8000/", Arc::new(http), Arc::new(store))
    }

    #[tokio::test]
    async fn test_request_without_token_has_no_authorization() {
        let mut http = MockHttpClient::new();
        http.expect_execute()
            .times(1)
            .withf(|request| {
                request.url == "http://localhost:8000/activity/stats"
                    && request.header_value("authorization").is_none()
                    && request.header_value("content-type") == Some("application/json")
                    && request.timeout == Some(DEFAULT_REQUEST_TIMEOUT)
            })
            .returning(|_| ok_json(r#"{"ok":true}"#));

        let client = client(http, MemoryStore::default());
        let body: serde_json::Value = client.get_json("/activity/stats").await.unwrap();
        assert_eq!(body["ok"], true);
    }

    #[tokio::test]
    async fn test_stored_token_is_attached() {
        let mut http = MockHttpClient::new();
        http.expect_execute()
            .times(1)
            .withf(|request| request.header_value("Authorization") == Some("Bearer stored"))
            .returning(|_| ok_json("{}"));

        let client = client(http, MemoryStore::with_token(DEFAULT_TOKEN_KEY, "stored"));
        let _: serde_json::Value = client.get_json("/auth/me").await.unwrap();
    }

    #[tokio::test]
    async fn test_stored_token_overrides_default_header() {
        let mut http = MockHttpClient::new();
        http.expect_execute()
            .times(1)
            .withf(|request| {
                request.header_value("Authorization") == Some("Bearer fresh")
                    && request
                        .headers
                        .keys()
                        .filter(|k| k.eq_ignore_ascii_case("authorization"))
                        .count()
                        == 1
            })
            .returning(|_| ok_json("{}"));

        let client = client(http, MemoryStore::with_token(DEFAULT_TOKEN_KEY, "fresh"));
        client.set_auth_token("stale").await;
        let _: serde_json::Value = client.get_json("/auth/me").await.unwrap();
    }

    #[tokio::test]
    async fn test_storage_failure_falls_back_to_default_header() {
        let mut http = MockHttpClient::new();
        http.expect_execute()
            .times(1)
            .withf(|request| request.header_value("Authorization") == Some("Bearer session"))
            .returning(|_| ok_json("{}"));

        let store = MemoryStore {
            fail_reads: true,
            ..Default::default()
        };
        let client = client(http, store);
        client.set_auth_token("session").await;
        let _: serde_json::Value = client.get_json("/auth/me").await.unwrap();
    }

    #[tokio::test]
    async fn test_custom_token_key() {
        let mut http = MockHttpClient::new();
        http.expect_execute()
            .times(1)
            .withf(|request| request.header_value("Authorization") == Some("Bearer legacy"))
            .returning(|_| ok_json("{}"));

        let client = client(http, MemoryStore::with_token("token", "legacy")).with_token_key("token");
        let _: serde_json::Value = client.get_json("/auth/me").await.unwrap();
    }

    #[tokio::test]
    async fn test_auth_header_lifecycle() {
        let client = client(MockHttpClient::new(), MemoryStore::default());

        assert!(client.auth_header().await.is_none());
        client.set_auth_token("abc").await;
        assert_eq!(client.auth_header().await.as_deref(), Some("Bearer abc"));

        // Clones share the header map.
        let other = client.clone();
        other.clear_auth_token().await;
        assert!(client.auth_header().await.is_none());
        assert_eq!(
            client.default_header("content-type").await.as_deref(),
            Some("application/json")
        );
    }

    #[tokio::test]
    async fn test_cleared_auth_ignores_leftover_stored_token() {
        let mut http = MockHttpClient::new();
        let mut seq = mockall::Sequence::new();
        http.expect_execute()
            .times(1)
            .in_sequence(&mut seq)
            .withf(|request| request.header_value("Authorization").is_none())
            .returning(|_| ok_json("{}"));
        http.expect_execute()
            .times(1)
            .in_sequence(&mut seq)
            .withf(|request| request.header_value("Authorization") == Some("Bearer leftover"))
            .returning(|_| ok_json("{}"));

        let client = client(http, MemoryStore::with_token(DEFAULT_TOKEN_KEY, "leftover"));
        client.clear_auth_token().await;
        assert!(client.is_signed_out());
        let _: serde_json::Value = client.get_json("/plan/wellness-score").await.unwrap();

        client.set_auth_token("leftover").await;
        assert!(!client.is_signed_out());
        let _: serde_json::Value = client.get_json("/plan/wellness-score").await.unwrap();
    }

    #[tokio::test]
    async fn test_network_error_is_rewritten() {
        let mut http = MockHttpClient::new();
        http.expect_execute()
            .times(1)
            .returning(|_| Err(BridgeError::ConnectionFailed("connection refused".to_string())));

        let client = client(http, MemoryStore::default());
        let error = client
            .get_json::<serde_json::Value>("/plan/wellness-score")
            .await
            .unwrap_err();

        assert_eq!(error.to_string(), NETWORK_MESSAGE);
        assert!(error.status().is_none());
        match error {
            ApiError::Network { cause, .. } => assert_eq!(cause, "connection refused"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_timeout_is_rewritten() {
        let mut http = MockHttpClient::new();
        http.expect_execute()
            .times(1)
            .returning(|_| Err(BridgeError::Timeout("deadline elapsed".to_string())));

        let client = client(http, MemoryStore::default());
        let error = client
            .post_empty::<serde_json::Value>("/plan/generate-plan")
            .await
            .unwrap_err();

        assert_eq!(error.to_string(), TIMEOUT_MESSAGE);
    }

    #[tokio::test]
    async fn test_status_error_keeps_status_and_body() {
        let mut http = MockHttpClient::new();
        http.expect_execute().times(1).returning(|_| {
            Ok(HttpResponse {
                status: 400,
                headers: HashMap::new(),
                body: Bytes::from_static(br#"{"detail":"Email already registered"}"#),
            })
        });

        let client = client(http, MemoryStore::default());
        let error = client
            .post_json::<_, serde_json::Value>("/auth/register", &serde_json::json!({}))
            .await
            .unwrap_err();

        assert_eq!(error.status(), Some(400));
        assert_eq!(error.detail(), Some("Email already registered"));
        match error {
            ApiError::Status { body, .. } => assert!(body.contains("already registered")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_decode_error_names_path() {
        let mut http = MockHttpClient::new();
        http.expect_execute()
            .times(1)
            .returning(|_| ok_json("not json"));

        let client = client(http, MemoryStore::default());
        let error = client
            .get_json::<serde_json::Value>("/activity/recent")
            .await
            .unwrap_err();

        assert!(matches!(error, ApiError::Decode { ref path, .. } if path == "/activity/recent"));
    }

    #[tokio::test]
    async fn test_multipart_drops_json_content_type() {
        let mut http = MockHttpClient::new();
        http.expect_execute()
            .times(1)
            .withf(|request| {
                request.header_value("content-type").is_none()
                    && request
                        .multipart
                        .as_ref()
                        .map(|file| file.field_name == "file")
                        .unwrap_or(false)
            })
            .returning(|_| ok_json(r#"{"profile_picture":"http://minio/p.jpg"}"#));

        let client = client(http, MemoryStore::default());
        let file = MultipartFile {
            field_name: "file".to_string(),
            file_name: "p.jpg".to_string(),
            content_type: "image/jpeg".to_string(),
            data: Bytes::from_static(b"\xff\xd8"),
        };
        let body: serde_json::Value = client
            .post_multipart("/auth/upload-profile-picture", file)
            .await
            .unwrap();
        assert_eq!(body["profile_picture"], "http://minio/p.jpg");
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client = client(MockHttpClient::new(), MemoryStore::default());
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(client.url("upload/"), "http://localhost:8000/upload/");
    }
}
