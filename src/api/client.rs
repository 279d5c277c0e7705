//! Datalyn REST API Client
//!
//! HTTP client for the Datalyn backend. All requests go through the shared
//! [`CredentialChannel`], which adds the bearer token once a session exists.

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::credentials::CredentialChannel;
use super::error::{ApiError, ApiResult};

/// Datalyn REST API client
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    config: ClientConfig,
    credentials: CredentialChannel,
}

/// Configuration for the API client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL including the `/api` prefix (e.g., "http://localhost:8001/api")
    pub base_url: String,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8001/api".to_string(),
            request_timeout_ms: 30_000,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }
}

impl ApiClient {
    /// Create a client with its own credential channel
    pub fn new(config: ClientConfig) -> ApiResult<Self> {
        Self::with_credentials(config, CredentialChannel::new())
    }

    /// Create a client sharing an existing credential channel
    pub fn with_credentials(
        mut config: ClientConfig,
        credentials: CredentialChannel,
    ) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_millis(config.request_timeout_ms))
            .build()
            .map_err(ApiError::Request)?;

        config.base_url = config.base_url.trim_end_matches('/').to_string();

        Ok(Self {
            client,
            config,
            credentials,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The credential channel this client reads from
    pub fn credentials(&self) -> &CredentialChannel {
        &self.credentials
    }

    /// Full URL for an API path such as `/auth/me`
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    /// Request builder with the channel's credential applied
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.url(path);
        tracing::debug!(method = %method, url = %url, "API request");
        self.credentials.apply(self.client.request(method, url))
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let response = self.request(Method::GET, path).send().await?;
        Self::decode(response).await
    }

    /// GET with an explicit bearer token instead of the channel's
    pub(crate) async fn get_with_token<T: DeserializeOwned>(
        &self,
        path: &str,
        token: &str,
    ) -> ApiResult<T> {
        let url = self.url(path);
        tracing::debug!(url = %url, "API request with explicit credential");
        let response = self.client.get(url).bearer_auth(token).send().await?;
        Self::decode(response).await
    }

    pub(crate) async fn post<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.request(Method::POST, path).json(body).send().await?;
        Self::decode(response).await
    }

    /// POST without a request body
    pub(crate) async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let response = self.request(Method::POST, path).send().await?;
        Self::decode(response).await
    }

    pub(crate) async fn put<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.request(Method::PUT, path).json(body).send().await?;
        Self::decode(response).await
    }

    /// Turn a response into `T`, or into the backend's error message
    async fn decode<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
        let status = response.status();

        if status.is_success() {
            let bytes = response.bytes().await?;
            serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
        } else {
            let text = response.text().await.unwrap_or_default();
            let err = ApiError::from_body(status, &text);
            tracing::debug!(status = status.as_u16(), error = %err, "API returned error");
            Err(err)
        }
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("config", &self.config)
            .field("credentials", &self.credentials)
            .finish()
    }
}

/// Percent-encode a single path segment
pub(crate) fn segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:8001/api");
        assert_eq!(config.request_timeout_ms, 30_000);
    }

    #[test]
    fn test_url_trims_trailing_slash() {
        let client = ApiClient::new(ClientConfig::new("https://app.datalyn.io/api/")).unwrap();
        assert_eq!(client.url("/auth/me"), "https://app.datalyn.io/api/auth/me");
    }

    #[test]
    fn test_shared_credentials() {
        let channel = CredentialChannel::new();
        let client = ApiClient::with_credentials(ClientConfig::default(), channel.clone()).unwrap();

        channel.attach("tok1");
        assert_eq!(client.credentials().current().as_deref(), Some("tok1"));
    }

    #[test]
    fn test_segment_encoding() {
        assert_eq!(segment("google sheets/v2"), "google%20sheets%2Fv2");
        assert_eq!(segment("slack"), "slack");
    }
}
