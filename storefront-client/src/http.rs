//! HTTP client for network-based API calls
//!
//! Every request resolves against the configured base URL, carries the bearer
//! token when one is available, and turns non-2xx responses into
//! [`ClientError::Api`] with the most specific message the body offers.

use async_trait::async_trait;
use http::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use http::{Method, StatusCode};
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::GENERIC_REQUEST_ERROR;
use crate::storage::TokenFile;
use crate::{ClientConfig, ClientError, ClientResult};

/// One API call: method, path relative to the base URL, optional JSON body
/// and extra headers that override the defaults.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<serde_json::Value>,
    pub headers: HeaderMap,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            headers: HeaderMap::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>, body: serde_json::Value) -> Self {
        Self::new(Method::POST, path).with_body(body)
    }

    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Add a header; replaces any default with the same name.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// HTTP client trait
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn send<T: DeserializeOwned>(&self, request: ApiRequest) -> ClientResult<T>;

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.send(ApiRequest::get(path)).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let body = serde_json::to_value(body)?;
        self.send(ApiRequest::post(path, body)).await
    }

    /// Token attached to the next request, if any
    fn token(&self) -> Option<String>;
}

/// Network HTTP client
#[derive(Debug, Clone)]
pub struct NetworkHttpClient {
    client: Client,
    base_url: String,
    token: Option<String>,
    token_file: Option<TokenFile>,
}

impl NetworkHttpClient {
    /// Create a new HTTP client from configuration
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
            token_file: config.token_path.clone().map(TokenFile::new),
        })
    }

    /// Base URL without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Set the bearer token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    fn headers(&self, request: &ApiRequest) -> ClientResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        if request.body.is_some() {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }
        if let Some(token) = self.token() {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| ClientError::InvalidRequest(format!("bearer token: {e}")))?;
            headers.insert(AUTHORIZATION, value);
        }
        for (name, value) in &request.headers {
            headers.insert(name.clone(), value.clone());
        }
        Ok(headers)
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> ClientResult<T> {
        let status = response.status();
        if !status.is_success() {
            // A body that cannot be read is treated like an empty one
            let text = response.text().await.unwrap_or_default();
            let message = error_message(status, &text);
            tracing::debug!(status = status.as_u16(), %message, "Request failed");
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }
}

/// Message for a failed response: JSON `error` field, then the status reason
/// phrase, then [`GENERIC_REQUEST_ERROR`].
pub fn error_message(status: StatusCode, body: &str) -> String {
    let from_body = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("error")
                .and_then(|e| e.as_str())
                .map(str::trim)
                .filter(|e| !e.is_empty())
                .map(str::to_string)
        });
    from_body
        .or_else(|| status.canonical_reason().map(str::to_string))
        .unwrap_or_else(|| GENERIC_REQUEST_ERROR.to_string())
}

#[async_trait]
impl HttpClient for NetworkHttpClient {
    async fn send<T: DeserializeOwned>(&self, request: ApiRequest) -> ClientResult<T> {
        let url = self.url(&request.path);
        let headers = self.headers(&request)?;
        let mut req = self.client.request(request.method.clone(), &url).headers(headers);
        if let Some(body) = &request.body {
            req = req.body(serde_json::to_vec(body)?);
        }
        tracing::debug!(method = %request.method, %url, "Sending request");
        let response = req.send().await?;
        self.handle_response(response).await
    }

    fn token(&self) -> Option<String> {
        self.token
            .clone()
            .filter(|t| !t.is_empty())
            .or_else(|| self.token_file.as_ref().and_then(TokenFile::load))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_error_message_precedence() {
        assert_eq!(
            error_message(StatusCode::BAD_REQUEST, r#"{"error":"Cart is stale"}"#),
            "Cart is stale"
        );
        assert_eq!(
            error_message(StatusCode::BAD_REQUEST, r#"{"error":""}"#),
            "Bad Request"
        );
        assert_eq!(error_message(StatusCode::BAD_GATEWAY, "<html>oops</html>"), "Bad Gateway");
        assert_eq!(
            error_message(StatusCode::from_u16(599).unwrap(), ""),
            GENERIC_REQUEST_ERROR
        );
    }

    #[test]
    fn test_url_joining() {
        let client = ClientConfig::new("http://localhost:4000/").build_http_client().unwrap();
        assert_eq!(client.url("/api/products"), "http://localhost:4000/api/products");
        assert_eq!(client.url("api/orders"), "http://localhost:4000/api/orders");
    }

    #[test]
    fn test_headers_defaults_and_overrides() {
        let client = ClientConfig::new("http://localhost:4000")
            .with_token("tok")
            .build_http_client()
            .unwrap();

        let plain = client.headers(&ApiRequest::get("/x")).unwrap();
        assert!(plain.get(CONTENT_TYPE).is_none());
        assert_eq!(plain.get(AUTHORIZATION).unwrap(), "Bearer tok");

        let request = ApiRequest::post("/x", serde_json::json!({}))
            .with_header(CONTENT_TYPE, HeaderValue::from_static("application/vnd.shop+json"));
        let headers = client.headers(&request).unwrap();
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/vnd.shop+json");
    }

    #[test]
    fn test_token_from_file_when_no_explicit_token() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("token");
        let client = ClientConfig::new("http://localhost:4000")
            .with_token_path(&path)
            .build_http_client()
            .unwrap();

        assert!(client.token().is_none());
        assert!(client.headers(&ApiRequest::get("/x")).unwrap().get(AUTHORIZATION).is_none());

        std::fs::write(&path, "file-token\n").unwrap();
        assert_eq!(client.token().as_deref(), Some("file-token"));

        let explicit = client.with_token("explicit");
        assert_eq!(explicit.token().as_deref(), Some("explicit"));
    }
}
