//! ArenaTicket API client implementation

use crate::error::{ApiError, Result};
use crate::messages::normalize_error;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

/// Base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api/v1";

/// Environment variable holding the API base URL.
pub const BASE_URL_ENV: &str = "ARENATICKET_API_BASE_URL";

/// Supplies the bearer token for outgoing requests.
///
/// The session layer implements this; the client reads the token on every
/// request so that login and logout take effect immediately.
pub trait TokenSource: Send + Sync {
    /// Current token, or `None` when nobody is signed in
    fn bearer_token(&self) -> Option<String>;
}

/// A fixed token, mostly for scripts and tests.
#[derive(Debug, Clone)]
pub struct StaticToken(pub String);

impl TokenSource for StaticToken {
    fn bearer_token(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

/// ArenaTicket API client
///
/// Every call is a single HTTP exchange: no retries, no timeouts beyond the
/// transport's own. Non-2xx answers become [`ApiError::RequestFailed`] with
/// an operator-facing message.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    tokens: Option<Arc<dyn TokenSource>>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("authenticated", &self.current_token().is_some())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client for `base_url` (trailing slashes are dropped)
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: Client::new(),
            base_url,
            tokens: None,
        }
    }

    /// Create a client from `ARENATICKET_API_BASE_URL`, falling back to
    /// [`DEFAULT_BASE_URL`]
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(std::env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()))
    }

    /// Attach the token source used for the `Authorization` header
    #[must_use]
    pub fn with_token_source(mut self, tokens: Arc<dyn TokenSource>) -> Self {
        self.tokens = Some(tokens);
        self
    }

    /// Configured base URL
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Token that the next request would carry
    #[must_use]
    pub fn current_token(&self) -> Option<String> {
        self.tokens.as_ref().and_then(|tokens| tokens.bearer_token())
    }

    /// GET `path` and decode the JSON body
    ///
    /// # Errors
    ///
    /// [`ApiError::RequestFailed`] for non-2xx answers, [`ApiError::Transport`]
    /// when no answer arrived, [`ApiError::Protocol`] for a missing or
    /// malformed body.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let request = self.json_request(Method::GET, path);
        expect_body(self.execute(request, path).await?)
    }

    /// GET `path` with query parameters; `None` values are left out
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::get`].
    pub async fn get_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, Option<String>)],
    ) -> Result<T> {
        let present: Vec<(&str, &str)> = query
            .iter()
            .filter_map(|(key, value)| value.as_deref().map(|value| (*key, value)))
            .collect();
        let request = self.json_request(Method::GET, path).query(&present);
        expect_body(self.execute(request, path).await?)
    }

    /// POST a JSON body and decode the answer
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::get`].
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.json_request(Method::POST, path).json(body);
        expect_body(self.execute(request, path).await?)
    }

    /// POST without a body; the answer body is optional
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::get`], except that an empty answer is `Ok(None)`.
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
        let request = self.json_request(Method::POST, path);
        self.execute(request, path).await
    }

    /// PUT a JSON body and decode the answer
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::get`].
    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.json_request(Method::PUT, path).json(body);
        expect_body(self.execute(request, path).await?)
    }

    /// PATCH without a body; the answer body is optional
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::post_empty`].
    pub async fn patch_empty<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
        let request = self.json_request(Method::PATCH, path);
        self.execute(request, path).await
    }

    /// DELETE `path`; any answer body is ignored
    ///
    /// # Errors
    ///
    /// [`ApiError::RequestFailed`] for non-2xx answers, [`ApiError::Transport`]
    /// when no answer arrived.
    pub async fn delete(&self, path: &str) -> Result<()> {
        let request = self.json_request(Method::DELETE, path);
        self.execute::<serde::de::IgnoredAny>(request, path).await?;
        Ok(())
    }

    /// Multipart POST of a single file under `field`
    ///
    /// The multipart boundary sets its own content type, so only
    /// `Accept` and `Authorization` are added.
    ///
    /// # Errors
    ///
    /// [`ApiError::Protocol`] for an unusable MIME type, otherwise the same as
    /// [`ApiClient::get`].
    pub async fn upload<T: DeserializeOwned>(
        &self,
        path: &str,
        field: &str,
        file_name: &str,
        bytes: Vec<u8>,
        mime: &str,
    ) -> Result<T> {
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(mime)
            .map_err(|e| ApiError::Protocol(format!("invalid MIME type {mime}: {e}")))?;
        let form = reqwest::multipart::Form::new().part(field.to_string(), part);

        let request = self
            .authorized(self.http.post(self.url(path)))
            .header(ACCEPT, "application/json")
            .multipart(form);
        expect_body(self.execute(request, path).await?)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn json_request(&self, method: Method, path: &str) -> RequestBuilder {
        let request = self
            .http
            .request(method, self.url(path))
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json");
        self.authorized(request)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match self.current_token() {
            Some(token) => request.header(AUTHORIZATION, format!("Bearer {token}")),
            None => request,
        }
    }

    /// Send the request and decode a possibly empty 2xx body
    async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        path: &str,
    ) -> Result<Option<T>> {
        tracing::debug!(path, "API request");

        let response = request.send().await.map_err(|e| {
            tracing::warn!(path, error = %e, "API request failed before a response arrived");
            ApiError::Transport(e.to_string())
        })?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(ApiError::from)?;

        if !status.is_success() {
            let error = normalize_error(status.as_u16(), &String::from_utf8_lossy(&bytes));
            tracing::warn!(path, status = status.as_u16(), error = %error, "API request rejected");
            return Err(error);
        }

        if status == StatusCode::NO_CONTENT || bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }

        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| ApiError::Protocol(format!("{path}: {e}")))
    }
}

fn expect_body<T>(body: Option<T>) -> Result<T> {
    body.ok_or_else(|| ApiError::Protocol("empty response body".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoToken;

    impl TokenSource for NoToken {
        fn bearer_token(&self) -> Option<String> {
            None
        }
    }

    #[test]
    fn trailing_slash_is_dropped() {
        let client = ApiClient::new("http://arena.local/api/v1/");
        assert_eq!(client.base_url(), "http://arena.local/api/v1");
        assert_eq!(client.url("/admin/eventos"), "http://arena.local/api/v1/admin/eventos");
    }

    #[test]
    fn token_is_read_from_source() {
        let client = ApiClient::new(DEFAULT_BASE_URL);
        assert_eq!(client.current_token(), None);

        let client = client.with_token_source(Arc::new(StaticToken("abc".into())));
        assert_eq!(client.current_token().as_deref(), Some("abc"));

        let client = ApiClient::new(DEFAULT_BASE_URL).with_token_source(Arc::new(NoToken));
        assert_eq!(client.current_token(), None);
    }

    #[test]
    fn empty_body_is_a_protocol_error_when_required() {
        let result: Result<u8> = expect_body(None);
        assert!(matches!(result, Err(ApiError::Protocol(_))));
    }
}
