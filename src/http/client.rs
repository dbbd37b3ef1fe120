//! Generic JSON client over a single base URL.

use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Errors from the HTTP client.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Unknown verb string, rejected before any network I/O.
    #[error("invalid http method: {0}")]
    InvalidMethod(String),

    /// Network, status, or decode failure from the underlying transport.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

/// Thin request/response mediator scoped to one base URL.
///
/// Failures propagate unchanged to the caller; there is no retry and no
/// timeout beyond the transport's own default.
pub struct HttpClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpClient {
    /// Create a client for the given base URL. A trailing slash is
    /// normalized away.
    pub fn new(base_url: &str) -> Self {
        let base_url = base_url.strip_suffix('/').unwrap_or(base_url).to_string();
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    /// Resolve the final URL for a request path.
    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, if path == "/" { "" } else { path })
    }

    /// Dispatch a request by verb name. Unknown verbs fail here, before
    /// any network I/O. Non-2xx responses surface as errors.
    pub async fn request<T: Serialize + ?Sized>(
        &self,
        method: &str,
        path: &str,
        body: Option<&T>,
    ) -> Result<Value, HttpError> {
        let method = match method.to_ascii_lowercase().as_str() {
            "get" => Method::GET,
            "post" => Method::POST,
            "put" => Method::PUT,
            "patch" => Method::PATCH,
            "delete" => Method::DELETE,
            other => return Err(HttpError::InvalidMethod(other.to_string())),
        };

        let mut request = self.client.request(method, self.endpoint(path));
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?.error_for_status()?;
        Ok(response.json().await?)
    }

    pub async fn get(&self, path: &str) -> Result<Value, HttpError> {
        self.request::<Value>("get", path, None).await
    }

    pub async fn post<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<Value, HttpError> {
        self.request("post", path, Some(body)).await
    }

    pub async fn put<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<Value, HttpError> {
        self.request("put", path, Some(body)).await
    }

    pub async fn patch<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<Value, HttpError> {
        self.request("patch", path, Some(body)).await
    }

    /// DELETE carries no body.
    pub async fn delete(&self, path: &str) -> Result<Value, HttpError> {
        self.request::<Value>("delete", path, None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_normalized() {
        let client = HttpClient::new("http://x/");
        assert_eq!(client.base_url, "http://x");
    }

    #[test]
    fn root_path_targets_base_with_slash() {
        let client = HttpClient::new("http://x/");
        assert_eq!(client.endpoint("/"), "http://x/");
    }

    #[test]
    fn relative_path_is_appended() {
        let client = HttpClient::new("http://x");
        assert_eq!(client.endpoint("users"), "http://x/users");
    }

    #[tokio::test]
    async fn unknown_verb_fails_before_any_network_io() {
        // Unroutable base: an attempted connection would error differently.
        let client = HttpClient::new("http://192.0.2.1:9");

        let result = client.request::<Value>("foo", "/", None).await;

        assert!(matches!(result, Err(HttpError::InvalidMethod(m)) if m == "foo"));
    }
}
