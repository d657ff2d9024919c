//! Network Fetch Abstraction
//!
//! Request/response value types and the live-fetch capability the host must
//! provide for intercepted requests.

use async_trait::async_trait;
use bytes::Bytes;
use serde::de::DeserializeOwned;
use std::collections::HashMap;

use crate::error::{BridgeError, Result};

/// HTTP method types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
        }
    }

    /// Whether responses to this method may be stored in a cache namespace.
    pub fn is_cacheable(&self) -> bool {
        matches!(self, HttpMethod::Get)
    }
}

/// How the request was initiated, mirroring the platform request mode.
///
/// `Navigate` marks a top-level page load; everything else is a subresource
/// or programmatic request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestMode {
    Navigate,
    SameOrigin,
    NoCors,
    #[default]
    Cors,
}

/// What kind of resource the request is for.
///
/// Drives graceful degradation: image requests that fail completely get an
/// empty placeholder response instead of an error page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestDestination {
    Document,
    Style,
    Script,
    Image,
    Font,
    Manifest,
    Audio,
    Video,
    Worker,
    #[default]
    Empty,
}

/// An intercepted outgoing request.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: HashMap<String, String>,
    pub body: Option<Bytes>,
    pub mode: RequestMode,
    pub destination: RequestDestination,
}

impl FetchRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HashMap::new(),
            body: None,
            mode: RequestMode::default(),
            destination: RequestDestination::default(),
        }
    }

    /// Shorthand for a plain GET subresource request.
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    /// Shorthand for a top-level navigation request.
    pub fn navigation(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url)
            .mode(RequestMode::Navigate)
            .destination(RequestDestination::Document)
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn mode(mut self, mode: RequestMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn destination(mut self, destination: RequestDestination) -> Self {
        self.destination = destination;
        self
    }

    pub fn body(mut self, body: Bytes) -> Self {
        self.body = Some(body);
        self
    }

    /// Whether this is a top-level page load.
    pub fn is_navigation(&self) -> bool {
        self.mode == RequestMode::Navigate
    }
}

/// A captured response, either live from the network or synthesized.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub status: u16,
    pub status_text: String,
    pub headers: HashMap<String, String>,
    pub body: Bytes,
}

impl FetchResponse {
    pub fn new(status: u16, body: Bytes) -> Self {
        Self {
            status,
            status_text: default_status_text(status).to_string(),
            headers: HashMap::new(),
            body,
        }
    }

    pub fn status_text(mut self, text: impl Into<String>) -> Self {
        self.status_text = text.into();
        self
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Parse response body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(|e| {
            BridgeError::OperationFailed(format!("JSON deserialization failed: {}", e))
        })
    }

    /// Get response body as UTF-8 string
    pub fn text(&self) -> Result<String> {
        String::from_utf8(self.body.to_vec())
            .map_err(|e| BridgeError::OperationFailed(format!("Invalid UTF-8: {}", e)))
    }

    /// Check if response status is successful (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Check if response status indicates a client error (4xx)
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status)
    }

    /// Check if response status indicates a server error (5xx)
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status)
    }
}

fn default_status_text(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        301 => "Moved Permanently",
        302 => "Found",
        304 => "Not Modified",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        _ => "",
    }
}

/// Live network fetch trait
///
/// The host supplies the actual network stack behind this trait. The router
/// never talks to the network directly; every live fetch, including install
/// precaching, goes through here.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::fetch::{Fetcher, FetchRequest};
///
/// async fn load(fetcher: &dyn Fetcher) -> Result<String> {
///     let response = fetcher.fetch(FetchRequest::get("https://example.com/app.js")).await?;
///     response.text()
/// }
/// ```
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Perform a live network fetch
    ///
    /// # Errors
    ///
    /// Returns an error if the request could not produce a response at all
    /// (connection refused, DNS failure, offline). A response with a non-2xx
    /// status is a successful fetch, not an error.
    async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse>;

    /// Check network connectivity
    async fn is_connected(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let request = FetchRequest::get("https://example.com/styles.css")
            .header("Accept", "text/css")
            .destination(RequestDestination::Style);

        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(request.url, "https://example.com/styles.css");
        assert_eq!(request.headers.get("Accept"), Some(&"text/css".to_string()));
        assert_eq!(request.destination, RequestDestination::Style);
        assert!(!request.is_navigation());
    }

    #[test]
    fn test_navigation_request() {
        let request = FetchRequest::navigation("https://example.com/");

        assert!(request.is_navigation());
        assert_eq!(request.destination, RequestDestination::Document);
    }

    #[test]
    fn test_only_get_is_cacheable() {
        assert!(HttpMethod::Get.is_cacheable());
        assert!(!HttpMethod::Post.is_cacheable());
        assert!(!HttpMethod::Delete.is_cacheable());
    }

    #[test]
    fn test_response_status_checks() {
        let response = FetchResponse::new(200, Bytes::from_static(b"ok"));
        assert!(response.is_success());
        assert!(!response.is_client_error());
        assert!(!response.is_server_error());
        assert_eq!(response.status_text, "OK");

        let offline = FetchResponse::new(503, Bytes::new());
        assert!(offline.is_server_error());
        assert_eq!(offline.status_text, "Service Unavailable");
    }

    #[test]
    fn test_response_json() {
        let response = FetchResponse::new(200, Bytes::from_static(b"{\"count\":3}"));
        let value: serde_json::Value = response.json().unwrap();
        assert_eq!(value["count"], 3);
    }
}
