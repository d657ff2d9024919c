//! Synthesized fallback responses and the timed API fetch.
//!
//! Every response produced here is a stand-in the router returns when the
//! network cannot: the empty image placeholder, the plain-text offline page
//! for other static assets, and the offline JSON body for API calls.

use std::time::Duration;

use bridge_traits::fetch::{FetchRequest, FetchResponse, Fetcher};
use bytes::Bytes;

use crate::error::{Result, RouterError};

/// Empty 200 placeholder for an image that could not be fetched.
pub(crate) fn empty_image_response() -> FetchResponse {
    FetchResponse::new(200, Bytes::new())
}

/// Plain 503 for non-image static assets under total failure.
pub(crate) fn offline_text_response() -> FetchResponse {
    FetchResponse::new(503, Bytes::from_static(b"Offline"))
        .status_text("Service Unavailable")
}

/// 503 JSON body for API calls that cannot reach the network and have no
/// cached copy.
pub(crate) fn offline_api_response() -> FetchResponse {
    let body = serde_json::json!({
        "error": "Offline",
        "message": "This feature requires an internet connection",
    });
    FetchResponse::new(503, Bytes::from(body.to_string()))
        .status_text("Service Unavailable")
        .header("Content-Type", "application/json")
}

/// Races a live fetch against `limit`.
///
/// If the fetch loses the race its future is dropped, which drops the
/// in-flight request with it; the late result cannot arrive afterwards.
pub(crate) async fn fetch_with_timeout(
    fetcher: &dyn Fetcher,
    request: FetchRequest,
    limit: Duration,
) -> Result<FetchResponse> {
    match tokio::time::timeout(limit, fetcher.fetch(request)).await {
        Ok(Ok(response)) => Ok(response),
        Ok(Err(error)) => Err(RouterError::Bridge(error)),
        Err(_) => Err(RouterError::Timeout(limit)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::error::{BridgeError, Result as BridgeResult};
    use mockall::mock;

    mock! {
        pub NetFetcher {}

        #[async_trait::async_trait]
        impl Fetcher for NetFetcher {
            async fn fetch(&self, request: FetchRequest) -> BridgeResult<FetchResponse>;
            async fn is_connected(&self) -> bool;
        }
    }

    /// Fetcher that stalls longer than any test timeout before answering.
    struct StalledFetcher;

    #[async_trait::async_trait]
    impl Fetcher for StalledFetcher {
        async fn fetch(&self, _request: FetchRequest) -> BridgeResult<FetchResponse> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(FetchResponse::new(200, Bytes::from_static(b"late")))
        }
    }

    #[test]
    fn test_empty_image_response() {
        let response = empty_image_response();
        assert_eq!(response.status, 200);
        assert!(response.body.is_empty());
    }

    #[test]
    fn test_offline_text_response() {
        let response = offline_text_response();
        assert_eq!(response.status, 503);
        assert_eq!(response.status_text, "Service Unavailable");
        assert_eq!(response.text().unwrap(), "Offline");
    }

    #[test]
    fn test_offline_api_response() {
        let response = offline_api_response();
        assert_eq!(response.status, 503);
        assert_eq!(
            response.headers.get("Content-Type"),
            Some(&"application/json".to_string())
        );

        let body: serde_json::Value = response.json().unwrap();
        assert_eq!(body["error"], "Offline");
        assert_eq!(
            body["message"],
            "This feature requires an internet connection"
        );
    }

    #[tokio::test]
    async fn test_fast_fetch_wins_the_race() {
        let mut fetcher = MockNetFetcher::new();
        fetcher
            .expect_fetch()
            .returning(|_| Ok(FetchResponse::new(200, Bytes::from_static(b"live"))));

        let response = fetch_with_timeout(
            &fetcher,
            FetchRequest::get("https://api.example/v1/status"),
            Duration::from_secs(1),
        )
        .await
        .unwrap();

        assert_eq!(response.body, Bytes::from_static(b"live"));
    }

    #[tokio::test]
    async fn test_fetch_error_passes_through() {
        let mut fetcher = MockNetFetcher::new();
        fetcher
            .expect_fetch()
            .returning(|_| Err(BridgeError::Network("connection refused".to_string())));

        let result = fetch_with_timeout(
            &fetcher,
            FetchRequest::get("https://api.example/v1/status"),
            Duration::from_secs(1),
        )
        .await;

        assert!(matches!(result, Err(RouterError::Bridge(_))));
    }

    #[tokio::test]
    async fn test_slow_fetch_loses_the_race() {
        let result = fetch_with_timeout(
            &StalledFetcher,
            FetchRequest::get("https://api.example/v1/status"),
            Duration::from_millis(20),
        )
        .await;

        assert!(matches!(result, Err(RouterError::Timeout(_))));
    }
}
