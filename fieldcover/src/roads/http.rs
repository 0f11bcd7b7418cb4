//! HTTP client abstraction for testability

use std::future::Future;
use std::time::Duration;

use super::types::RoadDataError;

/// Default request timeout in seconds.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Trait for async HTTP operations used to fetch road data.
///
/// Allows the Overpass source to be tested with a mock client.
pub trait AsyncHttpClient: Send + Sync {
    /// Performs an HTTP POST with a plain-text body.
    ///
    /// Returns the response body on a success status.
    fn post(
        &self,
        url: &str,
        body: String,
    ) -> impl Future<Output = Result<Vec<u8>, RoadDataError>> + Send;
}

/// Real async HTTP client implementation using reqwest.
#[derive(Clone)]
pub struct AsyncReqwestClient {
    client: reqwest::Client,
    timeout_secs: u64,
}

impl AsyncReqwestClient {
    /// Creates a new client with the default timeout.
    pub fn new() -> Result<Self, RoadDataError> {
        Self::with_timeout(DEFAULT_HTTP_TIMEOUT_SECS)
    }

    /// Creates a new client with a custom timeout.
    pub fn with_timeout(timeout_secs: u64) -> Result<Self, RoadDataError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(concat!("fieldcover/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RoadDataError::Http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            timeout_secs,
        })
    }

    fn map_error(&self, e: reqwest::Error) -> RoadDataError {
        if e.is_timeout() {
            RoadDataError::Timeout {
                timeout_secs: self.timeout_secs,
            }
        } else {
            RoadDataError::Http(format!("Request failed: {}", e))
        }
    }
}

impl AsyncHttpClient for AsyncReqwestClient {
    async fn post(&self, url: &str, body: String) -> Result<Vec<u8>, RoadDataError> {
        let response = self
            .client
            .post(url)
            .body(body)
            .send()
            .await
            .map_err(|e| self.map_error(e))?;

        // Check HTTP status
        let status = response.status();
        if !status.is_success() {
            return Err(RoadDataError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        response
            .bytes()
            .await
            .map(|b| b.to_vec())
            .map_err(|e| self.map_error(e))
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use parking_lot::Mutex;

    /// Mock async HTTP client for testing.
    ///
    /// Returns a fixed response and records every request body.
    pub struct MockAsyncHttpClient {
        pub response: Result<Vec<u8>, RoadDataError>,
        pub requests: Mutex<Vec<(String, String)>>,
    }

    impl MockAsyncHttpClient {
        pub fn ok(body: impl Into<Vec<u8>>) -> Self {
            Self {
                response: Ok(body.into()),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn err(error: RoadDataError) -> Self {
            Self {
                response: Err(error),
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    impl AsyncHttpClient for MockAsyncHttpClient {
        async fn post(&self, url: &str, body: String) -> Result<Vec<u8>, RoadDataError> {
            self.requests.lock().push((url.to_string(), body));
            self.response.clone()
        }
    }

    #[tokio::test]
    async fn test_mock_client_success() {
        let mock = MockAsyncHttpClient::ok(b"{}".to_vec());
        let result = mock.post("http://example.com", "query".to_string()).await;
        assert_eq!(result.unwrap(), b"{}".to_vec());

        let requests = mock.requests.lock();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].1, "query");
    }

    #[tokio::test]
    async fn test_mock_client_error() {
        let mock = MockAsyncHttpClient::err(RoadDataError::Http("Test error".to_string()));
        let result = mock.post("http://example.com", String::new()).await;
        assert!(matches!(result, Err(RoadDataError::Http(_))));
    }

    #[test]
    fn test_reqwest_client_builds() {
        let client = AsyncReqwestClient::with_timeout(5).unwrap();
        assert_eq!(client.timeout_secs, 5);
    }
}
