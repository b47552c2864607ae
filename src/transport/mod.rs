//! One-shot HTTP requests.
//!
//! [`Transport`] is the seam between the fetch protocol and the network.
//! [`HttpTransport`] is the reqwest-backed implementation; tests plug in
//! their own. Decorators such as [`RetryingTransport`] wrap any
//! implementation.

pub mod retry;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tracing::debug;

use crate::telemetry;
use crate::{HuginnError, Result};

pub use retry::{RetryConfig, RetryingTransport};

/// Performs a single GET request and returns the response body.
///
/// Headers are literal `"Name: value"` strings. Any failure (connection,
/// timeout, non-2xx status) is a network error; implementations must not
/// retry on their own.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn request(&self, url: &str, headers: &[String]) -> Result<String>;
}

/// reqwest-backed [`Transport`].
#[derive(Clone)]
pub struct HttpTransport {
    http: Client,
}

impl HttpTransport {
    /// Create a transport with the given request timeout and user agent.
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| HuginnError::Configuration(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http })
    }

    /// Wrap an existing reqwest client.
    pub fn with_client(http: Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn request(&self, url: &str, headers: &[String]) -> Result<String> {
        let header_map = parse_headers(headers)?;
        debug!(url, headers = headers.len(), "sending request");

        let result = send(&self.http, url, header_map).await;
        let status = if result.is_ok() { "ok" } else { "error" };
        metrics::counter!(telemetry::TRANSPORT_REQUESTS_TOTAL, "status" => status).increment(1);
        result
    }
}

async fn send(http: &Client, url: &str, headers: HeaderMap) -> Result<String> {
    let response = http
        .get(url)
        .headers(headers)
        .send()
        .await
        .map_err(|e| HuginnError::Http(e.to_string()))?;

    check_status(&response)?;

    response
        .text()
        .await
        .map_err(|e| HuginnError::Http(format!("failed to read response body: {e}")))
}

fn check_status(response: &reqwest::Response) -> Result<()> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }

    match status.as_u16() {
        429 => {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.trim().parse::<u64>().ok())
                .map(Duration::from_secs);
            Err(HuginnError::RateLimited { retry_after })
        }
        code => Err(HuginnError::Api {
            status: code,
            message: format!("{} returned {status}", response.url()),
        }),
    }
}

/// Turn `"Name: value"` strings into a header map.
pub fn parse_headers(headers: &[String]) -> Result<HeaderMap> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for line in headers {
        let (name, value) = line
            .split_once(':')
            .ok_or_else(|| HuginnError::Configuration(format!("malformed header {line:?}")))?;
        let name = HeaderName::from_bytes(name.trim().as_bytes())
            .map_err(|e| HuginnError::Configuration(format!("invalid header name in {line:?}: {e}")))?;
        let value = HeaderValue::from_str(value.trim()).map_err(|e| {
            HuginnError::Configuration(format!("invalid header value in {line:?}: {e}"))
        })?;
        map.append(name, value);
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_name_value_headers() {
        let map = parse_headers(&[
            "User-Agent: huginn-test".to_string(),
            "Accept: application/json".to_string(),
        ])
        .unwrap();
        assert_eq!(map.get("user-agent").unwrap(), "huginn-test");
        assert_eq!(map.get("accept").unwrap(), "application/json");
    }

    #[test]
    fn value_may_contain_colons() {
        let map = parse_headers(&["Referer: http://example.com:8080/x".to_string()]).unwrap();
        assert_eq!(map.get("referer").unwrap(), "http://example.com:8080/x");
    }

    #[test]
    fn header_without_colon_rejected() {
        let err = parse_headers(&["NoColonHere".to_string()]).unwrap_err();
        assert!(matches!(err, HuginnError::Configuration(_)));
    }

    #[test]
    fn empty_headers_ok() {
        assert!(parse_headers(&[]).unwrap().is_empty());
    }
}
