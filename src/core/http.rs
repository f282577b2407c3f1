//! One-shot HTTP round trips with a bounded timeout.

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder, Url};
use std::time::Duration;
use tracing::{debug, warn};

use super::error::{FinanceError, Result};

/// Issues a single request and returns the raw response body.
///
/// The timeout is set on the underlying client, so it bounds connecting,
/// waiting for headers and reading the body. The HTTP status is not
/// interpreted: SOAP services report faults with a 500 status and a
/// well-formed body, so the decision belongs to the caller's parser.
#[derive(Debug, Clone)]
pub struct RequestExecutor {
    client: Client,
    timeout: Duration,
}

impl RequestExecutor {
    /// Build an executor whose requests are bounded by `timeout`.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FinanceError::ServiceUnreachable(e.to_string()))?;
        Ok(Self { client, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// GET `url` and return the body bytes.
    pub async fn get(&self, url: Url) -> Result<Vec<u8>> {
        debug!(method = "GET", %url, timeout = ?self.timeout, "sending request");
        self.execute(self.client.get(url.clone()), &url).await
    }

    /// POST `body` to `url` with the given content type and return the body bytes.
    pub async fn post(&self, url: Url, content_type: &str, body: String) -> Result<Vec<u8>> {
        debug!(method = "POST", %url, timeout = ?self.timeout, "sending request");
        let request = self
            .client
            .post(url.clone())
            .header(CONTENT_TYPE, content_type)
            .body(body);
        self.execute(request, &url).await
    }

    async fn execute(&self, request: RequestBuilder, url: &Url) -> Result<Vec<u8>> {
        let resp = request.send().await.map_err(|e| {
            warn!(%url, error = %e, "service unreachable");
            FinanceError::ServiceUnreachable(e.to_string())
        })?;

        let status = resp.status();
        if !status.is_success() {
            warn!(%url, %status, "service answered with a non-success status");
        }

        let body = resp.bytes().await.map_err(|e| {
            if e.is_timeout() {
                warn!(%url, error = %e, "timed out reading response body");
                FinanceError::ServiceUnreachable(e.to_string())
            } else {
                FinanceError::ResponseRead(e.to_string())
            }
        })?;

        debug!(%url, %status, bytes = body.len(), "received response");
        Ok(body.to_vec())
    }
}

/// Parse a configured endpoint URL.
///
/// An unparseable URL can never be reached, so it reports as
/// [`FinanceError::ServiceUnreachable`] like any other transport failure.
pub fn parse_url(url: &str) -> Result<Url> {
    Url::parse(url).map_err(|e| FinanceError::ServiceUnreachable(format!("invalid URL '{url}': {e}")))
}
