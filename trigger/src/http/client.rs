//! Dashboard HTTP client

use std::time::Duration;

use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::{Client, Response};

use crate::errors::{FailedResponse, TriggerError};

/// Request header carrying the CSRF token on every protected call.
pub(crate) const CSRF_HEADER: &str = "x-csrftoken";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for the ZaneOps dashboard API.
pub struct DashboardClient {
    client: Client,
    base_url: String,
    extra_headers: HeaderMap,
}

impl DashboardClient {
    /// Create a new dashboard client.
    ///
    /// Extra headers are merged into every authenticated request; the
    /// unauthenticated CSRF fetch goes out bare.
    pub fn new(base_url: &str, extra_headers: HeaderMap) -> Result<Self, TriggerError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            extra_headers,
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub(crate) fn http(&self) -> &Client {
        &self.client
    }

    pub(crate) fn extra_headers(&self) -> HeaderMap {
        self.extra_headers.clone()
    }
}

/// Capture the status and body of a failed response for reporting.
pub(crate) async fn failed_response(response: Response) -> FailedResponse {
    let status = response.status();
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string());
    let body = response.text().await.unwrap_or_default();
    FailedResponse {
        status,
        content_type,
        body,
    }
}
