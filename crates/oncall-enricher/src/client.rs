//! HTTP client for the On-call enricher search endpoint.

use std::time::Duration;

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::EnricherError;

/// Query parameter carrying the search term.
const SEARCH_TERM_PARAM: &str = "search_term";

/// Thin client for `GET {enricher_url}?search_term=...`.
#[derive(Debug, Clone)]
pub struct EnricherClient {
    client: reqwest::Client,
}

impl EnricherClient {
    /// Create a client using reqwest's default timeout behaviour.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Create a client with an explicit request timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, EnricherError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// Ask the enricher about `search_term`, returning `data.result` from the response.
    ///
    /// Missing `data` or `result` fields, or a `result` that is not a string,
    /// yield an empty answer. A non-2xx status, a transport failure or a body
    /// that is not JSON is an error; nothing is retried.
    pub async fn search(
        &self,
        enricher_url: &str,
        search_term: &str,
    ) -> Result<String, EnricherError> {
        let response = self
            .client
            .get(enricher_url)
            .query(&[(SEARCH_TERM_PARAM, search_term)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let url = response.url().to_string();
            warn!(status = %status, url = %url, "On-call enricher request failed");
            return Err(EnricherError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.bytes().await?;
        let body: Value = serde_json::from_slice(&body)?;

        debug!(response = %body, "Response from On-call enricher");

        Ok(extract_result(&body))
    }
}

impl Default for EnricherClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Pull `data.result` out of an enricher response.
fn extract_result(body: &Value) -> String {
    body.pointer("/data/result")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_result() {
        assert_eq!(
            extract_result(&json!({"data": {"result": "Check the node disk pressure"}})),
            "Check the node disk pressure"
        );
    }

    #[test]
    fn test_extract_result_defaults_to_empty() {
        assert_eq!(extract_result(&json!({"data": {}})), "");
        assert_eq!(extract_result(&json!({})), "");
        assert_eq!(extract_result(&json!({"data": null})), "");
        assert_eq!(extract_result(&json!({"data": {"result": null}})), "");
    }

    #[test]
    fn test_extract_non_string_result_is_empty() {
        assert_eq!(extract_result(&json!({"data": {"result": 42}})), "");
        assert_eq!(extract_result(&json!({"data": {"result": ["a", "b"]}})), "");
    }
}
