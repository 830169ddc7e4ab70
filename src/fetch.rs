//! Submission counts from an action's polling endpoint.

use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use url::Url;

use crate::{Error, Result, ServerConfig};

/// JSON pointer to the live submission count in a polling response.
const TOTAL_POINTER: &str = "/pgbar/pgbar_default/0";

/// HTTP client for `<action-url>/polling`. Cheap to clone; clones share the
/// connection pool.
#[derive(Debug, Clone)]
pub struct PollingClient {
    client: Client,
}

impl PollingClient {
    pub fn new(config: &ServerConfig) -> Result<Self> {
        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(ms) = config.fetch_timeout_ms {
            builder = builder.timeout(Duration::from_millis(ms));
        }
        let client = builder
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    /// Polling endpoint for an action URL: its path with `/polling` appended,
    /// without the query or fragment.
    pub fn polling_url(action_url: &Url) -> Url {
        let mut url = action_url.clone();
        let path = format!("{}/polling", action_url.path().trim_end_matches('/'));
        url.set_path(&path);
        url.set_query(None);
        url.set_fragment(None);
        url
    }

    /// Current submission count for `action_url`. A single attempt; any
    /// transport error, error status, or non-JSON body fails the fetch.
    ///
    /// `requested` is the URL as the caller wrote it and is what a failure
    /// reports back.
    pub async fn fetch_total(&self, action_url: &Url, requested: &str) -> Result<u64> {
        let polling_url = Self::polling_url(action_url);
        let failed = || Error::UpstreamFetch {
            url: requested.to_string(),
        };

        let resp = self
            .client
            .get(polling_url.clone())
            .send()
            .await
            .map_err(|e| {
                log::warn!("GET {} failed: {}", polling_url, e);
                failed()
            })?;

        let status = resp.status();
        if !status.is_success() {
            log::warn!("GET {} returned {}", polling_url, status);
            return Err(failed());
        }

        let body: Value = resp.json().await.map_err(|e| {
            log::warn!("GET {} did not return JSON: {}", polling_url, e);
            failed()
        })?;

        let total = extract_total(&body);
        log::debug!("{} reports {} submissions", polling_url, total);
        Ok(total)
    }
}

/// Read `pgbar.pgbar_default[0]`. Numbers and numeric strings are accepted;
/// anything missing, negative, or non-numeric counts as zero.
pub fn extract_total(body: &Value) -> u64 {
    let count = match body.pointer(TOTAL_POINTER) {
        Some(Value::Number(n)) => n.as_u64().or_else(|| n.as_f64().and_then(whole_count)),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok().and_then(whole_count),
        _ => None,
    };
    count.unwrap_or(0)
}

fn whole_count(n: f64) -> Option<u64> {
    (n.is_finite() && n > 0.0).then(|| n.trunc() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn polling_url_appends_segment() {
        let action = Url::parse("https://act.youngminds.org.uk/node/136").unwrap();
        assert_eq!(
            PollingClient::polling_url(&action).as_str(),
            "https://act.youngminds.org.uk/node/136/polling"
        );

        let action = Url::parse("https://act.example.org/node/7/?utm_source=mail#top").unwrap();
        assert_eq!(
            PollingClient::polling_url(&action).as_str(),
            "https://act.example.org/node/7/polling"
        );
    }

    #[test]
    fn extracts_numeric_total() {
        assert_eq!(extract_total(&json!({"pgbar": {"pgbar_default": [116]}})), 116);
        assert_eq!(extract_total(&json!({"pgbar": {"pgbar_default": [116.9, 3]}})), 116);
        assert_eq!(extract_total(&json!({"pgbar": {"pgbar_default": ["2048"]}})), 2048);
    }

    #[test]
    fn odd_shapes_count_as_zero() {
        assert_eq!(extract_total(&json!({})), 0);
        assert_eq!(extract_total(&json!([1, 2, 3])), 0);
        assert_eq!(extract_total(&json!(42)), 0);
        assert_eq!(extract_total(&json!({"pgbar": null})), 0);
        assert_eq!(extract_total(&json!({"pgbar": {"pgbar_default": []}})), 0);
        assert_eq!(extract_total(&json!({"pgbar": {"pgbar_default": [-5]}})), 0);
        assert_eq!(extract_total(&json!({"pgbar": {"pgbar_default": ["lots"]}})), 0);
        assert_eq!(extract_total(&json!({"pgbar": {"pgbar_default": [null]}})), 0);
    }

    #[tokio::test]
    async fn unreachable_endpoint_names_action_url() {
        let client = PollingClient::new(&ServerConfig::default()).unwrap();
        // port 9 (discard) on loopback is closed in test environments
        let action = Url::parse("http://127.0.0.1:9/node/1").unwrap();
        match client.fetch_total(&action, "http://127.0.0.1:9/node/1").await {
            Err(Error::UpstreamFetch { url }) => assert_eq!(url, "http://127.0.0.1:9/node/1"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn failure_reports_url_as_written() {
        let client = PollingClient::new(&ServerConfig::default()).unwrap();
        let requested = "http://LOCALHOST:9/node/1";
        let action = Url::parse(requested).unwrap();
        assert_eq!(action.as_str(), "http://localhost:9/node/1");
        match client.fetch_total(&action, requested).await {
            Err(err @ Error::UpstreamFetch { .. }) => {
                assert!(err.public_message().contains("http://LOCALHOST:9/node/1"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
