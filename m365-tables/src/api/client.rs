//! Graph REST client with bearer injection and page iteration
//!
//! Transient failures (429, 502, 503, 504) are retried inside this client
//! with exponential backoff; the layer above never retries. Tables that
//! must observe every failure pass [`RetryConfig::disabled`].

use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

use super::auth::Session;
use super::error::{GraphError, GraphResult, decode_error_body};

/// Retry behavior for transient HTTP failures.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Total attempts, including the first. `1` means no retries.
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryConfig {
    /// No retries: every failure propagates on first occurrence.
    pub fn disabled() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::from_millis(0),
        }
    }
}

/// One page of an OData collection response.
#[derive(Debug, Deserialize)]
pub struct ODataPage<T> {
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,
    #[serde(rename = "@odata.nextLink")]
    pub next_link: Option<String>,
}

/// HTTP client for one connection's Graph API traffic.
#[derive(Clone)]
pub struct GraphClient {
    http: reqwest::Client,
    session: Arc<Session>,
    base_url: String,
    retry: RetryConfig,
}

impl GraphClient {
    /// `base_url` is the versioned API root, e.g.
    /// `https://graph.microsoft.com/v1.0`.
    pub fn new(
        http: reqwest::Client,
        session: Arc<Session>,
        base_url: impl Into<String>,
        retry: RetryConfig,
    ) -> Self {
        Self {
            http,
            session,
            base_url: base_url.into(),
            retry,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    fn url(&self, path_and_query: &str) -> String {
        // Continuation links come back absolute.
        if path_and_query.starts_with("http://") || path_and_query.starts_with("https://") {
            path_and_query.to_string()
        } else {
            format!("{}/{}", self.base_url, path_and_query.trim_start_matches('/'))
        }
    }

    /// GET a single resource or collection page, decoding into `T`.
    pub async fn get<T: DeserializeOwned>(&self, path_and_query: &str) -> GraphResult<T> {
        let response = self.send(path_and_query).await?;
        response.json().await.map_err(GraphError::from)
    }

    async fn send(&self, path_and_query: &str) -> GraphResult<reqwest::Response> {
        let url = self.url(path_and_query);
        let mut attempt = 0u32;
        let mut delay = self.retry.base_delay;

        loop {
            attempt += 1;
            let token = self.session.token().await?;
            log::debug!("GET {}", url);

            let response = self.http.get(&url).bearer_auth(&token).send().await?;
            let status = response.status();

            if status.is_success() {
                return Ok(response);
            }

            let transient = status == reqwest::StatusCode::TOO_MANY_REQUESTS
                || status == reqwest::StatusCode::BAD_GATEWAY
                || status == reqwest::StatusCode::SERVICE_UNAVAILABLE
                || status == reqwest::StatusCode::GATEWAY_TIMEOUT;

            if transient && attempt < self.retry.max_attempts {
                let wait = retry_after(&response).unwrap_or(delay);
                log::warn!(
                    "Transient error {} from Graph, retry {}/{} after {:?}",
                    status,
                    attempt,
                    self.retry.max_attempts - 1,
                    wait
                );
                tokio::time::sleep(wait).await;
                delay *= 2;
                continue;
            }

            let body = response.text().await.unwrap_or_default();
            return Err(decode_error_body(status.as_u16(), &body));
        }
    }

    /// Drive a paginated listing, handing each page's items to `on_page`.
    /// The callback returns `false` to stop early (row limit reached or the
    /// host wants no more rows); remaining pages are not fetched.
    pub async fn list_pages<T, F>(&self, first_path: &str, mut on_page: F) -> GraphResult<()>
    where
        T: DeserializeOwned,
        F: FnMut(Vec<T>) -> bool,
    {
        let mut next = first_path.to_string();
        loop {
            let page: ODataPage<T> = self.get(&next).await?;
            let more_wanted = on_page(page.value);
            match page.next_link {
                Some(link) if more_wanted => next = link,
                _ => return Ok(()),
            }
        }
    }
}

fn retry_after(response: &reqwest::Response) -> Option<Duration> {
    response
        .headers()
        .get("Retry-After")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Item {
        id: String,
    }

    #[test]
    fn page_with_continuation_parses() {
        let json = r#"{
            "value": [{"id": "1"}, {"id": "2"}],
            "@odata.nextLink": "https://graph.microsoft.com/v1.0/users?$skiptoken=abc"
        }"#;
        let page: ODataPage<Item> = serde_json::from_str(json).unwrap();
        assert_eq!(page.value.len(), 2);
        assert_eq!(page.value[0].id, "1");
        assert!(page.next_link.is_some());
    }

    #[test]
    fn final_page_has_no_continuation() {
        let json = r#"{"value": []}"#;
        let page: ODataPage<Item> = serde_json::from_str(json).unwrap();
        assert!(page.value.is_empty());
        assert!(page.next_link.is_none());
    }

    #[test]
    fn disabled_retry_makes_a_single_attempt() {
        let config = RetryConfig::disabled();
        assert_eq!(config.max_attempts, 1);
    }
}
