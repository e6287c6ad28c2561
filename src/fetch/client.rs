//! Leaderboard page sources
//!
//! `PageSource` is the seam between the pagination loop and the network; the
//! production implementation talks to the league endpoint over reqwest.

use crate::config::ApiSettings;
use crate::error::{LeaderboardError, Result};
use crate::types::{Entry, PageResponse};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use tracing::debug;

/// Pagination token taken from the last fetched entry's rating
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cursor {
    pub rating: f64,
}

impl Cursor {
    pub fn new(rating: f64) -> Self {
        Self { rating }
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // sub-sort keys are always zero
        write!(f, "{}:0:0", self.rating)
    }
}

/// Trait for fetching one page of leaderboard entries
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch the page after `cursor`, or the first page when `None`
    async fn fetch_page(&self, cursor: Option<Cursor>) -> Result<Vec<Entry>>;
}

/// HTTP page source for the league leaderboard endpoint
#[derive(Debug, Clone)]
pub struct HttpPageSource {
    client: Client,
    endpoint: String,
    page_limit: u32,
}

impl HttpPageSource {
    /// Build a client carrying the static session headers
    pub fn new(settings: &ApiSettings, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "X-Session-ID",
            HeaderValue::from_str(&settings.session_id).map_err(|e| {
                LeaderboardError::RequestFailed {
                    message: format!("Invalid session id header: {}", e),
                }
            })?,
        );
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&settings.user_agent).map_err(|e| {
                LeaderboardError::RequestFailed {
                    message: format!("Invalid user agent header: {}", e),
                }
            })?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| LeaderboardError::RequestFailed {
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            endpoint: settings.endpoint.clone(),
            page_limit: settings.page_limit,
        })
    }

    /// Request URL for a page
    pub fn page_url(&self, cursor: Option<Cursor>) -> String {
        page_url(&self.endpoint, self.page_limit, cursor)
    }
}

/// Build `<endpoint>?limit=<n>[&after=<tr>:0:0]`
pub fn page_url(endpoint: &str, page_limit: u32, cursor: Option<Cursor>) -> String {
    let mut url = format!("{}?limit={}", endpoint, page_limit);
    if let Some(cursor) = cursor {
        url.push_str(&format!("&after={}", cursor));
    }
    url
}

/// Turn a decoded response body into the page entries or a rejection
pub fn entries_from_response(response: PageResponse) -> Result<Vec<Entry>> {
    if !response.success {
        let error = match response.error {
            Some(Value::String(message)) => message,
            Some(other) => other.to_string(),
            None => "undefined".to_string(),
        };
        return Err(LeaderboardError::ApiRejected { error }.into());
    }

    match response.data {
        Some(data) => Ok(data.entries),
        None => Err(LeaderboardError::RequestFailed {
            message: "Successful response carried no data".to_string(),
        }
        .into()),
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    async fn fetch_page(&self, cursor: Option<Cursor>) -> Result<Vec<Entry>> {
        let url = self.page_url(cursor);
        debug!("GET {}", url);

        let response =
            self.client
                .get(&url)
                .send()
                .await
                .map_err(|e| LeaderboardError::RequestFailed {
                    message: format!("GET {} failed: {}", url, e),
                })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(LeaderboardError::HttpStatus {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("").to_string(),
            }
            .into());
        }

        let body: PageResponse =
            response
                .json()
                .await
                .map_err(|e| LeaderboardError::RequestFailed {
                    message: format!("Failed to decode page body: {}", e),
                })?;

        entries_from_response(body)
    }
}
