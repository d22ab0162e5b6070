//! HTTP client for the YouTube Data API v3

use crate::core::models::{ChannelRecord, CommentThread, VideoRecord};
use crate::error::PulseError;
use crate::platform::data_api::{ErrorResponse, ListResponse, PlaylistItem, SearchResult};
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use reqwest::{Client, ClientBuilder};
use serde::de::DeserializeOwned;
use std::num::NonZeroU32;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Public Data API endpoint
pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

/// Largest `maxResults` accepted by `playlistItems.list` and `search.list`
pub const MAX_PAGE_SIZE: u32 = 50;

/// Largest number of ids accepted by one `videos.list` call
pub const MAX_IDS_PER_BATCH: usize = 50;

/// Largest `maxResults` accepted by `commentThreads.list`
pub const MAX_COMMENTS_PER_CALL: u32 = 100;

/// Data API client configuration
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    /// API root, without trailing slash
    pub base_url: String,
    /// Transport-level timeout for one request
    pub timeout: Duration,
    /// User agent string
    pub user_agent: Option<String>,
    /// Client-side pacing of outbound calls
    pub requests_per_second: Option<u32>,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(15),
            user_agent: None,
            requests_per_second: None,
        }
    }
}

/// How a channel is looked up through `channels.list`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelLookup<'a> {
    Id(&'a str),
    Handle(&'a str),
    Username(&'a str),
}

impl ChannelLookup<'_> {
    fn param(&self) -> (&'static str, String) {
        match self {
            ChannelLookup::Id(id) => ("id", id.to_string()),
            ChannelLookup::Handle(handle) => ("forHandle", handle.to_string()),
            ChannelLookup::Username(name) => ("forUsername", name.to_string()),
        }
    }
}

/// Data API client.
///
/// Every method performs exactly one HTTP call and never retries; retries
/// belong to [`crate::platform::retry::RetryExecutor`]. The inner
/// `reqwest::Client` can be swapped with [`DataApiClient::rebuild`] after a
/// transport failure while other tasks keep using their own clone.
pub struct DataApiClient {
    http: RwLock<Client>,
    api_key: String,
    config: ApiClientConfig,
    limiter: Option<DefaultDirectRateLimiter>,
    rebuild_count: AtomicU32,
}

impl DataApiClient {
    /// Create a client. An empty key is a configuration error.
    pub fn new(api_key: impl Into<String>, config: ApiClientConfig) -> Result<Self, PulseError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(PulseError::ApiKeyMissing);
        }

        let limiter = config
            .requests_per_second
            .and_then(NonZeroU32::new)
            .map(|rate| RateLimiter::direct(Quota::per_second(rate)));

        Ok(Self {
            http: RwLock::new(build_http_client(&config)?),
            api_key,
            config,
            limiter,
            rebuild_count: AtomicU32::new(0),
        })
    }

    /// Get client configuration
    pub fn config(&self) -> &ApiClientConfig {
        &self.config
    }

    /// Number of times the HTTP client has been rebuilt
    pub fn rebuild_count(&self) -> u32 {
        self.rebuild_count.load(Ordering::SeqCst)
    }

    /// Drop pooled connections by replacing the HTTP client
    pub async fn rebuild(&self) -> Result<(), PulseError> {
        let fresh = build_http_client(&self.config)?;
        *self.http.write().await = fresh;
        let count = self.rebuild_count.fetch_add(1, Ordering::SeqCst) + 1;
        info!("Rebuilt Data API HTTP client (rebuild #{})", count);
        Ok(())
    }

    /// `channels.list`
    pub async fn channels(
        &self,
        lookup: ChannelLookup<'_>,
        part: &str,
    ) -> Result<Vec<ChannelRecord>, PulseError> {
        let response: ListResponse<ChannelRecord> = self
            .get("channels", &[("part", part.to_string()), lookup.param()])
            .await?;
        Ok(response.items)
    }

    /// `playlistItems.list`, one page
    pub async fn playlist_items(
        &self,
        playlist_id: &str,
        page_token: Option<&str>,
        max_results: u32,
    ) -> Result<ListResponse<PlaylistItem>, PulseError> {
        let mut params = vec![
            ("part", "contentDetails".to_string()),
            ("playlistId", playlist_id.to_string()),
            ("maxResults", max_results.clamp(1, MAX_PAGE_SIZE).to_string()),
        ];
        if let Some(token) = page_token {
            params.push(("pageToken", token.to_string()));
        }
        self.get("playlistItems", &params).await
    }

    /// `videos.list` for at most [`MAX_IDS_PER_BATCH`] ids
    pub async fn videos(&self, ids: &[String]) -> Result<Vec<VideoRecord>, PulseError> {
        if ids.len() > MAX_IDS_PER_BATCH {
            return Err(PulseError::Generic(format!(
                "videos.list accepts at most {} ids, got {}",
                MAX_IDS_PER_BATCH,
                ids.len()
            )));
        }
        let response: ListResponse<VideoRecord> = self
            .get(
                "videos",
                &[
                    ("part", "snippet,statistics,contentDetails".to_string()),
                    ("id", ids.join(",")),
                    ("maxResults", MAX_PAGE_SIZE.to_string()),
                ],
            )
            .await?;
        Ok(response.items)
    }

    /// `commentThreads.list`, top comments by relevance
    pub async fn comment_threads(
        &self,
        video_id: &str,
        max_results: u32,
    ) -> Result<Vec<CommentThread>, PulseError> {
        let response: ListResponse<CommentThread> = self
            .get(
                "commentThreads",
                &[
                    ("part", "snippet".to_string()),
                    ("videoId", video_id.to_string()),
                    (
                        "maxResults",
                        max_results.clamp(1, MAX_COMMENTS_PER_CALL).to_string(),
                    ),
                    ("order", "relevance".to_string()),
                    ("textFormat", "plainText".to_string()),
                ],
            )
            .await?;
        Ok(response.items)
    }

    /// `search.list` restricted to channels
    pub async fn search_channels(
        &self,
        query: &str,
        max_results: u32,
    ) -> Result<Vec<SearchResult>, PulseError> {
        let response: ListResponse<SearchResult> = self
            .get(
                "search",
                &[
                    ("part", "snippet".to_string()),
                    ("type", "channel".to_string()),
                    ("q", query.to_string()),
                    ("maxResults", max_results.clamp(1, MAX_PAGE_SIZE).to_string()),
                ],
            )
            .await?;
        Ok(response.items)
    }

    async fn get<T>(&self, endpoint: &str, params: &[(&str, String)]) -> Result<T, PulseError>
    where
        T: DeserializeOwned,
    {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }

        let url = format!("{}/{}", self.config.base_url.trim_end_matches('/'), endpoint);
        debug!("GET {} {:?}", url, params);

        let http = self.http.read().await.clone();
        let response = http
            .get(&url)
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| PulseError::from_transport(e, self.config.timeout))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PulseError::from_transport(e, self.config.timeout))?;

        if status.is_success() {
            return Ok(serde_json::from_str(&body)?);
        }

        let error = error_from_status(status.as_u16(), &body);
        warn!("{} returned {}: {}", endpoint, status, error);
        Err(error)
    }
}

fn build_http_client(config: &ApiClientConfig) -> Result<Client, PulseError> {
    let mut builder = ClientBuilder::new()
        .timeout(config.timeout)
        .gzip(true)
        .brotli(true);

    builder = match &config.user_agent {
        Some(user_agent) => builder.user_agent(user_agent),
        None => builder.user_agent(concat!("audience-pulse/", env!("CARGO_PKG_VERSION"))),
    };

    Ok(builder.build()?)
}

/// Translate a non-success status and its body into the error taxonomy
pub fn error_from_status(status: u16, body: &str) -> PulseError {
    let parsed = serde_json::from_str::<ErrorResponse>(body).ok();
    let reason = parsed
        .as_ref()
        .map(|r| r.reason().to_string())
        .unwrap_or_default();
    let message = parsed
        .map(|r| r.error.message)
        .unwrap_or_else(|| body.chars().take(200).collect());

    match (status, reason.as_str()) {
        (429, _) => PulseError::RateLimited,
        (403, "rateLimitExceeded") | (403, "userRateLimitExceeded") => PulseError::RateLimited,
        (403, "commentsDisabled") => PulseError::CommentsDisabled,
        (500..=599, _) => PulseError::ServerError { status, message },
        _ => PulseError::Api {
            status,
            reason,
            message,
        },
    }
}
