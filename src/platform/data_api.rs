//! Wire types for the YouTube Data API v3 list endpoints

use serde::Deserialize;

/// Generic `*.list` response envelope
#[derive(Debug, Clone, Deserialize)]
pub struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(rename = "nextPageToken", default)]
    pub next_page_token: Option<String>,
    #[serde(rename = "pageInfo", default)]
    pub page_info: Option<PageInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PageInfo {
    #[serde(rename = "totalResults", default)]
    pub total_results: u64,
    #[serde(rename = "resultsPerPage", default)]
    pub results_per_page: u64,
}

/// `playlistItems.list` entry
#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistItem {
    #[serde(default)]
    pub snippet: Option<PlaylistItemSnippet>,
    #[serde(rename = "contentDetails", default)]
    pub content_details: Option<PlaylistItemContentDetails>,
}

impl PlaylistItem {
    pub fn video_id(&self) -> Option<&str> {
        self.content_details
            .as_ref()
            .map(|d| d.video_id.as_str())
            .or_else(|| {
                self.snippet
                    .as_ref()
                    .and_then(|s| s.resource_id.video_id.as_deref())
            })
            .filter(|id| !id.is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistItemSnippet {
    #[serde(rename = "resourceId")]
    pub resource_id: ResourceId,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResourceId {
    #[serde(rename = "videoId", default)]
    pub video_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistItemContentDetails {
    #[serde(rename = "videoId", default)]
    pub video_id: String,
}

/// `search.list` entry
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResult {
    pub id: SearchResultId,
    #[serde(default)]
    pub snippet: Option<SearchSnippet>,
}

impl SearchResult {
    /// Channel id of a channel-typed result
    pub fn channel_id(&self) -> Option<&str> {
        self.id
            .channel_id
            .as_deref()
            .or_else(|| self.snippet.as_ref().map(|s| s.channel_id.as_str()))
            .filter(|id| !id.is_empty())
    }

    pub fn title(&self) -> &str {
        self.snippet.as_ref().map(|s| s.title.as_str()).unwrap_or("")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResultId {
    #[serde(default)]
    pub kind: String,
    #[serde(rename = "channelId", default)]
    pub channel_id: Option<String>,
    #[serde(rename = "videoId", default)]
    pub video_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchSnippet {
    #[serde(rename = "channelId", default)]
    pub channel_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// Error body: `{"error": {"code": 403, "message": "...", "errors": [{"reason": "..."}]}}`
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub code: u16,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub errors: Vec<ErrorDetail>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub message: String,
}

impl ErrorResponse {
    /// First machine-readable reason, e.g. `commentsDisabled`
    pub fn reason(&self) -> &str {
        self.error
            .errors
            .first()
            .map(|e| e.reason.as_str())
            .unwrap_or("")
    }
}
