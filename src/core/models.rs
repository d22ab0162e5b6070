//! Channel, video and comment records as returned by the Data API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Parse a Data API counter. Counters arrive as decimal strings.
fn parse_count(value: Option<&str>) -> u64 {
    value.and_then(|v| v.parse().ok()).unwrap_or(0)
}

/// Thumbnail image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thumbnail {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

/// Thumbnails keyed by size name (`default`, `medium`, `high`, ...)
pub type Thumbnails = BTreeMap<String, Thumbnail>;

/// Channel metadata: snippet, statistics and content details
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelRecord {
    pub id: String,
    #[serde(default)]
    pub snippet: Option<ChannelSnippet>,
    #[serde(default)]
    pub statistics: Option<ChannelStatistics>,
    #[serde(rename = "contentDetails", default)]
    pub content_details: Option<ChannelContentDetails>,
}

impl ChannelRecord {
    pub fn title(&self) -> &str {
        self.snippet.as_ref().map(|s| s.title.as_str()).unwrap_or("")
    }

    /// Playlist holding every upload of the channel
    pub fn uploads_playlist_id(&self) -> Option<&str> {
        self.content_details
            .as_ref()
            .and_then(|details| details.related_playlists.uploads.as_deref())
            .filter(|id| !id.is_empty())
    }

    pub fn subscriber_count(&self) -> u64 {
        parse_count(
            self.statistics
                .as_ref()
                .and_then(|s| s.subscriber_count.as_deref()),
        )
    }

    pub fn video_count(&self) -> u64 {
        parse_count(self.statistics.as_ref().and_then(|s| s.video_count.as_deref()))
    }

    pub fn view_count(&self) -> u64 {
        parse_count(self.statistics.as_ref().and_then(|s| s.view_count.as_deref()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelSnippet {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "customUrl", default, skip_serializing_if = "Option::is_none")]
    pub custom_url: Option<String>,
    #[serde(rename = "publishedAt", default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub thumbnails: Thumbnails,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelStatistics {
    #[serde(rename = "viewCount", default)]
    pub view_count: Option<String>,
    #[serde(rename = "subscriberCount", default)]
    pub subscriber_count: Option<String>,
    #[serde(rename = "hiddenSubscriberCount", default)]
    pub hidden_subscriber_count: bool,
    #[serde(rename = "videoCount", default)]
    pub video_count: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelContentDetails {
    #[serde(rename = "relatedPlaylists", default)]
    pub related_playlists: RelatedPlaylists,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelatedPlaylists {
    #[serde(default)]
    pub uploads: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub likes: Option<String>,
}

/// Video metadata: snippet, statistics and content details
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoRecord {
    pub id: String,
    #[serde(default)]
    pub snippet: Option<VideoSnippet>,
    #[serde(default)]
    pub statistics: Option<VideoStatistics>,
    #[serde(rename = "contentDetails", default)]
    pub content_details: Option<VideoContentDetails>,
}

impl VideoRecord {
    pub fn title(&self) -> &str {
        self.snippet.as_ref().map(|s| s.title.as_str()).unwrap_or("")
    }

    /// Owning channel as reported by the video itself
    pub fn channel_id(&self) -> Option<&str> {
        self.snippet
            .as_ref()
            .map(|s| s.channel_id.as_str())
            .filter(|id| !id.is_empty())
    }

    /// View count, 0 when statistics are hidden or missing
    pub fn view_count(&self) -> u64 {
        parse_count(self.statistics.as_ref().and_then(|s| s.view_count.as_deref()))
    }

    pub fn like_count(&self) -> u64 {
        parse_count(self.statistics.as_ref().and_then(|s| s.like_count.as_deref()))
    }

    pub fn comment_count(&self) -> u64 {
        parse_count(
            self.statistics
                .as_ref()
                .and_then(|s| s.comment_count.as_deref()),
        )
    }

    pub fn summary(&self) -> VideoSummary {
        VideoSummary {
            id: self.id.clone(),
            title: self.title().to_string(),
            published_at: self.snippet.as_ref().and_then(|s| s.published_at),
            view_count: self.view_count(),
            like_count: self.like_count(),
            comment_count: self.comment_count(),
            duration: self
                .content_details
                .as_ref()
                .and_then(|d| d.duration.clone()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoSnippet {
    #[serde(rename = "publishedAt", default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(rename = "channelId", default)]
    pub channel_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub thumbnails: Thumbnails,
    #[serde(rename = "channelTitle", default)]
    pub channel_title: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(rename = "categoryId", default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoStatistics {
    #[serde(rename = "viewCount", default)]
    pub view_count: Option<String>,
    #[serde(rename = "likeCount", default)]
    pub like_count: Option<String>,
    #[serde(rename = "favoriteCount", default, skip_serializing_if = "Option::is_none")]
    pub favorite_count: Option<String>,
    #[serde(rename = "commentCount", default)]
    pub comment_count: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoContentDetails {
    /// ISO 8601 duration, e.g. `PT4M13S`
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

/// Compact per-video line used for the full ranked listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoSummary {
    pub id: String,
    pub title: String,
    pub published_at: Option<DateTime<Utc>>,
    pub view_count: u64,
    pub like_count: u64,
    pub comment_count: u64,
    pub duration: Option<String>,
}

/// Top-level comment with its thread metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentThread {
    pub id: String,
    pub snippet: CommentThreadSnippet,
}

impl CommentThread {
    pub fn text(&self) -> &str {
        let snippet = &self.snippet.top_level_comment.snippet;
        if snippet.text_original.is_empty() {
            &snippet.text_display
        } else {
            &snippet.text_original
        }
    }

    pub fn author(&self) -> &str {
        &self.snippet.top_level_comment.snippet.author_display_name
    }

    pub fn like_count(&self) -> u64 {
        self.snippet.top_level_comment.snippet.like_count
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentThreadSnippet {
    #[serde(rename = "videoId", default)]
    pub video_id: String,
    #[serde(rename = "topLevelComment")]
    pub top_level_comment: Comment,
    #[serde(rename = "totalReplyCount", default)]
    pub total_reply_count: u64,
    #[serde(rename = "canReply", default)]
    pub can_reply: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    #[serde(default)]
    pub id: String,
    pub snippet: CommentSnippet,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentSnippet {
    #[serde(rename = "authorDisplayName", default)]
    pub author_display_name: String,
    #[serde(rename = "authorChannelUrl", default, skip_serializing_if = "Option::is_none")]
    pub author_channel_url: Option<String>,
    #[serde(rename = "textDisplay", default)]
    pub text_display: String,
    #[serde(rename = "textOriginal", default)]
    pub text_original: String,
    #[serde(rename = "likeCount", default)]
    pub like_count: u64,
    #[serde(rename = "publishedAt", default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(rename = "updatedAt", default)]
    pub updated_at: Option<DateTime<Utc>>,
}
