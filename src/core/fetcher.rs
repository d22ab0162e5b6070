//! Channel aggregation and comment fetching

use crate::core::models::{ChannelRecord, CommentThread, VideoRecord};
use crate::core::ranking::{popularity_windows, rank_by_views};
use crate::core::report::{ChannelReport, VideoReport, VideoWithComments};
use crate::error::PulseError;
use crate::platform::client::{
    ApiClientConfig, ChannelLookup, DataApiClient, MAX_COMMENTS_PER_CALL, MAX_IDS_PER_BATCH,
    MAX_PAGE_SIZE,
};
use crate::platform::gateway::ApiGateway;
use crate::platform::resolver::IdentifierResolver;
use crate::platform::retry::{RetryExecutor, RetryPolicy, RetryPolicyBuilder};
use crate::utils::cache::CacheStats;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Parts requested for the channel being aggregated
const CHANNEL_PARTS: &str = "snippet,statistics,contentDetails";

/// Aggregation settings
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Upper bound on uploads considered per channel
    pub max_videos: usize,
    /// Top-level comments fetched per selected video
    pub max_comments_per_video: u32,
    /// Size of the most-popular window
    pub popular_count: usize,
    /// Size of the least-popular window
    pub least_popular_count: usize,
    /// Total attempts per remote call
    pub retry_attempts: u32,
    /// Backoff before the first retry
    pub retry_base_delay: Duration,
    /// Hard limit for a single remote call
    pub call_timeout: Duration,
    /// Fetch comments for selected videos in parallel
    pub concurrent_comments: bool,
    /// Parallel comment requests when `concurrent_comments` is set
    pub worker_count: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_videos: 200,
            max_comments_per_video: 20,
            popular_count: 5,
            least_popular_count: 5,
            retry_attempts: 5,
            retry_base_delay: Duration::from_secs(1),
            call_timeout: Duration::from_secs(15),
            concurrent_comments: true,
            worker_count: 5,
        }
    }
}

impl FetchConfig {
    pub fn with_max_videos(mut self, max_videos: usize) -> Self {
        self.max_videos = max_videos;
        self
    }

    pub fn with_max_comments(mut self, max_comments: u32) -> Self {
        self.max_comments_per_video = max_comments;
        self
    }

    /// Set both window sizes
    pub fn with_windows(mut self, popular: usize, least_popular: usize) -> Self {
        self.popular_count = popular;
        self.least_popular_count = least_popular;
        self
    }

    pub fn with_retries(mut self, attempts: u32, base_delay: Duration) -> Self {
        self.retry_attempts = attempts;
        self.retry_base_delay = base_delay;
        self
    }

    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    pub fn with_concurrency(mut self, concurrent: bool, workers: usize) -> Self {
        self.concurrent_comments = concurrent;
        self.worker_count = workers;
        self
    }

    /// Retry policy derived from these settings
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicyBuilder::new()
            .max_attempts(self.retry_attempts)
            .base_delay(self.retry_base_delay)
            .call_timeout(self.call_timeout)
            .build()
    }

    /// Comments actually requested per video
    pub fn comment_cap(&self) -> u32 {
        self.max_comments_per_video.min(MAX_COMMENTS_PER_CALL)
    }
}

/// YouTube data fetcher.
///
/// Owns the API gateway and the identifier cache; clones share both.
#[derive(Clone)]
pub struct YouTubeFetcher {
    gateway: ApiGateway,
    resolver: IdentifierResolver,
    config: FetchConfig,
}

impl YouTubeFetcher {
    /// Create a fetcher against the public API
    pub fn new(api_key: impl Into<String>, config: FetchConfig) -> Result<Self, PulseError> {
        let api_config = ApiClientConfig {
            timeout: config.call_timeout,
            ..Default::default()
        };
        Self::with_api_config(api_key, config, api_config)
    }

    /// Create a fetcher with explicit client settings
    pub fn with_api_config(
        api_key: impl Into<String>,
        config: FetchConfig,
        api_config: ApiClientConfig,
    ) -> Result<Self, PulseError> {
        let api = Arc::new(DataApiClient::new(api_key, api_config)?);
        let gateway = ApiGateway::new(api, RetryExecutor::with_policy(config.retry_policy()));
        let resolver = IdentifierResolver::new(gateway.clone());

        Ok(Self {
            gateway,
            resolver,
            config,
        })
    }

    /// Get fetch configuration
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    pub fn resolver(&self) -> &IdentifierResolver {
        &self.resolver
    }

    /// Forget every resolved identifier
    pub fn clear_cache(&self) {
        self.resolver.cache().clear();
        info!("Identifier cache cleared");
    }

    pub async fn cache_stats(&self) -> CacheStats {
        CacheStats {
            identifier_entries: self.resolver.cache().len().await,
        }
    }

    /// Aggregate the channel behind a channel, handle or legacy-name link
    pub async fn channel_data(&self, link: &str) -> Result<ChannelReport, PulseError> {
        let channel_id = self.resolver.resolve_channel_id(link).await?;
        self.aggregate_channel(&channel_id).await
    }

    /// Details and comments of one video plus the aggregate of its channel.
    ///
    /// A failure while aggregating the channel still yields the video
    /// fields, with the failure recorded in `error`.
    pub async fn video_data(&self, link: &str) -> Result<VideoReport, PulseError> {
        let video_id = self.resolver.resolve_video_id(link).await?;
        let video = self.video_details_one(&video_id).await?;

        let (channel, error) = match video.channel_id() {
            Some(channel_id) => match self.aggregate_channel(channel_id).await {
                Ok(report) => (Some(report), None),
                Err(e) => {
                    error!("Channel aggregation failed for video {}: {}", video_id, e);
                    (None, Some(e.to_string()))
                }
            },
            None => {
                warn!("Video {} carries no channel id", video_id);
                (None, Some(format!("Video {} has no channel", video_id)))
            }
        };

        let comments = self.comments_for(&video_id).await;

        Ok(VideoReport {
            channel,
            current_video_details: video,
            current_video_comments: comments,
            error,
        })
    }

    /// Build the aggregate for a known channel id
    pub async fn aggregate_channel(&self, channel_id: &str) -> Result<ChannelReport, PulseError> {
        info!("Aggregating channel {}", channel_id);

        let channel = self.channel_details(channel_id).await?;
        let uploads = channel
            .uploads_playlist_id()
            .ok_or_else(|| PulseError::PlaylistNotFound(format!("uploads of {}", channel_id)))?
            .to_string();

        let ids = self.uploaded_video_ids(&uploads).await?;
        let videos = if ids.is_empty() {
            Vec::new()
        } else {
            self.video_details(&ids).await?
        };
        info!("Channel {} has {} videos under consideration", channel_id, videos.len());

        let ranked = rank_by_views(videos);
        let (most, least) = popularity_windows(
            ranked.len(),
            self.config.popular_count,
            self.config.least_popular_count,
        );
        let all_videos_summary = ranked.iter().map(VideoRecord::summary).collect();

        let split = most.len();
        let selected: Vec<VideoRecord> = ranked[most]
            .iter()
            .chain(ranked[least].iter())
            .cloned()
            .collect();
        let mut most_popular_videos = self.with_comments(selected).await;
        let least_popular_videos = most_popular_videos.split_off(split);

        Ok(ChannelReport {
            channel_id: channel_id.to_string(),
            channel_details: channel,
            all_videos_summary,
            most_popular_videos,
            least_popular_videos,
        })
    }

    /// `channels.list` with snippet, statistics and content details
    pub async fn channel_details(&self, channel_id: &str) -> Result<ChannelRecord, PulseError> {
        let api = self.gateway.api();
        let channels = self
            .gateway
            .call("channels.list", move || {
                api.channels(ChannelLookup::Id(channel_id), CHANNEL_PARTS)
            })
            .await?;

        channels
            .into_iter()
            .next()
            .ok_or_else(|| PulseError::ChannelNotFound(channel_id.to_string()))
    }

    /// Video ids of the uploads playlist, newest first, at most `max_videos`.
    /// A missing playlist is treated as a channel without uploads.
    pub async fn uploaded_video_ids(&self, playlist_id: &str) -> Result<Vec<String>, PulseError> {
        let api = self.gateway.api();
        let max = self.config.max_videos;
        let mut ids: Vec<String> = Vec::new();
        let mut page_token: Option<String> = None;

        while ids.len() < max {
            let page_size = (max - ids.len()).min(MAX_PAGE_SIZE as usize) as u32;
            let token = page_token.as_deref();
            let page = match self
                .gateway
                .call("playlistItems.list", move || {
                    api.playlist_items(playlist_id, token, page_size)
                })
                .await
            {
                Ok(page) => page,
                Err(e) if ids.is_empty() && e.root_cause().is_not_found() => {
                    warn!("Uploads playlist {} not found, assuming no videos", playlist_id);
                    break;
                }
                Err(e) => return Err(e),
            };

            let before = ids.len();
            ids.extend(
                page.items
                    .iter()
                    .filter_map(|item| item.video_id())
                    .map(str::to_string),
            );
            debug!("Playlist {} page added {} ids", playlist_id, ids.len() - before);

            match page.next_page_token {
                Some(next) if !next.is_empty() && !page.items.is_empty() => page_token = Some(next),
                _ => break,
            }
        }

        ids.truncate(max);
        Ok(ids)
    }

    /// `videos.list` in batches of [`MAX_IDS_PER_BATCH`]
    pub async fn video_details(&self, ids: &[String]) -> Result<Vec<VideoRecord>, PulseError> {
        let api = self.gateway.api();
        let mut videos = Vec::with_capacity(ids.len());

        for batch in ids.chunks(MAX_IDS_PER_BATCH) {
            let records = self
                .gateway
                .call("videos.list", move || api.videos(batch))
                .await?;
            videos.extend(records);
        }

        Ok(videos)
    }

    async fn video_details_one(&self, video_id: &str) -> Result<VideoRecord, PulseError> {
        self.video_details(&[video_id.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| PulseError::VideoNotFound(video_id.to_string()))
    }

    /// Top-level comments of a video, most relevant first.
    ///
    /// Never fails: disabled comments and exhausted retries both yield an
    /// empty list.
    pub async fn comments_for(&self, video_id: &str) -> Vec<CommentThread> {
        let cap = self.config.comment_cap();
        if cap == 0 {
            return Vec::new();
        }

        let api = self.gateway.api();
        match self
            .gateway
            .call("commentThreads.list", move || api.comment_threads(video_id, cap))
            .await
        {
            Ok(mut threads) => {
                threads.truncate(cap as usize);
                threads
            }
            Err(e) if matches!(e.root_cause(), PulseError::CommentsDisabled) => {
                info!("Comments are disabled for video {}", video_id);
                Vec::new()
            }
            Err(e) => {
                warn!("Could not fetch comments for video {}: {}", video_id, e);
                Vec::new()
            }
        }
    }

    /// Pair each video with its comments, preserving input order
    pub async fn with_comments(&self, videos: Vec<VideoRecord>) -> Vec<VideoWithComments> {
        if self.config.concurrent_comments && videos.len() > 1 {
            stream::iter(videos)
                .map(|video| async move {
                    let comments = self.comments_for(&video.id).await;
                    VideoWithComments { video, comments }
                })
                .buffered(self.config.worker_count.max(1))
                .collect()
                .await
        } else {
            let mut paired = Vec::with_capacity(videos.len());
            for video in videos {
                let comments = self.comments_for(&video.id).await;
                paired.push(VideoWithComments { video, comments });
            }
            paired
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::cache::IdKind;
    use mockito::{Matcher, Mock, Server, ServerGuard};
    use serde_json::json;

    fn fetcher(server: &ServerGuard, config: FetchConfig) -> YouTubeFetcher {
        YouTubeFetcher::with_api_config(
            "test-key",
            config.with_retries(1, Duration::from_millis(1)),
            ApiClientConfig {
                base_url: server.url(),
                ..Default::default()
            },
        )
        .unwrap()
    }

    fn channel_body(id: &str, uploads: &str) -> String {
        json!({
            "items": [{
                "id": id,
                "snippet": {"title": "Test Channel"},
                "statistics": {"subscriberCount": "1000", "videoCount": "3", "viewCount": "5000"},
                "contentDetails": {"relatedPlaylists": {"uploads": uploads}}
            }]
        })
        .to_string()
    }

    fn playlist_body(ids: &[&str], next: Option<&str>) -> String {
        let items: Vec<_> = ids
            .iter()
            .map(|id| json!({"contentDetails": {"videoId": id}}))
            .collect();
        let mut body = json!({ "items": items });
        if let Some(next) = next {
            body["nextPageToken"] = json!(next);
        }
        body.to_string()
    }

    fn videos_body(videos: &[(&str, u64)]) -> String {
        let items: Vec<_> = videos
            .iter()
            .map(|(id, views)| {
                json!({
                    "id": id,
                    "snippet": {"title": format!("Video {}", id), "channelId": "UC1"},
                    "statistics": {"viewCount": views.to_string()}
                })
            })
            .collect();
        json!({ "items": items }).to_string()
    }

    fn comments_body(video_id: &str) -> String {
        json!({
            "items": [{
                "id": format!("c-{}", video_id),
                "snippet": {
                    "videoId": video_id,
                    "topLevelComment": {
                        "id": format!("c-{}", video_id),
                        "snippet": {"authorDisplayName": "viewer", "textDisplay": "nice", "likeCount": 2}
                    }
                }
            }]
        })
        .to_string()
    }

    async fn mock_channel(server: &mut ServerGuard, id: &str, uploads: &str) -> Mock {
        server
            .mock("GET", "/channels")
            .match_query(Matcher::UrlEncoded("id".into(), id.into()))
            .with_status(200)
            .with_body(channel_body(id, uploads))
            .create_async()
            .await
    }

    async fn mock_comments(server: &mut ServerGuard, video_id: &str) -> Mock {
        server
            .mock("GET", "/commentThreads")
            .match_query(Matcher::UrlEncoded("videoId".into(), video_id.into()))
            .with_status(200)
            .with_body(comments_body(video_id))
            .expect(1)
            .create_async()
            .await
    }

    #[test]
    fn test_fetch_config_default() {
        let config = FetchConfig::default();
        assert_eq!(config.max_videos, 200);
        assert_eq!(config.max_comments_per_video, 20);
        assert_eq!(config.popular_count, 5);
        assert_eq!(config.least_popular_count, 5);
        assert_eq!(config.retry_attempts, 5);
        assert_eq!(config.retry_base_delay, Duration::from_secs(1));
        assert_eq!(config.call_timeout, Duration::from_secs(15));
        assert!(config.concurrent_comments);
        assert_eq!(config.worker_count, 5);
    }

    #[test]
    fn test_comment_cap() {
        assert_eq!(FetchConfig::default().with_max_comments(500).comment_cap(), 100);
        assert_eq!(FetchConfig::default().with_max_comments(7).comment_cap(), 7);

        let policy = FetchConfig::default()
            .with_retries(3, Duration::from_millis(250))
            .retry_policy();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.base_delay, Duration::from_millis(250));
    }

    #[tokio::test]
    async fn test_channel_without_uploads() {
        let mut server = Server::new_async().await;
        let _channel = mock_channel(&mut server, "UC_empty", "UU_empty").await;
        let _mock = server
            .mock("GET", "/playlistItems")
            .match_query(Matcher::UrlEncoded("playlistId".into(), "UU_empty".into()))
            .with_status(200)
            .with_body(r#"{"items": []}"#)
            .create_async()
            .await;
        let videos = server
            .mock("GET", "/videos")
            .match_query(Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let report = fetcher(&server, FetchConfig::default())
            .aggregate_channel("UC_empty")
            .await
            .unwrap();

        assert_eq!(report.channel_id, "UC_empty");
        assert_eq!(report.channel_details.title(), "Test Channel");
        assert!(report.all_videos_summary.is_empty());
        assert!(report.most_popular_videos.is_empty());
        assert!(report.least_popular_videos.is_empty());
        videos.assert_async().await;
    }

    #[tokio::test]
    async fn test_missing_uploads_playlist_is_empty() {
        let mut server = Server::new_async().await;
        let _channel = mock_channel(&mut server, "UC_gone", "UU_gone").await;
        let _mock = server
            .mock("GET", "/playlistItems")
            .match_query(Matcher::Any)
            .with_status(404)
            .with_body(r#"{"error": {"code": 404, "message": "not found", "errors": [{"reason": "playlistNotFound"}]}}"#)
            .create_async()
            .await;

        let report = fetcher(&server, FetchConfig::default())
            .aggregate_channel("UC_gone")
            .await
            .unwrap();
        assert!(report.all_videos_summary.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_channel() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/channels")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"items": []}"#)
            .create_async()
            .await;

        let result = fetcher(&server, FetchConfig::default())
            .aggregate_channel("UC_missing")
            .await;
        assert!(matches!(result, Err(PulseError::ChannelNotFound(id)) if id == "UC_missing"));
    }

    #[tokio::test]
    async fn test_pagination_stops_at_max_videos() {
        let mut server = Server::new_async().await;
        let first = server
            .mock("GET", "/playlistItems")
            .match_query(Matcher::UrlEncoded("maxResults".into(), "3".into()))
            .with_status(200)
            .with_body(playlist_body(&["v1", "v2"], Some("P2")))
            .expect(1)
            .create_async()
            .await;
        let second = server
            .mock("GET", "/playlistItems")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("pageToken".into(), "P2".into()),
                Matcher::UrlEncoded("maxResults".into(), "1".into()),
            ]))
            .with_status(200)
            .with_body(playlist_body(&["v3", "v4"], Some("P3")))
            .expect(1)
            .create_async()
            .await;

        let ids = fetcher(&server, FetchConfig::default().with_max_videos(3))
            .uploaded_video_ids("UU1")
            .await
            .unwrap();

        assert_eq!(ids, vec!["v1", "v2", "v3"]);
        first.assert_async().await;
        second.assert_async().await;
    }

    #[tokio::test]
    async fn test_video_details_are_batched() {
        let mut server = Server::new_async().await;
        let ids: Vec<String> = (0..60).map(|i| format!("v{i}")).collect();

        let first_batch: Vec<(&str, u64)> = ids[..50].iter().map(|id| (id.as_str(), 1)).collect();
        let second_batch: Vec<(&str, u64)> = ids[50..].iter().map(|id| (id.as_str(), 1)).collect();

        let first = server
            .mock("GET", "/videos")
            .match_query(Matcher::UrlEncoded("id".into(), ids[..50].join(",")))
            .with_status(200)
            .with_body(videos_body(&first_batch))
            .expect(1)
            .create_async()
            .await;
        let second = server
            .mock("GET", "/videos")
            .match_query(Matcher::UrlEncoded("id".into(), ids[50..].join(",")))
            .with_status(200)
            .with_body(videos_body(&second_batch))
            .expect(1)
            .create_async()
            .await;

        let videos = fetcher(&server, FetchConfig::default())
            .video_details(&ids)
            .await
            .unwrap();

        assert_eq!(videos.len(), 60);
        first.assert_async().await;
        second.assert_async().await;
    }

    #[tokio::test]
    async fn test_comments_disabled_yield_empty_list() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/commentThreads")
            .match_query(Matcher::Any)
            .with_status(403)
            .with_body(r#"{"error": {"code": 403, "message": "disabled", "errors": [{"reason": "commentsDisabled"}]}}"#)
            .create_async()
            .await;

        let comments = fetcher(&server, FetchConfig::default())
            .comments_for("quiet")
            .await;
        assert!(comments.is_empty());
    }

    #[tokio::test]
    async fn test_zero_comment_cap_skips_call() {
        let mut server = Server::new_async().await;
        let any = server.mock("GET", Matcher::Any).expect(0).create_async().await;

        let comments = fetcher(&server, FetchConfig::default().with_max_comments(0))
            .comments_for("abc")
            .await;
        assert!(comments.is_empty());
        any.assert_async().await;
    }

    /// Twelve uploads where v{i} has i * 100 views, except v4 which ties
    /// with v5. Returns the setup mocks and the per-video comment mocks.
    async fn ranked_channel(server: &mut ServerGuard) -> (Vec<Mock>, Vec<Mock>) {
        let ids: Vec<String> = (1..=12).map(|i| format!("v{i}")).collect();
        let id_refs: Vec<&str> = ids.iter().map(String::as_str).collect();
        let views: Vec<(&str, u64)> = id_refs
            .iter()
            .enumerate()
            .map(|(i, id)| (*id, if *id == "v4" { 500 } else { (i as u64 + 1) * 100 }))
            .collect();

        let mut setup = vec![mock_channel(server, "UC1", "UU1").await];
        setup.push(
            server
                .mock("GET", "/playlistItems")
                .match_query(Matcher::Any)
                .with_status(200)
                .with_body(playlist_body(&id_refs, None))
                .create_async()
                .await,
        );
        setup.push(
            server
                .mock("GET", "/videos")
                .match_query(Matcher::Any)
                .with_status(200)
                .with_body(videos_body(&views))
                .create_async()
                .await,
        );
        setup.push(
            server
                .mock("GET", "/commentThreads")
                .match_query(Matcher::UrlEncoded("videoId".into(), "v11".into()))
                .with_status(403)
                .with_body(r#"{"error": {"code": 403, "errors": [{"reason": "commentsDisabled"}]}}"#)
                .create_async()
                .await,
        );

        let mut comments = Vec::new();
        for id in ["v12", "v10", "v3", "v2", "v1"] {
            comments.push(mock_comments(server, id).await);
        }
        (setup, comments)
    }

    #[tokio::test]
    async fn test_aggregate_ranks_and_selects_windows() {
        let mut server = Server::new_async().await;
        let (_setup, comment_mocks) = ranked_channel(&mut server).await;

        let report = fetcher(&server, FetchConfig::default().with_windows(3, 3))
            .aggregate_channel("UC1")
            .await
            .unwrap();

        let summary: Vec<&str> = report.all_videos_summary.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(
            summary,
            vec!["v12", "v11", "v10", "v9", "v8", "v7", "v6", "v4", "v5", "v3", "v2", "v1"]
        );

        let most: Vec<&str> = report.most_popular_videos.iter().map(|v| v.video.id.as_str()).collect();
        let least: Vec<&str> = report.least_popular_videos.iter().map(|v| v.video.id.as_str()).collect();
        assert_eq!(most, vec!["v12", "v11", "v10"]);
        assert_eq!(least, vec!["v3", "v2", "v1"]);

        // v11 has comments disabled, the others still get theirs
        assert!(report.most_popular_videos[1].comments.is_empty());
        assert_eq!(report.most_popular_videos[0].comments[0].id, "c-v12");
        assert_eq!(report.least_popular_videos[2].comments[0].id, "c-v1");

        for mock in &comment_mocks {
            mock.assert_async().await;
        }
    }

    #[tokio::test]
    async fn test_sequential_and_concurrent_agree() {
        let mut server = Server::new_async().await;
        let _mocks = ranked_channel(&mut server).await;

        let sequential = fetcher(
            &server,
            FetchConfig::default()
                .with_windows(2, 2)
                .with_concurrency(false, 1),
        )
        .aggregate_channel("UC1")
        .await
        .unwrap();
        let concurrent = fetcher(
            &server,
            FetchConfig::default()
                .with_windows(2, 2)
                .with_concurrency(true, 4),
        )
        .aggregate_channel("UC1")
        .await
        .unwrap();

        let pairs = |report: &ChannelReport| -> Vec<(String, usize)> {
            report
                .most_popular_videos
                .iter()
                .chain(&report.least_popular_videos)
                .map(|v| (v.video.id.clone(), v.comments.len()))
                .collect()
        };
        assert_eq!(pairs(&sequential), pairs(&concurrent));
    }

    #[tokio::test]
    async fn test_video_data_for_watch_link() {
        let mut server = Server::new_async().await;
        let search = server
            .mock("GET", "/search")
            .match_query(Matcher::Any)
            .expect(0)
            .create_async()
            .await;
        let _mock = server
            .mock("GET", "/videos")
            .match_query(Matcher::UrlEncoded("id".into(), "abc123".into()))
            .with_status(200)
            .with_body(videos_body(&[("abc123", 42)]))
            .create_async()
            .await;
        let _channel = mock_channel(&mut server, "UC1", "UU1").await;
        let _mock = server
            .mock("GET", "/playlistItems")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(playlist_body(&["abc123", "other"], None))
            .create_async()
            .await;
        let _mock = server
            .mock("GET", "/videos")
            .match_query(Matcher::UrlEncoded("id".into(), "abc123,other".into()))
            .with_status(200)
            .with_body(videos_body(&[("abc123", 42), ("other", 7)]))
            .create_async()
            .await;
        let _mock = server
            .mock("GET", "/commentThreads")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(comments_body("abc123"))
            .create_async()
            .await;

        let report = fetcher(&server, FetchConfig::default())
            .video_data("https://www.youtube.com/watch?v=abc123")
            .await
            .unwrap();

        assert_eq!(report.current_video_details.id, "abc123");
        assert_eq!(report.current_video_comments.len(), 1);
        assert!(report.error.is_none());
        let channel = report.channel.unwrap();
        assert_eq!(channel.channel_id, "UC1");
        assert_eq!(channel.all_videos_summary.len(), 2);
        search.assert_async().await;
    }

    #[tokio::test]
    async fn test_video_data_keeps_video_when_channel_fails() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/videos")
            .match_query(Matcher::UrlEncoded("id".into(), "abc123".into()))
            .with_status(200)
            .with_body(videos_body(&[("abc123", 42)]))
            .create_async()
            .await;
        let _mock = server
            .mock("GET", "/channels")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"items": []}"#)
            .create_async()
            .await;
        let _mock = server
            .mock("GET", "/commentThreads")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"items": []}"#)
            .create_async()
            .await;

        let report = fetcher(&server, FetchConfig::default())
            .video_data("https://youtu.be/abc123")
            .await
            .unwrap();

        assert_eq!(report.current_video_details.id, "abc123");
        assert!(report.channel.is_none());
        assert!(report.error.unwrap().contains("UC1"));
    }

    #[tokio::test]
    async fn test_unknown_video() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/videos")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"items": []}"#)
            .create_async()
            .await;

        let result = fetcher(&server, FetchConfig::default())
            .video_data("https://www.youtube.com/shorts/gone")
            .await;
        assert!(matches!(result, Err(PulseError::VideoNotFound(id)) if id == "gone"));
    }

    #[tokio::test]
    async fn test_clear_cache() {
        let server = Server::new_async().await;
        let fetcher = fetcher(&server, FetchConfig::default());

        let link = "https://youtu.be/abc";
        fetcher.resolver().resolve_video_id(link).await.unwrap();
        assert_eq!(fetcher.cache_stats().await.identifier_entries, 1);

        fetcher.clear_cache();
        assert!(fetcher
            .resolver()
            .cache()
            .get(IdKind::Video, link)
            .await
            .is_none());
    }
}
