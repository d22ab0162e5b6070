//! Response payloads

use crate::core::models::{ChannelRecord, CommentThread, VideoRecord, VideoSummary};
use crate::error::PulseError;
use serde::{Deserialize, Serialize};

/// A selected video paired with its top comments
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoWithComments {
    pub video: VideoRecord,
    pub comments: Vec<CommentThread>,
}

/// Aggregate view of one channel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelReport {
    pub channel_id: String,
    pub channel_details: ChannelRecord,
    /// Every considered upload, most viewed first
    pub all_videos_summary: Vec<VideoSummary>,
    pub most_popular_videos: Vec<VideoWithComments>,
    pub least_popular_videos: Vec<VideoWithComments>,
}

/// Channel aggregate extended with one specific video.
///
/// When the channel aggregate could not be built, `channel` is `None` and
/// `error` explains why; the video fields are still filled in.
#[derive(Debug, Clone, Serialize)]
pub struct VideoReport {
    #[serde(flatten)]
    pub channel: Option<ChannelReport>,
    pub current_video_details: VideoRecord,
    pub current_video_comments: Vec<CommentThread>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// What a caller gets back for one link. Errors are reported in-band.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum AnalysisOutcome {
    Channel(ChannelReport),
    Video(Box<VideoReport>),
    Status { status: String },
    Error { error: String },
}

impl AnalysisOutcome {
    pub fn status(message: impl Into<String>) -> Self {
        AnalysisOutcome::Status {
            status: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        AnalysisOutcome::Error {
            error: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, AnalysisOutcome::Error { .. })
    }
}

impl From<PulseError> for AnalysisOutcome {
    fn from(error: PulseError) -> Self {
        AnalysisOutcome::error(error.to_string())
    }
}
