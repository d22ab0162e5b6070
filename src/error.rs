//! Error types for audience-pulse

use std::time::Duration;
use thiserror::Error;

/// Main error type for audience-pulse operations
#[derive(Debug, Error)]
pub enum PulseError {
    #[error("Invalid or unsupported link: {0}")]
    InvalidLink(String),

    #[error("Unsupported YouTube link: {0}")]
    UnsupportedLink(String),

    #[error("YouTube API key is not configured")]
    ApiKeyMissing,

    #[error("Channel not found: {0}")]
    ChannelNotFound(String),

    #[error("Video not found: {0}")]
    VideoNotFound(String),

    #[error("Playlist not found: {0}")]
    PlaylistNotFound(String),

    #[error("Could not resolve a channel for {name}{}", last_error_suffix(.last_error))]
    Unresolvable {
        name: String,
        /// Most recent strategy failure, if any strategy errored
        #[source]
        last_error: Option<Box<PulseError>>,
    },

    #[error("Rate limited")]
    RateLimited,

    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Comments are disabled")]
    CommentsDisabled,

    #[error("API error ({status}, {reason}): {message}")]
    Api {
        status: u16,
        reason: String,
        message: String,
    },

    #[error("Retries exhausted after {attempts} attempts: {source}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        source: Box<PulseError>,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("URL parsing error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Generic error: {0}")]
    Generic(String),
}

impl PulseError {
    /// Map a transport failure from reqwest onto the taxonomy
    pub fn from_transport(error: reqwest::Error, timeout: Duration) -> Self {
        if error.is_timeout() {
            PulseError::Timeout(timeout)
        } else if error.is_connect() || error.is_request() {
            PulseError::Connection(error.to_string())
        } else {
            PulseError::Http(error)
        }
    }

    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PulseError::RateLimited
                | PulseError::ServerError { .. }
                | PulseError::Timeout(_)
                | PulseError::Connection(_)
        )
    }

    /// Check if the HTTP client should be rebuilt before the next attempt
    pub fn needs_reconnect(&self) -> bool {
        matches!(self, PulseError::Timeout(_) | PulseError::Connection(_))
    }

    /// Check if error means the requested resource does not exist
    pub fn is_not_found(&self) -> bool {
        match self {
            PulseError::ChannelNotFound(_)
            | PulseError::VideoNotFound(_)
            | PulseError::PlaylistNotFound(_)
            | PulseError::Unresolvable { .. } => true,
            PulseError::Api { status, .. } => *status == 404,
            _ => false,
        }
    }

    /// Innermost cause, looking through exhausted retries
    pub fn root_cause(&self) -> &PulseError {
        match self {
            PulseError::RetriesExhausted { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

fn last_error_suffix(last_error: &Option<Box<PulseError>>) -> String {
    last_error
        .as_ref()
        .map(|e| format!(" (last error: {})", e.root_cause()))
        .unwrap_or_default()
}
