//! Link classification for supported social media platforms

use percent_encoding::percent_decode_str;
use tracing::debug;
use url::Url;

/// Shape of a YouTube link, carrying the raw identifier source from the URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum YouTubeLink {
    /// `youtu.be/<id>`
    ShortVideo(String),
    /// `/watch?v=<id>` or `/shorts/<id>`
    Video(String),
    /// `/@<handle>`
    Handle(String),
    /// `/channel/<id>`
    ChannelId(String),
    /// `/c/<name>` or `/user/<name>`
    LegacyName(String),
    Unrecognized,
}

impl YouTubeLink {
    /// Whether the link points at a single video
    pub fn is_video(&self) -> bool {
        matches!(self, YouTubeLink::ShortVideo(_) | YouTubeLink::Video(_))
    }

    /// Whether the link points at a channel
    pub fn is_channel(&self) -> bool {
        matches!(
            self,
            YouTubeLink::Handle(_) | YouTubeLink::ChannelId(_) | YouTubeLink::LegacyName(_)
        )
    }

    /// Identifier source extracted from the URL, if any
    pub fn token(&self) -> Option<&str> {
        match self {
            YouTubeLink::ShortVideo(token)
            | YouTubeLink::Video(token)
            | YouTubeLink::Handle(token)
            | YouTubeLink::ChannelId(token)
            | YouTubeLink::LegacyName(token) => Some(token.as_str()),
            YouTubeLink::Unrecognized => None,
        }
    }
}

/// Result of classifying a raw link
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkClass {
    YouTube(YouTubeLink),
    Facebook,
    Instagram,
    Unknown,
}

/// Classify a link by host and path. Never touches the network.
pub fn classify(link: &str) -> LinkClass {
    let parsed = match Url::parse(link.trim()) {
        Ok(parsed) => parsed,
        Err(e) => {
            debug!("Link {} does not parse: {}", link, e);
            return LinkClass::Unknown;
        }
    };

    let host = match parsed.host_str() {
        Some(host) if !host.is_empty() => host.to_lowercase(),
        _ => {
            debug!("Link {} has no host", link);
            return LinkClass::Unknown;
        }
    };

    let class = if host.contains("youtube.com") || host.contains("youtu.be") {
        LinkClass::YouTube(classify_youtube(&host, &parsed))
    } else if host.contains("facebook.com") {
        LinkClass::Facebook
    } else if host.contains("instagram.com") {
        LinkClass::Instagram
    } else {
        LinkClass::Unknown
    };

    debug!("Classified {} as {:?}", link, class);
    class
}

fn classify_youtube(host: &str, parsed: &Url) -> YouTubeLink {
    let path = parsed.path();

    if host.contains("youtu.be") {
        return YouTubeLink::ShortVideo(first_segment(path.trim_start_matches('/')));
    }

    if path.starts_with("/watch") {
        let id = parsed
            .query_pairs()
            .find(|(key, _)| key == "v")
            .map(|(_, value)| value.to_string())
            .unwrap_or_default();
        return YouTubeLink::Video(id);
    }

    if let Some(rest) = path.strip_prefix("/shorts/") {
        return YouTubeLink::Video(first_segment(rest));
    }

    if let Some(rest) = path.strip_prefix("/@") {
        return YouTubeLink::Handle(first_segment(rest));
    }

    if let Some(rest) = segment_after(path, "/channel/") {
        return YouTubeLink::ChannelId(rest);
    }

    if let Some(rest) = segment_after(path, "/c/").or_else(|| segment_after(path, "/user/")) {
        return YouTubeLink::LegacyName(rest);
    }

    YouTubeLink::Unrecognized
}

/// First path segment, percent-decoded
fn first_segment(path: &str) -> String {
    let segment = path.split('/').next().unwrap_or_default();
    percent_decode_str(segment).decode_utf8_lossy().into_owned()
}

fn segment_after(path: &str, marker: &str) -> Option<String> {
    path.find(marker)
        .map(|index| first_segment(&path[index + marker.len()..]))
}
