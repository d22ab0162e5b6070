//! Link dispatch

use crate::core::fetcher::{FetchConfig, YouTubeFetcher};
use crate::core::report::AnalysisOutcome;
use crate::error::PulseError;
use crate::platform::client::ApiClientConfig;
use crate::utils::url::{classify, LinkClass};
use tracing::{error, info};

/// Classifies a link and routes it to the matching analysis
pub struct Analyzer {
    fetcher: Option<YouTubeFetcher>,
}

impl Analyzer {
    /// Create an analyzer. Without an API key YouTube links are answered
    /// with an error instead of failing here.
    pub fn new(
        api_key: Option<String>,
        config: FetchConfig,
        api_config: ApiClientConfig,
    ) -> Result<Self, PulseError> {
        let fetcher = match api_key.filter(|key| !key.trim().is_empty()) {
            Some(key) => Some(YouTubeFetcher::with_api_config(key, config, api_config)?),
            None => None,
        };
        Ok(Self { fetcher })
    }

    pub fn with_fetcher(fetcher: YouTubeFetcher) -> Self {
        Self {
            fetcher: Some(fetcher),
        }
    }

    pub fn fetcher(&self) -> Option<&YouTubeFetcher> {
        self.fetcher.as_ref()
    }

    /// Analyze one link. Every failure is reported in-band.
    pub async fn analyze(&self, link: &str) -> AnalysisOutcome {
        info!("Received analysis request for link: {}", link);

        let youtube = match classify(link) {
            LinkClass::YouTube(youtube) => youtube,
            LinkClass::Facebook => {
                info!("Facebook link received: {}", link);
                return AnalysisOutcome::status("Facebook analysis not yet implemented.");
            }
            LinkClass::Instagram => {
                info!("Instagram link received: {}", link);
                return AnalysisOutcome::status("Instagram analysis not yet implemented.");
            }
            LinkClass::Unknown => {
                info!("Unrecognized link: {}", link);
                return AnalysisOutcome::error("Invalid or unsupported link");
            }
        };

        let Some(fetcher) = &self.fetcher else {
            error!("YouTube link received but no API key is configured");
            return PulseError::ApiKeyMissing.into();
        };

        let result = if youtube.is_video() {
            fetcher
                .video_data(link)
                .await
                .map(|report| AnalysisOutcome::Video(Box::new(report)))
        } else if youtube.is_channel() {
            fetcher.channel_data(link).await.map(AnalysisOutcome::Channel)
        } else {
            Err(PulseError::UnsupportedLink(link.to_string()))
        };

        result.unwrap_or_else(|e| {
            error!("Analysis of {} failed: {}", link, e);
            e.into()
        })
    }
}
