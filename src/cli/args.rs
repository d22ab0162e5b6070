//! Command line argument parsing

use crate::core::fetcher::FetchConfig;
use crate::platform::client::{ApiClientConfig, DEFAULT_BASE_URL};
use clap::{Parser, ValueEnum};
use std::time::Duration;

/// Audience Pulse - channel and video metadata for social media links
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// YouTube, Facebook or Instagram link
    pub link: String,

    /// YouTube Data API v3 key
    #[arg(long, env = "YOUTUBE_API_KEY", hide_env_values = true, value_name = "KEY")]
    pub api_key: Option<String>,

    /// Max uploads considered per channel
    #[arg(long, default_value = "200")]
    pub max_videos: usize,

    /// Top-level comments fetched per selected video
    #[arg(long, default_value = "20")]
    pub max_comments: u32,

    /// Size of the most-popular window
    #[arg(long, default_value = "5")]
    pub popular: usize,

    /// Size of the least-popular window
    #[arg(long, default_value = "5")]
    pub least_popular: usize,

    /// Attempts per API call for transient errors
    #[arg(long, default_value = "5")]
    pub retries: u32,

    /// Backoff before the first retry (e.g., 500ms, 1s)
    #[arg(long, value_name = "DURATION", default_value = "1s")]
    pub retry_delay: humantime::Duration,

    /// Per-call timeout (e.g., 15s, 1m)
    #[arg(long, value_name = "DURATION", default_value = "15s")]
    pub timeout: humantime::Duration,

    /// Fetch comments one video at a time
    #[arg(long)]
    pub sequential: bool,

    /// Parallel comment requests
    #[arg(long, default_value = "5")]
    pub workers: usize,

    /// Max API requests per second
    #[arg(long, value_name = "RPS")]
    pub rate_limit: Option<u32>,

    /// Data API root
    #[arg(long, hide = true, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Output format
    #[arg(long, value_enum, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Quiet output (only errors)
    #[arg(short, long)]
    pub quiet: bool,
}

/// How results are printed
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    /// Pretty-printed JSON
    Json,
    /// Human-readable overview
    Summary,
}

impl Args {
    /// Get per-call timeout as Duration
    pub fn timeout_duration(&self) -> Duration {
        self.timeout.into()
    }

    /// Get retry backoff as Duration
    pub fn retry_delay_duration(&self) -> Duration {
        self.retry_delay.into()
    }

    /// Aggregation settings selected on the command line
    pub fn fetch_config(&self) -> FetchConfig {
        FetchConfig::default()
            .with_max_videos(self.max_videos)
            .with_max_comments(self.max_comments)
            .with_windows(self.popular, self.least_popular)
            .with_retries(self.retries, self.retry_delay_duration())
            .with_call_timeout(self.timeout_duration())
            .with_concurrency(!self.sequential, self.workers)
    }

    /// Data API client settings selected on the command line
    pub fn api_config(&self) -> ApiClientConfig {
        ApiClientConfig {
            base_url: self.base_url.clone(),
            timeout: self.timeout_duration(),
            requests_per_second: self.rate_limit,
            ..Default::default()
        }
    }

    /// Get output verbosity level
    pub fn verbosity_level(&self) -> VerbosityLevel {
        if self.quiet {
            VerbosityLevel::Quiet
        } else if self.verbose {
            VerbosityLevel::Verbose
        } else {
            VerbosityLevel::Normal
        }
    }
}

/// Output verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerbosityLevel {
    /// Quiet (only errors)
    Quiet,
    /// Normal
    Normal,
    /// Verbose (debug info)
    Verbose,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            link: String::new(),
            api_key: None,
            max_videos: 200,
            max_comments: 20,
            popular: 5,
            least_popular: 5,
            retries: 5,
            retry_delay: humantime::Duration::from(Duration::from_secs(1)),
            timeout: humantime::Duration::from(Duration::from_secs(15)),
            sequential: false,
            workers: 5,
            rate_limit: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            format: OutputFormat::Json,
            verbose: false,
            quiet: false,
        }
    }
}
