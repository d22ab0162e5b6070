//! # audience-pulse
//!
//! Resolve social media links and aggregate YouTube channel and video
//! metadata through the YouTube Data API v3.
//!
//! ## Features
//!
//! - Link classification for YouTube, Facebook and Instagram
//! - Channel resolution from handles, legacy names and channel ids
//! - Popularity ranking of a channel's uploads
//! - Top comments for the most and least popular videos
//! - Retries with exponential backoff and client rebuilds
//!
//! ## Example
//!
//! ```rust,no_run
//! use audience_pulse::{Analyzer, ApiClientConfig, FetchConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let analyzer = Analyzer::new(
//!         std::env::var("YOUTUBE_API_KEY").ok(),
//!         FetchConfig::default().with_windows(3, 3),
//!         ApiClientConfig::default(),
//!     )?;
//!
//!     let outcome = analyzer.analyze("https://www.youtube.com/@SomeHandle").await;
//!     println!("{}", serde_json::to_string_pretty(&outcome)?);
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod core;
pub mod error;
pub mod platform;
pub mod utils;

// Re-export main types
pub use self::core::{AnalysisOutcome, Analyzer, ChannelReport, FetchConfig, VideoReport, YouTubeFetcher};
pub use self::error::PulseError;
pub use self::platform::ApiClientConfig;

/// Result type alias for audience-pulse operations
pub type Result<T> = std::result::Result<T, PulseError>;
