//! Core functionality for audience-pulse

pub mod analyzer;
pub mod fetcher;
pub mod models;
pub mod ranking;
pub mod report;

pub use analyzer::*;
pub use fetcher::*;
pub use models::*;
pub use ranking::*;
pub use report::*;
