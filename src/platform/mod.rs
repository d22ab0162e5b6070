//! YouTube Data API client and related functionality

pub mod client;
pub mod data_api;
pub mod gateway;
pub mod resolver;
pub mod retry;

pub use client::*;
pub use data_api::*;
pub use gateway::*;
pub use resolver::*;
pub use retry::*;
