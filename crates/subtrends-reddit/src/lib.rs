//! # subtrends-reddit
//!
//! Reddit API client for subtrends. Fetches subreddit listings over the
//! public JSON endpoints or, when OAuth credentials are configured, the
//! authenticated API, and parses them into [`subtrends_core::types::ScrapeBatch`]es.

pub mod client;
pub mod wire;

pub use client::RedditClient;
