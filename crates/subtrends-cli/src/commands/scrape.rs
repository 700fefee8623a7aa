//! Scrape commands: `top` and `hot`.

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use subtrends_core::config::AppConfig;
use subtrends_core::config::storage::BackendKind;
use subtrends_core::error::AppError;
use subtrends_core::types::{ScrapeBatch, TimeFilter};
use subtrends_reddit::RedditClient;
use subtrends_storage::backends::build_store;

/// Arguments for the `top` command
#[derive(Debug, Args)]
pub struct TopArgs {
    /// Subreddit to scrape
    pub subreddit: String,

    /// Time window for the top listing
    #[arg(short, long, default_value = "week")]
    pub time_filter: TimeFilter,

    /// Maximum number of submissions to fetch
    #[arg(short, long, default_value_t = 1)]
    pub limit: u32,

    /// Persist the batch to storage
    #[arg(short, long)]
    pub save: bool,

    /// Storage backend (defaults to storage.default_backend)
    #[arg(short, long)]
    pub backend: Option<BackendKind>,
}

/// Arguments for the `hot` command
#[derive(Debug, Args)]
pub struct HotArgs {
    /// Subreddit to scrape
    pub subreddit: String,

    /// Maximum number of submissions to fetch
    #[arg(short, long, default_value_t = 1)]
    pub limit: u32,

    /// Persist the batch to storage
    #[arg(short, long)]
    pub save: bool,

    /// Storage backend (defaults to storage.default_backend)
    #[arg(short, long)]
    pub backend: Option<BackendKind>,
}

/// Submission display row
#[derive(Debug, Serialize, Tabled)]
struct SubmissionRow {
    /// Submission id
    id: String,
    /// Title, truncated for table output
    title: String,
    /// Author or `[deleted]`
    author: String,
    /// Score
    score: i64,
    /// Comment count
    comments: i64,
    /// Post type
    #[tabled(rename = "type")]
    post_type: String,
    /// Image count
    images: i64,
    /// Upvote ratio
    ratio: f64,
    /// Creation time (UTC)
    created: String,
}

/// Execute the `top` command
pub async fn execute_top(
    args: &TopArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let client = RedditClient::new(&config.reddit)?;
    let batch = client
        .fetch_top(&args.subreddit, args.time_filter, args.limit)
        .await?;

    present(&batch, format);

    if args.save {
        save(&batch, config, args.backend).await?;
    }
    Ok(())
}

/// Execute the `hot` command
pub async fn execute_hot(
    args: &HotArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let client = RedditClient::new(&config.reddit)?;
    let batch = client.fetch_hot(&args.subreddit, args.limit).await?;

    present(&batch, format);

    if args.save {
        save(&batch, config, args.backend).await?;
    }
    Ok(())
}

/// Print the batch in the selected format
fn present(batch: &ScrapeBatch, format: OutputFormat) {
    if format == OutputFormat::Table {
        println!(
            "Scraped {} submission(s) from r/{} ({}, {})",
            batch.records.len(),
            batch.subreddit,
            batch.listing,
            batch.time_filter_label(),
        );
    }

    let rows: Vec<SubmissionRow> = batch
        .records
        .iter()
        .map(|r| SubmissionRow {
            id: r.id.clone(),
            title: truncate(&r.title, 60),
            author: r.author.clone().unwrap_or_else(|| "[deleted]".to_string()),
            score: r.score,
            comments: r.num_comments,
            post_type: r.post_kind.to_string(),
            images: r.num_images,
            ratio: r.upvote_ratio,
            created: r.created_utc.format("%Y-%m-%d %H:%M:%S").to_string(),
        })
        .collect();

    output::print_list(&rows, format);
}

/// Persist the batch and report the stored key
async fn save(
    batch: &ScrapeBatch,
    config: &AppConfig,
    backend: Option<BackendKind>,
) -> Result<(), AppError> {
    let kind = backend.unwrap_or(config.storage.default_backend);
    let store = build_store(&config.storage, kind).await?;
    let key = subtrends_storage::save_batch(store.as_ref(), batch).await?;

    output::print_success(&format!("Saved batch to {kind} storage at {key}"));
    Ok(())
}

/// Truncate a string for table display
fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_chars.saturating_sub(1)).collect();
        format!("{truncated}…")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_leaves_short_titles_alone() {
        assert_eq!(truncate("short", 60), "short");
    }

    #[test]
    fn truncate_clips_long_titles_with_ellipsis() {
        let long = "x".repeat(100);
        let clipped = truncate(&long, 60);
        assert_eq!(clipped.chars().count(), 60);
        assert!(clipped.ends_with('…'));
    }
}
