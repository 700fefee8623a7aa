//! Scraped submission records and batch metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::listing::{ListingKind, PostKind, TimeFilter};

/// Timestamp format used in object keys, e.g. `20260829_153012`.
const KEY_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Label used in object keys when no time filter applies (hot listings).
const NO_FILTER_LABEL: &str = "at_point_in_time";

/// One scraped submission, flattened to the output column set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionRecord {
    /// Reddit base36 submission id.
    pub id: String,
    /// Target URL (media URL for image posts, external link otherwise).
    pub url: String,
    /// Site-relative permalink to the comment page.
    pub permalink: String,
    /// Subreddit display name.
    pub subreddit: String,
    /// Author username; `None` when the account was deleted.
    pub author: Option<String>,
    /// Submission title.
    pub title: String,
    /// Creation time in UTC.
    pub created_utc: DateTime<Utc>,
    /// Media classification.
    pub post_kind: PostKind,
    /// Submission score at scrape time.
    pub score: i64,
    /// Comment count at scrape time.
    pub num_comments: i64,
    /// Whether the submission is a gallery post.
    pub is_gallery: bool,
    /// Number of images: gallery item count, 1 for single images, else 0.
    pub num_images: i64,
    /// Upvote ratio in `[0.0, 1.0]`.
    pub upvote_ratio: f64,
}

/// The result of one scrape operation: the records plus the metadata
/// needed to derive a storage location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeBatch {
    /// Subreddit the records were scraped from.
    pub subreddit: String,
    /// Listing endpoint that produced the records.
    pub listing: ListingKind,
    /// Time filter applied to the listing, if any (`top` only).
    pub time_filter: Option<TimeFilter>,
    /// Scrape timestamp, formatted `%Y%m%d_%H%M%S`.
    pub scraped_at: String,
    /// The scraped records, in listing order.
    pub records: Vec<SubmissionRecord>,
}

impl ScrapeBatch {
    /// Create a batch stamped with the current UTC time.
    pub fn new(
        subreddit: impl Into<String>,
        listing: ListingKind,
        time_filter: Option<TimeFilter>,
        records: Vec<SubmissionRecord>,
    ) -> Self {
        Self {
            subreddit: subreddit.into(),
            listing,
            time_filter,
            scraped_at: Utc::now().format(KEY_TIMESTAMP_FORMAT).to_string(),
            records,
        }
    }

    /// Human-readable label for the time filter, used in object keys.
    pub fn time_filter_label(&self) -> &str {
        self.time_filter
            .as_ref()
            .map_or(NO_FILTER_LABEL, |f| f.as_str())
    }

    /// Storage key for this batch, shared by all backends:
    /// `<subreddit>/<listing>/<listing>_<filter>_<timestamp>.parquet`.
    pub fn object_key(&self) -> String {
        format!(
            "{}/{}/{}_{}_{}.parquet",
            self.subreddit,
            self.listing,
            self.listing,
            self.time_filter_label(),
            self.scraped_at
        )
    }

    /// Whether the batch contains no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> SubmissionRecord {
        SubmissionRecord {
            id: "1abc2d".into(),
            url: "https://i.redd.it/example.png".into(),
            permalink: "/r/rust/comments/1abc2d/example/".into(),
            subreddit: "rust".into(),
            author: Some("ferris".into()),
            title: "example".into(),
            created_utc: Utc::now(),
            post_kind: PostKind::SingleImage,
            score: 42,
            num_comments: 7,
            is_gallery: false,
            num_images: 1,
            upvote_ratio: 0.97,
        }
    }

    #[test]
    fn object_key_includes_time_filter() {
        let mut batch = ScrapeBatch::new(
            "rust",
            ListingKind::Top,
            Some(TimeFilter::Week),
            vec![record()],
        );
        batch.scraped_at = "20260829_120000".into();
        assert_eq!(
            batch.object_key(),
            "rust/top/top_week_20260829_120000.parquet"
        );
    }

    #[test]
    fn object_key_uses_placeholder_without_filter() {
        let mut batch = ScrapeBatch::new("rust", ListingKind::Hot, None, vec![record()]);
        batch.scraped_at = "20260829_120000".into();
        assert_eq!(
            batch.object_key(),
            "rust/hot/hot_at_point_in_time_20260829_120000.parquet"
        );
    }

    #[test]
    fn scraped_at_matches_key_timestamp_format() {
        let batch = ScrapeBatch::new("rust", ListingKind::Hot, None, vec![]);
        assert_eq!(batch.scraped_at.len(), 15);
        assert!(batch.is_empty());
    }
}
