//! Listing selectors and post classification.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Time window applied to `top` listings.
///
/// These are the values the Reddit API accepts for the `t` query parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeFilter {
    /// Past hour.
    Hour,
    /// Past 24 hours.
    Day,
    /// Past week.
    #[default]
    Week,
    /// Past month.
    Month,
    /// Past year.
    Year,
    /// All time.
    All,
}

impl TimeFilter {
    /// The wire value sent as the `t` query parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hour => "hour",
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
            Self::All => "all",
        }
    }
}

impl fmt::Display for TimeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeFilter {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hour" => Ok(Self::Hour),
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "year" => Ok(Self::Year),
            "all" => Ok(Self::All),
            other => Err(AppError::validation(format!(
                "Invalid time filter '{other}' (expected hour, day, week, month, year, or all)"
            ))),
        }
    }
}

/// Which subreddit listing endpoint to scrape.
///
/// `top` accepts a [`TimeFilter`]; `hot` is a point-in-time snapshot and
/// does not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingKind {
    /// Highest-scored submissions within a time window.
    Top,
    /// Currently trending submissions.
    Hot,
}

impl ListingKind {
    /// The API path segment for this listing.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Hot => "hot",
        }
    }
}

impl fmt::Display for ListingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification of a submission by its media payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostKind {
    /// A multi-image gallery post.
    ImageGallery,
    /// A single-image post (`post_hint == "image"`).
    SingleImage,
    /// Text, link, video, or anything else.
    Other,
}

impl PostKind {
    /// The value stored in the `post_type` output column.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ImageGallery => "image_gallery",
            Self::SingleImage => "single_image",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for PostKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
