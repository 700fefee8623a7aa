//! Wire-format structs for the Reddit listing API.
//!
//! A listing response is an envelope of kind `Listing` whose children are
//! `t3` (submission) things. Only the fields the output columns need are
//! deserialized; everything else is ignored.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use subtrends_core::error::AppError;
use subtrends_core::result::AppResult;
use subtrends_core::types::{PostKind, SubmissionRecord};

/// Top-level listing envelope.
#[derive(Debug, Deserialize)]
pub struct Listing {
    /// Listing payload.
    pub data: ListingData,
}

/// Listing payload holding the submission things.
#[derive(Debug, Deserialize)]
pub struct ListingData {
    /// Submissions in listing order.
    #[serde(default)]
    pub children: Vec<Thing>,
}

/// A `t3` thing wrapping one submission.
#[derive(Debug, Deserialize)]
pub struct Thing {
    /// The submission itself.
    pub data: RawSubmission,
}

/// One submission as returned by the API.
#[derive(Debug, Deserialize)]
pub struct RawSubmission {
    /// Base36 id.
    pub id: String,
    /// Target URL.
    #[serde(default)]
    pub url: String,
    /// Site-relative permalink.
    pub permalink: String,
    /// Subreddit display name.
    pub subreddit: String,
    /// Author name; absent or `"[deleted]"` for removed accounts.
    #[serde(default)]
    pub author: Option<String>,
    /// Title.
    pub title: String,
    /// Creation time, epoch seconds.
    pub created_utc: f64,
    /// Media hint, e.g. `"image"`. Absent for text posts.
    #[serde(default)]
    pub post_hint: Option<String>,
    /// Present and true for gallery posts, absent otherwise.
    #[serde(default)]
    pub is_gallery: Option<bool>,
    /// Gallery item list; only present on gallery posts.
    #[serde(default)]
    pub gallery_data: Option<GalleryData>,
    /// Score at response time.
    pub score: i64,
    /// Comment count at response time.
    pub num_comments: i64,
    /// Upvote ratio in `[0.0, 1.0]`.
    pub upvote_ratio: f64,
}

/// Gallery metadata for multi-image posts.
#[derive(Debug, Deserialize)]
pub struct GalleryData {
    /// One entry per gallery image.
    #[serde(default)]
    pub items: Vec<GalleryItem>,
}

/// One gallery entry.
#[derive(Debug, Deserialize)]
pub struct GalleryItem {
    /// Media id within the gallery.
    #[serde(default)]
    pub media_id: String,
}

impl RawSubmission {
    /// Flatten the wire submission into an output record.
    ///
    /// Gallery posts count their `gallery_data` items, single-image posts
    /// (`post_hint == "image"`) count 1, everything else 0.
    pub fn into_record(self) -> AppResult<SubmissionRecord> {
        let is_gallery = self.is_gallery.unwrap_or(false);

        let (post_kind, num_images) = if is_gallery {
            let count = self
                .gallery_data
                .as_ref()
                .map_or(0, |g| g.items.len() as i64);
            (PostKind::ImageGallery, count)
        } else if self.post_hint.as_deref() == Some("image") {
            (PostKind::SingleImage, 1)
        } else {
            (PostKind::Other, 0)
        };

        let created_utc = DateTime::<Utc>::from_timestamp(self.created_utc as i64, 0)
            .ok_or_else(|| {
                AppError::validation(format!(
                    "Submission {} has out-of-range created_utc {}",
                    self.id, self.created_utc
                ))
            })?;

        let author = self.author.filter(|a| a != "[deleted]");

        Ok(SubmissionRecord {
            id: self.id,
            url: self.url,
            permalink: self.permalink,
            subreddit: self.subreddit,
            author,
            title: self.title,
            created_utc,
            post_kind,
            score: self.score,
            num_comments: self.num_comments,
            is_gallery,
            num_images,
            upvote_ratio: self.upvote_ratio,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission_json(extra: &str) -> String {
        format!(
            r#"{{
                "id": "1abc2d",
                "url": "https://i.redd.it/example.png",
                "permalink": "/r/rust/comments/1abc2d/example/",
                "subreddit": "rust",
                "author": "ferris",
                "title": "example",
                "created_utc": 1756393200.0,
                "score": 42,
                "num_comments": 7,
                "upvote_ratio": 0.97
                {extra}
            }}"#
        )
    }

    #[test]
    fn classifies_single_image_posts() {
        let raw: RawSubmission =
            serde_json::from_str(&submission_json(r#", "post_hint": "image""#)).unwrap();
        let record = raw.into_record().unwrap();
        assert_eq!(record.post_kind, PostKind::SingleImage);
        assert_eq!(record.num_images, 1);
        assert!(!record.is_gallery);
    }

    #[test]
    fn classifies_gallery_posts_with_item_count() {
        let extra = r#",
            "is_gallery": true,
            "gallery_data": {"items": [
                {"media_id": "aaa"}, {"media_id": "bbb"}, {"media_id": "ccc"}
            ]}"#;
        let raw: RawSubmission = serde_json::from_str(&submission_json(extra)).unwrap();
        let record = raw.into_record().unwrap();
        assert_eq!(record.post_kind, PostKind::ImageGallery);
        assert_eq!(record.num_images, 3);
        assert!(record.is_gallery);
    }

    #[test]
    fn classifies_everything_else_as_other() {
        let raw: RawSubmission = serde_json::from_str(&submission_json("")).unwrap();
        let record = raw.into_record().unwrap();
        assert_eq!(record.post_kind, PostKind::Other);
        assert_eq!(record.num_images, 0);
    }

    #[test]
    fn deleted_author_becomes_none() {
        let raw: RawSubmission =
            serde_json::from_str(&submission_json(r#", "author": "[deleted]""#).replacen(
                r#""author": "ferris","#,
                "",
                1,
            ))
            .unwrap();
        let record = raw.into_record().unwrap();
        assert_eq!(record.author, None);
    }

    #[test]
    fn created_utc_converts_from_epoch_seconds() {
        let raw: RawSubmission = serde_json::from_str(&submission_json("")).unwrap();
        let record = raw.into_record().unwrap();
        assert_eq!(record.created_utc.timestamp(), 1_756_393_200);
    }
}
