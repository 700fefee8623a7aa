//! Parquet encoding of scraped batches.
//!
//! A batch is written as a single row group into an in-memory buffer, so
//! the same bytes can go to any backend. Column names match the original
//! dataset layout (`post_type`, `num_of_images`).

use bytes::Bytes;
use parquet::file::writer::SerializedFileWriter;
use parquet::record::RecordWriter;
use parquet_derive::ParquetRecordWriter;

use subtrends_core::error::{AppError, ErrorKind};
use subtrends_core::result::AppResult;
use subtrends_core::types::{ScrapeBatch, SubmissionRecord};

/// One output row. Field order defines column order.
#[derive(Debug, ParquetRecordWriter)]
struct BatchRow {
    id: String,
    url: String,
    permalink: String,
    subreddit: String,
    author: Option<String>,
    title: String,
    /// Epoch milliseconds, UTC.
    created_utc: i64,
    post_type: String,
    score: i64,
    num_comments: i64,
    is_gallery: bool,
    num_of_images: i64,
    upvote_ratio: f64,
}

impl From<&SubmissionRecord> for BatchRow {
    fn from(record: &SubmissionRecord) -> Self {
        Self {
            id: record.id.clone(),
            url: record.url.clone(),
            permalink: record.permalink.clone(),
            subreddit: record.subreddit.clone(),
            author: record.author.clone(),
            title: record.title.clone(),
            created_utc: record.created_utc.timestamp_millis(),
            post_type: record.post_kind.to_string(),
            score: record.score,
            num_comments: record.num_comments,
            is_gallery: record.is_gallery,
            num_of_images: record.num_images,
            upvote_ratio: record.upvote_ratio,
        }
    }
}

/// Encode a batch into a Parquet buffer.
///
/// Empty batches are rejected; an empty file would silently hide a scrape
/// that returned nothing.
pub fn encode_batch(batch: &ScrapeBatch) -> AppResult<Bytes> {
    if batch.is_empty() {
        return Err(AppError::validation(format!(
            "Batch for r/{} is empty, nothing to encode",
            batch.subreddit
        )));
    }

    let rows: Vec<BatchRow> = batch.records.iter().map(BatchRow::from).collect();
    let schema = rows.as_slice().schema().map_err(encode_error)?;

    let mut buffer = Vec::new();
    let mut writer =
        SerializedFileWriter::new(&mut buffer, schema, Default::default()).map_err(encode_error)?;
    let mut row_group = writer.next_row_group().map_err(encode_error)?;
    rows.as_slice()
        .write_to_row_group(&mut row_group)
        .map_err(encode_error)?;
    row_group.close().map_err(encode_error)?;
    writer.close().map_err(encode_error)?;

    Ok(Bytes::from(buffer))
}

fn encode_error(err: parquet::errors::ParquetError) -> AppError {
    AppError::with_source(
        ErrorKind::Serialization,
        format!("Parquet encoding failed: {err}"),
        err,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use parquet::file::reader::{FileReader, SerializedFileReader};
    use parquet::record::RowAccessor;
    use subtrends_core::types::{ListingKind, PostKind, TimeFilter};

    fn record(id: &str, author: Option<&str>) -> SubmissionRecord {
        SubmissionRecord {
            id: id.into(),
            url: "https://i.redd.it/example.png".into(),
            permalink: format!("/r/rust/comments/{id}/example/"),
            subreddit: "rust".into(),
            author: author.map(Into::into),
            title: "example".into(),
            created_utc: chrono::Utc.with_ymd_and_hms(2026, 8, 29, 12, 0, 0).unwrap(),
            post_kind: PostKind::SingleImage,
            score: 42,
            num_comments: 7,
            is_gallery: false,
            num_images: 1,
            upvote_ratio: 0.97,
        }
    }

    #[test]
    fn encodes_rows_with_expected_columns() {
        let batch = ScrapeBatch::new(
            "rust",
            ListingKind::Top,
            Some(TimeFilter::Week),
            vec![record("aaa111", Some("ferris")), record("bbb222", None)],
        );

        let bytes = encode_batch(&batch).unwrap();
        let reader = SerializedFileReader::new(bytes).unwrap();
        let file_meta = reader.metadata().file_metadata();
        assert_eq!(file_meta.num_rows(), 2);

        let schema = file_meta.schema_descr();
        let columns: Vec<String> = (0..schema.num_columns())
            .map(|i| schema.column(i).name().to_string())
            .collect();
        assert_eq!(
            columns,
            vec![
                "id",
                "url",
                "permalink",
                "subreddit",
                "author",
                "title",
                "created_utc",
                "post_type",
                "score",
                "num_comments",
                "is_gallery",
                "num_of_images",
                "upvote_ratio",
            ]
        );
    }

    #[test]
    fn encoded_values_round_trip() {
        let created = chrono::Utc.with_ymd_and_hms(2026, 8, 29, 12, 0, 0).unwrap();
        let batch = ScrapeBatch::new(
            "rust",
            ListingKind::Hot,
            None,
            vec![record("aaa111", Some("ferris"))],
        );

        let bytes = encode_batch(&batch).unwrap();
        let reader = SerializedFileReader::new(bytes).unwrap();
        let row = reader
            .get_row_iter(None)
            .unwrap()
            .next()
            .unwrap()
            .unwrap();

        assert_eq!(row.get_string(0).unwrap().as_str(), "aaa111");
        assert_eq!(row.get_string(7).unwrap().as_str(), "single_image");
        assert_eq!(row.get_long(6).unwrap(), created.timestamp_millis());
        assert!(!row.get_bool(10).unwrap());
        assert_eq!(row.get_long(11).unwrap(), 1);
    }

    #[test]
    fn empty_batch_is_rejected() {
        let batch = ScrapeBatch::new("rust", ListingKind::Hot, None, vec![]);
        let err = encode_batch(&batch).unwrap_err();
        assert_eq!(err.kind, subtrends_core::error::ErrorKind::Validation);
    }
}
