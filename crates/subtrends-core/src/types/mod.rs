//! Shared domain types.

pub mod batch;
pub mod listing;

pub use batch::{ScrapeBatch, SubmissionRecord};
pub use listing::{ListingKind, PostKind, TimeFilter};
