//! # subtrends-core
//!
//! Core crate for subtrends. Contains configuration schemas, shared types,
//! the object-store trait, and the unified error system.
//!
//! This crate has **no** internal dependencies on other subtrends crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
