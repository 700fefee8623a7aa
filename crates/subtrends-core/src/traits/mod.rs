//! Traits implemented by the backend crates.

pub mod object_store;
