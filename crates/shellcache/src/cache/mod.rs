//! Versioned cache generation storage.
//!
//! This module provides the `CacheStore` holding the worker's cache
//! generations. A generation is a named bucket of URL -> response snapshots,
//! persisted as one pretty-printed JSON file per generation and kept
//! authoritative in memory behind an `RwLock`.
//!
//! Two generations exist at a time:
//! - `static-v<version>` for the app shell
//! - `dynamic-v<version>` for external assets fetched at runtime

pub mod entry;
pub mod store;

pub use entry::CacheEntry;
pub use store::{CacheError, CacheStore};
