//! Network fetch abstraction.
//!
//! The worker talks to the network through the [`Fetch`] trait so that the
//! caching strategies can be exercised against an in-memory backend in tests.
//! [`HttpFetcher`] is the reqwest-backed production implementation.

mod client;
mod error;
mod types;

pub use client::HttpFetcher;
pub use error::FetchError;
pub use types::{FetchRequest, FetchResponse, ResponseSource};

use async_trait::async_trait;

/// Network backend for the cache worker.
///
/// A fetch resolves with a response for any HTTP status; it only fails on
/// transport-level problems (unreachable host, timeout). This mirrors the
/// semantics the strategies are written against: HTTP error statuses are
/// inspected via [`FetchResponse::is_success`], never surfaced as `Err`.
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse, FetchError>;
}
