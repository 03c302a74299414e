//! Offline asset cache worker.
//!
//! This crate sits between an application's outgoing HTTP fetches and the
//! network. Each request is classified against the configured origin and a
//! trusted-host allow-list, then served under one of three strategies:
//!
//! - **cache-first** for same-origin app shell assets,
//! - **stale-while-revalidate** for trusted external resources,
//! - **network-first** for everything else.
//!
//! Responses are stored in versioned cache generations (`static-v*`,
//! `dynamic-v*`) that are populated at install time and purged of stale
//! versions at activation time.

pub mod cache;
pub mod config;
pub mod events;
pub mod net;
pub mod platform;
pub mod router;
pub mod worker;

pub use cache::{CacheEntry, CacheError, CacheStore};
pub use config::WorkerConfig;
pub use events::{PushPayload, WorkerEvent, BACKGROUND_SYNC_TAG};
pub use net::{Fetch, FetchError, FetchRequest, FetchResponse, HttpFetcher, ResponseSource};
pub use platform::{Notification, NullPlatform, Platform};
pub use router::{classify, RouteDecision};
pub use worker::{CacheWorker, WorkerError, WorkerState};
