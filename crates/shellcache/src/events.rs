//! Host events delivered to the worker.
//!
//! The host environment drives the worker entirely through these events;
//! dispatch is an explicit match in `CacheWorker::handle_event`.

use serde::{Deserialize, Serialize};

use crate::net::FetchRequest;

/// Sync tag recognized for offline-action replay.
pub const BACKGROUND_SYNC_TAG: &str = "background-sync";

/// An event from the host environment.
#[derive(Debug, Clone)]
pub enum WorkerEvent {
    /// Populate the cache generations from the manifest.
    Install,
    /// Purge stale generations and take control of clients.
    Activate,
    /// Route one outgoing request through the strategies.
    Fetch(FetchRequest),
    /// Connectivity restored; tag identifies the sync operation.
    Sync { tag: String },
    /// Incoming push message carrying a JSON payload.
    Push { payload: String },
    /// User activated a previously shown notification.
    NotificationClick,
}

/// JSON payload of a push message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushPayload {
    pub title: String,
    pub body: String,
}
