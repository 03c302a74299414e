use std::collections::HashMap;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::net::{FetchResponse, ResponseSource};

/// A stored response snapshot keyed by request URL.
///
/// Entries carry their capture time for display purposes only; age never
/// affects serving decisions. There is no TTL - entries live until their
/// whole generation is purged by a version change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub url: String,
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
    pub cached_at: DateTime<Utc>,
}

impl CacheEntry {
    /// Snapshot a network response for storage under `key`.
    ///
    /// The key is the URL of the original request, not the response's final
    /// URL - redirects may leave those different, and lookups always use
    /// the request URL.
    pub fn from_response(key: &str, response: &FetchResponse) -> Self {
        Self {
            url: key.to_string(),
            status: response.status,
            headers: response.headers.clone(),
            body: response.body.to_vec(),
            cached_at: Utc::now(),
        }
    }

    /// Rehydrate this snapshot as a cache-sourced response.
    pub fn into_response(self) -> FetchResponse {
        FetchResponse {
            url: self.url,
            status: self.status,
            headers: self.headers,
            body: Bytes::from(self.body),
            source: ResponseSource::Cache,
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn age_minutes(&self) -> i64 {
        (Utc::now() - self.cached_at).num_minutes()
    }

    /// Human-readable entry age for status output.
    pub fn age_display(&self) -> String {
        let minutes = self.age_minutes();
        if minutes < 1 {
            // Also covers clock skew producing negative ages
            "just now".to_string()
        } else if minutes < 60 {
            format!("{}m ago", minutes)
        } else if minutes < 1440 {
            format!("{}h ago", minutes / 60)
        } else {
            format!("{}d ago", minutes / 1440)
        }
    }
}
