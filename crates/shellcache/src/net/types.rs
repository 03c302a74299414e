use std::collections::HashMap;

use bytes::Bytes;
use url::Url;

/// An outgoing request as seen by the worker before routing.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub method: String,
    pub url: Url,
    pub headers: HashMap<String, String>,
    /// Whether this is a page navigation (top-level document load).
    /// Navigations get the cached-root offline fallback in cache-first.
    pub is_navigation: bool,
}

impl FetchRequest {
    pub fn get(url: Url) -> Self {
        Self {
            method: "GET".to_string(),
            url,
            headers: HashMap::new(),
            is_navigation: false,
        }
    }

    pub fn navigation(url: Url) -> Self {
        Self {
            is_navigation: true,
            ..Self::get(url)
        }
    }

    pub fn with_method(url: Url, method: &str) -> Self {
        Self {
            method: method.to_uppercase(),
            ..Self::get(url)
        }
    }

    pub fn is_get(&self) -> bool {
        self.method == "GET"
    }

    /// Canonical cache key for this request.
    pub fn cache_key(&self) -> String {
        self.url.to_string()
    }
}

/// Where a response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseSource {
    Network,
    Cache,
}

impl std::fmt::Display for ResponseSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Network => write!(f, "network"),
            Self::Cache => write!(f, "cache"),
        }
    }
}

/// A resolved response, from either the network or a cache generation.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub url: String,
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Bytes,
    pub source: ResponseSource,
}

impl FetchResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
