//! Request classification.
//!
//! Pure routing of an outgoing request to a caching strategy. No side
//! effects; identical inputs always classify identically.

use url::Url;

use crate::net::FetchRequest;

/// Which strategy handles a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    /// Non-GET requests pass through to the network untouched.
    Bypass,
    /// Same-origin assets: serve from cache, populate on miss.
    CacheFirst,
    /// Trusted external hosts: serve cached copy, refresh in background.
    StaleWhileRevalidate,
    /// Everything else: network wins, cache is the offline fallback.
    NetworkFirst,
}

/// Classify a request against the page origin and trusted-host allow-list.
pub fn classify(request: &FetchRequest, origin: &Url, trusted_hosts: &[String]) -> RouteDecision {
    if !request.is_get() {
        return RouteDecision::Bypass;
    }

    if request.url.origin() == origin.origin() {
        return RouteDecision::CacheFirst;
    }

    let trusted = request
        .url
        .host_str()
        .map(|host| trusted_hosts.iter().any(|t| t == host))
        .unwrap_or(false);

    if trusted {
        RouteDecision::StaleWhileRevalidate
    } else {
        RouteDecision::NetworkFirst
    }
}
