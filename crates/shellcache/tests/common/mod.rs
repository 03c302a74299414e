//! Shared test fixtures: an in-memory network backend and a recording
//! platform, so the strategies can be exercised without touching the network.
#![allow(dead_code)]

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use url::Url;

use shellcache::{
    CacheStore, CacheWorker, Fetch, FetchError, FetchRequest, FetchResponse, Notification,
    Platform, ResponseSource, WorkerConfig, WorkerEvent,
};

/// Scripted network backend. Routes map full URLs to (status, body); any
/// unrouted URL resolves 404. The offline flag turns every fetch into a
/// transport error, and an optional delay simulates a slow network.
#[derive(Default)]
pub struct MockFetch {
    routes: Mutex<HashMap<String, (u16, Vec<u8>)>>,
    hits: Mutex<HashMap<String, usize>>,
    offline: AtomicBool,
    delay_ms: AtomicUsize,
    /// Appended to the response URL to simulate a redirect resolving at a
    /// different final URL than the one requested.
    final_url_suffix: Mutex<Option<String>>,
}

impl MockFetch {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn route(&self, url: &str, status: u16, body: &[u8]) {
        self.routes
            .lock()
            .unwrap()
            .insert(url.to_string(), (status, body.to_vec()));
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn set_delay_ms(&self, millis: usize) {
        self.delay_ms.store(millis, Ordering::SeqCst);
    }

    pub fn set_final_url_suffix(&self, suffix: &str) {
        *self.final_url_suffix.lock().unwrap() = Some(suffix.to_string());
    }

    pub fn hit_count(&self, url: &str) -> usize {
        self.hits.lock().unwrap().get(url).copied().unwrap_or(0)
    }

    pub fn total_hits(&self) -> usize {
        self.hits.lock().unwrap().values().sum()
    }
}

#[async_trait]
impl Fetch for MockFetch {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse, FetchError> {
        let url = request.url.to_string();
        *self.hits.lock().unwrap().entry(url.clone()).or_default() += 1;

        let delay = self.delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay as u64)).await;
        }

        if self.offline.load(Ordering::SeqCst) {
            return Err(FetchError::Network("offline".to_string()));
        }

        let routed = self.routes.lock().unwrap().get(&url).cloned();
        let (status, body) = routed.unwrap_or((404, b"not found".to_vec()));
        let final_url = match self.final_url_suffix.lock().unwrap().as_ref() {
            Some(suffix) => format!("{}{}", url, suffix),
            None => url,
        };
        Ok(FetchResponse {
            url: final_url,
            status,
            headers: HashMap::new(),
            body: Bytes::from(body),
            source: ResponseSource::Network,
        })
    }
}

/// Platform that records every handoff for assertions.
#[derive(Default)]
pub struct RecordingPlatform {
    pub notifications: Mutex<Vec<Notification>>,
    pub opened: Mutex<Vec<String>>,
    pub claims: AtomicUsize,
}

impl Platform for RecordingPlatform {
    fn show_notification(&self, notification: Notification) {
        self.notifications.lock().unwrap().push(notification);
    }

    fn open_window(&self, url: &str) {
        self.opened.lock().unwrap().push(url.to_string());
    }

    fn claim_clients(&self) {
        self.claims.fetch_add(1, Ordering::SeqCst);
    }
}

pub const ORIGIN: &str = "http://localhost:3000";
pub const FONT_CSS: &str = "https://fonts.googleapis.com/css2?family=Inter";

pub fn test_config(store_dir: &Path, version: &str) -> WorkerConfig {
    WorkerConfig {
        version: version.to_string(),
        origin: Url::parse(ORIGIN).unwrap(),
        static_assets: vec!["/".to_string(), "/static/js/bundle.js".to_string()],
        external_resources: vec![FONT_CSS.to_string()],
        trusted_hosts: vec![
            "fonts.googleapis.com".to_string(),
            "fonts.gstatic.com".to_string(),
            "cdn.jsdelivr.net".to_string(),
            "cdnjs.cloudflare.com".to_string(),
        ],
        store_dir: store_dir.to_path_buf(),
    }
}

/// Script the manifest routes so install succeeds.
pub fn route_manifest(mock: &MockFetch) {
    mock.route("http://localhost:3000/", 200, b"<html>shell</html>");
    mock.route("http://localhost:3000/static/js/bundle.js", 200, b"bundle");
    mock.route(FONT_CSS, 200, b"@font-face{}");
}

/// Build a worker over the mock backend, installed and activated.
pub async fn active_worker(mock: Arc<MockFetch>, store_dir: &Path) -> CacheWorker {
    route_manifest(&mock);
    let store = Arc::new(CacheStore::open(store_dir.to_path_buf()).unwrap());
    let worker = CacheWorker::new(test_config(store_dir, "1.0.0"), mock, store);
    worker.handle_event(WorkerEvent::Install).await.unwrap();
    worker.handle_event(WorkerEvent::Activate).await.unwrap();
    worker
}

pub fn url(raw: &str) -> Url {
    Url::parse(raw).unwrap()
}
