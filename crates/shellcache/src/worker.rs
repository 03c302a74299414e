//! The cache worker: lifecycle, strategy execution, and event dispatch.
//!
//! A `CacheWorker` is a process-wide singleton owning the two cache
//! generations for the configured version. The host environment drives it
//! through [`WorkerEvent`]s: `install` populates the generations from the
//! manifest, `activate` purges stale generations and claims clients, and
//! `fetch` routes one request through the strategy selected by the router.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use url::Url;

use crate::cache::{CacheEntry, CacheError, CacheStore};
use crate::config::WorkerConfig;
use crate::events::{PushPayload, WorkerEvent, BACKGROUND_SYNC_TAG};
use crate::net::{Fetch, FetchError, FetchRequest, FetchResponse};
use crate::platform::{Notification, NullPlatform, Platform};
use crate::router::{classify, RouteDecision};

/// Callback invoked when a recognized background-sync tag fires.
/// Reserved for offline-action replay; no default behavior.
pub type SyncHandler = Arc<dyn Fn(&str) + Send + Sync>;

#[derive(Error, Debug)]
pub enum WorkerError {
    /// A manifest asset could not be fetched during install.
    /// Install is all-or-nothing: one unreachable asset fails the step.
    #[error("install failed for {url}: {reason}")]
    Install { url: String, reason: String },

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("invalid push payload: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Lifecycle state of the worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Idle,
    Installing,
    /// Installed and ready; there is no waiting phase, activation may
    /// follow immediately.
    Installed,
    Activating,
    Active,
}

pub struct CacheWorker {
    config: WorkerConfig,
    fetcher: Arc<dyn Fetch>,
    store: Arc<CacheStore>,
    platform: Arc<dyn Platform>,
    on_sync: Option<SyncHandler>,
    state: RwLock<WorkerState>,
}

impl CacheWorker {
    pub fn new(config: WorkerConfig, fetcher: Arc<dyn Fetch>, store: Arc<CacheStore>) -> Self {
        Self {
            config,
            fetcher,
            store,
            platform: Arc::new(NullPlatform),
            on_sync: None,
            state: RwLock::new(WorkerState::Idle),
        }
    }

    pub fn with_platform(mut self, platform: Arc<dyn Platform>) -> Self {
        self.platform = platform;
        self
    }

    pub fn with_sync_handler(mut self, handler: SyncHandler) -> Self {
        self.on_sync = Some(handler);
        self
    }

    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<CacheStore> {
        &self.store
    }

    pub async fn state(&self) -> WorkerState {
        *self.state.read().await
    }

    async fn set_state(&self, state: WorkerState) {
        *self.state.write().await = state;
    }

    /// Dispatch one host event.
    pub async fn handle_event(
        &self,
        event: WorkerEvent,
    ) -> Result<Option<FetchResponse>, WorkerError> {
        match event {
            WorkerEvent::Install => {
                self.install().await?;
                Ok(None)
            }
            WorkerEvent::Activate => {
                self.activate().await?;
                Ok(None)
            }
            WorkerEvent::Fetch(request) => Ok(Some(self.handle_fetch(&request).await?)),
            WorkerEvent::Sync { tag } => {
                self.handle_sync(&tag);
                Ok(None)
            }
            WorkerEvent::Push { payload } => {
                self.handle_push(&payload)?;
                Ok(None)
            }
            WorkerEvent::NotificationClick => {
                self.platform.open_window(self.config.root_url().as_str());
                Ok(None)
            }
        }
    }

    /// Populate both cache generations from the manifest.
    ///
    /// Fails as a whole if any manifest entry is unreachable or comes back
    /// with a non-success status. On success the worker is immediately ready
    /// for activation.
    pub async fn install(&self) -> Result<(), WorkerError> {
        self.set_state(WorkerState::Installing).await;
        info!(version = %self.config.version, "installing cache worker");

        let static_generation = self.config.static_generation();
        let dynamic_generation = self.config.dynamic_generation();
        self.store.ensure(&static_generation).await?;
        self.store.ensure(&dynamic_generation).await?;

        let static_urls = self
            .config
            .static_assets
            .iter()
            .map(|path| {
                self.config.resolve_asset(path).map_err(|e| WorkerError::Install {
                    url: path.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<Url>, WorkerError>>()?;

        let external_urls = self
            .config
            .external_resources
            .iter()
            .map(|raw| {
                Url::parse(raw).map_err(|e| WorkerError::Install {
                    url: raw.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<Url>, WorkerError>>()?;

        futures::future::try_join(
            self.populate(&static_generation, static_urls),
            self.populate(&dynamic_generation, external_urls),
        )
        .await?;

        // Skip any waiting period: the new instance takes over on the next
        // activation without a reload grace period.
        self.set_state(WorkerState::Installed).await;
        info!("install complete");
        Ok(())
    }

    async fn populate(&self, generation: &str, urls: Vec<Url>) -> Result<(), WorkerError> {
        for url in urls {
            let request = FetchRequest::get(url.clone());
            let response =
                self.fetcher
                    .fetch(&request)
                    .await
                    .map_err(|e| WorkerError::Install {
                        url: url.to_string(),
                        reason: e.to_string(),
                    })?;
            if !response.is_success() {
                return Err(WorkerError::Install {
                    url: url.to_string(),
                    reason: format!("status {}", response.status),
                });
            }
            self.store
                .put(generation, CacheEntry::from_response(&request.cache_key(), &response))
                .await?;
            debug!(generation, url = %url, "precached asset");
        }
        Ok(())
    }

    /// Purge generations from other versions and take control of clients.
    pub async fn activate(&self) -> Result<(), WorkerError> {
        self.set_state(WorkerState::Activating).await;
        let expected = self.config.expected_generations();

        for name in self.store.generation_names().await {
            if !expected.contains(&name) {
                info!(generation = %name, "deleting stale cache generation");
                self.store.delete_generation(&name).await?;
            }
        }
        for name in &expected {
            self.store.ensure(name).await?;
        }

        self.platform.claim_clients();
        self.set_state(WorkerState::Active).await;
        info!(version = %self.config.version, "cache worker active");
        Ok(())
    }

    /// Route one request through the strategy the router selects.
    ///
    /// Until the worker is active, and for non-GET requests, the request
    /// passes through to the network untouched.
    pub async fn handle_fetch(
        &self,
        request: &FetchRequest,
    ) -> Result<FetchResponse, WorkerError> {
        if self.state().await != WorkerState::Active {
            debug!(url = %request.url, "worker not active; passing request through");
            return Ok(self.fetcher.fetch(request).await?);
        }

        match classify(request, &self.config.origin, &self.config.trusted_hosts) {
            RouteDecision::Bypass => Ok(self.fetcher.fetch(request).await?),
            RouteDecision::CacheFirst => self.cache_first(request).await,
            RouteDecision::StaleWhileRevalidate => self.stale_while_revalidate(request).await,
            RouteDecision::NetworkFirst => self.network_first(request).await,
        }
    }

    /// Serve same-origin assets from any generation; populate `static` on
    /// miss. Offline navigations fall back to the cached root document.
    async fn cache_first(&self, request: &FetchRequest) -> Result<FetchResponse, WorkerError> {
        let key = request.cache_key();
        if let Some(entry) = self.store.match_url(&key).await {
            debug!(url = %key, "cache-first hit");
            return Ok(entry.into_response());
        }

        match self.fetcher.fetch(request).await {
            Ok(response) => {
                if response.is_success() {
                    self.store
                        .put(
                            &self.config.static_generation(),
                            CacheEntry::from_response(&key, &response),
                        )
                        .await?;
                }
                Ok(response)
            }
            Err(e) => {
                if request.is_navigation {
                    if let Some(root) = self.store.match_url(self.config.root_url().as_str()).await
                    {
                        warn!(url = %key, error = %e, "offline navigation; serving cached root");
                        return Ok(root.into_response());
                    }
                }
                Err(e.into())
            }
        }
    }

    /// Serve trusted external assets from `dynamic` while refreshing them in
    /// the background. The network leg always runs; it never blocks the
    /// caller when a cached copy exists, and its failures are dropped.
    async fn stale_while_revalidate(
        &self,
        request: &FetchRequest,
    ) -> Result<FetchResponse, WorkerError> {
        let generation = self.config.dynamic_generation();
        let key = request.cache_key();
        let cached = self.store.match_in(&generation, &key).await;

        let fetcher = Arc::clone(&self.fetcher);
        let store = Arc::clone(&self.store);
        let background_request = request.clone();
        let revalidation = tokio::spawn(async move {
            let response = fetcher.fetch(&background_request).await?;
            if response.is_success() {
                if let Err(e) = store
                    .put(
                        &generation,
                        CacheEntry::from_response(&background_request.cache_key(), &response),
                    )
                    .await
                {
                    warn!(url = %background_request.url, error = %e, "failed to store revalidated entry");
                }
            } else {
                debug!(url = %background_request.url, status = response.status, "revalidation returned non-success");
            }
            Ok::<FetchResponse, FetchError>(response)
        });

        match cached {
            Some(entry) => {
                debug!(url = %key, "stale-while-revalidate hit; revalidating in background");
                Ok(entry.into_response())
            }
            None => {
                let response = revalidation
                    .await
                    .map_err(|e| FetchError::Network(format!("revalidation task failed: {e}")))??;
                Ok(response)
            }
        }
    }

    /// Fetch fresh, cache successes into `dynamic`, and fall back to any
    /// cached copy when the network is unreachable.
    async fn network_first(&self, request: &FetchRequest) -> Result<FetchResponse, WorkerError> {
        let key = request.cache_key();
        match self.fetcher.fetch(request).await {
            Ok(response) => {
                if response.is_success() {
                    self.store
                        .put(
                            &self.config.dynamic_generation(),
                            CacheEntry::from_response(&key, &response),
                        )
                        .await?;
                }
                Ok(response)
            }
            Err(e) => {
                if let Some(entry) = self.store.match_url(&key).await {
                    debug!(url = %key, error = %e, "network-first offline; serving cached copy");
                    Ok(entry.into_response())
                } else {
                    Err(e.into())
                }
            }
        }
    }

    fn handle_sync(&self, tag: &str) {
        if tag != BACKGROUND_SYNC_TAG {
            debug!(tag, "ignoring unrecognized sync tag");
            return;
        }
        match &self.on_sync {
            Some(handler) => {
                info!(tag, "background sync");
                handler(tag);
            }
            None => info!(tag, "background sync: no handler registered"),
        }
    }

    fn handle_push(&self, payload: &str) -> Result<(), WorkerError> {
        let payload: PushPayload = serde_json::from_str(payload)?;
        self.platform
            .show_notification(Notification::new(payload.title, payload.body));
        Ok(())
    }
}
