//! The offline cache agent: lifecycle, fetch handling, and event stubs.
//!
//! One agent serves one origin and one cache generation. `install` populates
//! the generation's store all-or-nothing, `activate` retires every older
//! generation, and `handle_fetch` serves intercepted requests cache-first
//! with network and offline fallbacks. Sync, push, and notification-click
//! events are handled but mostly forward-looking.

use crate::host::HostRuntime;
use crate::lifecycle::LifecycleState;
use crate::notifications::{ACTION_EXPLORE, Notification};
use crate::request::FetchRequest;
use crate::response::{ServeSource, ServedResponse, stored_from_fetch};
use pantry_client::{FetchError, FetchResponse, Method, Network, StatusCode, resolve, same_origin};
use pantry_core::{AppConfig, CacheStorage, Error, StoredResponse};
use std::sync::Arc;
use tokio::sync::{Mutex, Semaphore};
use tokio::task::{JoinHandle, JoinSet};
use url::Url;

/// Sync tag the agent recognizes.
pub const SYNC_TAG: &str = "background-sync";

/// How many manifest assets are fetched at once during install.
const INSTALL_CONCURRENCY: usize = 4;

/// Result of handling an intercepted fetch.
#[derive(Debug)]
pub enum FetchOutcome {
    /// The agent declines this request; the host lets it proceed untouched.
    PassThrough,
    /// The agent produced a response.
    Served {
        response: ServedResponse,
        source: ServeSource,
        /// Handle of the detached cache write, when one was started.
        /// Dropping it is fine; the write keeps running on its own.
        cache_write: Option<JoinHandle<()>>,
    },
    /// Offline with no fallback available; the host surfaces its own
    /// network error.
    Unavailable,
}

/// Result of a sync event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The tag was recognized and its work ran.
    Completed,
    /// Unknown tag; nothing to do.
    Ignored,
}

/// Offline-first cache agent for a fixed origin.
pub struct OfflineCacheAgent {
    cache: CacheStorage,
    network: Arc<dyn Network>,
    host: Arc<dyn HostRuntime>,
    generation: String,
    manifest: Vec<String>,
    origin: Url,
    offline_fallback: String,
    state: Mutex<LifecycleState>,
}

impl OfflineCacheAgent {
    /// Build an agent from configuration and its collaborators.
    pub fn new(
        cache: CacheStorage, network: Arc<dyn Network>, host: Arc<dyn HostRuntime>, config: &AppConfig,
    ) -> Result<Self, Error> {
        let origin = Url::parse(&config.origin).map_err(|e| Error::InvalidUrl(format!("{}: {e}", config.origin)))?;

        Ok(Self {
            cache,
            network,
            host,
            generation: config.current_generation.clone(),
            manifest: config.asset_manifest.clone(),
            origin,
            offline_fallback: config.offline_fallback.clone(),
            state: Mutex::new(LifecycleState::Idle),
        })
    }

    /// Current lifecycle state.
    pub async fn state(&self) -> LifecycleState {
        *self.state.lock().await
    }

    /// Name of the cache generation this agent serves.
    pub fn generation(&self) -> &str {
        &self.generation
    }

    async fn set_state(&self, next: LifecycleState) {
        *self.state.lock().await = next;
    }

    /// Install this generation: fetch every manifest asset and store them
    /// all, or none.
    ///
    /// Assets are fetched concurrently (bounded) and committed in a single
    /// transaction, so a failed install never leaves a partially populated
    /// store. On success the agent is `Waiting` and has asked the host to
    /// skip waiting; on failure it returns to `Idle`.
    pub async fn install(&self) -> Result<(), Error> {
        tracing::info!(generation = %self.generation, "installing");
        self.set_state(LifecycleState::Installing).await;

        match self.populate_store().await {
            Ok(assets) => {
                self.set_state(LifecycleState::Waiting).await;
                self.host.skip_waiting().await;
                tracing::info!(generation = %self.generation, assets, "installation complete");
                Ok(())
            }
            Err(err) => {
                self.set_state(LifecycleState::Idle).await;
                tracing::error!(generation = %self.generation, error = %err, "installation failed");
                Err(err)
            }
        }
    }

    /// Fetch the asset manifest and commit it to this generation's store.
    ///
    /// The store is only created once every asset is in hand.
    async fn populate_store(&self) -> Result<usize, Error> {
        let snapshots = self.fetch_manifest().await?;
        self.cache.open_store(&self.generation).await?;
        self.cache.put_entries(&self.generation, &snapshots).await?;
        Ok(snapshots.len())
    }

    /// Fetch every manifest asset with bounded concurrency.
    ///
    /// Fails fast: the first asset that errors or comes back non-2xx aborts
    /// the remaining fetches and fails the install.
    async fn fetch_manifest(&self) -> Result<Vec<StoredResponse>, Error> {
        let semaphore = Arc::new(Semaphore::new(INSTALL_CONCURRENCY));
        let mut join_set = JoinSet::new();

        for path in &self.manifest {
            let url = resolve(&self.origin, path).map_err(|e| Error::InvalidUrl(format!("{path}: {e}")))?;

            let permit = semaphore.clone().acquire_owned().await.map_err(|e| Error::TaskFailed(e.to_string()))?;
            let network = self.network.clone();

            join_set.spawn(async move {
                // permit rides with the task; dropping it frees a slot
                let _permit = permit;
                let result = network.fetch(Method::GET, &url).await;
                (url, result)
            });
        }

        let mut snapshots = Vec::with_capacity(self.manifest.len());

        while let Some(joined) = join_set.join_next().await {
            let (url, result) = joined.map_err(|e| Error::TaskFailed(e.to_string()))?;

            match result {
                Ok(fetched) if fetched.status.is_success() => {
                    tracing::debug!(url = %url, "cached app shell asset");
                    snapshots.push(stored_from_fetch(&Method::GET, &fetched));
                }
                Ok(fetched) => {
                    join_set.shutdown().await;
                    return Err(Error::InstallFailed {
                        url: url.to_string(),
                        reason: format!("status {}", fetched.status.as_u16()),
                    });
                }
                Err(err) => {
                    join_set.shutdown().await;
                    return Err(Error::InstallFailed { url: url.to_string(), reason: err.to_string() });
                }
            }
        }

        Ok(snapshots)
    }

    /// Activate this generation: delete every other store, then take over.
    ///
    /// Cleanup is best-effort. A store that fails to delete is logged and
    /// left for a later activation; activation itself always completes.
    pub async fn activate(&self) {
        tracing::info!(generation = %self.generation, "activating");

        match self.cache.store_names().await {
            Ok(names) => {
                for name in names.into_iter().filter(|n| n != &self.generation) {
                    match self.cache.delete_store(&name).await {
                        Ok(_) => tracing::info!(store = %name, "deleted old cache store"),
                        Err(err) => tracing::warn!(store = %name, error = %err, "failed to delete old cache store"),
                    }
                }
            }
            Err(err) => tracing::warn!(error = %err, "could not enumerate cache stores"),
        }

        self.set_state(LifecycleState::Active).await;
        self.host.claim_clients().await;
        tracing::info!(generation = %self.generation, "activation complete");
    }

    /// Bring a restarted agent back to `Active`, installing first only if
    /// this generation's store is missing.
    ///
    /// Lets a host reuse an on-disk cache across restarts without refetching
    /// the manifest every time.
    pub async fn resume(&self) -> Result<(), Error> {
        if self.cache.has_store(&self.generation).await? {
            tracing::info!(generation = %self.generation, "store already present, skipping install");
        } else {
            self.install().await?;
        }

        self.activate().await;
        Ok(())
    }

    /// Handle an intercepted request: cache first, then network with
    /// opportunistic caching, then offline fallbacks.
    ///
    /// Only cache storage failures surface as errors; a failed network fetch
    /// turns into one of the offline fallbacks instead.
    pub async fn handle_fetch(&self, request: &FetchRequest) -> Result<FetchOutcome, Error> {
        if !request.is_intercepted() {
            tracing::debug!(method = %request.method, url = %request.url, "request passes through");
            return Ok(FetchOutcome::PassThrough);
        }

        if let Some(stored) = self.cache.match_request(request.method.as_str(), request.url.as_str()).await? {
            tracing::debug!(url = %request.url, "serving from cache");
            return Ok(FetchOutcome::Served {
                response: ServedResponse::from_stored(&stored),
                source: ServeSource::Cache,
                cache_write: None,
            });
        }

        tracing::debug!(url = %request.url, "fetching from network");

        match self.network.fetch(request.method.clone(), &request.url).await {
            Ok(fetched) => {
                let cache_write = self.spawn_cache_write(request, &fetched);
                Ok(FetchOutcome::Served {
                    response: ServedResponse::from_fetch(&fetched),
                    source: ServeSource::Network,
                    cache_write,
                })
            }
            Err(err) => self.serve_offline(request, err).await,
        }
    }

    /// Produce the offline response for a request whose network fetch
    /// failed: navigations get the cached fallback document, everything
    /// else gets the synthetic placeholder.
    async fn serve_offline(&self, request: &FetchRequest, err: FetchError) -> Result<FetchOutcome, Error> {
        tracing::warn!(url = %request.url, error = %err, "network fetch failed");

        if request.is_navigation() {
            let fallback_url = match resolve(&self.origin, &self.offline_fallback) {
                Ok(url) => url,
                Err(e) => {
                    tracing::warn!(fallback = %self.offline_fallback, error = %e, "offline fallback URL unusable");
                    return Ok(FetchOutcome::Unavailable);
                }
            };

            if let Some(stored) = self.cache.match_request(Method::GET.as_str(), fallback_url.as_str()).await? {
                tracing::info!(url = %request.url, "serving offline fallback document");
                return Ok(FetchOutcome::Served {
                    response: ServedResponse::from_stored(&stored),
                    source: ServeSource::DocumentFallback,
                    cache_write: None,
                });
            }

            tracing::warn!(url = %request.url, "offline fallback document not cached");
            return Ok(FetchOutcome::Unavailable);
        }

        tracing::info!(url = %request.url, "serving offline placeholder");
        Ok(FetchOutcome::Served {
            response: ServedResponse::offline_placeholder(),
            source: ServeSource::OfflinePlaceholder,
            cache_write: None,
        })
    }

    /// Start a detached write of a fresh network response into the current
    /// generation's store.
    ///
    /// Only plain 200 responses that landed on our origin are stored. The
    /// serve path never waits on this write; failures are logged and the
    /// entry is simply absent next time.
    fn spawn_cache_write(&self, request: &FetchRequest, fetched: &FetchResponse) -> Option<JoinHandle<()>> {
        if fetched.status != StatusCode::OK || !same_origin(&fetched.final_url, &self.origin) {
            return None;
        }

        let cache = self.cache.clone();
        let store = self.generation.clone();
        let snapshot = stored_from_fetch(&request.method, fetched);

        Some(tokio::spawn(async move {
            if let Err(err) = cache.open_store(&store).await {
                tracing::warn!(store = %store, error = %err, "cache store open failed");
                return;
            }
            match cache.put_entry(&store, &snapshot).await {
                Ok(()) => tracing::debug!(store = %store, url = %snapshot.url, "cached network response"),
                Err(err) => tracing::warn!(store = %store, url = %snapshot.url, error = %err, "cache write failed"),
            }
        }))
    }

    /// Handle a background sync event.
    ///
    /// Recognizes [`SYNC_TAG`]; the refresh work behind it has no
    /// implementation yet, so completing is just an acknowledgement.
    pub async fn handle_sync(&self, tag: &str) -> SyncOutcome {
        tracing::info!(tag, "background sync");

        if tag == SYNC_TAG {
            tracing::info!("performing background sync");
            SyncOutcome::Completed
        } else {
            SyncOutcome::Ignored
        }
    }

    /// Handle a push event by showing the standing "new recipes"
    /// notification.
    ///
    /// The push payload is ignored; every push shows the same notification.
    /// Returns the descriptor the host was asked to display.
    pub async fn handle_push(&self, payload: Option<&[u8]>) -> Notification {
        tracing::info!(payload_bytes = payload.map_or(0, <[u8]>::len), "push received");

        let notification = Notification::recipes_available();
        self.host.show_notification(&notification).await;
        notification
    }

    /// Handle a click on a displayed notification.
    ///
    /// The notification is always dismissed; the explore action also opens
    /// a window at the origin root.
    pub async fn handle_notification_click(&self, action: &str) {
        tracing::info!(action, "notification click");

        self.host.close_notification().await;

        if action == ACTION_EXPLORE
            && let Ok(url) = resolve(&self.origin, "./")
        {
            self.host.open_window(&url).await;
        }
    }
}
