//! The offline worker: event dispatch, lifecycle, and the four strategies.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use bridge_traits::fetch::{FetchRequest, FetchResponse, Fetcher, RequestDestination};
use bridge_traits::notifications::{
    Notification, NotificationAction, NotificationPresenter, WindowOpener,
};
use bridge_traits::time::{Clock, SystemClock};
use bytes::Bytes;
use tokio::sync::RwLock;
use tracing::{debug, error, info, instrument, warn};

use core_cache::{CacheKey, CacheStorage, CachedResponse};
use core_runtime::config::WorkerConfig;
use core_runtime::events::{ClientHub, ClientMessage, ControlMessage};

use crate::error::{Result, RouterError};
use crate::messages::{PushPayload, SyncTag, ACTION_DISMISS, ACTION_VIEW, PERIODIC_BACKUP_TAG};
use crate::routes::{RequestClass, RouteTable};
use crate::strategy;

/// Everything the platform can hand the worker, as one tagged variant.
#[derive(Debug)]
pub enum WorkerEvent {
    /// A new worker version is being installed.
    Install,
    /// This worker version is taking over.
    Activate,
    /// An outgoing request was intercepted.
    Fetch(FetchRequest),
    /// A page sent a maintenance command.
    Message(ControlMessage),
    /// A background sync registration fired.
    Sync(SyncTag),
    /// A periodic sync registration fired.
    PeriodicSync(String),
    /// A push message arrived, possibly with a payload.
    Push(Option<Bytes>),
    /// The user activated a notification action.
    NotificationClick(String),
}

impl WorkerEvent {
    fn kind(&self) -> &'static str {
        match self {
            WorkerEvent::Install => "install",
            WorkerEvent::Activate => "activate",
            WorkerEvent::Fetch(_) => "fetch",
            WorkerEvent::Message(_) => "message",
            WorkerEvent::Sync(_) => "sync",
            WorkerEvent::PeriodicSync(_) => "periodicsync",
            WorkerEvent::Push(_) => "push",
            WorkerEvent::NotificationClick(_) => "notificationclick",
        }
    }
}

/// What handling an event produced.
#[derive(Debug)]
pub enum EventOutcome {
    /// A response for the intercepted request.
    Respond(FetchResponse),
    /// The event was side-effect-only.
    Done,
}

/// Where the worker is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecyclePhase {
    /// Created but not yet installed.
    Idle,
    /// Shell precached, ready to take over.
    Installed,
    /// Controlling all open pages.
    Active,
}

/// The offline cache router.
///
/// One instance per worker version. Each event is handled independently; the
/// only shared state is the cache storage, which is an append/overwrite
/// keyed store, so concurrent handlers cannot corrupt it.
///
/// # Example
///
/// ```ignore
/// use core_router::{OfflineWorker, WorkerEvent};
///
/// let worker = OfflineWorker::new(config, storage, fetcher)?;
/// worker.handle_event(WorkerEvent::Install).await?;
/// worker.handle_event(WorkerEvent::Activate).await?;
///
/// let outcome = worker.handle_event(WorkerEvent::Fetch(request)).await?;
/// ```
pub struct OfflineWorker {
    config: WorkerConfig,
    routes: RouteTable,
    storage: Arc<CacheStorage>,
    fetcher: Arc<dyn Fetcher>,
    hub: ClientHub,
    clock: Arc<dyn Clock>,
    notifier: Option<Arc<dyn NotificationPresenter>>,
    windows: Option<Arc<dyn WindowOpener>>,
    phase: RwLock<LifecyclePhase>,
    skip_waiting: AtomicBool,
}

impl OfflineWorker {
    /// Create a worker from a validated configuration and its capabilities.
    ///
    /// # Errors
    ///
    /// Fails fast if the configuration does not validate.
    pub fn new(
        config: WorkerConfig,
        storage: Arc<CacheStorage>,
        fetcher: Arc<dyn Fetcher>,
    ) -> Result<Self> {
        config
            .validate()
            .map_err(|e| RouterError::Config(e.to_string()))?;
        let routes = RouteTable::new(&config)?;

        Ok(Self {
            config,
            routes,
            storage,
            fetcher,
            hub: ClientHub::default(),
            clock: Arc::new(SystemClock),
            notifier: None,
            windows: None,
            phase: RwLock::new(LifecyclePhase::Idle),
            skip_waiting: AtomicBool::new(false),
        })
    }

    /// Set the notification presenter for push messages.
    pub fn with_notifications(mut self, presenter: Arc<dyn NotificationPresenter>) -> Self {
        self.notifier = Some(presenter);
        self
    }

    /// Set the window opener for notification actions.
    pub fn with_window_opener(mut self, opener: Arc<dyn WindowOpener>) -> Self {
        self.windows = Some(opener);
        self
    }

    /// Replace the time source. Tests use this for fixed timestamps.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// The hub page clients connect to for worker messages.
    pub fn clients(&self) -> &ClientHub {
        &self.hub
    }

    /// The namespace store this worker routes through.
    pub fn storage(&self) -> &CacheStorage {
        &self.storage
    }

    /// Current lifecycle phase.
    pub async fn phase(&self) -> LifecyclePhase {
        *self.phase.read().await
    }

    /// Whether the waiting/install gate has been skipped.
    pub fn skip_waiting_requested(&self) -> bool {
        self.skip_waiting.load(Ordering::SeqCst)
    }

    /// Single entry point: dispatch one platform event.
    ///
    /// Never panics; a failing handler logs its error here before it is
    /// returned, so the host can treat the result as advisory for every
    /// event kind except `Fetch`, where `Respond` carries the answer.
    #[instrument(skip(self, event), fields(kind = event.kind()))]
    pub async fn handle_event(&self, event: WorkerEvent) -> Result<EventOutcome> {
        let result = match event {
            WorkerEvent::Install => self.on_install().await.map(|_| EventOutcome::Done),
            WorkerEvent::Activate => self.on_activate().await.map(|_| EventOutcome::Done),
            WorkerEvent::Fetch(request) => {
                self.handle_fetch(request).await.map(EventOutcome::Respond)
            }
            WorkerEvent::Message(message) => {
                self.on_message(message).await.map(|_| EventOutcome::Done)
            }
            WorkerEvent::Sync(tag) => {
                self.on_sync(tag);
                Ok(EventOutcome::Done)
            }
            WorkerEvent::PeriodicSync(tag) => {
                self.on_periodic_sync(&tag);
                Ok(EventOutcome::Done)
            }
            WorkerEvent::Push(payload) => self.on_push(payload).await.map(|_| EventOutcome::Done),
            WorkerEvent::NotificationClick(action) => self
                .on_notification_click(&action)
                .await
                .map(|_| EventOutcome::Done),
        };

        if let Err(e) = &result {
            error!(error = %e, "event handler failed");
        }
        result
    }

    /// Route one intercepted request through its class strategy.
    pub async fn handle_fetch(&self, request: FetchRequest) -> Result<FetchResponse> {
        match self.routes.classify(&request) {
            RequestClass::Navigation => self.navigation_strategy(request).await,
            RequestClass::StaticAsset => self.static_asset_strategy(request).await,
            RequestClass::Api => self.api_strategy(request).await,
            RequestClass::Default => self.default_strategy(request).await,
        }
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    #[instrument(skip(self))]
    async fn on_install(&self) -> Result<()> {
        info!(version = %self.config.version, "installing worker");
        let static_tag = self.config.static_tag();

        // Stage every shell fetch before committing anything: a single
        // failure must leave no partial static namespace behind.
        let mut staged = Vec::with_capacity(self.config.shell_manifest.len());
        for url in &self.config.shell_manifest {
            let request = FetchRequest::get(url.clone());
            let key = self.cache_key(&request);
            let response = self.fetcher.fetch(request).await.map_err(|e| {
                RouterError::InstallFailed(format!("failed to fetch '{}': {}", url, e))
            })?;

            if !response.is_success() {
                return Err(RouterError::InstallFailed(format!(
                    "'{}' returned status {}",
                    url, response.status
                )));
            }

            staged.push((
                key,
                CachedResponse::capture(&response, self.clock.now_millis()),
            ));
        }

        let precached = staged.len();
        for (key, entry) in staged {
            self.storage.put(&static_tag, key, entry).await;
        }

        // Replace any waiting predecessor immediately instead of waiting for
        // old clients to close.
        self.request_skip_waiting();
        *self.phase.write().await = LifecyclePhase::Installed;

        info!(precached, tag = %static_tag, "worker installed");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn on_activate(&self) -> Result<()> {
        let static_tag = self.config.static_tag();
        let runtime_tag = self.config.runtime_tag();

        let deleted = self
            .storage
            .retain(&[static_tag.as_str(), runtime_tag.as_str()])
            .await;
        if !deleted.is_empty() {
            info!(?deleted, "removed obsolete cache namespaces");
        }

        // Take control of all open pages without requiring a reload.
        *self.phase.write().await = LifecyclePhase::Active;
        info!(version = %self.config.version, "worker activated");
        Ok(())
    }

    fn request_skip_waiting(&self) {
        if !self.skip_waiting.swap(true, Ordering::SeqCst) {
            debug!("skip-waiting requested");
        }
    }

    // ========================================================================
    // Fetch strategies
    // ========================================================================

    async fn navigation_strategy(&self, request: FetchRequest) -> Result<FetchResponse> {
        let key = self.cache_key(&request);
        match self.fetcher.fetch(request).await {
            Ok(response) => {
                self.storage
                    .put(
                        &self.config.runtime_tag(),
                        key,
                        CachedResponse::capture(&response, self.clock.now_millis()),
                    )
                    .await;
                Ok(response)
            }
            Err(e) => {
                debug!(url = %key.url, error = %e, "navigation fetch failed, serving cached document");
                let fallback = self.fallback_document_key();
                match self.storage.match_any(&fallback).await {
                    Some(entry) => Ok(entry.to_response()),
                    None => Err(RouterError::Unreachable {
                        url: key.url,
                        message: e.to_string(),
                    }),
                }
            }
        }
    }

    async fn static_asset_strategy(&self, request: FetchRequest) -> Result<FetchResponse> {
        let key = self.cache_key(&request);
        if let Some(entry) = self.storage.match_any(&key).await {
            debug!(url = %key.url, "static asset served from cache");
            return Ok(entry.to_response());
        }

        let destination = request.destination;
        match self.fetcher.fetch(request).await {
            Ok(response) => {
                if response.is_success() {
                    self.storage
                        .put(
                            &self.config.static_tag(),
                            key,
                            CachedResponse::capture(&response, self.clock.now_millis()),
                        )
                        .await;
                }
                Ok(response)
            }
            Err(e) => {
                warn!(url = %key.url, error = %e, "static asset unreachable, synthesizing fallback");
                if destination == RequestDestination::Image {
                    Ok(strategy::empty_image_response())
                } else {
                    Ok(strategy::offline_text_response())
                }
            }
        }
    }

    async fn api_strategy(&self, request: FetchRequest) -> Result<FetchResponse> {
        let key = self.cache_key(&request);
        match strategy::fetch_with_timeout(
            self.fetcher.as_ref(),
            request,
            self.config.api_timeout,
        )
        .await
        {
            Ok(response) => Ok(response),
            Err(e) => {
                debug!(url = %key.url, error = %e, "api fetch failed, trying cached copy");
                match self.storage.match_any(&key).await {
                    Some(entry) => Ok(entry.to_response()),
                    None => Ok(strategy::offline_api_response()),
                }
            }
        }
    }

    async fn default_strategy(&self, request: FetchRequest) -> Result<FetchResponse> {
        let key = self.cache_key(&request);
        match self.fetcher.fetch(request).await {
            Ok(response) => Ok(response),
            Err(e) => match self.storage.match_any(&key).await {
                Some(entry) => Ok(entry.to_response()),
                None => Err(RouterError::Unreachable {
                    url: key.url,
                    message: e.to_string(),
                }),
            },
        }
    }

    /// Canonical cache key for a request: relative URLs resolve against the
    /// worker scope so `/app.js` and its absolute form share an entry.
    fn cache_key(&self, request: &FetchRequest) -> CacheKey {
        match self.routes.canonical_url(&request.url) {
            Some(url) => CacheKey::new(request.method.as_str(), url),
            None => CacheKey::from_request(request),
        }
    }

    fn fallback_document_key(&self) -> CacheKey {
        let fallback = &self.config.navigation_fallback;
        match self.routes.canonical_url(fallback) {
            Some(url) => CacheKey::get(url),
            None => CacheKey::get(fallback.clone()),
        }
    }

    // ========================================================================
    // Control messages
    // ========================================================================

    #[instrument(skip(self, message))]
    async fn on_message(&self, message: ControlMessage) -> Result<()> {
        match message {
            ControlMessage::CacheUrls { urls } => self.cache_urls(urls).await,
            ControlMessage::ClearCache => {
                self.storage.clear().await;
                Ok(())
            }
            ControlMessage::SkipWaiting => {
                self.request_skip_waiting();
                Ok(())
            }
        }
    }

    /// Bulk-add URLs to the runtime namespace, all-or-nothing like install.
    async fn cache_urls(&self, urls: Vec<String>) -> Result<()> {
        let mut staged = Vec::with_capacity(urls.len());
        for url in &urls {
            let request = FetchRequest::get(url.clone());
            let key = self.cache_key(&request);
            let response = self.fetcher.fetch(request).await.map_err(|e| {
                RouterError::CacheUrlsFailed(format!("failed to fetch '{}': {}", url, e))
            })?;

            if !response.is_success() {
                return Err(RouterError::CacheUrlsFailed(format!(
                    "'{}' returned status {}",
                    url, response.status
                )));
            }

            staged.push((
                key,
                CachedResponse::capture(&response, self.clock.now_millis()),
            ));
        }

        let runtime_tag = self.config.runtime_tag();
        let added = staged.len();
        for (key, entry) in staged {
            self.storage.put(&runtime_tag, key, entry).await;
        }

        info!(added, tag = %runtime_tag, "cached urls into runtime namespace");
        Ok(())
    }

    // ========================================================================
    // Background sync and push
    // ========================================================================

    fn on_sync(&self, tag: SyncTag) {
        let timestamp = self.clock.now_millis();
        let message = match &tag {
            SyncTag::BackupData => ClientMessage::SyncBackup { timestamp },
            SyncTag::BreachCheck => ClientMessage::SyncBreachCheck { timestamp },
            SyncTag::Other(name) => {
                warn!(tag = %name, "ignoring unknown sync tag");
                return;
            }
        };

        debug!(tag = tag.as_str(), "background sync fired");
        self.notify_clients(message);
    }

    fn on_periodic_sync(&self, tag: &str) {
        if tag == PERIODIC_BACKUP_TAG {
            self.notify_clients(ClientMessage::PeriodicBackup {
                timestamp: self.clock.now_millis(),
            });
        } else {
            warn!(tag, "ignoring unknown periodic sync tag");
        }
    }

    /// The router does no data movement itself; it only tells every open
    /// page that now is the moment to act.
    fn notify_clients(&self, message: ClientMessage) {
        match self.hub.post(message) {
            Ok(count) => debug!(clients = count, "posted message to clients"),
            Err(_) => debug!("no connected clients to notify"),
        }
    }

    async fn on_push(&self, payload: Option<Bytes>) -> Result<()> {
        let Some(data) = payload else {
            debug!("push event carried no payload");
            return Ok(());
        };

        let payload = PushPayload::parse(&data);
        let defaults = &self.config.push_defaults;
        let notification = Notification::new(
            payload.title.unwrap_or_else(|| defaults.title.clone()),
            payload.body.unwrap_or_else(|| defaults.body.clone()),
        )
        .icon(defaults.icon.clone())
        .badge(defaults.badge.clone())
        .tag(defaults.tag.clone())
        .require_interaction(true)
        .action(NotificationAction::new(ACTION_VIEW, "View").icon(defaults.badge.clone()))
        .action(NotificationAction::new(ACTION_DISMISS, "Dismiss"));

        match &self.notifier {
            Some(presenter) => {
                presenter.show(notification).await?;
                Ok(())
            }
            None => {
                debug!("no notification presenter configured, dropping push");
                Ok(())
            }
        }
    }

    async fn on_notification_click(&self, action: &str) -> Result<()> {
        if action != ACTION_VIEW {
            debug!(action, "notification dismissed");
            return Ok(());
        }

        match &self.windows {
            Some(opener) => {
                opener.open_window("/").await?;
                Ok(())
            }
            None => {
                debug!("no window opener configured");
                Ok(())
            }
        }
    }
}

impl std::fmt::Debug for OfflineWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OfflineWorker")
            .field("version", &self.config.version)
            .field("skip_waiting", &self.skip_waiting_requested())
            .finish()
    }
}
