//! The quiz store: the single source of truth for the quiz list
//!
//! The store fetches the feed from the configured source URL, publishes the
//! decoded quizzes, keeps the last good body in the on-disk cache and falls
//! back to that cache when the network is unavailable or the body is bad.
//!
//! All store state is mutated by whoever owns the store. Fetches run on
//! spawned tasks and report back through the store's channel; the owner
//! drains that channel with [`QuizStore::next_message`] or
//! [`QuizStore::process_pending`] and the results are applied in order.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local};
use reqwest::Url;
use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::cache::QuizCache;
use crate::data::{decode_quizzes, FetchError, HttpSource, Quiz, QuizSource};
use crate::refresh::{RefreshMessage, RefreshTimer, CHANNEL_CAPACITY};
use crate::settings::{Settings, SettingsStore};

/// Longest a single fetch may take before it is reported as failed
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Reasons a load can fail
///
/// The `Display` text of each variant is the message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// The configured source URL does not parse
    #[error("Bad URL")]
    BadUrl,

    /// The request failed without reaching the server's answer, or the body was empty
    #[error("No data received.")]
    NoData,

    /// The body is not a valid quiz feed
    #[error("Decoding error: {0}")]
    Decode(String),

    /// The cache fallback found no usable feed
    #[error("Offline & no cache available.")]
    CacheUnavailable,
}

/// Where the currently published quiz list came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedOrigin {
    Network,
    Cache,
}

/// Owns the quiz list and keeps it in sync with the remote feed
pub struct QuizStore<S: QuizSource = HttpSource> {
    /// Currently published quizzes
    quizzes: Vec<Quiz>,
    /// Origin of the published quizzes, `None` until the first publish
    origin: Option<FeedOrigin>,
    /// When the list was last published
    last_refresh: Option<DateTime<Local>>,
    /// Most recent error, kept after the alert is dismissed
    last_error: Option<LoadError>,
    /// Whether the error alert should be shown
    show_error: bool,
    /// Current settings
    settings: Settings,
    /// Where settings are persisted, if anywhere
    settings_store: Option<SettingsStore>,
    /// Where the last good feed is kept, if anywhere
    cache: Option<QuizCache>,
    /// Fetches the feed
    source: Arc<S>,
    /// Sender handed to fetch tasks and the timer
    sender: mpsc::Sender<RefreshMessage>,
    /// Receiver drained by the store's owner
    receiver: mpsc::Receiver<RefreshMessage>,
    /// The auto-refresh timer; replacing it cancels the old one
    timer: Option<RefreshTimer>,
    /// Whether a fetch has been started and not yet applied
    fetching: bool,
    /// Observers of the published list
    published: watch::Sender<Vec<Quiz>>,
}

impl QuizStore<HttpSource> {
    /// Creates a store that fetches over HTTP
    pub fn new(settings: Settings, cache: Option<QuizCache>) -> Self {
        Self::with_source(HttpSource::new(), settings, cache)
    }
}

impl<S: QuizSource> QuizStore<S> {
    /// Creates a store with a custom feed source
    pub fn with_source(source: S, settings: Settings, cache: Option<QuizCache>) -> Self {
        let (sender, receiver) = mpsc::channel(CHANNEL_CAPACITY);
        let (published, _) = watch::channel(Vec::new());
        Self {
            quizzes: Vec::new(),
            origin: None,
            last_refresh: None,
            last_error: None,
            show_error: false,
            settings,
            settings_store: None,
            cache,
            source: Arc::new(source),
            sender,
            receiver,
            timer: None,
            fetching: false,
            published,
        }
    }

    /// Persists settings changes to `store`
    pub fn with_settings_store(mut self, store: SettingsStore) -> Self {
        self.settings_store = Some(store);
        self
    }

    /// Published quizzes
    pub fn quizzes(&self) -> &[Quiz] {
        &self.quizzes
    }

    /// Origin of the published quizzes
    pub fn origin(&self) -> Option<FeedOrigin> {
        self.origin
    }

    /// When the quiz list was last published
    pub fn last_refresh(&self) -> Option<DateTime<Local>> {
        self.last_refresh
    }

    /// Most recent error, if any
    pub fn last_error(&self) -> Option<&LoadError> {
        self.last_error.as_ref()
    }

    /// Message for the error alert
    pub fn error_message(&self) -> String {
        self.last_error
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default()
    }

    /// Whether the error alert should be visible
    pub fn show_error(&self) -> bool {
        self.show_error
    }

    /// Hides the error alert
    pub fn dismiss_error(&mut self) {
        self.show_error = false;
    }

    /// Current settings
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The cache backing the store, if any
    pub fn cache(&self) -> Option<&QuizCache> {
        self.cache.as_ref()
    }

    /// Whether a fetch is outstanding
    pub fn is_fetching(&self) -> bool {
        self.fetching
    }

    /// Period of the running refresh timer
    pub fn timer_period(&self) -> Option<Duration> {
        self.timer.as_ref().map(RefreshTimer::period)
    }

    /// Watches the published quiz list
    pub fn subscribe(&self) -> watch::Receiver<Vec<Quiz>> {
        self.published.subscribe()
    }

    /// Loads once and starts the refresh timer at the configured interval
    pub fn start(&mut self) {
        self.load();
        self.start_timer(self.settings.refresh_period());
    }

    /// Starts fetching the feed from the configured source URL
    ///
    /// The result arrives later as a [`RefreshMessage::FeedFetched`]. A call
    /// made while a fetch is outstanding is skipped. A fetch that takes longer
    /// than [`FETCH_TIMEOUT`] or panics is reported as a failed request, so a
    /// result always arrives.
    pub fn load(&mut self) {
        let url = match Url::parse(&self.settings.source_url) {
            Ok(url) => url,
            Err(err) => {
                warn!(source_url = %self.settings.source_url, %err, "source URL does not parse");
                self.signal(LoadError::BadUrl);
                return;
            }
        };

        if self.fetching {
            debug!("fetch already in flight, skipping load");
            return;
        }
        self.fetching = true;

        let source = Arc::clone(&self.source);
        let sender = self.sender.clone();
        tokio::spawn(async move {
            let result = fetch_with_timeout(source, url).await;
            let _ = sender.send(RefreshMessage::FeedFetched(result)).await;
        });
    }

    /// Starts or restarts the auto-refresh timer
    ///
    /// Any previous timer is cancelled first, so at most one is ever running.
    pub fn start_timer(&mut self, period: Duration) {
        self.timer = None;
        self.timer = Some(RefreshTimer::spawn(period, self.sender.clone()));
    }

    /// Stops the auto-refresh timer
    pub fn stop_timer(&mut self) {
        self.timer = None;
    }

    /// Waits for the next message from the timer or a fetch task
    pub async fn next_message(&mut self) -> Option<RefreshMessage> {
        self.receiver.recv().await
    }

    /// Returns a pending message without waiting
    pub fn try_next_message(&mut self) -> Option<RefreshMessage> {
        self.receiver.try_recv().ok()
    }

    /// Applies every pending message and returns how many there were
    pub fn process_pending(&mut self) -> usize {
        let mut handled = 0;
        while let Some(message) = self.try_next_message() {
            self.handle_message(message);
            handled += 1;
        }
        handled
    }

    /// Applies one message from the timer or a fetch task
    pub fn handle_message(&mut self, message: RefreshMessage) {
        match message {
            RefreshMessage::Tick => {
                debug!("refresh timer fired");
                self.load();
            }
            RefreshMessage::FeedFetched(result) => {
                self.fetching = false;
                let _ = self.apply_fetch(result);
            }
        }
    }

    /// Applies the result of a fetch
    ///
    /// # Behavior
    /// - Offline: falls back to the cache
    /// - Other transport failure or empty body: signals "No data received."
    /// - Body decodes: publishes it, writes it to the cache and clears the alert
    /// - Body does not decode: signals the decode error, then falls back to the cache
    ///
    /// # Returns
    /// * `Ok(FeedOrigin)` - Where the newly published list came from
    /// * `Err(LoadError)` - Nothing was published; the previous list is kept
    pub fn apply_fetch(
        &mut self,
        result: Result<Vec<u8>, FetchError>,
    ) -> Result<FeedOrigin, LoadError> {
        let bytes = match result {
            Ok(bytes) => bytes,
            Err(err) if err.is_not_connected() => {
                info!(%err, "offline, falling back to cache");
                return self.load_from_disk();
            }
            Err(err) => {
                warn!(%err, "quiz feed request failed");
                return Err(self.signal(LoadError::NoData));
            }
        };

        if bytes.is_empty() {
            return Err(self.signal(LoadError::NoData));
        }

        match decode_quizzes(&bytes) {
            Ok(quizzes) => {
                self.publish(quizzes, FeedOrigin::Network);
                self.show_error = false;
                self.last_error = None;
                if let Some(ref cache) = self.cache {
                    if let Err(err) = cache.write(&bytes) {
                        warn!(%err, "failed to write quiz cache");
                    }
                }
                Ok(FeedOrigin::Network)
            }
            Err(err) => {
                self.signal(LoadError::Decode(err.to_string()));
                self.load_from_disk()
            }
        }
    }

    /// Publishes the cached feed
    ///
    /// # Returns
    /// * `Ok(FeedOrigin::Cache)` - The cached feed was decoded and published
    /// * `Err(LoadError::CacheUnavailable)` - No cache, unreadable cache, or a cache that doesn't decode
    pub fn load_from_disk(&mut self) -> Result<FeedOrigin, LoadError> {
        let Some(cached) = self.cache.as_ref().and_then(QuizCache::read) else {
            return Err(self.signal(LoadError::CacheUnavailable));
        };

        match decode_quizzes(&cached.bytes) {
            Ok(quizzes) => {
                debug!(cached_at = ?cached.cached_at, "publishing cached feed");
                self.publish(quizzes, FeedOrigin::Cache);
                Ok(FeedOrigin::Cache)
            }
            Err(err) => {
                warn!(%err, "cached feed does not decode");
                Err(self.signal(LoadError::CacheUnavailable))
            }
        }
    }

    /// Changes the source URL and persists it
    pub fn set_source_url(&mut self, url: impl Into<String>) {
        self.settings.source_url = url.into();
        self.persist_settings();
    }

    /// Changes the refresh interval, persists it and restarts the timer
    pub fn set_refresh_interval(&mut self, secs: u64) {
        self.settings.set_refresh_interval(secs);
        self.apply_interval_change();
    }

    /// Raises the refresh interval by one step
    pub fn increment_refresh_interval(&mut self) {
        self.settings.increment_refresh_interval();
        self.apply_interval_change();
    }

    /// Lowers the refresh interval by one step
    pub fn decrement_refresh_interval(&mut self) {
        self.settings.decrement_refresh_interval();
        self.apply_interval_change();
    }

    fn apply_interval_change(&mut self) {
        self.persist_settings();
        self.start_timer(self.settings.refresh_period());
    }

    fn persist_settings(&self) {
        if let Some(ref store) = self.settings_store {
            if let Err(err) = store.save(&self.settings) {
                warn!(%err, "failed to save settings");
            }
        }
    }

    /// Replaces the published list wholesale
    fn publish(&mut self, quizzes: Vec<Quiz>, origin: FeedOrigin) {
        info!(count = quizzes.len(), ?origin, "publishing quizzes");
        self.quizzes = quizzes;
        self.origin = Some(origin);
        self.last_refresh = Some(Local::now());
        self.published.send_replace(self.quizzes.clone());
    }

    /// Records `err` for the alert and hands it back
    fn signal(&mut self, err: LoadError) -> LoadError {
        warn!(%err, "load failed");
        self.last_error = Some(err.clone());
        self.show_error = true;
        err
    }
}

/// Runs one fetch on its own task, bounded by [`FETCH_TIMEOUT`]
async fn fetch_with_timeout<S: QuizSource>(
    source: Arc<S>,
    url: Url,
) -> Result<Vec<u8>, FetchError> {
    let mut handle = tokio::spawn(async move { source.fetch(url).await });

    match tokio::time::timeout(FETCH_TIMEOUT, &mut handle).await {
        Ok(Ok(result)) => result,
        Ok(Err(err)) => {
            warn!(%err, "fetch task failed");
            Err(FetchError::RequestFailed(format!("fetch task failed: {}", err)))
        }
        Err(_) => {
            handle.abort();
            warn!(timeout_secs = FETCH_TIMEOUT.as_secs(), "fetch timed out");
            Err(FetchError::RequestFailed(format!(
                "no response within {} seconds",
                FETCH_TIMEOUT.as_secs()
            )))
        }
    }
}
