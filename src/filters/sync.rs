//! Keeps a filter form and the URL in step.
//!
//! [`FilterSync`] is the synchronous core: it tracks the URL the page was
//! loaded with and the edits made since. [`DebouncedFilters`] drives it from a
//! tokio task so that a burst of edits produces a single URL update once the
//! input has been quiet for the debounce window. [`FilteredListFeed`] turns
//! each URL update into a fetch and cancels the previous fetch when a newer
//! one is issued, so a slow stale response can never replace fresher data.
//!
//! The rendered pages run the same behaviour in the browser through
//! `assets/js/filters.js`; these types are the server-side model of that
//! script and pin its rules down in tests: debounce, `page` dropped on every
//! filter change, Clear always returning to the bare path, and only the
//! newest response applied.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::{AbortHandle, JoinHandle};

use crate::filters::{FilterState, FilterValue, PAGE_KEY};

/// Filter form state bound to one listing path.
#[derive(Clone, Debug)]
pub struct FilterSync {
    path: String,
    current: FilterState,
    draft: FilterState,
    dirty: bool,
}

impl FilterSync {
    /// Initializes the form from the URL the page was rendered for.
    pub fn from_url(path: impl Into<String>, query: &str) -> Self {
        let current = FilterState::parse(query);
        Self {
            path: path.into(),
            draft: current.clone(),
            current,
            dirty: false,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn current(&self) -> &FilterState {
        &self.current
    }

    pub fn draft(&self) -> &FilterState {
        &self.draft
    }

    pub fn current_url(&self) -> String {
        self.current.to_url(&self.path)
    }

    /// Records an edit of one field. Empty values clear the field.
    pub fn set(&mut self, key: &str, value: impl Into<FilterValue>) {
        self.draft.set(key, value);
        self.dirty = true;
    }

    /// Computes the URL to navigate to after the debounce window.
    ///
    /// The page key is always dropped. Returns `None` when nothing was edited
    /// since the last commit or when the result equals the current URL, so the
    /// initial render never navigates.
    pub fn commit(&mut self) -> Option<String> {
        if !self.dirty {
            return None;
        }
        self.dirty = false;

        let next = self.draft.without(PAGE_KEY);
        if next == self.current {
            return None;
        }

        self.current = next.clone();
        self.draft = next;
        Some(self.current_url())
    }

    /// Resets every field and returns the bare path.
    pub fn clear(&mut self) -> String {
        self.current = FilterState::new();
        self.draft = FilterState::new();
        self.dirty = false;
        self.path.clone()
    }
}

/// Receives the URLs produced by the filter form.
pub trait Navigator: Send + Sync + 'static {
    /// Replaces the current URL without a full reload.
    fn navigate(&self, url: String);
}

impl<N: Navigator + ?Sized> Navigator for Arc<N> {
    fn navigate(&self, url: String) {
        (**self).navigate(url)
    }
}

#[derive(Debug)]
enum FilterCommand {
    Set(String, FilterValue),
    Clear,
}

/// Debounced driver around [`FilterSync`].
pub struct DebouncedFilters {
    commands: mpsc::UnboundedSender<FilterCommand>,
    task: JoinHandle<FilterSync>,
}

impl DebouncedFilters {
    /// Spawns the driver task on the current tokio runtime.
    pub fn spawn<N: Navigator>(sync: FilterSync, window: Duration, navigator: N) -> Self {
        let (commands, receiver) = mpsc::unbounded_channel();
        let task = tokio::spawn(run_debounce_loop(sync, window, navigator, receiver));
        Self { commands, task }
    }

    /// Queues a field edit; restarts the debounce window.
    pub fn set(&self, key: &str, value: impl Into<FilterValue>) -> bool {
        self.commands
            .send(FilterCommand::Set(key.to_string(), value.into()))
            .is_ok()
    }

    /// Clears every filter and navigates to the bare path right away.
    pub fn clear(&self) -> bool {
        self.commands.send(FilterCommand::Clear).is_ok()
    }

    /// Flushes pending edits and returns the final form state.
    pub async fn shutdown(self) -> Option<FilterSync> {
        drop(self.commands);
        self.task.await.ok()
    }
}

async fn run_debounce_loop<N: Navigator>(
    mut sync: FilterSync,
    window: Duration,
    navigator: N,
    mut commands: mpsc::UnboundedReceiver<FilterCommand>,
) -> FilterSync {
    // Idle until the first edit arrives.
    while let Some(command) = commands.recv().await {
        match command {
            FilterCommand::Clear => {
                navigator.navigate(sync.clear());
                continue;
            }
            FilterCommand::Set(key, value) => sync.set(&key, value),
        }

        // Pending: every further edit restarts the window.
        loop {
            match tokio::time::timeout(window, commands.recv()).await {
                Ok(Some(FilterCommand::Set(key, value))) => sync.set(&key, value),
                Ok(Some(FilterCommand::Clear)) => {
                    navigator.navigate(sync.clear());
                    break;
                }
                Ok(None) => {
                    if let Some(url) = sync.commit() {
                        navigator.navigate(url);
                    }
                    return sync;
                }
                Err(_) => {
                    if let Some(url) = sync.commit() {
                        log::debug!("Filter debounce elapsed, navigating to {url}");
                        navigator.navigate(url);
                    }
                    break;
                }
            }
        }
    }
    sync
}

/// Issues fetches so that only the most recent one can complete.
#[derive(Debug, Default)]
pub struct LatestRequest {
    in_flight: Option<AbortHandle>,
    generation: u64,
}

impl LatestRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Aborts the previous fetch, if still running, and spawns `request`.
    pub fn issue<F>(&mut self, request: F) -> JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        self.cancel();
        self.generation += 1;
        let handle = tokio::spawn(request);
        self.in_flight = Some(handle.abort_handle());
        handle
    }

    pub fn cancel(&mut self) {
        if let Some(previous) = self.in_flight.take() {
            previous.abort();
        }
    }

    /// Number of fetches issued so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

type Loader<T> = dyn Fn(String) -> Pin<Box<dyn Future<Output = T> + Send>> + Send + Sync;

/// Result of the newest completed fetch.
#[derive(Clone, Debug, PartialEq)]
pub struct Loaded<T> {
    pub generation: u64,
    pub url: String,
    pub value: T,
}

/// Navigator that loads the list for every URL it receives.
pub struct FilteredListFeed<T> {
    loader: Arc<Loader<T>>,
    latest: Mutex<LatestRequest>,
    results: watch::Sender<Option<Loaded<T>>>,
}

impl<T> FilteredListFeed<T>
where
    T: Send + Sync + 'static,
{
    pub fn new<F, Fut>(loader: F) -> Self
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = T> + Send + 'static,
    {
        let (results, _) = watch::channel(None);
        let loader: Arc<Loader<T>> = Arc::new(
            move |url: String| -> Pin<Box<dyn Future<Output = T> + Send>> { Box::pin(loader(url)) },
        );
        Self {
            loader,
            latest: Mutex::new(LatestRequest::new()),
            results,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Loaded<T>>> {
        self.results.subscribe()
    }
}

impl<T> Navigator for FilteredListFeed<T>
where
    T: Send + Sync + 'static,
{
    fn navigate(&self, url: String) {
        let request = (self.loader)(url.clone());
        let results = self.results.clone();
        let Ok(mut latest) = self.latest.lock() else {
            log::error!("Filtered list feed lock poisoned, dropping fetch for {url}");
            return;
        };
        let generation = latest.generation() + 1;

        latest.issue(async move {
            let value = request.await;
            results.send_if_modified(|slot| {
                let newer = slot
                    .as_ref()
                    .is_none_or(|loaded| loaded.generation < generation);
                if newer {
                    *slot = Some(Loaded {
                        generation,
                        url,
                        value,
                    });
                }
                newer
            });
        });
    }
}
