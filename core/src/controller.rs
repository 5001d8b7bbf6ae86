//! List controller: fetch-on-demand, search debounce and cancellation.
//!
//! # Design
//! The controller is an actor. `CharacterListController::spawn` starts a
//! tokio task that exclusively owns a `CharacterListState`; the host talks to
//! it with `ListEvent`s and observes it through a `watch` channel of
//! `ListSnapshot`s. Fetches and debounce timers run as separate tasks and hand
//! their results back over an internal channel, so state is only ever
//! mutated on the actor task.
//!
//! At most one fetch is in flight. Starting a fetch cancels the previous one
//! through its `CancelFlag`, which the fetch task checks before calling the
//! fetcher and again after the response is decoded. A cancelled fetch drops
//! its result silently and never touches the loading flag; the fetch that
//! superseded it owns that flag. Completions are also tagged with a
//! generation so that a result already queued when its fetch was superseded
//! is discarded too.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

use crate::config::ExplorerConfig;
use crate::error::FetchError;
use crate::fetcher::CharacterFetcher;
use crate::items::CharacterListItem;
use crate::state::CharacterListState;
use crate::types::{Character, CharacterPage, Status};

pub const NETWORK_ERROR_TITLE: &str = "Network error";
pub const UNKNOWN_ERROR_TITLE: &str = "Unknown error";

/// Presentation surfaces the controller drives.
///
/// Called from the actor task; hosts that need a UI thread should forward.
pub trait ListRouter: Send + Sync {
    fn show_alert(&self, title: &str, message: &str);
    fn open_detail(&self, character: &Character);
}

/// Input from the list screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListEvent {
    /// The screen became visible. Only the first activation fetches.
    Activated,
    /// Row `index` is about to be displayed.
    RowDisplayed(usize),
    /// Raw search field contents after a keystroke.
    SearchTextChanged(String),
    FilterChanged(Option<Status>),
    CharacterSelected(i64),
}

/// Everything the list screen renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListSnapshot {
    pub items: Vec<CharacterListItem>,
    pub is_loading: bool,
    pub has_more: bool,
    pub current_page: u32,
    pub search_query: String,
    pub status_filter: Option<Status>,
}

impl From<&CharacterListState> for ListSnapshot {
    fn from(state: &CharacterListState) -> Self {
        Self {
            items: state.list_items(),
            is_loading: state.is_loading,
            has_more: state.has_more,
            current_page: state.current_page,
            search_query: state.search_query.clone(),
            status_filter: state.status_filter,
        }
    }
}

/// Cooperative cancellation flag shared between the actor and one fetch.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

enum Internal {
    CommitSearch {
        text: String,
        generation: u64,
    },
    FetchFinished {
        generation: u64,
        result: Result<CharacterPage, FetchError>,
    },
}

/// Handle to a running list actor. Dropping it stops the actor and cancels
/// any in-flight fetch.
pub struct CharacterListController {
    events: mpsc::UnboundedSender<ListEvent>,
    snapshots: watch::Receiver<ListSnapshot>,
    task: JoinHandle<()>,
}

impl CharacterListController {
    /// Start the actor on the current tokio runtime.
    pub fn spawn(
        fetcher: Arc<dyn CharacterFetcher>,
        router: Arc<dyn ListRouter>,
        config: &ExplorerConfig,
    ) -> Self {
        let state = CharacterListState::new();
        let (snapshot_tx, snapshots) = watch::channel(ListSnapshot::from(&state));
        let (events, events_rx) = mpsc::unbounded_channel();
        let (internal_tx, internal_rx) = mpsc::unbounded_channel();

        let actor = ListActor {
            state,
            fetcher,
            router,
            search_debounce: config.search_debounce,
            snapshots: snapshot_tx,
            internal: internal_tx,
            activated: false,
            fetch_generation: 0,
            in_flight: None,
            search_generation: 0,
            pending_search: None,
        };
        let task = tokio::spawn(actor.run(events_rx, internal_rx));

        Self {
            events,
            snapshots,
            task,
        }
    }

    pub fn send(&self, event: ListEvent) {
        if self.events.send(event).is_err() {
            warn!("list controller is no longer running");
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ListSnapshot> {
        self.snapshots.clone()
    }

    pub fn snapshot(&self) -> ListSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Stop the actor and cancel any in-flight fetch. Later events are
    /// dropped.
    pub fn shutdown(&self) {
        self.task.abort();
    }
}

impl Drop for CharacterListController {
    fn drop(&mut self) {
        self.task.abort();
    }
}

struct ListActor {
    state: CharacterListState,
    fetcher: Arc<dyn CharacterFetcher>,
    router: Arc<dyn ListRouter>,
    search_debounce: Duration,
    snapshots: watch::Sender<ListSnapshot>,
    internal: mpsc::UnboundedSender<Internal>,
    activated: bool,
    fetch_generation: u64,
    in_flight: Option<CancelFlag>,
    search_generation: u64,
    pending_search: Option<JoinHandle<()>>,
}

impl ListActor {
    async fn run(
        mut self,
        mut events: mpsc::UnboundedReceiver<ListEvent>,
        mut internal: mpsc::UnboundedReceiver<Internal>,
    ) {
        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Some(event) => self.handle_event(event),
                    None => break,
                },
                Some(message) = internal.recv() => self.handle_internal(message),
            }
        }
        debug!("list controller stopped");
    }

    fn handle_event(&mut self, event: ListEvent) {
        match event {
            ListEvent::Activated => {
                if !self.activated {
                    self.activated = true;
                    self.load_characters();
                }
            }
            ListEvent::RowDisplayed(index) => {
                let is_last = self.state.characters.len().checked_sub(1) == Some(index);
                if is_last && self.in_flight.is_none() {
                    self.load_characters();
                }
            }
            ListEvent::SearchTextChanged(text) => self.schedule_search(text),
            ListEvent::FilterChanged(status) => {
                if status != self.state.status_filter {
                    self.state.update_status_filter(status);
                    self.load_characters();
                }
            }
            ListEvent::CharacterSelected(id) => match self.state.find(id) {
                Some(character) => self.router.open_detail(character),
                None => warn!(id, "selected character is not loaded"),
            },
        }
    }

    fn handle_internal(&mut self, message: Internal) {
        match message {
            Internal::CommitSearch { text, generation } => {
                if generation != self.search_generation {
                    return;
                }
                self.pending_search = None;
                // Committing the active query again keeps pagination, so this loads the next page.
                if text.is_empty() {
                    self.state.reset_search();
                } else {
                    self.state.update_search_query(&text);
                }
                self.load_characters();
            }
            Internal::FetchFinished { generation, result } => {
                self.finish_fetch(generation, result);
            }
        }
    }

    /// Restart the debounce window; only the last text inside it commits.
    fn schedule_search(&mut self, text: String) {
        if let Some(pending) = self.pending_search.take() {
            pending.abort();
        }
        self.search_generation += 1;
        let generation = self.search_generation;
        let delay = self.search_debounce;
        let internal = self.internal.clone();
        self.pending_search = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = internal.send(Internal::CommitSearch { text, generation });
        }));
    }

    fn load_characters(&mut self) {
        if !self.state.has_more {
            return;
        }
        if let Some(previous) = self.in_flight.take() {
            previous.cancel();
        }

        self.state.is_loading = true;
        self.publish();

        self.fetch_generation += 1;
        let generation = self.fetch_generation;
        let cancel = CancelFlag::default();
        self.in_flight = Some(cancel.clone());

        let page = self.state.current_page;
        let name = self.state.request_name().map(str::to_string);
        let status = self.state.status_filter;
        debug!(page, ?name, ?status, generation, "fetching characters");

        let fetcher = Arc::clone(&self.fetcher);
        let internal = self.internal.clone();
        tokio::spawn(async move {
            if cancel.is_cancelled() {
                trace!(generation, "fetch cancelled before request");
                return;
            }
            let result = fetcher.fetch_characters(page, name.as_deref(), status).await;
            if cancel.is_cancelled() {
                trace!(generation, "fetch cancelled after response");
                return;
            }
            let _ = internal.send(Internal::FetchFinished { generation, result });
        });
    }

    fn finish_fetch(&mut self, generation: u64, result: Result<CharacterPage, FetchError>) {
        if generation != self.fetch_generation {
            trace!(generation, "dropping superseded fetch result");
            return;
        }
        self.in_flight = None;

        match result {
            Ok(page) => {
                debug!(results = page.results.len(), has_next = page.has_next(), "applying page");
                self.state.apply_page(page);
            }
            Err(err) => self.report(err),
        }

        self.state.is_loading = false;
        self.publish();
    }

    fn report(&self, err: FetchError) {
        warn!(error = %err, "character fetch failed");
        match err {
            FetchError::Network(err) => {
                self.router.show_alert(NETWORK_ERROR_TITLE, &err.description());
            }
            other => self.router.show_alert(UNKNOWN_ERROR_TITLE, &other.to_string()),
        }
    }

    fn publish(&self) {
        self.snapshots.send_replace(ListSnapshot::from(&self.state));
    }
}

impl Drop for ListActor {
    fn drop(&mut self) {
        if let Some(flag) = self.in_flight.take() {
            flag.cancel();
        }
        if let Some(pending) = self.pending_search.take() {
            pending.abort();
        }
    }
}
