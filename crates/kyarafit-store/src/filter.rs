//! Search and category input, debounced into store criteria changes.
//!
//! Keystrokes restart a trailing timer; only the text present when it
//! fires becomes a fetch. Clearing the search and picking a category skip
//! the timer. Every applied change goes through
//! [`PieceStore::spawn_fetch`], so a slow response for an older query can
//! never overwrite a newer one.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, trace};

use kyarafit_core::types::QueryCriteria;

use crate::collection::{FetchTrigger, PieceStore};

/// What the user has typed and picked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    /// Raw search box text.
    pub search_query: String,
    /// Selected category, `None` for all.
    pub selected_category: Option<String>,
}

impl FilterState {
    /// The criteria this input maps to.
    pub fn criteria(&self, page_size: u32) -> QueryCriteria {
        QueryCriteria::with_limit(page_size)
            .search(&self.search_query)
            .category(self.selected_category.as_deref())
    }
}

#[derive(Debug)]
enum Command {
    Search(String),
    ClearSearch,
    Category(Option<String>),
    Flush(oneshot::Sender<()>),
}

/// Handle to the debounce worker.
///
/// Dropping the handle stops the worker once queued input is processed.
#[derive(Debug)]
pub struct FilterController {
    tx: mpsc::UnboundedSender<Command>,
    state: watch::Receiver<FilterState>,
    worker: JoinHandle<()>,
}

impl FilterController {
    /// Start a controller feeding `store`, debouncing by the store's
    /// configured delay.
    pub fn spawn(store: Arc<PieceStore>) -> Self {
        let debounce = Duration::from_millis(store.config().debounce_millis);
        Self::with_debounce(store, debounce)
    }

    /// Start a controller with an explicit debounce delay.
    pub fn with_debounce(store: Arc<PieceStore>, debounce: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let initial = FilterState {
            search_query: String::new(),
            selected_category: store.criteria().category,
        };
        let (state_tx, state) = watch::channel(initial);
        let worker = tokio::spawn(run(store, debounce, rx, state_tx));
        Self { tx, state, worker }
    }

    /// Record new search text. Blank text clears the search immediately;
    /// anything else is applied after the debounce delay.
    pub fn set_search(&self, text: impl Into<String>) {
        let text = text.into();
        let command = if text.trim().is_empty() {
            Command::ClearSearch
        } else {
            Command::Search(text)
        };
        self.send(command);
    }

    /// Drop the search text and refetch unfiltered by search right away.
    pub fn clear_search(&self) {
        self.send(Command::ClearSearch);
    }

    /// Pick a category (`None` or `"all"` for every category). Applied
    /// immediately, together with any search text still waiting.
    pub fn select_category(&self, category: Option<&str>) {
        self.send(Command::Category(category.map(str::to_string)));
    }

    /// Apply pending search text now instead of waiting for the timer.
    ///
    /// Resolves once the worker has issued the fetch.
    pub async fn flush(&self) {
        let (done, wait) = oneshot::channel();
        self.send(Command::Flush(done));
        let _ = wait.await;
    }

    /// Current search text.
    pub fn search_query(&self) -> String {
        self.state.borrow().search_query.clone()
    }

    /// Current category selection.
    pub fn selected_category(&self) -> Option<String> {
        self.state.borrow().selected_category.clone()
    }

    /// Receive every filter input change.
    pub fn subscribe(&self) -> watch::Receiver<FilterState> {
        self.state.clone()
    }

    /// Stop the worker, dropping any pending search.
    pub fn shutdown(self) {
        self.worker.abort();
    }

    fn send(&self, command: Command) {
        if self.tx.send(command).is_err() {
            debug!("Filter worker stopped, dropping input");
        }
    }
}

async fn run(
    store: Arc<PieceStore>,
    debounce: Duration,
    mut rx: mpsc::UnboundedReceiver<Command>,
    state: watch::Sender<FilterState>,
) {
    let page_size = store.config().page_size;
    let mut deadline: Option<Instant> = None;

    let apply = |input: &FilterState| {
        let criteria = input.criteria(page_size);
        debug!(?criteria, "Applying filter criteria");
        drop(store.spawn_fetch(FetchTrigger::CriteriaChange, Some(criteria)));
    };

    loop {
        tokio::select! {
            command = rx.recv() => {
                let Some(command) = command else { break };
                match command {
                    Command::Search(text) => {
                        trace!(text = %text, "Search input");
                        state.send_modify(|s| s.search_query = text);
                        deadline = Some(Instant::now() + debounce);
                    }
                    Command::ClearSearch => {
                        deadline = None;
                        state.send_modify(|s| s.search_query.clear());
                        apply(&state.borrow());
                    }
                    Command::Category(category) => {
                        deadline = None;
                        let category = QueryCriteria::default()
                            .category(category.as_deref())
                            .category;
                        state.send_modify(|s| s.selected_category = category);
                        apply(&state.borrow());
                    }
                    Command::Flush(done) => {
                        if deadline.take().is_some() {
                            apply(&state.borrow());
                        }
                        let _ = done.send(());
                    }
                }
            }
            _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                deadline = None;
                apply(&state.borrow());
            }
        }
    }

    debug!("Filter worker stopped");
}
