//! Session-gated piece collection store.
//!
//! Every fetch is tagged with a generation number taken from a single
//! counter. A response is committed only while its generation is still the
//! latest issued, so responses apply in request order, not arrival order.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use kyarafit_client::PieceApi;
use kyarafit_core::AppError;
use kyarafit_core::AppResult;
use kyarafit_core::config::{FetchFallback, StoreConfig};
use kyarafit_core::traits::SessionProvider;
use kyarafit_core::types::{AccessToken, Page, PieceId, QueryCriteria};
use kyarafit_entity::Piece;

use crate::sample::sample_matching;
use crate::state::{CollectionState, FetchStatus, ItemsSource};

/// What started a fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchTrigger {
    /// First load of the screen.
    Mount,
    /// Search, category, or page changed.
    CriteriaChange,
    /// Explicit pull-to-refresh.
    Refresh,
}

impl FetchTrigger {
    fn in_flight_status(self) -> FetchStatus {
        match self {
            Self::Mount | Self::CriteriaChange => FetchStatus::Loading,
            Self::Refresh => FetchStatus::Refreshing,
        }
    }
}

/// How a fetch ended.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// The response was applied; carries the number of visible items.
    Committed(usize),
    /// A newer fetch was issued meanwhile; the response was dropped.
    Superseded,
    /// No authenticated session; nothing was requested.
    NoSession,
    /// The fetch failed and the failure is now in the state.
    Failed(AppError),
}

/// A piece created locally, remembered until a fetch issued after it
/// commits.
#[derive(Debug)]
struct LocalInsert {
    issued_at: u64,
    piece: Piece,
}

/// A fetch that has been issued but not yet completed.
#[derive(Debug)]
struct Ticket {
    trigger: FetchTrigger,
    generation: u64,
    criteria: QueryCriteria,
    token: Option<AccessToken>,
}

#[derive(Debug, Default)]
struct Ledger {
    issued: u64,
    local_inserts: Vec<LocalInsert>,
}

/// Holds the collection for one screen and orchestrates its fetches.
#[derive(Debug)]
pub struct PieceStore {
    api: Arc<dyn PieceApi>,
    session: Arc<dyn SessionProvider>,
    config: StoreConfig,
    state: watch::Sender<CollectionState>,
    ledger: Mutex<Ledger>,
}

impl PieceStore {
    /// Create an empty store. Nothing is fetched until [`mount`](Self::mount).
    pub fn new(
        api: Arc<dyn PieceApi>,
        session: Arc<dyn SessionProvider>,
        config: StoreConfig,
    ) -> Self {
        let criteria = QueryCriteria::with_limit(config.page_size);
        let (state, _rx) = watch::channel(CollectionState::new(criteria));
        Self {
            api,
            session,
            config,
            state,
            ledger: Mutex::new(Ledger::default()),
        }
    }

    /// A copy of the current state.
    pub fn snapshot(&self) -> CollectionState {
        self.state.borrow().clone()
    }

    /// Receive every state change.
    pub fn subscribe(&self) -> watch::Receiver<CollectionState> {
        self.state.subscribe()
    }

    /// The active criteria.
    pub fn criteria(&self) -> QueryCriteria {
        self.state.borrow().criteria.clone()
    }

    /// Store configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Initial load.
    pub async fn mount(&self) -> FetchOutcome {
        self.fetch(FetchTrigger::Mount, None).await
    }

    /// Switch to new criteria and fetch for them.
    pub async fn set_criteria(&self, criteria: QueryCriteria) -> FetchOutcome {
        self.fetch(FetchTrigger::CriteriaChange, Some(criteria))
            .await
    }

    /// Re-fetch the current criteria.
    pub async fn refresh(&self) -> FetchOutcome {
        self.fetch(FetchTrigger::Refresh, None).await
    }

    /// Issue a fetch now and run it on a spawned task.
    ///
    /// The generation is taken before this returns, so fetches spawned one
    /// after another commit in that order no matter when they finish.
    pub fn spawn_fetch(
        self: &Arc<Self>,
        trigger: FetchTrigger,
        next: Option<QueryCriteria>,
    ) -> JoinHandle<FetchOutcome> {
        let ticket = self.issue(trigger, next);
        let store = Arc::clone(self);
        tokio::spawn(async move { store.complete(ticket).await })
    }

    async fn fetch(&self, trigger: FetchTrigger, next: Option<QueryCriteria>) -> FetchOutcome {
        let ticket = self.issue(trigger, next);
        self.complete(ticket).await
    }

    /// Take a generation and move the state to its in-flight status.
    fn issue(&self, trigger: FetchTrigger, next: Option<QueryCriteria>) -> Ticket {
        let session = self.session.current();
        let mut ledger = self.lock();
        ledger.issued += 1;
        let generation = ledger.issued;
        if !session.is_authenticated() {
            ledger.local_inserts.clear();
        }

        let mut criteria = QueryCriteria::default();
        self.state.send_modify(|state| {
            if let Some(next) = next {
                state.criteria = next;
            }
            criteria = state.criteria.clone();
            if session.is_authenticated() {
                state.status = trigger.in_flight_status();
            } else {
                state.items.clear();
                state.total = 0;
                state.status = FetchStatus::Idle;
                state.source = ItemsSource::Server;
            }
        });

        Ticket {
            trigger,
            generation,
            criteria,
            token: session.token().cloned(),
        }
    }

    async fn complete(&self, ticket: Ticket) -> FetchOutcome {
        let Ticket {
            trigger,
            generation,
            criteria,
            token,
        } = ticket;

        let Some(token) = token else {
            debug!(?trigger, generation, "No session, skipping piece fetch");
            return FetchOutcome::NoSession;
        };

        debug!(?trigger, generation, ?criteria, "Fetching pieces");
        let limit = Duration::from_secs(self.config.fetch_timeout_seconds);
        let result = match tokio::time::timeout(limit, self.api.list(&token, &criteria)).await {
            Ok(result) => result,
            Err(_) => Err(AppError::network(format!(
                "Piece fetch timed out after {}s",
                limit.as_secs()
            ))),
        };

        self.commit(trigger, generation, &criteria, result)
    }

    fn commit(
        &self,
        trigger: FetchTrigger,
        generation: u64,
        criteria: &QueryCriteria,
        result: AppResult<Page<Piece>>,
    ) -> FetchOutcome {
        let mut ledger = self.lock();
        if generation != ledger.issued {
            debug!(
                generation,
                latest = ledger.issued,
                "Discarding stale piece response"
            );
            return FetchOutcome::Superseded;
        }

        // Creations made before this fetch was issued are in the response.
        ledger.local_inserts.retain(|l| l.issued_at >= generation);

        match result {
            Ok(page) => {
                let mut items = page.items;
                let mut total = page.total;
                for insert in &ledger.local_inserts {
                    if !items.iter().any(|p| p.id == insert.piece.id) {
                        items.insert(0, insert.piece.clone());
                        total += 1;
                    }
                }
                let count = items.len();
                self.state.send_modify(|state| {
                    state.items = items;
                    state.total = total;
                    state.status = FetchStatus::Idle;
                    state.source = ItemsSource::Server;
                });
                debug!(generation, count, "Committed piece response");
                FetchOutcome::Committed(count)
            }
            Err(err) => {
                warn!(?trigger, generation, error = %err, "Piece fetch failed");
                let fallback = self.config.fallback;
                let placeholder = sample_matching(criteria);
                self.state.send_modify(|state| {
                    match fallback {
                        FetchFallback::SampleData => {
                            state.total = placeholder.len() as u64;
                            state.items = placeholder;
                            state.source = ItemsSource::Placeholder;
                        }
                        // A refresh failure leaves items that still match.
                        FetchFallback::Error if trigger == FetchTrigger::Refresh => {}
                        FetchFallback::Error => {
                            state.items.clear();
                            state.total = 0;
                            state.source = ItemsSource::Server;
                        }
                    }
                    state.status = FetchStatus::Failed(err.clone());
                });
                FetchOutcome::Failed(err)
            }
        }
    }

    /// Put a freshly created piece at the top without refetching.
    ///
    /// An existing item with the same id is replaced. The piece survives a
    /// fetch that was already in flight when it was created.
    pub fn apply_created(&self, piece: Piece) {
        let mut ledger = self.lock();
        let issued_at = ledger.issued;
        ledger.local_inserts.retain(|l| l.piece.id != piece.id);
        ledger.local_inserts.push(LocalInsert {
            issued_at,
            piece: piece.clone(),
        });

        self.state.send_modify(|state| {
            let before = state.items.len();
            state.items.retain(|p| p.id != piece.id);
            if state.items.len() == before {
                state.total += 1;
            }
            state.items.insert(0, piece);
        });
        info!(pieces = self.state.borrow().items.len(), "Added created piece to collection");
    }

    /// Replace a piece in place after an update. Returns whether it was shown.
    pub fn apply_updated(&self, piece: Piece) -> bool {
        let mut ledger = self.lock();
        for insert in ledger.local_inserts.iter_mut() {
            if insert.piece.id == piece.id {
                insert.piece = piece.clone();
            }
        }
        self.state.send_if_modified(|state| {
            match state.items.iter_mut().find(|p| p.id == piece.id) {
                Some(slot) => {
                    *slot = piece;
                    true
                }
                None => false,
            }
        })
    }

    /// Drop a deleted piece. Returns whether it was shown.
    pub fn apply_removed(&self, id: &PieceId) -> bool {
        let mut ledger = self.lock();
        ledger.local_inserts.retain(|l| &l.piece.id != id);
        self.state.send_if_modified(|state| {
            let before = state.items.len();
            state.items.retain(|p| &p.id != id);
            let removed = state.items.len() != before;
            if removed {
                state.total = state.total.saturating_sub(1);
            }
            removed
        })
    }

    /// Re-run the mount path whenever the session provider reports a change.
    ///
    /// Each change issues its own fetch without waiting on the previous one,
    /// so a sign-out supersedes a held load at once. Returns `None` for
    /// providers that never change.
    pub fn watch_session(self: &Arc<Self>) -> Option<JoinHandle<()>> {
        let mut rx = self.session.subscribe()?;
        let store = Arc::clone(self);
        Some(tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                let authenticated = rx.borrow_and_update().is_authenticated();
                info!(authenticated, "Session changed, reloading pieces");
                drop(store.spawn_fetch(FetchTrigger::Mount, None));
            }
        }))
    }

    fn lock(&self) -> MutexGuard<'_, Ledger> {
        self.ledger.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
