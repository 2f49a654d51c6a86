//! Observable state of the piece collection.

use kyarafit_core::AppError;
use kyarafit_core::types::QueryCriteria;
use kyarafit_entity::Piece;

/// Where the current fetch stands.
///
/// `Loading` and `Refreshing` are mutually exclusive by construction; at
/// rest the status is `Idle` or `Failed`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FetchStatus {
    /// Nothing in flight.
    #[default]
    Idle,
    /// Fetch triggered by mount or a criteria change.
    Loading,
    /// Fetch triggered by an explicit refresh.
    Refreshing,
    /// The latest fetch failed.
    Failed(AppError),
}

/// Provenance of the visible items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ItemsSource {
    /// Items came from the backend (or local edits on top of it).
    #[default]
    Server,
    /// Development placeholder pieces shown after a failed fetch.
    Placeholder,
}

/// The collection a screen renders.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CollectionState {
    /// Pieces in server order, local creations first.
    pub items: Vec<Piece>,
    /// Total reported by the backend for the current criteria.
    pub total: u64,
    /// Criteria the items belong to.
    pub criteria: QueryCriteria,
    /// Fetch status.
    pub status: FetchStatus,
    /// Where `items` came from.
    pub source: ItemsSource,
}

impl CollectionState {
    /// Empty state for the given criteria.
    pub fn new(criteria: QueryCriteria) -> Self {
        Self {
            criteria,
            ..Self::default()
        }
    }

    /// A mount or criteria-change fetch is in flight.
    pub fn loading(&self) -> bool {
        matches!(self.status, FetchStatus::Loading)
    }

    /// A refresh is in flight.
    pub fn refreshing(&self) -> bool {
        matches!(self.status, FetchStatus::Refreshing)
    }

    /// The failure from the latest fetch, if any.
    pub fn error(&self) -> Option<&AppError> {
        match &self.status {
            FetchStatus::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// Whether there is nothing to show.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
