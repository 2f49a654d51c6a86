//! # kyarafit-store
//!
//! Client-side state for the closet view:
//!
//! - [`PieceStore`] owns the fetched collection, its loading flags, and the
//!   active criteria, and applies only the latest-issued response.
//! - [`FilterController`] turns search and category input into debounced
//!   criteria changes.
//! - [`CreateForm`] holds a draft, validates it, submits it, and feeds the
//!   created piece back into the store.

pub mod collection;
pub mod filter;
pub mod form;
pub mod sample;
pub mod state;

pub use collection::{FetchOutcome, FetchTrigger, PieceStore};
pub use filter::{FilterController, FilterState};
pub use form::CreateForm;
pub use state::{CollectionState, FetchStatus, ItemsSource};
