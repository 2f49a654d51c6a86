//! Create-piece form controller.

use std::sync::Arc;

use tracing::{info, warn};

use kyarafit_client::{PieceApi, require_token};
use kyarafit_core::traits::SessionProvider;
use kyarafit_core::{AppError, AppResult};
use kyarafit_entity::piece::{date, rules};
use kyarafit_entity::{CreatePiece, Piece};

use crate::collection::PieceStore;

/// Owns an unsaved draft and submits it.
///
/// A failed submit keeps the draft so the user can fix it and retry.
#[derive(Debug)]
pub struct CreateForm {
    api: Arc<dyn PieceApi>,
    session: Arc<dyn SessionProvider>,
    store: Option<Arc<PieceStore>>,
    draft: CreatePiece,
    last_error: Option<AppError>,
}

impl CreateForm {
    /// Create an empty form.
    pub fn new(api: Arc<dyn PieceApi>, session: Arc<dyn SessionProvider>) -> Self {
        Self {
            api,
            session,
            store: None,
            draft: CreatePiece::default(),
            last_error: None,
        }
    }

    /// Feed created pieces into `store`.
    pub fn with_store(mut self, store: Arc<PieceStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// The draft as entered so far.
    pub fn draft(&self) -> &CreatePiece {
        &self.draft
    }

    /// The failure from the last submit, cleared by the next success.
    pub fn last_error(&self) -> Option<&AppError> {
        self.last_error.as_ref()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.draft.name = name.into();
    }

    pub fn set_description(&mut self, text: &str) {
        self.draft.description = optional(text);
    }

    pub fn set_category(&mut self, category: &str) {
        self.draft.category = optional(category).map(|c| c.to_lowercase());
    }

    pub fn set_image_url(&mut self, url: &str) {
        self.draft.image_url = optional(url);
    }

    pub fn set_thumbnail_url(&mut self, url: &str) {
        self.draft.thumbnail_url = optional(url);
    }

    pub fn set_source_link(&mut self, url: &str) {
        self.draft.source_link = optional(url);
    }

    /// Append a tag; blank and duplicate tags are ignored.
    pub fn add_tag(&mut self, tag: &str) -> bool {
        self.draft.add_tag(tag)
    }

    /// Remove every occurrence of `tag`.
    pub fn remove_tag(&mut self, tag: &str) -> usize {
        self.draft.remove_tag(tag)
    }

    /// Set the price from user text. Unparseable text clears it.
    ///
    /// Negative amounts are kept here and rejected at submit.
    pub fn set_price(&mut self, text: &str) {
        self.draft.price = rules::parse_price(text);
    }

    /// Set the purchase date from `YYYY-MM-DD` text. Blank text clears it.
    pub fn set_purchase_date(&mut self, text: &str) -> AppResult<()> {
        if text.trim().is_empty() {
            self.draft.purchase_date = None;
            return Ok(());
        }
        let parsed = date::parse(text).ok_or_else(|| {
            AppError::validation(format!("Invalid purchase date '{}', expected YYYY-MM-DD", text.trim()))
        })?;
        self.draft.purchase_date = Some(parsed);
        Ok(())
    }

    /// Discard the draft and any error.
    pub fn cancel(&mut self) {
        self.draft = CreatePiece::default();
        self.last_error = None;
    }

    /// Validate and create the piece.
    ///
    /// Checks run before any request: a blank name, then a missing session,
    /// then every field rule. On success the draft is cleared and the piece
    /// is put at the top of the store.
    pub async fn submit(&mut self) -> AppResult<Piece> {
        let result = self.try_submit().await;
        match &result {
            Ok(piece) => {
                info!(id = %piece.id, name = %piece.name, "Piece created");
                self.draft = CreatePiece::default();
                self.last_error = None;
                if let Some(store) = &self.store {
                    store.apply_created(piece.clone());
                }
            }
            Err(err) => {
                warn!(error = %err, "Piece submission failed");
                self.last_error = Some(err.clone());
            }
        }
        result
    }

    async fn try_submit(&self) -> AppResult<Piece> {
        if !self.draft.has_name() {
            return Err(AppError::validation("Piece name is required"));
        }
        let session = self.session.current();
        let token = require_token(&session)?;
        self.draft.check()?;

        let mut payload = self.draft.clone();
        payload.name = payload.name.trim().to_string();
        self.api.create(token, &payload).await
    }
}

fn optional(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
