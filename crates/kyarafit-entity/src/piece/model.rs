//! Piece entity model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use kyarafit_core::types::{PieceId, QueryCriteria};

/// A single catalogued costume or wardrobe item.
///
/// `id`, `created_at`, and `updated_at` are assigned by the server and
/// never change on the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Piece {
    /// Server-assigned identifier.
    pub id: PieceId,
    /// Owning user, when the backend reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,
    /// Display name.
    pub name: String,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Full-size image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Thumbnail image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    /// Category tag (open-ended, see [`PieceCategory`](super::PieceCategory)).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Unique tags in the order they were entered.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Where the piece was bought or referenced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_link: Option<String>,
    /// Date of purchase.
    #[serde(
        default,
        with = "super::date::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub purchase_date: Option<NaiveDate>,
    /// Purchase price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    /// When the piece was created.
    pub created_at: DateTime<Utc>,
    /// When the piece was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Piece {
    /// Whether this piece would be returned for `criteria`.
    ///
    /// Search is a case-insensitive substring match over name,
    /// description, category, and tags. Pagination is ignored.
    pub fn matches(&self, criteria: &QueryCriteria) -> bool {
        if let Some(category) = &criteria.category {
            if !self
                .category
                .as_deref()
                .is_some_and(|c| c.eq_ignore_ascii_case(category))
            {
                return false;
            }
        }

        let Some(search) = &criteria.search else {
            return true;
        };
        let needle = search.to_lowercase();
        let hit = |text: &str| text.to_lowercase().contains(&needle);

        hit(&self.name)
            || self.description.as_deref().is_some_and(hit)
            || self.category.as_deref().is_some_and(hit)
            || self.tags.iter().any(|t| hit(t.as_str()))
    }

    /// Whether the server timestamps are consistent.
    pub fn has_consistent_timestamps(&self) -> bool {
        self.updated_at >= self.created_at
    }
}
