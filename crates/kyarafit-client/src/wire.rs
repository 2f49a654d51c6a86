//! Response bodies as the backend actually sends them.

use serde::Deserialize;

use kyarafit_core::types::{Page, QueryCriteria};
use kyarafit_entity::Piece;

/// `GET /api/v1/pieces` body.
///
/// The backend encodes an empty result as `null` and names the total
/// `total_count`; both spellings are accepted.
#[derive(Debug, Deserialize)]
pub struct ListBody {
    #[serde(default)]
    pub pieces: Option<Vec<Piece>>,
    #[serde(default, alias = "total_count")]
    pub total: Option<u64>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub offset: Option<u32>,
}

impl ListBody {
    /// Fill in anything the backend left out from the request criteria.
    pub fn into_page(self, criteria: &QueryCriteria) -> Page<Piece> {
        let items = self.pieces.unwrap_or_default();
        let offset = self.offset.unwrap_or(criteria.offset);
        let total = self
            .total
            .unwrap_or(offset as u64 + items.len() as u64);
        Page::new(items, total, self.limit.unwrap_or(criteria.limit), offset)
    }
}

/// A single piece, either bare or wrapped as `{"piece": ..., "message": ...}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum PieceBody {
    Wrapped { piece: Piece },
    Bare(Piece),
}

impl PieceBody {
    pub fn into_piece(self) -> Piece {
        match self {
            Self::Wrapped { piece } | Self::Bare(piece) => piece,
        }
    }
}

/// `GET /api/v1/pieces/categories` body.
#[derive(Debug, Deserialize)]
pub struct CategoriesBody {
    #[serde(default)]
    pub categories: Option<Vec<String>>,
}

impl CategoriesBody {
    /// Categories with duplicates removed, first occurrence kept.
    pub fn into_unique(self) -> Vec<String> {
        let mut unique: Vec<String> = Vec::new();
        for category in self.categories.unwrap_or_default() {
            if !unique.contains(&category) {
                unique.push(category);
            }
        }
        unique
    }
}

/// Error body, `{"error": "..."}`.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}
