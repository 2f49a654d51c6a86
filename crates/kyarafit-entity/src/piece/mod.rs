//! Wardrobe piece domain entities.

pub mod category;
pub mod date;
pub mod draft;
pub mod model;
pub mod patch;
pub mod rules;

pub use category::PieceCategory;
pub use draft::CreatePiece;
pub use model::Piece;
pub use patch::UpdatePiece;
