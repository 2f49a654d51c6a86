//! # kyarafit-entity
//!
//! Domain models for KyaraFit. Every struct in this crate is either a
//! resource the backend returns or a payload the client sends. All derive
//! `Debug`, `Clone`, `Serialize`, and `Deserialize`; outgoing payloads
//! additionally derive `validator::Validate`.

pub mod piece;

pub use piece::{CreatePiece, Piece, PieceCategory, UpdatePiece};
