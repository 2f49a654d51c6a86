//! Core type definitions used across the KyaraFit workspace.

pub mod criteria;
pub mod id;
pub mod pagination;
pub mod session;

pub use criteria::QueryCriteria;
pub use id::PieceId;
pub use pagination::Page;
pub use session::{AccessToken, SessionState};
