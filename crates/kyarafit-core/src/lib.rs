//! # kyarafit-core
//!
//! Core crate for KyaraFit. Contains configuration schemas, typed
//! identifiers, query criteria and pagination types, the session seam,
//! and the unified error system.
//!
//! This crate has **no** internal dependencies on other KyaraFit crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
