//! # kyarafit-client
//!
//! Resource client for the pieces REST backend. Every operation takes a
//! bearer token plus its payload and either returns data or an
//! [`AppError`](kyarafit_core::AppError). Failures are logged here and
//! returned unchanged: there is no retry or backoff at this layer.

pub mod api;
pub mod error;
pub mod http;
pub mod wire;

pub use api::{HealthStatus, PieceApi, require_token};
pub use http::HttpPieceClient;
