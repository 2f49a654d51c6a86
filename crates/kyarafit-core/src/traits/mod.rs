//! Core traits defined in `kyarafit-core` and implemented by other crates.

pub mod session;

pub use session::{SessionProvider, StaticSession, WatchSession};
