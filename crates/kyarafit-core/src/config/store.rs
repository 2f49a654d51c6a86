//! Resource store and filter configuration.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// What the store shows when a list fetch fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchFallback {
    /// Surface the failure with no items.
    #[default]
    Error,
    /// Surface the failure and show the development placeholder pieces.
    SampleData,
}

/// Resource store configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct StoreConfig {
    /// Page size used for list fetches.
    #[serde(default = "default_page_size")]
    #[validate(range(min = 1, max = 100))]
    pub page_size: u32,
    /// Trailing debounce applied to search keystrokes, in milliseconds.
    #[serde(default = "default_debounce")]
    #[validate(range(max = 5000))]
    pub debounce_millis: u64,
    /// Upper bound on a single list fetch, in seconds.
    #[serde(default = "default_fetch_timeout")]
    #[validate(range(min = 1, max = 120))]
    pub fetch_timeout_seconds: u64,
    /// Behaviour on fetch failure.
    #[serde(default)]
    pub fallback: FetchFallback,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            debounce_millis: default_debounce(),
            fetch_timeout_seconds: default_fetch_timeout(),
            fallback: FetchFallback::default(),
        }
    }
}

fn default_page_size() -> u32 {
    50
}

fn default_debounce() -> u64 {
    300
}

fn default_fetch_timeout() -> u64 {
    15
}
