//! Search, filter, and pagination criteria for list fetches.

use serde::{Deserialize, Serialize};

use super::pagination::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// Category value meaning "no category filter".
pub const ALL_CATEGORIES: &str = "all";

/// The active search/filter/pagination parameters for a list fetch.
///
/// Passed verbatim to the resource client. Two criteria are equal only if
/// every field is equal, which is what staleness checks compare.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueryCriteria {
    /// Maximum number of items to return.
    pub limit: u32,
    /// Number of items to skip.
    pub offset: u32,
    /// Free-text search, already trimmed and non-empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// Category tag, already normalized and non-empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Default for QueryCriteria {
    fn default() -> Self {
        Self::with_limit(DEFAULT_PAGE_SIZE)
    }
}

impl QueryCriteria {
    /// Unfiltered criteria for the first page of the given size.
    pub fn with_limit(limit: u32) -> Self {
        Self {
            limit: limit.clamp(1, MAX_PAGE_SIZE),
            offset: 0,
            search: None,
            category: None,
        }
    }

    /// Replace the search text. Blank text removes the criterion.
    pub fn search(mut self, text: &str) -> Self {
        self.search = normalize_search(text);
        self.offset = 0;
        self
    }

    /// Replace the category. `None`, blank, or `"all"` removes the criterion.
    pub fn category(mut self, category: Option<&str>) -> Self {
        self.category = category.and_then(normalize_category);
        self.offset = 0;
        self
    }

    /// Move to the given offset, keeping every filter.
    pub fn at_offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }

    /// Whether neither search nor category is set.
    pub fn is_unfiltered(&self) -> bool {
        self.search.is_none() && self.category.is_none()
    }

    /// Query-string pairs in the order the backend documents them.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("limit", self.limit.to_string()),
            ("offset", self.offset.to_string()),
        ];
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        if let Some(category) = &self.category {
            pairs.push(("category", category.clone()));
        }
        pairs
    }
}

fn normalize_search(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn normalize_category(category: &str) -> Option<String> {
    let trimmed = category.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(ALL_CATEGORIES) {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}
