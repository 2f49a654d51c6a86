//! Pagination types for list responses.

use serde::{Deserialize, Serialize};

/// Default page size requested by the closet view.
pub const DEFAULT_PAGE_SIZE: u32 = 50;
/// Maximum page size honoured by the backend.
pub const MAX_PAGE_SIZE: u32 = 100;

/// One page of a server-ordered collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// The items on this page, in server order.
    pub items: Vec<T>,
    /// Total number of items across all pages.
    pub total: u64,
    /// Page size the server applied.
    pub limit: u32,
    /// Offset of the first item.
    pub offset: u32,
}

impl<T> Page<T> {
    /// Create a new page.
    pub fn new(items: Vec<T>, total: u64, limit: u32, offset: u32) -> Self {
        Self {
            items,
            total,
            limit,
            offset,
        }
    }

    /// Whether more items exist past this page.
    pub fn has_more(&self) -> bool {
        (self.offset as u64) + (self.items.len() as u64) < self.total
    }
}
