//! Page index to storage limit/offset.

use serde::Serialize;

/// Rows per page.
pub const PAGE_SIZE: i64 = 20;

/// Storage-level window for one page.
///
/// `limit` grows with the page index: page `n` asks for `(n + 1) * 20` rows
/// starting at `n * 20`, so later pages return up to `n + 1` pages worth of
/// rows. Callers relying on fixed-size pages must cap on their side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub limit: i64,
    pub offset: i64,
}

impl Pagination {
    pub fn for_page(page: u32) -> Self {
        let page = i64::from(page);
        Self {
            limit: (page + 1) * PAGE_SIZE,
            offset: page * PAGE_SIZE,
        }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::for_page(0)
    }
}
