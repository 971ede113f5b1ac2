//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Hard ceiling on page size.
const MAX_LIMIT: i64 = 100;

/// Generic pagination parameters (`?page=&limit=`), 1-based.
///
/// Used by any handler that supports paginated listing.
#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl PaginationParams {
    /// Resolve to a `(page, limit, offset)` triple with defaults
    /// (page 1, limit 10) and the limit clamped to [1, 100].
    pub fn resolve(&self) -> (i64, i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let limit = self.limit.unwrap_or(10).clamp(1, MAX_LIMIT);
        (page, limit, (page - 1) * limit)
    }
}
