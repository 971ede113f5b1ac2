//! Shared response envelope types for API handlers.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope for single resources.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// Paginated listing envelope: `{ data, total, page, pages }`.
///
/// `total` counts the full filtered collection, not the returned page.
#[derive(Debug, Serialize)]
pub struct Paginated<T: Serialize> {
    pub data: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub pages: i64,
}

impl<T: Serialize> Paginated<T> {
    /// Assemble an envelope, deriving the page count from `total` and `limit`.
    pub fn new(data: Vec<T>, total: i64, page: i64, limit: i64) -> Self {
        let pages = if total == 0 {
            0
        } else {
            (total + limit - 1) / limit
        };
        Self {
            data,
            total,
            page,
            pages,
        }
    }
}
