//! Pagination parameters and the paged response envelope.

use serde::{Deserialize, Serialize};

pub const DEFAULT_LIMIT: u64 = 10;
pub const MAX_LIMIT: u64 = 100;

/// Pagination parameters shared across all list endpoints.
///
/// - `page`: ≥ 1, default 1
/// - `limit`: 1–100, default 10
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_page() -> u64 {
    1
}

fn default_limit() -> u64 {
    DEFAULT_LIMIT
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
        }
    }
}

/// Out-of-range pagination parameter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PageRequestError {
    #[error("page must be at least 1")]
    Page,
    #[error("page is too large")]
    PageTooLarge,
    #[error("limit must be between 1 and 100")]
    Limit,
}

impl PageRequest {
    /// Reject out-of-range values instead of silently clamping them.
    pub fn validate(&self) -> Result<(), PageRequestError> {
        if self.page < 1 {
            return Err(PageRequestError::Page);
        }
        if !(1..=MAX_LIMIT).contains(&self.limit) {
            return Err(PageRequestError::Limit);
        }
        // The offset ends up as a signed 64-bit SQL value.
        match (self.page - 1).checked_mul(self.limit) {
            Some(offset) if offset <= i64::MAX as u64 => Ok(()),
            _ => Err(PageRequestError::PageTooLarge),
        }
    }

    /// Zero-based row offset for this page. Saturates for requests that
    /// did not pass `validate`.
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }
}

/// One page of results plus totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub data: Vec<T>,
    pub page: u64,
    pub limit: u64,
    pub total_data: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, request: PageRequest, total_data: u64) -> Self {
        let total_pages = if request.limit == 0 {
            0
        } else {
            total_data.div_ceil(request.limit)
        };
        Self {
            data,
            page: request.page,
            limit: request.limit,
            total_data,
            total_pages,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            data: self.data.into_iter().map(f).collect(),
            page: self.page,
            limit: self.limit,
            total_data: self.total_data,
            total_pages: self.total_pages,
        }
    }
}
