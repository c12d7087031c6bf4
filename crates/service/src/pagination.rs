//! Pagination utilities for service layer
//!
//! Provides a simple `Pagination` struct and helpers to normalize inputs
//! coming from query strings.

use serde::Serialize;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;
/// Largest offset or limit a SQL bind parameter can carry (signed 64-bit).
pub const MAX_BOUND: u64 = i64::MAX as u64;

/// Pagination parameters
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    /// 1-based page index
    pub page: u64,
    /// items per page
    pub limit: u64,
}

impl Pagination {
    /// Parse raw query values. Missing, non-numeric or non-positive values
    /// fall back to the defaults.
    pub fn from_query(page: Option<&str>, limit: Option<&str>) -> Self {
        Self {
            page: parse_positive(page).unwrap_or(DEFAULT_PAGE),
            limit: parse_positive(limit).unwrap_or(DEFAULT_LIMIT).min(MAX_BOUND),
        }
    }

    /// Rows to skip before the requested page. `None` when the offset cannot
    /// be expressed as a query bound; no row can live that far out.
    pub fn skip(&self) -> Option<u64> {
        self.page
            .saturating_sub(1)
            .checked_mul(self.limit)
            .filter(|skip| *skip <= MAX_BOUND)
    }

    /// `ceil(total / limit)`; zero when there is nothing to page through.
    pub fn total_pages(&self, total: u64) -> u64 {
        if self.limit == 0 { return 0; }
        total.div_ceil(self.limit)
    }
}

impl Default for Pagination {
    fn default() -> Self { Self { page: DEFAULT_PAGE, limit: DEFAULT_LIMIT } }
}

fn parse_positive(raw: Option<&str>) -> Option<u64> {
    raw.map(str::trim)
        .and_then(|s| s.parse::<u64>().ok())
        .filter(|v| *v > 0)
}

/// Pagination summary returned alongside a page of rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub total: u64,
    pub page: u64,
    pub total_pages: u64,
}

/// A page of rows plus its pagination summary.
#[derive(Clone, Debug, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub pagination: PageInfo,
}
