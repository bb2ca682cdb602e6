//! Pagination primitives shared by every listing endpoint
//!
//! Callers send `page`, `limit`, `sortOrder` and similar parameters as
//! untrusted strings. [`PageRequest`] and [`SortDirection`] turn them into a
//! bounded, deterministic query plan: junk values fall back to defaults and
//! `limit` is clamped so a single request can never ask for an unbounded
//! result set.

use serde::Serialize;

/// Hard upper bound for `limit`.
pub const MAX_LIMIT: u32 = 100;

/// Items per page when the caller does not say otherwise.
pub const DEFAULT_LIMIT: u32 = 10;

/// Sanitized pagination window.
///
/// Invariants: `page >= 1` and `1 <= limit <= MAX_LIMIT`. The only way to
/// construct one is through [`PageRequest::new`] or [`PageRequest::from_raw`],
/// both of which enforce the bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    /// Build from already-parsed values, applying defaults and bounds.
    pub fn new(page: Option<u32>, limit: Option<u32>) -> Self {
        let page = match page {
            Some(p) if p >= 1 => p,
            _ => 1,
        };
        let limit = match limit {
            Some(l) if l >= 1 => l.min(MAX_LIMIT),
            _ => DEFAULT_LIMIT,
        };
        Self { page, limit }
    }

    /// Build from raw query strings. Non-numeric or non-positive values
    /// fall back to the defaults instead of erroring.
    pub fn from_raw(page: Option<&str>, limit: Option<&str>) -> Self {
        Self::new(
            page.and_then(|s| s.trim().parse().ok()),
            limit.and_then(|s| s.trim().parse().ok()),
        )
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of records to skip: `(page - 1) * limit`.
    pub fn skip(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// Sort direction for listing queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

impl SortDirection {
    /// `"desc"` (and absence) sorts descending; any other value ascending.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("desc") | None => SortDirection::Descending,
            Some(_) => SortDirection::Ascending,
        }
    }

    pub fn is_descending(&self) -> bool {
        matches!(self, SortDirection::Descending)
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "ASC",
            SortDirection::Descending => "DESC",
        }
    }
}

/// Pagination metadata returned alongside every listing
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub pages: u64,
}

/// One page of items plus the metadata describing the full result set
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Page<T> {
    /// Shape a page from the slice a repository returned and the total
    /// match count before slicing.
    pub fn new(items: Vec<T>, request: &PageRequest, total: u64) -> Self {
        Self {
            items,
            pagination: Pagination {
                page: request.page(),
                limit: request.limit(),
                total,
                pages: total_pages(total, request.limit()),
            },
        }
    }

    /// Map the item type, keeping the metadata (entity to DTO conversion).
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }
}

/// `ceil(total / limit)`; 0 for an empty result set.
pub fn total_pages(total: u64, limit: u32) -> u64 {
    total.div_ceil(u64::from(limit))
}
