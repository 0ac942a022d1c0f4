//! Pagination helpers for list views.
//!
//! Pages are 1-based. Requests are clamped rather than rejected so that a
//! hand-edited `?page=0` still renders the first page.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Upper bound on `per_page`.
pub const MAX_PER_PAGE: u32 = 100;

/// Default page size when the caller does not specify one.
pub const DEFAULT_PER_PAGE: u32 = 20;

/// A request for one page of a list.
///
/// Deserialization goes through [`PageRequest::new`], so the clamping holds
/// for every constructed value.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawPageRequest")]
pub struct PageRequest {
    page: u32,
    per_page: u32,
}

#[derive(Deserialize)]
struct RawPageRequest {
    page: u32,
    per_page: u32,
}

impl From<RawPageRequest> for PageRequest {
    fn from(raw: RawPageRequest) -> Self {
        Self::new(raw.page, raw.per_page)
    }
}

impl PageRequest {
    /// Build a request, clamping `page` to at least 1 and `per_page` into
    /// `1..=MAX_PER_PAGE`.
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.clamp(1, MAX_PER_PAGE),
        }
    }

    /// Parse raw query-string values (`?page=2&per_page=50`).
    ///
    /// Missing values fall back to the first page and [`DEFAULT_PER_PAGE`].
    /// Non-numeric values are a validation error.
    pub fn parse(page: Option<&str>, per_page: Option<&str>) -> DomainResult<Self> {
        let page = parse_number("page", page, 1)?;
        let per_page = parse_number("per_page", per_page, DEFAULT_PER_PAGE)?;
        Ok(Self::new(page, per_page))
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Number of rows to skip.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.per_page)
    }

    /// Inclusive `(from, to)` row range, as expected by range-based backends.
    pub fn range(&self) -> (u64, u64) {
        let from = self.offset();
        (from, from + u64::from(self.per_page) - 1)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, DEFAULT_PER_PAGE)
    }
}

fn parse_number(name: &str, raw: Option<&str>, default: u32) -> DomainResult<u32> {
    match raw.map(str::trim) {
        None | Some("") => Ok(default),
        Some(value) => value.parse::<u32>().map_err(|_| {
            DomainError::validation(format!("{name} must be a non-negative integer, got '{value}'"))
        }),
    }
}

/// One page of results plus the arithmetic a list view needs for navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub per_page: u32,
    pub total_items: u64,
    pub total_pages: u32,
    pub has_next: bool,
    pub has_previous: bool,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total_items: u64) -> Self {
        let total_pages = total_pages(total_items, request.per_page());
        let page = request.page();
        Self {
            items,
            page,
            per_page: request.per_page(),
            total_items,
            total_pages,
            has_next: page < total_pages,
            has_previous: page > 1,
        }
    }

    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            per_page: self.per_page,
            total_items: self.total_items,
            total_pages: self.total_pages,
            has_next: self.has_next,
            has_previous: self.has_previous,
        }
    }
}

fn total_pages(total_items: u64, per_page: u32) -> u32 {
    let pages = total_items.div_ceil(u64::from(per_page));
    u32::try_from(pages).unwrap_or(u32::MAX)
}
