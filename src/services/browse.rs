//! Client-side listing helpers: pagination, sorting, trending and the
//! home-page shelf.
//!
//! The catalog returns whole result sets; everything here slices or reorders
//! them locally.

use std::cmp::Ordering;
use std::str::FromStr;

use serde::Serialize;

use crate::types::book::Book;

pub const DEFAULT_PAGE_SIZE: usize = 12;
pub const DEFAULT_HOME_LIMIT: usize = 24;
pub const DEFAULT_TRENDING_LIMIT: usize = 10;

/// One page of a result set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number actually served.
    pub page: usize,
    /// 0 when there are no items.
    pub total_pages: usize,
    pub total_items: usize,
}

/// Number of pages needed for `total_items` at `per_page` items each.
pub fn total_pages(total_items: usize, per_page: usize) -> usize {
    let per_page = per_page.max(1);
    total_items.div_ceil(per_page)
}

/// Slices `items` to the requested 1-based page, clamping out-of-range
/// requests to the first or last page.
pub fn paginate<T: Clone>(items: &[T], page: usize, per_page: usize) -> Page<T> {
    let per_page = per_page.max(1);
    let total_pages = total_pages(items.len(), per_page);
    let page = page.clamp(1, total_pages.max(1));
    let start = (page - 1) * per_page;
    let end = (start + per_page).min(items.len());
    Page {
        items: items.get(start..end).map(<[T]>::to_vec).unwrap_or_default(),
        page,
        total_pages,
        total_items: items.len(),
    }
}

/// Parses a typed page number. Only plain digits inside `1..=total_pages` are accepted.
pub fn parse_page_input(input: &str, total_pages: usize) -> Option<usize> {
    let trimmed = input.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let page: usize = trimmed.parse().ok()?;
    (1..=total_pages).contains(&page).then_some(page)
}

/// Result ordering selectable on the search page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    UpdatedDesc,
    UpdatedAsc,
    ViewsDesc,
    ViewsAsc,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "update-desc" => Ok(SortOrder::UpdatedDesc),
            "update-asc" => Ok(SortOrder::UpdatedAsc),
            "view-desc" => Ok(SortOrder::ViewsDesc),
            "view-asc" => Ok(SortOrder::ViewsAsc),
            other => Err(format!("unknown sort order: {}", other)),
        }
    }
}

impl SortOrder {
    /// Parses an optional UI value; empty or unknown means server order.
    pub fn parse_optional(value: Option<&str>) -> Option<Self> {
        value.and_then(|v| v.parse().ok())
    }
}

/// Sorts books in place. Stable, so ties keep server order. Books without a
/// parseable `updatedAt` go last for both update orders.
pub fn sort_books(books: &mut [Book], order: SortOrder) {
    match order {
        SortOrder::UpdatedDesc => books.sort_by(|a, b| {
            match (a.updated_at_instant(), b.updated_at_instant()) {
                (Some(x), Some(y)) => y.cmp(&x),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }
        }),
        SortOrder::UpdatedAsc => books.sort_by(|a, b| {
            match (a.updated_at_instant(), b.updated_at_instant()) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }
        }),
        SortOrder::ViewsDesc => books.sort_by(|a, b| b.view_count().cmp(&a.view_count())),
        SortOrder::ViewsAsc => books.sort_by_key(Book::view_count),
    }
}

/// The `limit` most viewed books, most viewed first.
pub fn trending(books: &[Book], limit: usize) -> Vec<Book> {
    let mut ranked = books.to_vec();
    sort_books(&mut ranked, SortOrder::ViewsDesc);
    ranked.truncate(limit);
    ranked
}

/// The first `limit` books in catalog order.
pub fn home_page(books: &[Book], limit: usize) -> Vec<Book> {
    books.iter().take(limit).cloned().collect()
}

/// Splits a raw comma-joined category label into display tags.
pub fn category_tags(raw: Option<&str>) -> Vec<String> {
    raw.map(|r| {
        r.split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}
