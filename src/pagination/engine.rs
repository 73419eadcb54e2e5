//! Pagination Engine
//!
//! Three interchangeable strategies over a collection sorted ascending by
//! its monotonic ordering key: offset/limit, page/size, and opaque
//! cursor. Each call is a pure function of (snapshot, parameters); no
//! pagination state lives on the server between requests.
//!
//! Offset and page strategies are positional: concurrent inserts or
//! deletes shift positions between requests, so they offer no
//! exactly-once traversal guarantee. The cursor strategy selects on the
//! ordering key instead, so a forward walk never re-sees or skips
//! elements that were present when it started. Concurrent deletion of
//! not-yet-visited elements simply removes them from later pages.

use serde::{Deserialize, Serialize};

use crate::error::{ApiError, Result};
use crate::pagination::{decode_cursor, encode_cursor, Cursor};

// == Guardrails ==
/// Page size when the client supplies none
pub const DEFAULT_LIMIT: i64 = 20;
/// Upper clamp for any page size
pub const MAX_LIMIT: i64 = 100;

// == Sequenced Trait ==
/// Exposes the monotonic ordering key pagination sorts and resumes by.
pub trait Sequenced {
    /// The ordering key (insertion sequence)
    fn seq(&self) -> u64;
}

// == List Params ==
/// Raw query parameters for list endpoints. Kept as strings so a
/// malformed integer produces a 400 naming the offending field rather
/// than a framework-shaped rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    pub offset: Option<String>,
    pub limit: Option<String>,
    pub page: Option<String>,
    pub size: Option<String>,
    pub cursor: Option<String>,
}

// == Page Request ==
/// A validated, clamped pagination request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageRequest {
    /// Positional window `[offset, offset+limit)`
    Offset { offset: i64, limit: i64 },
    /// 1-based page over fixed-size windows
    Numbered { page: i64, size: i64 },
    /// Ordering-key resume point
    Cursor { after_id: u64, limit: i64 },
}

impl PageRequest {
    // == Parse ==
    /// Selects and validates a strategy from raw query parameters.
    ///
    /// A `cursor` parameter selects the cursor strategy; `page` or `size`
    /// selects page/size; otherwise offset/limit with defaults. Guardrail
    /// clamping: offset >= 0, limit and size in [1, 100], page >= 1.
    pub fn parse(params: &ListParams) -> Result<Self> {
        if let Some(token) = &params.cursor {
            let Cursor { after_id } = decode_cursor(token)?;
            let limit = parse_integer("limit", &params.limit, DEFAULT_LIMIT)?.clamp(1, MAX_LIMIT);
            return Ok(PageRequest::Cursor { after_id, limit });
        }

        if params.page.is_some() || params.size.is_some() {
            let page = parse_integer("page", &params.page, 1)?.max(1);
            let size = parse_integer("size", &params.size, DEFAULT_LIMIT)?.clamp(1, MAX_LIMIT);
            return Ok(PageRequest::Numbered { page, size });
        }

        let offset = parse_integer("offset", &params.offset, 0)?.max(0);
        let limit = parse_integer("limit", &params.limit, DEFAULT_LIMIT)?.clamp(1, MAX_LIMIT);
        Ok(PageRequest::Offset { offset, limit })
    }
}

/// Parses an optional integer parameter, naming the field on failure.
fn parse_integer(name: &str, raw: &Option<String>, default: i64) -> Result<i64> {
    match raw {
        None => Ok(default),
        Some(s) => s
            .parse::<i64>()
            .map_err(|_| ApiError::Validation(format!("{} must be an integer", name))),
    }
}

// == Page Info ==
/// Navigation metadata accompanying a page. Fields are strategy-specific;
/// absent ones are omitted from the wire.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// Which strategy produced this page
    pub strategy: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<i64>,
    /// Whether more elements follow this page
    pub has_more: bool,
}

// == Links ==
/// A hypermedia link.
#[derive(Debug, Clone, Serialize)]
pub struct Link {
    pub href: String,
}

impl Link {
    fn new(href: String) -> Self {
        Self { href }
    }
}

/// Navigation links for positional strategies.
#[derive(Debug, Clone, Serialize)]
pub struct PageLinks {
    #[serde(rename = "self")]
    pub self_link: Link,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<Link>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<Link>,
    pub first: Link,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last: Option<Link>,
}

// == Page ==
/// One page of items plus everything a client needs to fetch the next.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page_info: PageInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
    #[serde(rename = "_links", skip_serializing_if = "Option::is_none")]
    pub links: Option<PageLinks>,
}

// == Paginate ==
/// Selects a page from `items`, which must already be sorted ascending by
/// ordering key (the store's list methods guarantee this). `base_path` is
/// the request path used to build navigation hrefs.
pub fn paginate<T: Sequenced + Clone>(
    items: &[T],
    request: &PageRequest,
    base_path: &str,
) -> Result<Page<T>> {
    match *request {
        PageRequest::Offset { offset, limit } => Ok(offset_page(items, offset, limit, base_path)),
        PageRequest::Numbered { page, size } => Ok(numbered_page(items, page, size, base_path)),
        PageRequest::Cursor { after_id, limit } => cursor_page(items, after_id, limit),
    }
}

// == Offset Strategy ==
fn offset_page<T: Clone>(items: &[T], offset: i64, limit: i64, base_path: &str) -> Page<T> {
    let total = items.len() as i64;
    let start = offset.clamp(0, total) as usize;
    let end = offset.saturating_add(limit).clamp(0, total) as usize;
    let selected = items[start..end].to_vec();
    let has_more = offset.saturating_add(limit) < total;

    let links = PageLinks {
        self_link: Link::new(format!("{}?offset={}&limit={}", base_path, offset, limit)),
        next: has_more
            .then(|| Link::new(format!("{}?offset={}&limit={}", base_path, offset + limit, limit))),
        prev: None,
        first: Link::new(format!("{}?offset=0&limit={}", base_path, limit)),
        last: None,
    };

    Page {
        items: selected,
        page_info: PageInfo {
            strategy: "offset",
            offset: Some(offset),
            limit: Some(limit),
            page: None,
            size: None,
            total: Some(total),
            total_pages: None,
            has_more,
        },
        next_cursor: None,
        links: Some(links),
    }
}

// == Page Strategy ==
fn numbered_page<T: Clone>(items: &[T], page: i64, size: i64, base_path: &str) -> Page<T> {
    let total = items.len() as i64;
    let total_pages = (total + size - 1) / size;
    // A page beyond the end is an empty page, not an error
    let offset = (page - 1).saturating_mul(size);
    let start = offset.clamp(0, total) as usize;
    let end = offset.saturating_add(size).clamp(0, total) as usize;
    let selected = items[start..end].to_vec();
    let has_more = page < total_pages;

    let links = PageLinks {
        self_link: Link::new(format!("{}?page={}&size={}", base_path, page, size)),
        next: has_more.then(|| Link::new(format!("{}?page={}&size={}", base_path, page + 1, size))),
        prev: (page > 1).then(|| Link::new(format!("{}?page={}&size={}", base_path, page - 1, size))),
        first: Link::new(format!("{}?page=1&size={}", base_path, size)),
        last: (total_pages > 0)
            .then(|| Link::new(format!("{}?page={}&size={}", base_path, total_pages, size))),
    };

    Page {
        items: selected,
        page_info: PageInfo {
            strategy: "page",
            offset: None,
            limit: None,
            page: Some(page),
            size: Some(size),
            total: Some(total),
            total_pages: Some(total_pages),
            has_more,
        },
        next_cursor: None,
        links: Some(links),
    }
}

// == Cursor Strategy ==
fn cursor_page<T: Sequenced + Clone>(items: &[T], after_id: u64, limit: i64) -> Result<Page<T>> {
    // Items are sorted by seq, so the resume point is a partition point
    let start = items.partition_point(|item| item.seq() <= after_id);
    let end = (start + limit as usize).min(items.len());
    let selected = items[start..end].to_vec();

    // A cursor is emitted only for an exactly-full page; a short page
    // signals end-of-collection
    let next_cursor = if selected.len() == limit as usize {
        let last = selected
            .last()
            .ok_or_else(|| ApiError::Internal("full page cannot be empty".to_string()))?;
        Some(encode_cursor(&Cursor {
            after_id: last.seq(),
        })?)
    } else {
        None
    };

    Ok(Page {
        page_info: PageInfo {
            strategy: "cursor",
            offset: None,
            limit: Some(limit),
            page: None,
            size: None,
            total: None,
            total_pages: None,
            has_more: next_cursor.is_some(),
        },
        items: selected,
        next_cursor,
        links: None,
    })
}
