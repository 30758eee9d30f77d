//! Pagination
//!
//! Turns the raw `page`/`limit`/`sort`/`search` query strings into a checked
//! [`PageRequest`], builds the `meta` block of list responses, and computes the
//! page links a front end renders under a list.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::api::ListQuery;
use crate::error::ValidationError;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;
pub const MAX_LIMIT: u32 = 100;

pub const EXPECTED_NUMBER: &str = "Expected number, received nan";
const INVALID_SORT: &str = "Invalid enum value. Expected 'asc' | 'desc'";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Sort {
    Asc,
    #[default]
    Desc,
}

impl Sort {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Sort::Asc => "ASC",
            Sort::Desc => "DESC",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Sort::Asc => "asc",
            Sort::Desc => "desc",
        }
    }
}

impl FromStr for Sort {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Sort::Asc),
            "desc" => Ok(Sort::Desc),
            _ => Err(ValidationError::new(INVALID_SORT)),
        }
    }
}

/// A validated list request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
    pub sort: Sort,
    pub search: Option<String>,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            sort: Sort::default(),
            search: None,
        }
    }
}

fn parse_positive(raw: Option<&str>, default: u32) -> Result<u32, ValidationError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(default),
        Some(value) => match value.parse::<u32>() {
            Ok(0) => Err(ValidationError::new("Number must be greater than 0")),
            Ok(n) => Ok(n),
            Err(_) => Err(ValidationError::new(EXPECTED_NUMBER)),
        },
    }
}

impl PageRequest {
    pub fn from_query(query: &ListQuery) -> Result<Self, ValidationError> {
        let page = parse_positive(query.page.as_deref(), DEFAULT_PAGE)?;
        let limit = parse_positive(query.limit.as_deref(), DEFAULT_LIMIT)?.min(MAX_LIMIT);
        let sort = match query.sort.as_deref() {
            None | Some("") => Sort::default(),
            Some(raw) => raw.parse()?,
        };
        let search = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        Ok(Self {
            page,
            limit,
            sort,
            search,
        })
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub current_page: u32,
    pub limit: u32,
    pub total_count: u64,
    pub total_pages: u64,
}

impl PageMeta {
    pub fn new(request: &PageRequest, total_count: u64) -> Self {
        Self {
            current_page: request.page,
            limit: request.limit,
            total_count,
            total_pages: total_count.div_ceil(u64::from(request.limit)),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub meta: PageMeta,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, request: &PageRequest, total_count: u64) -> Self {
        Self {
            data,
            meta: PageMeta::new(request, total_count),
        }
    }
}

/// One entry of a rendered page strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    Page(u32),
    Ellipsis,
}

/// Page links to show: every page for short lists, otherwise the first and
/// last page, the current page with one neighbour on each side, and gaps.
pub fn visible_pages(current: u32, total: u32) -> Vec<PageItem> {
    if total <= 7 {
        return (1..=total).map(PageItem::Page).collect();
    }

    let current = current.clamp(1, total);
    let mut pages = vec![PageItem::Page(1)];
    if current > 3 {
        pages.push(PageItem::Ellipsis);
    }

    let start = current.saturating_sub(1).max(2);
    let end = current.saturating_add(1).min(total - 1);
    pages.extend((start..=end).map(PageItem::Page));

    if current.saturating_add(2) < total {
        pages.push(PageItem::Ellipsis);
    }
    pages.push(PageItem::Page(total));
    pages
}

/// Link to `page`, carrying over every non-empty parameter except `page`.
pub fn page_url(base: &str, params: &[(&str, &str)], page: u32) -> String {
    let mut query = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in params {
        if *key != "page" && !value.is_empty() {
            query.append_pair(key, value);
        }
    }
    query.append_pair("page", &page.to_string());
    format!("{}?{}", base, query.finish())
}
