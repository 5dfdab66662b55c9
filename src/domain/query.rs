// src/domain/query.rs
//! Building blocks for filtered, sorted and paginated queries.
//!
//! A [`PageQuery`] bundles an entity specific filter, an ordered list of
//! [`SortKey`]s and a normalised [`PageRequest`]. Storage backends receive
//! the whole bundle through [`PagedSource`] and translate it into a single
//! query (SQL `WHERE` / `ORDER BY` / `LIMIT` / `OFFSET` for Postgres).
use crate::domain::errors::{DomainError, DomainResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, fmt, str::FromStr};
use tokio_util::sync::CancellationToken;

pub const DEFAULT_PAGE_SIZE: u32 = 25;
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }

    /// NULL placement matching `Option`'s ordering, where `None` is the
    /// smallest value.
    pub fn nulls_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "NULLS FIRST",
            SortDirection::Desc => "NULLS LAST",
        }
    }

    pub fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// A sortable column of some entity projection.
pub trait SortField: Copy + fmt::Debug + PartialEq + Send + Sync + 'static {
    /// Column (or expression) used by SQL backends. Only whitelisted values
    /// are ever pushed into a query.
    fn column(&self) -> &'static str;

    fn parse(name: &str) -> Option<Self>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey<S> {
    pub field: S,
    pub direction: SortDirection,
}

impl<S> SortKey<S> {
    pub fn asc(field: S) -> Self {
        Self {
            field,
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: S) -> Self {
        Self {
            field,
            direction: SortDirection::Desc,
        }
    }
}

/// Accepts `name`, `-name`, `name:asc` and `name:desc`.
impl<S: SortField> FromStr for SortKey<S> {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let (name, direction) = if let Some(rest) = raw.strip_prefix('-') {
            (rest, SortDirection::Desc)
        } else if let Some((name, dir)) = raw.split_once(':') {
            let direction = match dir.trim().to_ascii_lowercase().as_str() {
                "asc" => SortDirection::Asc,
                "desc" => SortDirection::Desc,
                other => {
                    return Err(DomainError::validation(
                        "sort",
                        format!("unknown sort direction: {other}"),
                    ));
                }
            };
            (name, direction)
        } else {
            (raw, SortDirection::Asc)
        };

        let field = S::parse(name.trim())
            .ok_or_else(|| DomainError::validation("sort", format!("unknown sort field: {name}")))?;
        Ok(Self { field, direction })
    }
}

/// In-memory comparison used by backends that sort rows themselves.
pub trait Sortable<S> {
    fn compare_by(&self, other: &Self, field: S) -> Ordering;
}

/// Orders `items` by the first key, breaking ties with each following key.
pub fn sort_by_keys<T, S>(items: &mut [T], keys: &[SortKey<S>])
where
    T: Sortable<S>,
    S: Copy,
{
    items.sort_by(|a, b| {
        keys.iter()
            .map(|key| key.direction.apply(a.compare_by(b, key.field)))
            .find(|ordering| *ordering != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    });
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    page_size: u32,
}

impl PageRequest {
    /// Page numbers start at 1; `0` is treated as the first page. An invalid
    /// page size falls back to the default and is capped at the maximum.
    pub fn new(page: u32, page_size: u32) -> Self {
        Self::with_limits(page, page_size, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE)
    }

    pub fn with_limits(page: u32, page_size: u32, default_size: u32, max_size: u32) -> Self {
        let max_size = max_size.max(1);
        let page_size = if page_size == 0 {
            default_size.clamp(1, max_size)
        } else {
            page_size.min(max_size)
        };
        Self {
            page: page.max(1),
            page_size,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.page_size)
    }

    pub fn is_first(&self) -> bool {
        self.page == 1
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, DEFAULT_PAGE_SIZE)
    }
}

/// Configured page size bounds applied to caller supplied paging input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    pub default_size: u32,
    pub max_size: u32,
}

impl PageLimits {
    pub fn request(&self, page: u32, page_size: u32) -> PageRequest {
        PageRequest::with_limits(page, page_size, self.default_size, self.max_size)
    }
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default_size: DEFAULT_PAGE_SIZE,
            max_size: MAX_PAGE_SIZE,
        }
    }
}

/// Trimmed, non-empty free-text search term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm(String);

impl SearchTerm {
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        raw.map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive substring match.
    pub fn matches(&self, haystack: &str) -> bool {
        haystack.to_lowercase().contains(&self.0.to_lowercase())
    }

    pub fn matches_any<'a>(&self, fields: impl IntoIterator<Item = Option<&'a str>>) -> bool {
        fields.into_iter().flatten().any(|field| self.matches(field))
    }

    /// `ILIKE` pattern with `%`, `_` and `\` escaped.
    pub fn like_pattern(&self) -> String {
        let mut escaped = String::with_capacity(self.0.len() + 2);
        escaped.push('%');
        for ch in self.0.chars() {
            if matches!(ch, '%' | '_' | '\\') {
                escaped.push('\\');
            }
            escaped.push(ch);
        }
        escaped.push('%');
        escaped
    }
}

#[derive(Debug, Clone)]
pub struct PageQuery<F, S> {
    pub filter: F,
    pub sort: Vec<SortKey<S>>,
    pub page: PageRequest,
}

impl<F, S> PageQuery<F, S> {
    pub fn new(filter: F) -> Self {
        Self {
            filter,
            sort: Vec::new(),
            page: PageRequest::default(),
        }
    }

    pub fn with_sort(mut self, sort: Vec<SortKey<S>>) -> Self {
        self.sort = sort;
        self
    }

    /// Used when the caller supplied no sort keys.
    pub fn or_default_sort(mut self, key: SortKey<S>) -> Self {
        if self.sort.is_empty() {
            self.sort.push(key);
        }
        self
    }

    pub fn with_page(mut self, page: PageRequest) -> Self {
        self.page = page;
        self
    }
}

/// Storage seam for paginated reads: one call for the requested slice and
/// one for the total number of rows matching the filter.
#[async_trait]
pub trait PagedSource<F, S, T>: Send + Sync
where
    F: Send + Sync + 'static,
    S: Send + Sync + 'static,
    T: Send + 'static,
{
    async fn fetch_slice(
        &self,
        query: &PageQuery<F, S>,
        cancel: &CancellationToken,
    ) -> DomainResult<Vec<T>>;

    async fn count_matching(&self, filter: &F, cancel: &CancellationToken) -> DomainResult<u64>;
}
