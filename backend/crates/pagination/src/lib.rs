//! Keyset pagination primitives shared by listing endpoints.
//!
//! A page boundary is the identifier of the last item a caller has seen.
//! Listings are ordered by identifier descending, so the next page holds the
//! items whose identifier sorts strictly before the cursor.
//!
//! ```
//! use pagination::{Page, PageParams};
//!
//! let params = PageParams {
//!     cursor: None,
//!     limit: Some("2".to_owned()),
//! };
//! let request = params.parse::<u32>().expect("valid parameters");
//! assert_eq!(request.limit(), 2);
//!
//! let page = Page::from_items(vec![9_u32, 8], &request, |item| *item);
//! assert_eq!(page.next_cursor(), Some(&8));
//! ```

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Page size applied when the caller omits a limit or sends a non-positive one.
pub const DEFAULT_LIMIT: usize = 100;

/// Upper bound on the page size a caller may request.
pub const MAX_LIMIT: usize = 1000;

/// Errors raised while parsing raw pagination parameters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaginationError {
    /// The limit could not be parsed as an integer.
    #[error("limit must be an integer, got '{value}'")]
    InvalidLimit {
        /// Raw value supplied by the caller.
        value: String,
    },
    /// The cursor could not be parsed as an identifier.
    #[error("cursor is not a valid identifier: '{value}'")]
    InvalidCursor {
        /// Raw value supplied by the caller.
        value: String,
    },
}

impl PaginationError {
    /// Name of the query parameter that failed to parse.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::InvalidLimit { .. } => "limit",
            Self::InvalidCursor { .. } => "cursor",
        }
    }

    /// Raw value that failed to parse.
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::InvalidLimit { value } | Self::InvalidCursor { value } => value,
        }
    }
}

/// Raw query parameters as they arrive from a transport.
///
/// Empty strings are treated as absent values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageParams {
    /// Identifier of the last item seen by the caller.
    #[serde(default)]
    pub cursor: Option<String>,
    /// Requested page size.
    #[serde(default)]
    pub limit: Option<String>,
}

impl PageParams {
    /// Parse the raw parameters into a typed [`PageRequest`].
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError::InvalidLimit`] when the limit is not an
    /// integer and [`PaginationError::InvalidCursor`] when the cursor does not
    /// parse as `C`.
    pub fn parse<C: FromStr>(&self) -> Result<PageRequest<C>, PaginationError> {
        let limit = match non_empty(self.limit.as_deref()) {
            Some(raw) => Some(raw.parse::<i64>().map_err(|_| PaginationError::InvalidLimit {
                value: raw.to_owned(),
            })?),
            None => None,
        };
        let cursor = match non_empty(self.cursor.as_deref()) {
            Some(raw) => Some(raw.parse::<C>().map_err(|_| PaginationError::InvalidCursor {
                value: raw.to_owned(),
            })?),
            None => None,
        };
        Ok(PageRequest::new(cursor, limit))
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|raw| !raw.is_empty())
}

/// Normalise a caller-supplied limit.
///
/// Absent and non-positive values fall back to [`DEFAULT_LIMIT`]; large values
/// are clamped to [`MAX_LIMIT`].
#[must_use]
pub fn normalize_limit(raw: Option<i64>) -> usize {
    match raw {
        Some(value) if value > 0 => usize::try_from(value).map_or(MAX_LIMIT, |v| v.min(MAX_LIMIT)),
        _ => DEFAULT_LIMIT,
    }
}

/// Typed page request: an optional exclusive cursor and a normalised limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest<C> {
    cursor: Option<C>,
    limit: usize,
}

impl<C> PageRequest<C> {
    /// Build a request, normalising the limit.
    #[must_use]
    pub fn new(cursor: Option<C>, limit: Option<i64>) -> Self {
        Self {
            cursor,
            limit: normalize_limit(limit),
        }
    }

    /// First page with the default limit.
    #[must_use]
    pub const fn first() -> Self {
        Self {
            cursor: None,
            limit: DEFAULT_LIMIT,
        }
    }

    /// Exclusive upper bound for the next page, if any.
    #[must_use]
    pub const fn cursor(&self) -> Option<&C> {
        self.cursor.as_ref()
    }

    /// Maximum number of items to return.
    #[must_use]
    pub const fn limit(&self) -> usize {
        self.limit
    }
}

impl<C> Default for PageRequest<C> {
    fn default() -> Self {
        Self::first()
    }
}

/// One page of results with the cursor for the following page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T, C> {
    items: Vec<T>,
    next_cursor: Option<C>,
}

impl<T, C> Page<T, C> {
    /// Build a page from items already ordered and truncated by the store.
    ///
    /// The next cursor is the identifier of the last item when the page is
    /// full. A short or empty page has no next cursor.
    #[must_use]
    pub fn from_items<R>(
        items: Vec<T>,
        request: &PageRequest<R>,
        cursor_of: impl Fn(&T) -> C,
    ) -> Self {
        let next_cursor = if items.len() >= request.limit() {
            items.last().map(cursor_of)
        } else {
            None
        };
        Self { items, next_cursor }
    }

    /// Items on this page.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Cursor for the following page, or `None` once exhausted.
    #[must_use]
    pub const fn next_cursor(&self) -> Option<&C> {
        self.next_cursor.as_ref()
    }

    /// Split the page into its items and next cursor.
    #[must_use]
    pub fn into_parts(self) -> (Vec<T>, Option<C>) {
        (self.items, self.next_cursor)
    }

    /// Transform every item, keeping the cursor.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U, C> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            next_cursor: self.next_cursor,
        }
    }
}
