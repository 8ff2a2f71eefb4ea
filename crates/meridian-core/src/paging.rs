//! Offset/limit pagination.

use meridian_router::Params;
use serde_json::{json, Value};

use crate::error::MeridianResult;
use crate::link::{Link, Links, UrlContext};
use crate::namespace::Namespace;
use crate::operation::Operation;
use crate::Record;

/// Page size used when a request does not ask for one.
pub const DEFAULT_LIMIT: i64 = 20;

/// An offset/limit window.
///
/// [`Page::prev`] may produce a negative offset when `offset < limit`;
/// callers clamp as needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Page {
    /// Index of the first item
    pub offset: i64,
    /// Maximum number of items
    pub limit: i64,
}

impl Page {
    /// Creates a page.
    #[must_use]
    pub const fn new(offset: i64, limit: i64) -> Self {
        Self { offset, limit }
    }

    /// Reads `offset` and `limit` from raw query pairs.
    ///
    /// Missing or non-integer values fall back to `0` and `default_limit`;
    /// this never fails.
    #[must_use]
    pub fn from_query(query: &[(String, String)], default_limit: i64) -> Self {
        let lookup = |key: &str| {
            query
                .iter()
                .find(|(k, _)| k == key)
                .and_then(|(_, v)| v.trim().parse::<i64>().ok())
        };
        Self::checked(lookup("offset"), lookup("limit"), default_limit)
    }

    /// Reads `offset` and `limit` from a decoded record.
    #[must_use]
    pub fn from_record(record: &Record, default_limit: i64) -> Self {
        let lookup = |key: &str| {
            record.get(key).and_then(|v| match v {
                Value::Number(n) => n.as_i64(),
                Value::String(s) => s.trim().parse::<i64>().ok(),
                _ => None,
            })
        };
        Self::checked(lookup("offset"), lookup("limit"), default_limit)
    }

    fn checked(offset: Option<i64>, limit: Option<i64>, default_limit: i64) -> Self {
        Self {
            offset: offset.filter(|o| *o >= 0).unwrap_or(0),
            limit: limit.filter(|l| *l > 0).unwrap_or(default_limit),
        }
    }

    /// The following page.
    #[must_use]
    pub const fn next(&self) -> Self {
        Self::new(self.offset.saturating_add(self.limit), self.limit)
    }

    /// The preceding page.
    #[must_use]
    pub const fn prev(&self) -> Self {
        Self::new(self.offset.saturating_sub(self.limit), self.limit)
    }

    /// `[("offset", ..), ("limit", ..)]`, in that order.
    #[must_use]
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        vec![
            ("offset".to_string(), self.offset.to_string()),
            ("limit".to_string(), self.limit.to_string()),
        ]
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(0, DEFAULT_LIMIT)
    }
}

/// One page of search results and the links around it.
#[derive(Debug, Clone)]
pub struct PaginatedList {
    namespace: Namespace,
    operation: Operation,
    page: Page,
    items: Vec<Value>,
    count: u64,
    context: Params,
}

impl PaginatedList {
    /// Creates a list for a plain search in `ns`.
    #[must_use]
    pub fn new(ns: &Namespace, page: Page, items: Vec<Value>, count: u64) -> Self {
        Self {
            namespace: ns.clone(),
            operation: Operation::Search,
            page,
            items,
            count,
            context: Params::new(),
        }
    }

    /// Links to `operation` instead of [`Operation::Search`].
    #[must_use]
    pub fn with_operation(mut self, operation: Operation) -> Self {
        self.operation = operation;
        self
    }

    /// Path parameters needed to link back to a nested collection.
    #[must_use]
    pub fn with_context(mut self, context: Params) -> Self {
        self.context = context;
        self
    }

    /// True when items exist past this page.
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.page
            .offset
            .checked_add(self.page.limit)
            .and_then(|end| u64::try_from(end).ok())
            .is_some_and(|end| end < self.count)
    }

    /// True when this is not the first page.
    #[must_use]
    pub const fn has_prev(&self) -> bool {
        self.page.offset > 0
    }

    fn link(&self, urls: &UrlContext<'_>, page: Page) -> MeridianResult<Link> {
        Link::to(self.operation, &self.namespace)
            .params(self.context.iter())
            .qs(page.to_query_pairs())
            .resolve(urls)
    }

    /// `self`, and `next`/`prev` where they exist.
    pub fn links(&self, urls: &UrlContext<'_>) -> MeridianResult<Links> {
        let mut links = Links::new();
        links.insert("self", self.link(urls, self.page)?);
        if self.has_next() {
            links.insert("next", self.link(urls, self.page.next())?);
        }
        if self.has_prev() {
            links.insert("prev", self.link(urls, self.page.prev())?);
        }
        Ok(links)
    }

    /// Renders `{count, items, offset, limit, _links}`.
    pub fn to_value(&self, urls: &UrlContext<'_>) -> MeridianResult<Value> {
        Ok(json!({
            "count": self.count,
            "items": self.items,
            "offset": self.page.offset,
            "limit": self.page.limit,
            "_links": self.links(urls)?,
        }))
    }
}
