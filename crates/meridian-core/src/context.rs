//! Per-request metadata derived from request headers.

use http::HeaderMap;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Header prefix captured into the request context by default.
pub const DEFAULT_CONTEXT_HEADER_PREFIX: &str = "X-Request";

/// A unique identifier for each request, using UUID v7.
///
/// An incoming `X-Request-Id` header is honoured when it holds a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Creates a new time-ordered request ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Metadata computed once per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestMetadata {
    request_id: RequestId,
    url_root: String,
    context: IndexMap<String, String>,
}

impl RequestMetadata {
    /// Derives metadata from request headers.
    ///
    /// `default_url_root` is used for any part of the external URL root the
    /// headers do not supply. Headers whose names start with `header_prefix`
    /// (case-insensitively) are captured into the context.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap, default_url_root: &str, header_prefix: &str) -> Self {
        let prefix = header_prefix.to_ascii_lowercase();
        let context: IndexMap<String, String> = headers
            .iter()
            .filter(|(name, _)| !prefix.is_empty() && name.as_str().starts_with(&prefix))
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();

        let request_id = headers
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| Uuid::try_parse(v).ok())
            .map_or_else(RequestId::new, RequestId);

        Self {
            request_id,
            url_root: external_url_root(headers, default_url_root),
            context,
        }
    }

    /// The request identifier.
    #[must_use]
    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Scheme and authority used for external links, without a trailing slash.
    #[must_use]
    pub fn url_root(&self) -> &str {
        &self.url_root
    }

    /// Captured context headers (lower-case names).
    #[must_use]
    pub fn context(&self) -> &IndexMap<String, String> {
        &self.context
    }
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.split(',').next().unwrap_or(v).trim())
        .filter(|v| !v.is_empty())
}

/// Computes the external URL root from `Host` and `X-Forwarded-*` headers.
///
/// ```
/// use http::HeaderMap;
/// use meridian_core::context::external_url_root;
///
/// let mut headers = HeaderMap::new();
/// headers.insert("x-forwarded-port", "8080".parse().unwrap());
/// assert_eq!(external_url_root(&headers, "http://localhost"), "http://localhost:8080");
/// ```
#[must_use]
pub fn external_url_root(headers: &HeaderMap, default_url_root: &str) -> String {
    let default_url_root = default_url_root.trim_end_matches('/');
    let (default_scheme, default_host) = default_url_root
        .split_once("://")
        .unwrap_or(("http", default_url_root));

    let scheme = header(headers, "x-forwarded-proto").unwrap_or(default_scheme);
    let mut host = header(headers, "x-forwarded-host")
        .or_else(|| header(headers, "host"))
        .unwrap_or(default_host)
        .to_string();

    if let Some(port) = header(headers, "x-forwarded-port") {
        let bare = match host.rsplit_once(':') {
            Some((name, existing)) if existing.bytes().all(|b| b.is_ascii_digit()) => {
                name.to_string()
            }
            _ => host.clone(),
        };
        let standard = matches!((scheme, port), ("http", "80") | ("https", "443"));
        host = if standard {
            bare
        } else {
            format!("{bare}:{port}")
        };
    }

    format!("{scheme}://{host}")
}
