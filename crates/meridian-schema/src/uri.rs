//! URI normalisation.

use url::form_urlencoded;
use url::Url;

/// Normalises an absolute URI, or returns `None` if it is not one.
///
/// The host is lower-cased, a default port is dropped, trailing slashes are
/// removed from the path and query parameters are sorted.
///
/// ```
/// use meridian_schema::normalize_uri;
///
/// assert_eq!(
///     normalize_uri("http://ExAmPlE.com:80/foo/?b=2&a=1").as_deref(),
///     Some("http://example.com/foo?a=1&b=2"),
/// );
/// assert_eq!(normalize_uri("example"), None);
/// ```
pub fn normalize_uri(raw: &str) -> Option<String> {
    let url = Url::parse(raw.trim()).ok()?;
    let host = url.host_str()?;
    if url.cannot_be_a_base() {
        return None;
    }

    let mut out = format!("{}://", url.scheme());
    if !url.username().is_empty() {
        out.push_str(url.username());
        if let Some(password) = url.password() {
            out.push(':');
            out.push_str(password);
        }
        out.push('@');
    }
    out.push_str(host);
    if let Some(port) = url.port() {
        out.push_str(&format!(":{port}"));
    }
    out.push_str(url.path().trim_end_matches('/'));

    if url.query().is_some_and(|q| !q.is_empty()) {
        let mut pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        pairs.sort();
        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(pairs)
            .finish();
        out.push('?');
        out.push_str(&query);
    }
    if let Some(fragment) = url.fragment() {
        out.push('#');
        out.push_str(fragment);
    }
    Some(out)
}
