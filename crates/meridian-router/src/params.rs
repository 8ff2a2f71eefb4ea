//! Path parameter extraction and storage.
//!
//! Parameters are stored in a small vector; instance and relation paths
//! carry one or two parameters, so the common case never allocates.

use smallvec::SmallVec;

/// Maximum number of parameters stored inline (stack allocated).
const INLINE_PARAMS: usize = 4;

/// Ordered path parameters, either extracted from a match or supplied for
/// reverse URL generation.
///
/// # Example
///
/// ```rust
/// use meridian_router::Params;
///
/// let mut params = Params::new();
/// params.push("person_id", "3d2f0e60-8e52-4c5e-a2fb-8d3c1f5f3f0a");
///
/// assert_eq!(params.get("person_id"), Some("3d2f0e60-8e52-4c5e-a2fb-8d3c1f5f3f0a"));
/// assert_eq!(params.get("unknown"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Params {
    inner: SmallVec<[(String, String); INLINE_PARAMS]>,
}

impl Params {
    /// Creates a new empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parameter, replacing any earlier value with the same name.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if let Some(slot) = self.inner.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = value;
        } else {
            self.inner.push((name, value));
        }
    }

    /// Builder form of [`Params::push`].
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(name, value);
        self
    }

    /// Returns the value for a parameter by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns true if there are no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns the number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Drops parameters beyond `len`; used to unwind a failed match branch.
    pub(crate) fn truncate(&mut self, len: usize) {
        self.inner.truncate(len);
    }

    /// Returns an iterator over the parameters.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

impl<'a> IntoIterator for &'a Params {
    type Item = (&'a str, &'a str);
    type IntoIter = std::iter::Map<
        std::slice::Iter<'a, (String, String)>,
        fn(&'a (String, String)) -> (&'a str, &'a str),
    >;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (name, value) in iter {
            params.push(name, value);
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_push_and_get() {
        let mut params = Params::new();
        params.push("foo_id", "1");
        params.push("bar_id", "2");

        assert_eq!(params.get("foo_id"), Some("1"));
        assert_eq!(params.get("bar_id"), Some("2"));
        assert_eq!(params.get("baz_id"), None);
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_params_push_replaces() {
        let params = Params::new().with("foo_id", "1").with("foo_id", "2");
        assert_eq!(params.len(), 1);
        assert_eq!(params.get("foo_id"), Some("2"));
    }

    #[test]
    fn test_params_truncate() {
        let mut params = Params::new().with("a", "1");
        let mark = params.len();
        params.push("b", "2");
        params.truncate(mark);
        assert_eq!(params.iter().collect::<Vec<_>>(), vec![("a", "1")]);
    }

    #[test]
    fn test_params_from_iterator() {
        let params: Params = vec![("a", "1"), ("b", "2")].into_iter().collect();
        assert_eq!(params.get("a"), Some("1"));
        assert_eq!(params.get("b"), Some("2"));
    }

    #[test]
    fn test_params_many_params() {
        let mut params = Params::new();
        for i in 0..10 {
            params.push(format!("key{i}"), format!("value{i}"));
        }

        assert_eq!(params.len(), 10);
        assert_eq!(params.get("key5"), Some("value5"));
    }
}
