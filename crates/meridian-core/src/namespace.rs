//! Namespaces: what a set of operations acts on, and where it is mounted.

use crate::error::{MeridianError, MeridianResult};
use crate::naming::{
    collection_path_for, instance_path_for, relation_path_for, singleton_path_for, ResourceName,
};
use crate::operation::{EndpointPattern, Operation};

/// Version used in endpoint identifiers when a namespace has none.
pub const DEFAULT_VERSION: &str = "v1";

/// A subject (and optional object) resource mounted under a path prefix and
/// an optional version.
///
/// Namespaces are immutable values; every path and the endpoint identifier
/// are derived on demand.
///
/// ```
/// use meridian_core::{Namespace, Operation};
///
/// let ns = Namespace::relation("person", "address").with_version("v1");
/// assert_eq!(ns.path(), "/v1");
/// assert_eq!(ns.relation_path().unwrap(), "/v1/person/<uuid:person_id>/address");
/// assert_eq!(ns.endpoint_for(Operation::SearchFor), "person.search_for.address.v1");
///
/// let (op, parsed) = Namespace::parse_endpoint("person.search_for.address.v1").unwrap();
/// assert_eq!(op, Operation::SearchFor);
/// assert!(parsed.is_equivalent(&ns));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Namespace {
    subject: ResourceName,
    object: Option<ResourceName>,
    prefix: String,
    version: Option<String>,
}

impl Namespace {
    /// A namespace for a single resource.
    pub fn new(subject: impl Into<ResourceName>) -> Self {
        Self {
            subject: subject.into(),
            object: None,
            prefix: String::new(),
            version: None,
        }
    }

    /// A namespace for a subject/object relation.
    pub fn relation(subject: impl Into<ResourceName>, object: impl Into<ResourceName>) -> Self {
        Self {
            object: Some(object.into()),
            ..Self::new(subject)
        }
    }

    /// Sets the path prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Sets the version.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// The subject name.
    #[must_use]
    pub fn subject_name(&self) -> &str {
        self.subject.as_str()
    }

    /// The object name, for relations.
    #[must_use]
    pub fn object_name(&self) -> Option<&str> {
        self.object.as_ref().map(ResourceName::as_str)
    }

    /// The path prefix, without the version.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The declared version.
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// The version used in endpoint identifiers.
    #[must_use]
    pub fn effective_version(&self) -> &str {
        self.version.as_deref().unwrap_or(DEFAULT_VERSION)
    }

    /// Prefix plus `/{version}` when versioned.
    #[must_use]
    pub fn path(&self) -> String {
        match &self.version {
            Some(version) => format!("{}/{version}", self.prefix),
            None => self.prefix.clone(),
        }
    }

    /// `{path}/{subject}`
    #[must_use]
    pub fn collection_path(&self) -> String {
        format!("{}{}", self.path(), collection_path_for(&self.subject))
    }

    /// `{path}/{subject}/<uuid:{subject}_id>`
    #[must_use]
    pub fn instance_path(&self) -> String {
        format!("{}{}", self.path(), instance_path_for(&self.subject))
    }

    /// Same as the collection path.
    #[must_use]
    pub fn singleton_path(&self) -> String {
        format!("{}{}", self.path(), singleton_path_for(&self.subject))
    }

    /// `{path}/{subject}/<uuid:{subject}_id>/{object}`, for relations.
    #[must_use]
    pub fn relation_path(&self) -> Option<String> {
        self.object
            .as_ref()
            .map(|object| format!("{}{}", self.path(), relation_path_for(&self.subject, object)))
    }

    /// The namespace of this relation's object, sharing prefix and version.
    #[must_use]
    pub fn object_ns(&self) -> Option<Namespace> {
        self.object.as_ref().map(|object| Namespace {
            subject: object.clone(),
            object: None,
            prefix: self.prefix.clone(),
            version: self.version.clone(),
        })
    }

    /// The endpoint identifier for `operation` in this namespace.
    #[must_use]
    pub fn endpoint_for(&self, operation: Operation) -> String {
        let version = self.effective_version();
        match operation.pattern() {
            EndpointPattern::Node => {
                format!("{}.{}.{version}", self.subject, operation.name())
            }
            EndpointPattern::Edge => format!(
                "{}.{}.{}.{version}",
                self.subject,
                operation.name(),
                self.object_name().unwrap_or_default()
            ),
        }
    }

    /// Recovers `(operation, namespace)` from an endpoint identifier.
    ///
    /// The recovered namespace has no prefix; it is equivalent to the
    /// registering namespace for endpoint purposes.
    pub fn parse_endpoint(endpoint: &str) -> MeridianResult<(Operation, Namespace)> {
        let malformed = || MeridianError::MalformedEndpoint {
            endpoint: endpoint.to_string(),
        };

        let slot = endpoint.split('.').nth(1).ok_or_else(malformed)?;
        let operation = Operation::from_name(slot).map_err(|_| malformed())?;

        let captures = operation
            .pattern()
            .regex()
            .captures(endpoint)
            .ok_or_else(malformed)?;

        let subject = captures.name("subject").ok_or_else(malformed)?.as_str();
        let version = captures.name("version").ok_or_else(malformed)?.as_str();
        let mut ns = match captures.name("object") {
            Some(object) => Namespace::relation(subject, object.as_str()),
            None => Namespace::new(subject),
        };
        ns.version = Some(version.to_string());
        Ok((operation, ns))
    }

    /// True when both namespaces produce the same endpoint identifiers.
    #[must_use]
    pub fn is_equivalent(&self, other: &Namespace) -> bool {
        self.subject == other.subject
            && self.object == other.object
            && self.effective_version() == other.effective_version()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_paths_unversioned() {
        let ns = Namespace::new("foo");
        assert_eq!(ns.path(), "");
        assert_eq!(ns.collection_path(), "/foo");
        assert_eq!(ns.instance_path(), "/foo/<uuid:foo_id>");
        assert_eq!(ns.singleton_path(), "/foo");
        assert_eq!(ns.relation_path(), None);
    }

    #[test]
    fn test_paths_versioned_with_prefix() {
        let ns = Namespace::relation("foo", "bar")
            .with_prefix("/internal")
            .with_version("v2");
        assert_eq!(ns.path(), "/internal/v2");
        assert_eq!(ns.collection_path(), "/internal/v2/foo");
        assert_eq!(
            ns.relation_path().unwrap(),
            "/internal/v2/foo/<uuid:foo_id>/bar"
        );
    }

    #[test]
    fn test_endpoint_for() {
        assert_eq!(Namespace::new("foo").endpoint_for(Operation::Search), "foo.search.v1");
        assert_eq!(
            Namespace::relation("foo", "bar").endpoint_for(Operation::SearchFor),
            "foo.search_for.bar.v1"
        );
        assert_eq!(
            Namespace::new("swagger")
                .with_version("v2")
                .endpoint_for(Operation::Discover),
            "swagger.discover.v2"
        );
    }

    #[test]
    fn test_parse_endpoint() {
        let (op, ns) = Namespace::parse_endpoint("swagger.discover.v2").unwrap();
        assert_eq!(op, Operation::Discover);
        assert_eq!(ns.subject_name(), "swagger");
        assert_eq!(ns.version(), Some("v2"));

        let (op, ns) = Namespace::parse_endpoint("foo.search_for.bar.v1").unwrap();
        assert_eq!(op, Operation::SearchFor);
        assert_eq!(ns.object_name(), Some("bar"));
    }

    #[test]
    fn test_parse_endpoint_malformed() {
        for bad in ["foo", "foo.frobnicate.v1", "foo.search_for.v1", "foo.search.bar.v1", ""] {
            assert!(
                matches!(
                    Namespace::parse_endpoint(bad),
                    Err(MeridianError::MalformedEndpoint { .. })
                ),
                "{bad} should be malformed"
            );
        }
    }

    #[test]
    fn test_object_ns() {
        let ns = Namespace::relation("person", "address").with_version("v1");
        let object = ns.object_ns().unwrap();
        assert_eq!(object.subject_name(), "address");
        assert_eq!(object.collection_path(), "/v1/address");
        assert!(Namespace::new("person").object_ns().is_none());
    }

    fn name() -> impl Strategy<Value = String> {
        "[a-z][a-z_]{0,12}"
    }

    proptest! {
        #[test]
        fn prop_endpoint_round_trip(
            subject in name(),
            object in name(),
            version in proptest::option::of("v[0-9]{1,2}"),
            index in 0..Operation::ALL.len(),
        ) {
            let op = Operation::ALL[index];
            let mut ns = if op.is_relation() {
                Namespace::relation(subject, object)
            } else {
                Namespace::new(subject)
            };
            if let Some(version) = version {
                ns = ns.with_version(version);
            }

            let (parsed_op, parsed_ns) = Namespace::parse_endpoint(&ns.endpoint_for(op)).unwrap();
            prop_assert_eq!(parsed_op, op);
            prop_assert!(parsed_ns.is_equivalent(&ns));
            prop_assert_eq!(parsed_ns.endpoint_for(op), ns.endpoint_for(op));
        }
    }
}
