//! The closed set of REST operation kinds.
//!
//! Every operation carries its HTTP method, its default success status and
//! the pattern used to build endpoint identifiers. Node operations act on a
//! subject; edge operations act on a subject and an object.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use http::{Method, StatusCode};
use regex::Regex;

use crate::error::{MeridianError, MeridianResult};
use crate::namespace::Namespace;
use crate::naming::pluralize;

/// Shape of an endpoint identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndpointPattern {
    /// `{subject}.{operation}.{version}`
    Node,
    /// `{subject}.{operation}.{object_}.{version}`
    Edge,
}

impl EndpointPattern {
    /// The format template.
    #[must_use]
    pub const fn template(self) -> &'static str {
        match self {
            Self::Node => "{subject}.{operation}.{version}",
            Self::Edge => "{subject}.{operation}.{object_}.{version}",
        }
    }

    /// The regex that recovers the named groups from an identifier.
    pub fn regex(self) -> &'static Regex {
        static NODE: OnceLock<Regex> = OnceLock::new();
        static EDGE: OnceLock<Regex> = OnceLock::new();
        match self {
            Self::Node => NODE.get_or_init(|| {
                Regex::new(r"^(?P<subject>[^.]+)\.(?P<operation>[^.]+)\.(?P<version>[^.]+)$")
                    .expect("valid regex")
            }),
            Self::Edge => EDGE.get_or_init(|| {
                Regex::new(
                    r"^(?P<subject>[^.]+)\.(?P<operation>[^.]+)\.(?P<object>[^.]+)\.(?P<version>[^.]+)$",
                )
                .expect("valid regex")
            }),
        }
    }
}

/// A REST operation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Operation {
    /// Singleton: list links to other endpoints
    Discover,
    /// Collection: paginated search
    Search,
    /// Collection: create one item
    Create,
    /// Collection: update several items at once
    UpdateBatch,
    /// Instance: fetch by id
    Retrieve,
    /// Instance: delete by id
    Delete,
    /// Instance: create or replace by id
    Replace,
    /// Instance: partial update by id
    Update,
    /// Relation: create an object under a subject
    CreateFor,
    /// Relation: delete an object under a subject
    DeleteFor,
    /// Relation: replace an object under a subject
    ReplaceFor,
    /// Relation: fetch an object under a subject
    RetrieveFor,
    /// Relation: paginated search of objects under a subject
    SearchFor,
    /// Singleton: a query endpoint
    Query,
}

impl Operation {
    /// Every operation kind.
    pub const ALL: [Operation; 14] = [
        Self::Discover,
        Self::Search,
        Self::Create,
        Self::UpdateBatch,
        Self::Retrieve,
        Self::Delete,
        Self::Replace,
        Self::Update,
        Self::CreateFor,
        Self::DeleteFor,
        Self::ReplaceFor,
        Self::RetrieveFor,
        Self::SearchFor,
        Self::Query,
    ];

    /// The operation name used in endpoint identifiers.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Discover => "discover",
            Self::Search => "search",
            Self::Create => "create",
            Self::UpdateBatch => "update_batch",
            Self::Retrieve => "retrieve",
            Self::Delete => "delete",
            Self::Replace => "replace",
            Self::Update => "update",
            Self::CreateFor => "create_for",
            Self::DeleteFor => "delete_for",
            Self::ReplaceFor => "replace_for",
            Self::RetrieveFor => "retrieve_for",
            Self::SearchFor => "search_for",
            Self::Query => "query",
        }
    }

    /// The HTTP method.
    #[must_use]
    pub fn method(self) -> Method {
        match self {
            Self::Discover
            | Self::Search
            | Self::Retrieve
            | Self::RetrieveFor
            | Self::SearchFor
            | Self::Query => Method::GET,
            Self::Create | Self::CreateFor => Method::POST,
            Self::Replace | Self::ReplaceFor => Method::PUT,
            Self::UpdateBatch | Self::Update => Method::PATCH,
            Self::Delete | Self::DeleteFor => Method::DELETE,
        }
    }

    /// The default success status.
    #[must_use]
    pub const fn default_code(self) -> StatusCode {
        match self {
            Self::Create | Self::CreateFor => StatusCode::CREATED,
            Self::Delete | Self::DeleteFor => StatusCode::NO_CONTENT,
            _ => StatusCode::OK,
        }
    }

    /// The endpoint identifier pattern.
    #[must_use]
    pub const fn pattern(self) -> EndpointPattern {
        match self {
            Self::CreateFor
            | Self::DeleteFor
            | Self::ReplaceFor
            | Self::RetrieveFor
            | Self::SearchFor => EndpointPattern::Edge,
            _ => EndpointPattern::Node,
        }
    }

    /// True for operations on a subject and an object.
    #[must_use]
    pub const fn is_relation(self) -> bool {
        matches!(self.pattern(), EndpointPattern::Edge)
    }

    /// Looks up an operation by name, case-insensitively.
    pub fn from_name(name: &str) -> MeridianResult<Self> {
        let lowered = name.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|op| op.name() == lowered)
            .ok_or_else(|| MeridianError::UnknownOperation {
                name: name.to_string(),
            })
    }

    /// Human-readable name: `foo.search`, or `foo.search_for.bars` for
    /// relation operations.
    #[must_use]
    pub fn name_for(self, ns: &Namespace) -> String {
        match ns.object_name() {
            Some(object) if self.is_relation() => {
                format!("{}.{}.{}", ns.subject_name(), self.name(), pluralize(object))
            }
            _ => format!("{}.{}", ns.subject_name(), self.name()),
        }
    }

    /// The API operation id: `retrieve`, or `search_for_bars` for relation
    /// operations.
    #[must_use]
    pub fn operation_id(self, ns: &Namespace) -> String {
        match ns.object_name() {
            Some(object) if self.is_relation() => {
                format!("{}_{}", self.name(), pluralize(object))
            }
            _ => self.name().to_string(),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = MeridianError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}
