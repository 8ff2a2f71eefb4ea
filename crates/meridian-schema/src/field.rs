//! Field declarations.

use std::fmt;
use std::sync::Arc;

use meridian_core::{MeridianResult, Record, UrlContext};
use serde_json::Value;

use crate::schema::Schema;

/// Computes a dump-only value from the record being encoded.
pub type ComputeFn =
    Arc<dyn Fn(&Record, &UrlContext<'_>) -> MeridianResult<Value> + Send + Sync>;

/// A reference to a nested schema.
///
/// `Deferred` resolves lazily so that a schema can refer to itself or to a
/// schema declared later.
#[derive(Clone)]
pub enum SchemaRef {
    /// An already-built schema.
    Shared(Arc<Schema>),
    /// A schema produced on demand.
    Deferred(fn() -> Arc<Schema>),
}

impl SchemaRef {
    /// Resolves the schema.
    #[must_use]
    pub fn get(&self) -> Arc<Schema> {
        match self {
            Self::Shared(schema) => Arc::clone(schema),
            Self::Deferred(build) => build(),
        }
    }
}

impl From<Schema> for SchemaRef {
    fn from(schema: Schema) -> Self {
        Self::Shared(Arc::new(schema))
    }
}

impl From<Arc<Schema>> for SchemaRef {
    fn from(schema: Arc<Schema>) -> Self {
        Self::Shared(schema)
    }
}

impl From<fn() -> Arc<Schema>> for SchemaRef {
    fn from(build: fn() -> Arc<Schema>) -> Self {
        Self::Deferred(build)
    }
}

impl fmt::Debug for SchemaRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Shared(schema) => f.debug_tuple("Shared").field(&schema.name()).finish(),
            Self::Deferred(_) => f.write_str("Deferred"),
        }
    }
}

/// An enumeration of named members, each with a JSON value.
///
/// Decoded records always hold the member *name*. By default the wire form
/// is also the name; [`EnumSpec::by_value`] switches the wire form to the
/// member value.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumSpec {
    name: String,
    members: Vec<(String, Value)>,
    by_value: bool,
}

impl EnumSpec {
    /// Declares an enumeration.
    ///
    /// ```
    /// use meridian_schema::EnumSpec;
    ///
    /// let spec = EnumSpec::new("Priority", [("Low", 1), ("High", 2)]).by_value();
    /// assert_eq!(spec.names(), vec!["Low", "High"]);
    /// assert!(spec.is_by_value());
    /// ```
    #[must_use]
    pub fn new<N, V>(name: impl Into<String>, members: impl IntoIterator<Item = (N, V)>) -> Self
    where
        N: Into<String>,
        V: Into<Value>,
    {
        Self {
            name: name.into(),
            members: members
                .into_iter()
                .map(|(n, v)| (n.into(), v.into()))
                .collect(),
            by_value: false,
        }
    }

    /// Uses member values on the wire.
    #[must_use]
    pub fn by_value(mut self) -> Self {
        self.by_value = true;
        self
    }

    /// The enumeration name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// True when member values are used on the wire.
    #[must_use]
    pub const fn is_by_value(&self) -> bool {
        self.by_value
    }

    /// Members in declaration order.
    #[must_use]
    pub fn members(&self) -> &[(String, Value)] {
        &self.members
    }

    /// Member names in declaration order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.members.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Member values in declaration order.
    #[must_use]
    pub fn values(&self) -> Vec<&Value> {
        self.members.iter().map(|(_, v)| v).collect()
    }

    /// The value of the member called `name`.
    #[must_use]
    pub fn value_of(&self, name: &str) -> Option<&Value> {
        self.members.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// The name of the member whose value is `value`.
    #[must_use]
    pub fn name_of(&self, value: &Value) -> Option<&str> {
        self.members
            .iter()
            .find(|(_, v)| values_equal(v, value))
            .map(|(n, _)| n.as_str())
    }
}

fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        _ => left == right,
    }
}

/// The declared kind of a field.
#[derive(Clone)]
pub enum FieldKind {
    /// UTF-8 string
    String,
    /// 32-bit signed integer
    Integer,
    /// Floating point number
    Number,
    /// Boolean
    Boolean,
    /// UUID, normalised to lower-case hyphenated form
    Uuid,
    /// RFC 3339 date-time
    DateTime,
    /// ISO 8601 calendar date
    Date,
    /// Decimal number, optionally rendered as a string
    Decimal {
        /// Render as a JSON string
        as_string: bool,
    },
    /// Seconds since the epoch, in UTC
    Timestamp {
        /// Render as a naive ISO 8601 string instead of a float
        iso: bool,
    },
    /// Free-form JSON object
    Dict,
    /// Homogeneous list
    List(Box<FieldKind>),
    /// List that may arrive comma-separated or as repeated query keys
    QueryList(Box<FieldKind>),
    /// Nested record
    Nested(SchemaRef),
    /// Enumeration member
    Enum(EnumSpec),
    /// Absolute URI, normalised
    Uri,
    /// Language tag such as `en` or `en-US`
    Language,
    /// Dump-only value computed at encode time
    Computed(ComputeFn),
}

impl FieldKind {
    /// A short name for error messages and logs.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Uuid => "uuid",
            Self::DateTime => "date-time",
            Self::Date => "date",
            Self::Decimal { .. } => "decimal",
            Self::Timestamp { .. } => "timestamp",
            Self::Dict => "dict",
            Self::List(_) => "list",
            Self::QueryList(_) => "query-list",
            Self::Nested(_) => "nested",
            Self::Enum(_) => "enum",
            Self::Uri => "uri",
            Self::Language => "language",
            Self::Computed(_) => "computed",
        }
    }
}

impl fmt::Debug for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List(inner) => f.debug_tuple("List").field(inner).finish(),
            Self::QueryList(inner) => f.debug_tuple("QueryList").field(inner).finish(),
            Self::Nested(schema) => f.debug_tuple("Nested").field(schema).finish(),
            Self::Enum(spec) => f.debug_tuple("Enum").field(&spec.name()).finish(),
            Self::Decimal { as_string } => {
                f.debug_struct("Decimal").field("as_string", as_string).finish()
            }
            Self::Timestamp { iso } => f.debug_struct("Timestamp").field("iso", iso).finish(),
            other => f.write_str(other.label()),
        }
    }
}

/// One declared field of a [`Schema`].
///
/// The *attribute* is the key in decoded records; the *wire name* is the key
/// in JSON payloads and defaults to the attribute.
///
/// ```
/// use meridian_schema::Field;
///
/// let field = Field::string("first_name").wire_name("firstName").required();
/// assert_eq!(field.attribute(), "first_name");
/// assert_eq!(field.data_key(), "firstName");
/// assert!(field.is_required());
/// ```
#[derive(Debug, Clone)]
pub struct Field {
    attribute: String,
    wire_name: Option<String>,
    kind: FieldKind,
    required: bool,
    allow_none: bool,
    default: Option<Value>,
    description: Option<String>,
    dump_only: bool,
    load_only: bool,
}

impl Field {
    /// A field of any kind.
    #[must_use]
    pub fn new(attribute: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            attribute: attribute.into(),
            wire_name: None,
            kind,
            required: false,
            allow_none: false,
            default: None,
            description: None,
            dump_only: false,
            load_only: false,
        }
    }

    /// A string field.
    #[must_use]
    pub fn string(attribute: impl Into<String>) -> Self {
        Self::new(attribute, FieldKind::String)
    }

    /// An integer field.
    #[must_use]
    pub fn integer(attribute: impl Into<String>) -> Self {
        Self::new(attribute, FieldKind::Integer)
    }

    /// A number field.
    #[must_use]
    pub fn number(attribute: impl Into<String>) -> Self {
        Self::new(attribute, FieldKind::Number)
    }

    /// A boolean field.
    #[must_use]
    pub fn boolean(attribute: impl Into<String>) -> Self {
        Self::new(attribute, FieldKind::Boolean)
    }

    /// A UUID field.
    #[must_use]
    pub fn uuid(attribute: impl Into<String>) -> Self {
        Self::new(attribute, FieldKind::Uuid)
    }

    /// A date-time field.
    #[must_use]
    pub fn date_time(attribute: impl Into<String>) -> Self {
        Self::new(attribute, FieldKind::DateTime)
    }

    /// A date field.
    #[must_use]
    pub fn date(attribute: impl Into<String>) -> Self {
        Self::new(attribute, FieldKind::Date)
    }

    /// A decimal field rendered as a number.
    #[must_use]
    pub fn decimal(attribute: impl Into<String>) -> Self {
        Self::new(attribute, FieldKind::Decimal { as_string: false })
    }

    /// A UTC timestamp field rendered as float seconds.
    #[must_use]
    pub fn timestamp(attribute: impl Into<String>) -> Self {
        Self::new(attribute, FieldKind::Timestamp { iso: false })
    }

    /// A free-form object field.
    #[must_use]
    pub fn dict(attribute: impl Into<String>) -> Self {
        Self::new(attribute, FieldKind::Dict)
    }

    /// A list field.
    #[must_use]
    pub fn list(attribute: impl Into<String>, item: FieldKind) -> Self {
        Self::new(attribute, FieldKind::List(Box::new(item)))
    }

    /// A query-string list field.
    #[must_use]
    pub fn query_list(attribute: impl Into<String>, item: FieldKind) -> Self {
        Self::new(attribute, FieldKind::QueryList(Box::new(item)))
    }

    /// A nested record field.
    #[must_use]
    pub fn nested(attribute: impl Into<String>, schema: impl Into<SchemaRef>) -> Self {
        Self::new(attribute, FieldKind::Nested(schema.into()))
    }

    /// An enumeration field.
    #[must_use]
    pub fn enumeration(attribute: impl Into<String>, spec: EnumSpec) -> Self {
        Self::new(attribute, FieldKind::Enum(spec))
    }

    /// A URI field.
    #[must_use]
    pub fn uri(attribute: impl Into<String>) -> Self {
        Self::new(attribute, FieldKind::Uri)
    }

    /// A language tag field.
    #[must_use]
    pub fn language(attribute: impl Into<String>) -> Self {
        Self::new(attribute, FieldKind::Language)
    }

    /// A dump-only computed field.
    #[must_use]
    pub fn computed<F>(attribute: impl Into<String>, compute: F) -> Self
    where
        F: Fn(&Record, &UrlContext<'_>) -> MeridianResult<Value> + Send + Sync + 'static,
    {
        Self::new(attribute, FieldKind::Computed(Arc::new(compute))).dump_only()
    }

    /// The conventional `_links` field.
    #[must_use]
    pub fn links<F>(compute: F) -> Self
    where
        F: Fn(&Record, &UrlContext<'_>) -> MeridianResult<Value> + Send + Sync + 'static,
    {
        Self::computed("_links", compute)
    }

    /// Sets the wire name.
    #[must_use]
    pub fn wire_name(mut self, name: impl Into<String>) -> Self {
        self.wire_name = Some(name.into());
        self
    }

    /// Marks the field as required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Accepts an explicit `null`.
    #[must_use]
    pub fn allow_none(mut self) -> Self {
        self.allow_none = true;
        self
    }

    /// Value used when the field is absent on decode.
    #[must_use]
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Excludes the field from decoding.
    #[must_use]
    pub fn dump_only(mut self) -> Self {
        self.dump_only = true;
        self
    }

    /// Excludes the field from encoding.
    #[must_use]
    pub fn load_only(mut self) -> Self {
        self.load_only = true;
        self
    }

    /// Renders a decimal field as a string, or a timestamp as ISO 8601.
    #[must_use]
    pub fn as_string(mut self) -> Self {
        match &mut self.kind {
            FieldKind::Decimal { as_string } => *as_string = true,
            FieldKind::Timestamp { iso } => *iso = true,
            _ => {}
        }
        self
    }

    /// The key in decoded records.
    #[must_use]
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    /// The key in JSON payloads.
    #[must_use]
    pub fn data_key(&self) -> &str {
        self.wire_name.as_deref().unwrap_or(&self.attribute)
    }

    /// The declared kind.
    #[must_use]
    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// True if the field must be present on full decode.
    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.required
    }

    /// True if `null` is accepted.
    #[must_use]
    pub const fn allows_none(&self) -> bool {
        self.allow_none
    }

    /// The decode default.
    #[must_use]
    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// The description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// True if the field is never decoded.
    #[must_use]
    pub const fn is_dump_only(&self) -> bool {
        self.dump_only
    }

    /// True if the field is never encoded.
    #[must_use]
    pub const fn is_load_only(&self) -> bool {
        self.load_only
    }
}
