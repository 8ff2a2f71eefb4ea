//! Record schemas.

use std::sync::Arc;

use meridian_core::naming;
use meridian_core::{MeridianResult, Record, UrlContext};
use serde_json::Value;

use crate::field::Field;
use crate::{decode, encode};

/// An ordered set of fields describing one record shape.
///
/// ```
/// use meridian_schema::{Field, Schema};
/// use serde_json::json;
///
/// let schema = Schema::new("NewPersonSchema")
///     .field(Field::string("first_name").wire_name("firstName").required())
///     .field(Field::string("last_name").wire_name("lastName").required());
///
/// assert_eq!(schema.type_name(), "NewPerson");
///
/// let record = schema
///     .decode(&json!({"firstName": "Alice", "lastName": "Smith"}), false)
///     .unwrap();
/// assert_eq!(record["first_name"], "Alice");
/// ```
#[derive(Debug, Clone)]
pub struct Schema {
    name: String,
    fields: Vec<Field>,
}

impl Schema {
    /// Creates an empty schema.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Appends a field.
    #[must_use]
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Appends several fields.
    #[must_use]
    pub fn fields_from(mut self, fields: impl IntoIterator<Item = Field>) -> Self {
        self.fields.extend(fields);
        self
    }

    /// Wraps the schema for sharing between routes.
    #[must_use]
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// The declared name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The definition name derived from the declared name.
    #[must_use]
    pub fn type_name(&self) -> String {
        naming::type_name(&self.name)
    }

    /// Fields in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Looks a field up by attribute.
    #[must_use]
    pub fn get(&self, attribute: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.attribute() == attribute)
    }

    /// Validates a JSON payload into a record.
    ///
    /// With `partial` set, required fields may be absent.
    pub fn decode(&self, payload: &Value, partial: bool) -> MeridianResult<Record> {
        decode::decode(self, payload, partial)
    }

    /// Validates raw query-string pairs into a record.
    pub fn decode_query(&self, query: &[(String, String)]) -> MeridianResult<Record> {
        decode::decode_query(self, query)
    }

    /// Renders a record as a JSON payload.
    pub fn encode(&self, record: &Record, urls: &UrlContext<'_>) -> MeridianResult<Value> {
        encode::encode(self, record, urls)
    }
}
