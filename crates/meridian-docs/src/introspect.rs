//! Schema introspection.
//!
//! Turns field metadata into Swagger descriptors. Nested schemas are never
//! inlined: they become `$ref`s into a shared [`Definitions`] table.

use std::sync::Arc;

use indexmap::IndexMap;
use meridian_schema::{Field, FieldKind, Schema};
use serde_json::Value;

use crate::error::{DocsError, DocsResult};
use crate::swagger::{SchemaObject, SchemaType};

/// The descriptor of one field.
///
/// ```
/// use meridian_docs::build_parameter;
/// use meridian_schema::Field;
/// use serde_json::json;
///
/// let descriptor = build_parameter(&Field::uuid("id"));
/// assert_eq!(serde_json::to_value(descriptor).unwrap(), json!({"type": "string", "format": "uuid"}));
/// ```
#[must_use]
pub fn build_parameter(field: &Field) -> SchemaObject {
    let mut descriptor = build_kind(field.kind());
    if let Some(description) = field.description() {
        descriptor.description = Some(description.to_string());
    }
    if let Some(default) = field.default_value() {
        descriptor.default = Some(default.clone());
    }
    if field.allows_none() {
        descriptor.nullable = true;
    }
    descriptor
}

fn build_kind(kind: &FieldKind) -> SchemaObject {
    match kind {
        FieldKind::String | FieldKind::Language => SchemaObject::string(),
        FieldKind::Integer => SchemaObject::integer().with_format("int32"),
        FieldKind::Number => SchemaObject::number(),
        FieldKind::Boolean => SchemaObject::boolean(),
        FieldKind::Uuid => SchemaObject::string().with_format("uuid"),
        FieldKind::DateTime => SchemaObject::string().with_format("date-time"),
        FieldKind::Date => SchemaObject::string().with_format("date"),
        FieldKind::Uri => SchemaObject::string().with_format("uri"),
        FieldKind::Decimal { as_string: true } => SchemaObject::string(),
        FieldKind::Decimal { as_string: false } => SchemaObject::number(),
        FieldKind::Timestamp { iso: true } => SchemaObject::string().with_format("date-time"),
        FieldKind::Timestamp { iso: false } => SchemaObject::number(),
        FieldKind::Dict | FieldKind::Computed(_) => SchemaObject::object(),
        FieldKind::List(item) | FieldKind::QueryList(item) => SchemaObject::array(build_kind(item)),
        FieldKind::Nested(schema) => SchemaObject::reference(&schema.get().type_name()),
        FieldKind::Enum(spec) => {
            if spec.is_by_value() {
                let schema_type = spec.values().first().map_or(SchemaType::String, |v| value_type(v));
                SchemaObject {
                    enum_values: spec.values().into_iter().cloned().collect(),
                    ..SchemaObject::of_type(schema_type)
                }
            } else {
                SchemaObject {
                    enum_values: spec.names().into_iter().map(Value::from).collect(),
                    ..SchemaObject::string()
                }
            }
        }
    }
}

fn value_type(value: &Value) -> SchemaType {
    match value {
        Value::Number(n) if n.is_i64() || n.is_u64() => SchemaType::Integer,
        Value::Number(_) => SchemaType::Number,
        Value::Bool(_) => SchemaType::Boolean,
        Value::Array(_) => SchemaType::Array,
        Value::Object(_) => SchemaType::Object,
        Value::String(_) | Value::Null => SchemaType::String,
    }
}

/// The object descriptor of a schema.
///
/// Properties are keyed by wire name; `required` is sorted.
#[must_use]
pub fn build_schema(schema: &Schema) -> SchemaObject {
    let mut descriptor = SchemaObject::object();
    for field in schema.fields() {
        descriptor
            .properties
            .insert(field.data_key().to_string(), build_parameter(field));
    }
    let mut required: Vec<String> = schema
        .fields()
        .iter()
        .filter(|f| f.is_required())
        .map(|f| f.data_key().to_string())
        .collect();
    required.sort();
    descriptor.required = required;
    descriptor
}

fn nested_schemas(kind: &FieldKind, out: &mut Vec<Arc<Schema>>) {
    match kind {
        FieldKind::Nested(schema) => out.push(schema.get()),
        FieldKind::List(item) | FieldKind::QueryList(item) => nested_schemas(item, out),
        _ => {}
    }
}

/// The flattened table of schema definitions, keyed by type name.
///
/// A schema is inserted before its nested schemas are visited, so
/// self-referential and mutually recursive schemas terminate. Two
/// *different* descriptors under one name are rejected.
#[derive(Debug, Clone, Default)]
pub struct Definitions {
    entries: IndexMap<String, SchemaObject>,
}

impl Definitions {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `schema` and everything it references; returns a `$ref` to it.
    pub fn add(&mut self, schema: &Schema) -> DocsResult<SchemaObject> {
        let name = schema.type_name();
        if self.insert(&name, build_schema(schema))? {
            tracing::trace!(type_name = %name, "adding definition");
            self.add_nested(schema)?;
        }
        Ok(SchemaObject::reference(&name))
    }

    /// Adds the schemas referenced by `schema`'s fields, but not `schema`.
    pub fn add_nested(&mut self, schema: &Schema) -> DocsResult<()> {
        let mut nested = Vec::new();
        for field in schema.fields() {
            nested_schemas(field.kind(), &mut nested);
        }
        for child in nested {
            self.add(&child)?;
        }
        Ok(())
    }

    /// Adds the fixed `Error`, `ErrorContext` and `SubError` definitions.
    ///
    /// A user schema already registered under one of these names is a
    /// collision.
    pub fn add_error_definitions(&mut self) -> DocsResult<()> {
        self.insert(
            "Error",
            SchemaObject::object()
                .property("code", SchemaObject::integer().with_format("int32"))
                .property("context", SchemaObject::reference("ErrorContext"))
                .property("message", SchemaObject::string())
                .property("retryable", SchemaObject::boolean())
                .required_property("code")
                .required_property("message")
                .required_property("retryable"),
        )?;
        self.insert(
            "ErrorContext",
            SchemaObject::object()
                .property("errors", SchemaObject::array(SchemaObject::reference("SubError")))
                .required_property("errors"),
        )?;
        self.insert(
            "SubError",
            SchemaObject::object()
                .property("field", SchemaObject::string())
                .property("message", SchemaObject::string())
                .property("reasons", SchemaObject::array(SchemaObject::string()))
                .required_property("message"),
        )?;
        Ok(())
    }

    /// Inserts `descriptor` under `name`; returns false if an identical
    /// descriptor is already present.
    fn insert(&mut self, name: &str, descriptor: SchemaObject) -> DocsResult<bool> {
        match self.entries.get(name) {
            Some(existing) if *existing == descriptor => Ok(false),
            Some(_) => Err(DocsError::DefinitionCollision {
                type_name: name.to_string(),
            }),
            None => {
                self.entries.insert(name.to_string(), descriptor);
                Ok(true)
            }
        }
    }

    /// Looks up a definition.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SchemaObject> {
        self.entries.get(name)
    }

    /// Number of definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no definitions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consumes the table.
    #[must_use]
    pub fn into_map(self) -> IndexMap<String, SchemaObject> {
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meridian_schema::{EnumSpec, SchemaRef};
    use serde_json::json;

    fn new_person() -> Schema {
        Schema::new("NewPersonSchema")
            .field(Field::string("first_name").wire_name("firstName").required())
            .field(Field::string("last_name").wire_name("lastName").required())
    }

    fn to_json(descriptor: SchemaObject) -> Value {
        serde_json::to_value(descriptor).unwrap()
    }

    #[test]
    fn test_schema_generation() {
        assert_eq!(
            to_json(build_schema(&new_person())),
            json!({
                "type": "object",
                "properties": {
                    "firstName": {"type": "string"},
                    "lastName": {"type": "string"},
                },
                "required": ["firstName", "lastName"],
            })
        );
    }

    #[test]
    fn test_field_description_and_default() {
        let field = Field::string("foo").with_description("Foo").with_default("bar");
        assert_eq!(
            to_json(build_parameter(&field)),
            json!({"type": "string", "description": "Foo", "default": "bar"})
        );
    }

    #[test]
    fn test_field_enums() {
        let by_name = Field::enumeration("choice", EnumSpec::new("Choices", [("Profit", "profit")]));
        assert_eq!(
            to_json(build_parameter(&by_name)),
            json!({"type": "string", "enum": ["Profit"]})
        );

        let by_value = Field::enumeration(
            "value",
            EnumSpec::new("ValueType", [("Foo", 1), ("Bar", 2)]).by_value(),
        );
        assert_eq!(
            to_json(build_parameter(&by_value)),
            json!({"type": "integer", "enum": [1, 2]})
        );
    }

    #[test]
    fn test_field_containers() {
        assert_eq!(
            to_json(build_parameter(&Field::list("names", FieldKind::String))),
            json!({"type": "array", "items": {"type": "string"}})
        );
        assert_eq!(to_json(build_parameter(&Field::dict("payload"))), json!({"type": "object"}));
        assert_eq!(
            to_json(build_parameter(&Field::nested("ref", new_person()))),
            json!({"$ref": "#/definitions/NewPerson"})
        );
    }

    #[test]
    fn test_field_decimals() {
        assert_eq!(to_json(build_parameter(&Field::decimal("d"))), json!({"type": "number"}));
        assert_eq!(
            to_json(build_parameter(&Field::decimal("d").as_string())),
            json!({"type": "string"})
        );
    }

    #[test]
    fn test_allow_none_is_nullable_regardless_of_required() {
        let schema = Schema::new("TestSchema")
            .field(Field::string("bar").allow_none().required())
            .field(Field::string("baz").allow_none());
        let descriptor = build_schema(&schema);
        assert_eq!(
            to_json(descriptor.properties["bar"].clone()),
            json!({"type": "string", "x-nullable": true})
        );
        assert_eq!(descriptor.required, vec!["bar"]);
    }

    fn tree() -> Arc<Schema> {
        Schema::new("TreeSchema")
            .field(Field::string("label"))
            .field(Field::list("children", FieldKind::Nested(SchemaRef::Deferred(tree))))
            .shared()
    }

    #[test]
    fn test_self_reference_terminates() {
        let mut definitions = Definitions::new();
        let reference = definitions.add(&tree()).unwrap();
        assert_eq!(reference.reference.as_deref(), Some("#/definitions/Tree"));
        assert_eq!(definitions.len(), 1);
        assert_eq!(
            to_json(definitions.get("Tree").unwrap().properties["children"].clone()),
            json!({"type": "array", "items": {"$ref": "#/definitions/Tree"}})
        );
    }

    #[test]
    fn test_nested_schemas_are_hoisted() {
        let address = Schema::new("AddressSchema").field(Field::string("street"));
        let person = Schema::new("PersonSchema").field(Field::nested("address", address));
        let mut definitions = Definitions::new();
        definitions.add(&person).unwrap();
        assert!(definitions.get("Person").is_some());
        assert!(definitions.get("Address").is_some());
    }

    #[test]
    fn test_collision_fails_fast() {
        let one = Schema::new("PersonSchema").field(Field::string("name"));
        let two = Schema::new("person").field(Field::integer("age"));
        let mut definitions = Definitions::new();
        definitions.add(&one).unwrap();
        definitions.add(&one).unwrap();
        assert!(matches!(
            definitions.add(&two),
            Err(DocsError::DefinitionCollision { ref type_name }) if type_name == "Person"
        ));
    }

    #[test]
    fn test_user_schema_named_error_collides() {
        let error = Schema::new("ErrorSchema").field(Field::string("reason"));
        let mut definitions = Definitions::new();
        definitions.add(&error).unwrap();
        assert!(matches!(
            definitions.add_error_definitions(),
            Err(DocsError::DefinitionCollision { ref type_name }) if type_name == "Error"
        ));
        assert!(definitions.get("Error").unwrap().properties.contains_key("reason"));
    }

    #[test]
    fn test_error_definitions() {
        let mut definitions = Definitions::new();
        definitions.add_error_definitions().unwrap();
        definitions.add_error_definitions().unwrap();
        assert_eq!(definitions.len(), 3);
        assert_eq!(
            definitions.get("Error").unwrap().required,
            vec!["code", "message", "retryable"]
        );
    }
}
