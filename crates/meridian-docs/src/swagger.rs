//! Swagger 2.0 document types.
//!
//! The types in this module follow the Swagger 2.0 specification:
//! <https://swagger.io/specification/v2/>

use http::Method;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{DocsError, DocsResult};

/// Media type used for every request and response.
pub const JSON_MEDIA_TYPE: &str = "application/json";

/// Swagger document root object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwaggerDocument {
    /// Always `2.0`.
    pub swagger: String,
    /// API metadata.
    pub info: Info,
    /// Prefix shared by every path.
    #[serde(rename = "basePath")]
    pub base_path: String,
    /// Accepted media types.
    pub consumes: Vec<String>,
    /// Produced media types.
    pub produces: Vec<String>,
    /// Operations grouped by relative path.
    pub paths: IndexMap<String, PathItem>,
    /// Shared schema definitions.
    pub definitions: IndexMap<String, SchemaObject>,
}

impl SwaggerDocument {
    /// Renders the document as a JSON value.
    pub fn to_value(&self) -> DocsResult<Value> {
        serde_json::to_value(self).map_err(DocsError::from)
    }

    /// Renders the document as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> DocsResult<String> {
        serde_json::to_string_pretty(self).map_err(DocsError::from)
    }
}

/// API metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Info {
    /// API title.
    pub title: String,
    /// API version.
    pub version: String,
}

/// Operations available on one path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathItem {
    /// GET operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub get: Option<OperationObject>,
    /// PUT operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub put: Option<OperationObject>,
    /// POST operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post: Option<OperationObject>,
    /// DELETE operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete: Option<OperationObject>,
    /// PATCH operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patch: Option<OperationObject>,
}

impl PathItem {
    /// Places `operation` under `method`.
    ///
    /// Fails if the slot is taken or the method has no slot.
    pub fn insert(&mut self, method: &Method, operation: OperationObject) -> DocsResult<()> {
        let slot = match *method {
            Method::GET => &mut self.get,
            Method::PUT => &mut self.put,
            Method::POST => &mut self.post,
            Method::DELETE => &mut self.delete,
            Method::PATCH => &mut self.patch,
            _ => {
                return Err(DocsError::InvalidOperation {
                    operation_id: operation.operation_id,
                    reason: format!("unsupported HTTP method: {method}"),
                })
            }
        };
        if slot.is_some() {
            return Err(DocsError::InvalidOperation {
                operation_id: operation.operation_id,
                reason: format!("duplicate {method} operation on path"),
            });
        }
        *slot = Some(operation);
        Ok(())
    }

    /// Looks up the operation for `method`.
    #[must_use]
    pub fn get_operation(&self, method: &Method) -> Option<&OperationObject> {
        match *method {
            Method::GET => self.get.as_ref(),
            Method::PUT => self.put.as_ref(),
            Method::POST => self.post.as_ref(),
            Method::DELETE => self.delete.as_ref(),
            Method::PATCH => self.patch.as_ref(),
            _ => None,
        }
    }
}

/// One API operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationObject {
    /// Grouping tags.
    pub tags: Vec<String>,
    /// Unique operation identifier.
    #[serde(rename = "operationId")]
    pub operation_id: String,
    /// Path, body and query parameters.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    /// Responses keyed by status code or `default`.
    pub responses: IndexMap<String, Response>,
}

/// Parameter location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterIn {
    /// Path parameter.
    Path,
    /// Query parameter.
    Query,
    /// Request body.
    Body,
}

/// Operation parameter.
///
/// Body parameters carry `schema`; the others describe their type inline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name.
    pub name: String,
    /// Parameter location.
    #[serde(rename = "in")]
    pub location: ParameterIn,
    /// Whether required.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
    /// Body schema.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaObject>,
    /// Inline type for non-body parameters.
    #[serde(flatten)]
    pub definition: SchemaObject,
}

impl Parameter {
    /// A required string path parameter.
    #[must_use]
    pub fn path(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: ParameterIn::Path,
            required: true,
            schema: None,
            definition: SchemaObject::string(),
        }
    }

    /// The `body` parameter.
    #[must_use]
    pub fn body(schema: SchemaObject) -> Self {
        Self {
            name: "body".to_string(),
            location: ParameterIn::Body,
            required: false,
            schema: Some(schema),
            definition: SchemaObject::default(),
        }
    }

    /// A query parameter.
    #[must_use]
    pub fn query(name: impl Into<String>, required: bool, definition: SchemaObject) -> Self {
        Self {
            name: name.into(),
            location: ParameterIn::Query,
            required,
            schema: None,
            definition,
        }
    }
}

/// Operation response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Response description.
    pub description: String,
    /// Response body schema.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaObject>,
}

/// JSON Schema type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    /// String type.
    String,
    /// Number type.
    Number,
    /// Integer type.
    Integer,
    /// Boolean type.
    Boolean,
    /// Array type.
    Array,
    /// Object type.
    Object,
}

/// Schema descriptor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaObject {
    /// Schema type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(rename = "type")]
    pub schema_type: Option<SchemaType>,
    /// Schema format (e.g., "uuid", "date-time").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Reference to a shared definition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(rename = "$ref")]
    pub reference: Option<String>,
    /// Object properties.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, SchemaObject>,
    /// Required properties.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    /// Array item schema.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaObject>>,
    /// Enum values.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[serde(rename = "enum")]
    pub enum_values: Vec<Value>,
    /// Default value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Whether `null` is accepted.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    #[serde(rename = "x-nullable")]
    pub nullable: bool,
}

impl SchemaObject {
    /// A schema of the given type.
    #[must_use]
    pub fn of_type(schema_type: SchemaType) -> Self {
        Self {
            schema_type: Some(schema_type),
            ..Default::default()
        }
    }

    /// Create a string schema.
    #[must_use]
    pub fn string() -> Self {
        Self::of_type(SchemaType::String)
    }

    /// Create an integer schema.
    #[must_use]
    pub fn integer() -> Self {
        Self::of_type(SchemaType::Integer)
    }

    /// Create a number schema.
    #[must_use]
    pub fn number() -> Self {
        Self::of_type(SchemaType::Number)
    }

    /// Create a boolean schema.
    #[must_use]
    pub fn boolean() -> Self {
        Self::of_type(SchemaType::Boolean)
    }

    /// Create an object schema.
    #[must_use]
    pub fn object() -> Self {
        Self::of_type(SchemaType::Object)
    }

    /// Create an array schema with the given item schema.
    #[must_use]
    pub fn array(items: SchemaObject) -> Self {
        Self {
            schema_type: Some(SchemaType::Array),
            items: Some(Box::new(items)),
            ..Default::default()
        }
    }

    /// A `$ref` to `#/definitions/{name}`.
    #[must_use]
    pub fn reference(name: &str) -> Self {
        Self {
            reference: Some(format!("#/definitions/{name}")),
            ..Default::default()
        }
    }

    /// Sets the format.
    #[must_use]
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Add a property to an object schema.
    #[must_use]
    pub fn property(mut self, name: impl Into<String>, schema: SchemaObject) -> Self {
        self.properties.insert(name.into(), schema);
        self
    }

    /// Mark a property as required.
    #[must_use]
    pub fn required_property(mut self, name: impl Into<String>) -> Self {
        self.required.push(name.into());
        self
    }
}
