//! Swagger document assembly.

use std::sync::{Arc, OnceLock};

use http::StatusCode;
use indexmap::IndexMap;
use meridian_core::naming::pluralize;
use meridian_core::{Namespace, Operation};
use meridian_schema::Schema;
use regex::Regex;

use crate::error::DocsResult;
use crate::introspect::{build_parameter, Definitions};
use crate::swagger::{
    Info, OperationObject, Parameter, PathItem, Response, SchemaObject, SwaggerDocument,
    JSON_MEDIA_TYPE,
};

/// Everything the builder needs to know about one registered route.
#[derive(Debug, Clone)]
pub struct DocumentedOperation {
    /// The operation kind.
    pub operation: Operation,
    /// The namespace it was registered in.
    pub namespace: Namespace,
    /// The full route template, e.g. `/api/v1/person/<uuid:person_id>`.
    pub path: String,
    /// Schema of the JSON body.
    pub request_schema: Option<Arc<Schema>>,
    /// Schema of the query string.
    pub query_schema: Option<Arc<Schema>>,
    /// Schema of the success response.
    pub response_schema: Option<Arc<Schema>>,
    /// Success response description.
    pub description: Option<String>,
}

impl DocumentedOperation {
    /// Describes `operation` in `namespace` at `path`, with no schemas.
    #[must_use]
    pub fn new(operation: Operation, namespace: Namespace, path: impl Into<String>) -> Self {
        Self {
            operation,
            namespace,
            path: path.into(),
            request_schema: None,
            query_schema: None,
            response_schema: None,
            description: None,
        }
    }

    /// Sets the body schema.
    #[must_use]
    pub fn request_schema(mut self, schema: Arc<Schema>) -> Self {
        self.request_schema = Some(schema);
        self
    }

    /// Sets the query-string schema.
    #[must_use]
    pub fn query_schema(mut self, schema: Arc<Schema>) -> Self {
        self.query_schema = Some(schema);
        self
    }

    /// Sets the response schema.
    #[must_use]
    pub fn response_schema(mut self, schema: Arc<Schema>) -> Self {
        self.response_schema = Some(schema);
        self
    }

    /// Sets the response description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// The generated description of an operation's success response.
#[must_use]
pub fn default_description(operation: Operation, ns: &Namespace) -> String {
    let subject = ns.subject_name();
    let objects = ns.object_name().map(pluralize).unwrap_or_default();
    match operation {
        Operation::Discover => format!("Discover the {subject} endpoints"),
        Operation::Query => format!("Query the {subject}"),
        Operation::Search => format!("Search the collection of all {}", pluralize(subject)),
        Operation::Create => format!("Create a new {subject}"),
        Operation::UpdateBatch => format!("Update a batch of {subject}"),
        Operation::Retrieve => format!("Retrieve a {subject} by id"),
        Operation::Delete => format!("Delete a {subject} by id"),
        Operation::Replace => format!("Create or update a {subject} by id"),
        Operation::Update => format!("Update some or all of a {subject} by id"),
        Operation::CreateFor => format!("Create a new {objects} relative to a {subject}"),
        Operation::DeleteFor => format!("Delete a {objects} relative to a {subject}"),
        Operation::ReplaceFor => format!("Replace a {objects} relative to a {subject}"),
        Operation::RetrieveFor => format!("Retrieve {objects} relative to a {subject}"),
        Operation::SearchFor => format!("Search for {objects} relative to a {subject}"),
    }
}

fn placeholder() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| {
        Regex::new(r"<(?:[a-z]+:)?([A-Za-z_][A-Za-z0-9_]*)>").expect("valid regex")
    })
}

/// Rewrites `<uuid:person_id>` placeholders as `{person_id}`.
#[must_use]
pub fn swagger_path(template: &str) -> String {
    placeholder().replace_all(template, "{$1}").into_owned()
}

fn path_parameters(template: &str) -> Vec<Parameter> {
    placeholder()
        .captures_iter(template)
        .filter_map(|cap| cap.get(1))
        .map(|name| Parameter::path(name.as_str()))
        .collect()
}

/// Builds Swagger 2.0 documents.
///
/// ```
/// use meridian_core::{Namespace, Operation};
/// use meridian_docs::{DocumentedOperation, SwaggerBuilder};
/// use meridian_schema::{Field, Schema};
///
/// let person = Schema::new("PersonSchema").field(Field::uuid("id").required()).shared();
/// let ns = Namespace::new("person").with_version("v1");
/// let retrieve = DocumentedOperation::new(Operation::Retrieve, ns, "/api/v1/person/<uuid:person_id>")
///     .response_schema(person);
///
/// let doc = SwaggerBuilder::new("example")
///     .version("v1")
///     .base_path("/api/v1")
///     .build(&[retrieve])
///     .unwrap();
///
/// assert!(doc.paths.contains_key("/person/{person_id}"));
/// assert!(doc.definitions.contains_key("Person"));
/// ```
#[derive(Debug, Clone)]
pub struct SwaggerBuilder {
    title: String,
    version: String,
    base_path: String,
}

impl SwaggerBuilder {
    /// A builder for an API called `title`.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            version: meridian_core::DEFAULT_VERSION.to_string(),
            base_path: String::new(),
        }
    }

    /// Set the API version.
    #[must_use]
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Set the base path; operation paths are made relative to it.
    #[must_use]
    pub fn base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into();
        self
    }

    fn relative_path(&self, template: &str) -> String {
        let relative = template
            .strip_prefix(self.base_path.as_str())
            .filter(|rest| rest.is_empty() || rest.starts_with('/'))
            .unwrap_or(template);
        if relative.is_empty() {
            "/".to_string()
        } else {
            swagger_path(relative)
        }
    }

    /// Builds a document describing `operations`, in order.
    pub fn build(&self, operations: &[DocumentedOperation]) -> DocsResult<SwaggerDocument> {
        let mut definitions = Definitions::new();
        let mut paths: IndexMap<String, PathItem> = IndexMap::new();

        for documented in operations {
            let object = Self::build_operation(documented, &mut definitions)?;
            paths
                .entry(self.relative_path(&documented.path))
                .or_default()
                .insert(&documented.operation.method(), object)?;
        }
        definitions.add_error_definitions()?;

        tracing::debug!(
            operations = operations.len(),
            paths = paths.len(),
            definitions = definitions.len(),
            "built swagger document"
        );

        Ok(SwaggerDocument {
            swagger: "2.0".to_string(),
            info: Info {
                title: self.title.clone(),
                version: self.version.clone(),
            },
            base_path: self.base_path.clone(),
            consumes: vec![JSON_MEDIA_TYPE.to_string()],
            produces: vec![JSON_MEDIA_TYPE.to_string()],
            paths,
            definitions: definitions.into_map(),
        })
    }

    fn build_operation(
        documented: &DocumentedOperation,
        definitions: &mut Definitions,
    ) -> DocsResult<OperationObject> {
        let operation = documented.operation;
        let ns = &documented.namespace;

        let mut parameters = path_parameters(&documented.path);
        if let Some(schema) = &documented.request_schema {
            parameters.push(Parameter::body(definitions.add(schema)?));
        }
        if let Some(schema) = &documented.query_schema {
            definitions.add_nested(schema)?;
            parameters.extend(
                schema
                    .fields()
                    .iter()
                    .filter(|field| !field.is_dump_only())
                    .map(|field| {
                        Parameter::query(field.data_key(), field.is_required(), build_parameter(field))
                    }),
            );
        }

        let mut responses = IndexMap::new();
        responses.insert(
            "default".to_string(),
            Response {
                description: "An error occurred".to_string(),
                schema: Some(SchemaObject::reference("Error")),
            },
        );
        let code = operation.default_code();
        let schema = match &documented.response_schema {
            Some(schema) if code != StatusCode::NO_CONTENT => Some(definitions.add(schema)?),
            _ => None,
        };
        responses.insert(
            code.as_u16().to_string(),
            Response {
                description: documented
                    .description
                    .clone()
                    .unwrap_or_else(|| default_description(operation, ns)),
                schema,
            },
        );

        Ok(OperationObject {
            tags: vec![ns.subject_name().to_string()],
            operation_id: operation.operation_id(ns),
            parameters,
            responses,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DocsError;
    use meridian_schema::{page_schema, paginated_list_schema, Field};
    use serde_json::json;

    fn new_person() -> Arc<Schema> {
        Schema::new("NewPersonSchema")
            .field(Field::string("first_name").wire_name("firstName").required())
            .field(Field::string("last_name").wire_name("lastName").required())
            .shared()
    }

    fn person() -> Arc<Schema> {
        Schema::new("PersonSchema")
            .field(Field::uuid("id").required())
            .field(Field::string("first_name").wire_name("firstName").required())
            .field(Field::string("last_name").wire_name("lastName").required())
            .field(Field::dict("_links"))
            .shared()
    }

    fn ns() -> Namespace {
        Namespace::new("person").with_version("v1")
    }

    #[test]
    fn test_swagger_path() {
        assert_eq!(swagger_path("/person/<uuid:person_id>"), "/person/{person_id}");
        assert_eq!(swagger_path("/file/<name>"), "/file/{name}");
        assert_eq!(swagger_path("/person"), "/person");
    }

    #[test]
    fn test_default_descriptions() {
        let relation = Namespace::relation("person", "address");
        assert_eq!(
            default_description(Operation::Search, &ns()),
            "Search the collection of all persons"
        );
        assert_eq!(default_description(Operation::Create, &ns()), "Create a new person");
        assert_eq!(
            default_description(Operation::SearchFor, &relation),
            "Search for addresses relative to a person"
        );
    }

    #[test]
    fn test_build_create_only() {
        let create = DocumentedOperation::new(Operation::Create, ns(), "/api/v1/person")
            .request_schema(new_person())
            .response_schema(person());
        let doc = SwaggerBuilder::new("example")
            .version("v1")
            .base_path("/api/v1")
            .build(&[create])
            .unwrap();
        let value = doc.to_value().unwrap();

        assert_eq!(value["swagger"], "2.0");
        assert_eq!(value["basePath"], "/api/v1");
        assert_eq!(value["info"], json!({"title": "example", "version": "v1"}));
        assert_eq!(value["consumes"], json!(["application/json"]));
        assert_eq!(value["produces"], json!(["application/json"]));
        assert_eq!(
            value["paths"],
            json!({
                "/person": {
                    "post": {
                        "tags": ["person"],
                        "operationId": "create",
                        "parameters": [{
                            "in": "body",
                            "name": "body",
                            "schema": {"$ref": "#/definitions/NewPerson"},
                        }],
                        "responses": {
                            "default": {
                                "description": "An error occurred",
                                "schema": {"$ref": "#/definitions/Error"},
                            },
                            "201": {
                                "description": "Create a new person",
                                "schema": {"$ref": "#/definitions/Person"},
                            },
                        },
                    },
                },
            })
        );
        let mut names: Vec<_> = doc.definitions.keys().cloned().collect();
        names.sort();
        assert_eq!(names, vec!["Error", "ErrorContext", "NewPerson", "Person", "SubError"]);
        assert_eq!(
            value["definitions"]["Person"]["required"],
            json!(["firstName", "id", "lastName"])
        );
    }

    #[test]
    fn test_build_search_and_delete() {
        let search = DocumentedOperation::new(Operation::Search, ns(), "/api/v1/person")
            .query_schema(page_schema().shared())
            .response_schema(paginated_list_schema(person()).shared());
        let delete =
            DocumentedOperation::new(Operation::Delete, ns(), "/api/v1/person/<uuid:person_id>")
                .description("Remove a person");
        let doc = SwaggerBuilder::new("example")
            .base_path("/api/v1")
            .build(&[search, delete])
            .unwrap();
        let value = doc.to_value().unwrap();

        let search = &value["paths"]["/person"]["get"];
        assert_eq!(search["operationId"], "search");
        assert_eq!(
            search["parameters"],
            json!([
                {"name": "offset", "in": "query", "type": "integer", "format": "int32", "default": 0},
                {"name": "limit", "in": "query", "type": "integer", "format": "int32", "default": 20},
            ])
        );
        assert_eq!(search["responses"]["200"]["schema"]["$ref"], "#/definitions/PersonList");
        assert!(doc.definitions.contains_key("Person"));

        let delete = &value["paths"]["/person/{person_id}"]["delete"];
        assert_eq!(
            delete["parameters"],
            json!([{"name": "person_id", "in": "path", "required": true, "type": "string"}])
        );
        assert_eq!(delete["responses"]["204"], json!({"description": "Remove a person"}));
    }

    #[test]
    fn test_relation_operation_id() {
        let relation = Namespace::relation("person", "address").with_version("v1");
        let search_for = DocumentedOperation::new(
            Operation::SearchFor,
            relation,
            "/api/v1/person/<uuid:person_id>/address",
        );
        let doc = SwaggerBuilder::new("example")
            .base_path("/api/v1")
            .build(&[search_for])
            .unwrap();
        let op = doc.paths["/person/{person_id}/address"].get.as_ref().unwrap();
        assert_eq!(op.operation_id, "search_for_addresses");
        assert_eq!(op.tags, vec!["person"]);
    }

    #[test]
    fn test_build_is_deterministic() {
        let ops = vec![
            DocumentedOperation::new(Operation::Create, ns(), "/api/v1/person")
                .request_schema(new_person())
                .response_schema(person()),
            DocumentedOperation::new(Operation::Retrieve, ns(), "/api/v1/person/<uuid:person_id>")
                .response_schema(person()),
        ];
        let builder = SwaggerBuilder::new("example").base_path("/api/v1");
        assert_eq!(builder.build(&ops).unwrap(), builder.build(&ops).unwrap());
    }

    #[test]
    fn test_colliding_definitions_fail() {
        let other = Schema::new("Person").field(Field::integer("age")).shared();
        let ops = vec![
            DocumentedOperation::new(Operation::Create, ns(), "/api/v1/person")
                .response_schema(person()),
            DocumentedOperation::new(Operation::Retrieve, ns(), "/api/v1/person/<uuid:person_id>")
                .response_schema(other),
        ];
        let err = SwaggerBuilder::new("example").build(&ops).unwrap_err();
        assert!(matches!(err, DocsError::DefinitionCollision { .. }));
    }

    #[test]
    fn test_schema_named_error_fails() {
        let error = Schema::new("ErrorSchema").field(Field::string("reason")).shared();
        let ops = vec![
            DocumentedOperation::new(Operation::Retrieve, ns(), "/api/v1/person/<uuid:person_id>")
                .response_schema(error),
        ];
        let err = SwaggerBuilder::new("example").build(&ops).unwrap_err();
        assert!(matches!(
            err,
            DocsError::DefinitionCollision { ref type_name } if type_name == "Error"
        ));
    }
}
