//! Schemas for paged collections.

use meridian_core::DEFAULT_LIMIT;

use crate::field::{Field, FieldKind, SchemaRef};
use crate::schema::Schema;

/// The `offset`/`limit` query schema used by search operations.
///
/// Both fields are int32; larger values are rejected.
#[must_use]
pub fn page_schema() -> Schema {
    page_schema_with_limit(DEFAULT_LIMIT)
}

/// [`page_schema`] with a different default limit.
#[must_use]
pub fn page_schema_with_limit(default_limit: i64) -> Schema {
    Schema::new("PageSchema")
        .field(Field::integer("offset").with_default(0))
        .field(Field::integer("limit").with_default(default_limit))
}

/// The `{count, items, offset, limit, _links}` envelope wrapping `item`.
///
/// Named after the item schema, so `PersonSchema` yields `PersonList`.
#[must_use]
pub fn paginated_list_schema(item: impl Into<SchemaRef>) -> Schema {
    let item = item.into();
    let name = format!("{}ListSchema", item.get().type_name());
    Schema::new(name)
        .field(Field::list("items", FieldKind::Nested(item)).required())
        .field(Field::integer("count").required())
        .field(Field::integer("offset").required())
        .field(Field::integer("limit").required())
        .field(Field::dict("_links"))
}
