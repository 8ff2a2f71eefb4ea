//! Record serialisation.

use chrono::DateTime;
use meridian_core::{MeridianError, MeridianResult, Record, UrlContext};
use serde_json::{Map, Number, Value};

use crate::decode::is_language_tag;
use crate::field::{Field, FieldKind};
use crate::schema::Schema;
use crate::uri::normalize_uri;

pub(crate) fn encode(schema: &Schema, record: &Record, urls: &UrlContext<'_>) -> MeridianResult<Value> {
    let mut out = Map::new();
    for field in schema.fields() {
        if field.is_load_only() {
            continue;
        }
        let value = match field.kind() {
            FieldKind::Computed(compute) => compute(record, urls)?,
            kind => match record.get(field.attribute()) {
                None => continue,
                Some(Value::Null) => Value::Null,
                Some(value) => encode_value(field, kind, value, urls)?,
            },
        };
        out.insert(field.data_key().to_string(), value);
    }
    Ok(Value::Object(out))
}

fn invalid(field: &Field, reason: &str) -> MeridianError {
    MeridianError::internal(format!(
        "could not encode field '{}': {reason}",
        field.attribute()
    ))
}

fn encode_value(
    field: &Field,
    kind: &FieldKind,
    value: &Value,
    urls: &UrlContext<'_>,
) -> MeridianResult<Value> {
    match kind {
        FieldKind::Nested(schema) => match value {
            Value::Object(record) => encode(&schema.get(), record, urls),
            _ => Err(invalid(field, "Invalid input type.")),
        },
        FieldKind::List(item) | FieldKind::QueryList(item) => match value {
            Value::Array(items) => items
                .iter()
                .map(|item_value| match item_value {
                    Value::Null => Ok(Value::Null),
                    other => encode_value(field, item, other, urls),
                })
                .collect::<MeridianResult<Vec<_>>>()
                .map(Value::Array),
            _ => Err(invalid(field, "Not a valid list.")),
        },
        FieldKind::Enum(spec) => {
            let name = value
                .as_str()
                .filter(|name| spec.value_of(name).is_some())
                .or_else(|| spec.name_of(value))
                .ok_or_else(|| invalid(field, &format!("Invalid enum member {value}")))?;
            if spec.is_by_value() {
                spec.value_of(name)
                    .cloned()
                    .ok_or_else(|| invalid(field, &format!("Invalid enum member {name}")))
            } else {
                Ok(Value::String(name.to_string()))
            }
        }
        FieldKind::Decimal { as_string } => {
            let text = match value {
                Value::Number(n) => n.to_string(),
                Value::String(s) => s.clone(),
                _ => return Err(invalid(field, "Not a valid number.")),
            };
            if *as_string {
                Ok(Value::String(text))
            } else {
                text.parse::<f64>()
                    .ok()
                    .and_then(Number::from_f64)
                    .map(Value::Number)
                    .ok_or_else(|| invalid(field, "Not a valid number."))
            }
        }
        FieldKind::Timestamp { iso } => {
            let seconds = match value {
                Value::Number(n) => n.as_f64(),
                Value::String(s) => DateTime::parse_from_rfc3339(s)
                    .ok()
                    .map(|dt| dt.timestamp_micros() as f64 / 1_000_000.0),
                _ => None,
            }
            .ok_or_else(|| invalid(field, "Not a valid timestamp."))?;
            if *iso {
                iso_timestamp(seconds)
                    .map(Value::String)
                    .ok_or_else(|| invalid(field, "Not a valid timestamp."))
            } else {
                Number::from_f64(seconds)
                    .map(Value::Number)
                    .ok_or_else(|| invalid(field, "Not a valid timestamp."))
            }
        }
        FieldKind::Uri => value
            .as_str()
            .and_then(normalize_uri)
            .map(Value::String)
            .ok_or_else(|| invalid(field, "Not a valid URL.")),
        FieldKind::Language => match value.as_str() {
            Some(tag) if is_language_tag(tag) => Ok(value.clone()),
            _ => Err(invalid(field, "Not a valid language tag.")),
        },
        _ => Ok(value.clone()),
    }
}

fn iso_timestamp(seconds: f64) -> Option<String> {
    let micros = (seconds * 1_000_000.0).round() as i64;
    let dt = DateTime::from_timestamp_micros(micros)?.naive_utc();
    if micros % 1_000_000 == 0 {
        Some(dt.format("%Y-%m-%dT%H:%M:%S").to_string())
    } else {
        Some(dt.format("%Y-%m-%dT%H:%M:%S%.6f").to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::EnumSpec;
    use http::Method;
    use meridian_router::Router;
    use serde_json::json;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_encode_uses_wire_names_and_skips_missing() {
        let schema = Schema::new("PersonSchema")
            .field(Field::uuid("id"))
            .field(Field::string("first_name").wire_name("firstName"))
            .field(Field::string("secret").load_only())
            .field(Field::string("nickname"));
        let router = Router::new();
        let urls = UrlContext::new(&router, "http://localhost");

        let encoded = encode(
            &schema,
            &record(json!({"id": "x", "first_name": "Alice", "secret": "s"})),
            &urls,
        )
        .unwrap();
        assert_eq!(encoded, json!({"id": "x", "firstName": "Alice"}));
    }

    #[test]
    fn test_encode_links_field() {
        let mut router = Router::new();
        router
            .add("/api/person/<uuid:person_id>", Method::GET, "person.retrieve.v1")
            .unwrap();
        let urls = UrlContext::new(&router, "http://localhost");
        let schema = Schema::new("PersonSchema")
            .field(Field::uuid("id"))
            .field(Field::links(|record, urls| {
                let id = record.get("id").and_then(Value::as_str).unwrap_or_default();
                let href = urls.external(&format!("/api/person/{id}"), &[])?;
                Ok(json!({"self": {"href": href}}))
            }));

        let encoded = encode(&schema, &record(json!({"id": "abc"})), &urls).unwrap();
        assert_eq!(encoded["_links"]["self"]["href"], "http://localhost/api/person/abc");
    }

    #[test]
    fn test_encode_enums() {
        let by_name = EnumSpec::new("Color", [("Foo", "foo"), ("Bar", "bar")]);
        let by_value = by_name.clone().by_value();
        let schema = Schema::new("S")
            .field(Field::enumeration("name", by_name))
            .field(Field::enumeration("value", by_value));
        let router = Router::new();
        let urls = UrlContext::new(&router, "http://localhost");

        let encoded = encode(
            &schema,
            &record(json!({"name": "Foo", "value": "Bar"})),
            &urls,
        )
        .unwrap();
        assert_eq!(encoded, json!({"name": "Foo", "value": "bar"}));

        let err = encode(&schema, &record(json!({"name": "Baz"})), &urls).unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_enum_members_survive_encode_then_decode() {
        let schema = Schema::new("S")
            .field(Field::enumeration(
                "color",
                EnumSpec::new("Color", [("Foo", "foo"), ("Bar", "bar")]),
            ))
            .field(Field::enumeration(
                "level",
                EnumSpec::new("Level", [("Low", 1), ("High", 2)]).by_value(),
            ));
        let router = Router::new();
        let urls = UrlContext::new(&router, "http://localhost");

        let original = record(json!({"color": "Bar", "level": "High"}));
        let encoded = schema.encode(&original, &urls).unwrap();
        assert_eq!(encoded, json!({"color": "Bar", "level": 2}));
        assert_eq!(schema.decode(&encoded, false).unwrap(), original);

        let coerced = schema.decode(&json!({"color": "Bar", "level": "2"}), false).unwrap();
        assert_eq!(coerced, original);
        assert_eq!(schema.encode(&coerced, &urls).unwrap(), encoded);
    }

    #[test]
    fn test_encode_timestamps_and_decimals() {
        let schema = Schema::new("S")
            .field(Field::timestamp("unix"))
            .field(Field::timestamp("iso").as_string())
            .field(Field::decimal("price"))
            .field(Field::decimal("exact").as_string());
        let router = Router::new();
        let urls = UrlContext::new(&router, "http://localhost");

        let encoded = encode(
            &schema,
            &record(json!({
                "unix": 1_427_702_400.0,
                "iso": 1_427_702_400.0,
                "price": "10.5",
                "exact": "10.50",
            })),
            &urls,
        )
        .unwrap();
        assert_eq!(encoded["unix"], 1_427_702_400.0);
        assert_eq!(encoded["iso"], "2015-03-30T08:00:00");
        assert_eq!(encoded["price"], 10.5);
        assert_eq!(encoded["exact"], "10.50");
    }

    #[test]
    fn test_encode_rejects_malformed_uri() {
        let schema = Schema::new("S").field(Field::uri("foo"));
        let router = Router::new();
        let urls = UrlContext::new(&router, "http://localhost");
        assert!(encode(&schema, &record(json!({"foo": "example"})), &urls).is_err());
        let ok = encode(&schema, &record(json!({"foo": "http://example.com/"})), &urls).unwrap();
        assert_eq!(ok["foo"], "http://example.com");
    }
}
