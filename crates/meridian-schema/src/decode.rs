//! Payload validation.
//!
//! Decoding walks every declared field and collects one [`SubError`] per
//! failing field, so a client sees all problems with a request at once.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use meridian_core::{MeridianError, MeridianResult, Record, SubError};
use regex::Regex;
use serde_json::{Map, Number, Value};
use std::sync::OnceLock;
use uuid::Uuid;

use crate::field::{EnumSpec, FieldKind};
use crate::schema::Schema;
use crate::uri::normalize_uri;

const MISSING: &str = "Missing data for required field.";
const NULL: &str = "Field may not be null.";
const INVALID_INPUT: &str = "Invalid input type.";

pub(crate) fn decode(schema: &Schema, payload: &Value, partial: bool) -> MeridianResult<Record> {
    let mut errors = Vec::new();
    let record = decode_object(schema, payload, partial, None, &mut errors);
    if errors.is_empty() {
        Ok(record)
    } else {
        tracing::debug!(
            schema = schema.name(),
            error_count = errors.len(),
            "payload failed validation"
        );
        Err(MeridianError::validation(errors))
    }
}

/// Folds raw query pairs into a payload, then decodes it.
///
/// List fields collect every occurrence of `key` or `key[]` and split
/// comma-separated values; scalar fields take the first occurrence.
pub(crate) fn decode_query(schema: &Schema, query: &[(String, String)]) -> MeridianResult<Record> {
    let mut payload = Map::new();
    for field in schema.fields() {
        if field.is_dump_only() {
            continue;
        }
        let key = field.data_key();
        let bracketed = format!("{key}[]");
        let mut values = query
            .iter()
            .filter(|(k, _)| k == key || *k == bracketed)
            .map(|(_, v)| v.as_str())
            .peekable();
        if values.peek().is_none() {
            continue;
        }
        let value = match field.kind() {
            FieldKind::List(_) | FieldKind::QueryList(_) => Value::Array(
                values
                    .flat_map(|v| v.split(','))
                    .filter(|v| !v.is_empty())
                    .map(|v| Value::String(v.to_string()))
                    .collect(),
            ),
            _ => values
                .next()
                .map_or(Value::Null, |v| Value::String(v.to_string())),
        };
        payload.insert(key.to_string(), value);
    }
    decode(schema, &Value::Object(payload), false)
}

fn join(prefix: Option<&str>, key: &str) -> String {
    match prefix {
        Some(prefix) => format!("{prefix}.{key}"),
        None => key.to_string(),
    }
}

fn decode_object(
    schema: &Schema,
    payload: &Value,
    partial: bool,
    prefix: Option<&str>,
    errors: &mut Vec<SubError>,
) -> Record {
    let mut record = Record::new();
    let Some(object) = payload.as_object() else {
        errors.push(SubError::for_field(
            join(prefix, "_schema"),
            vec![INVALID_INPUT.to_string()],
        ));
        return record;
    };

    for field in schema.fields() {
        if field.is_dump_only() {
            continue;
        }
        let path = join(prefix, field.data_key());
        match object.get(field.data_key()) {
            None => {
                if let Some(default) = field.default_value() {
                    record.insert(field.attribute().to_string(), default.clone());
                } else if field.is_required() && !partial {
                    errors.push(SubError::for_field(path, vec![MISSING.to_string()]));
                }
            }
            Some(Value::Null) => {
                if field.allows_none() {
                    record.insert(field.attribute().to_string(), Value::Null);
                } else {
                    errors.push(SubError::for_field(path, vec![NULL.to_string()]));
                }
            }
            Some(value) => match decode_value(field.kind(), value, partial, &path, errors) {
                Ok(decoded) => {
                    record.insert(field.attribute().to_string(), decoded);
                }
                Err(reasons) => errors.push(SubError::for_field(path, reasons)),
            },
        }
    }
    record
}

type Reasons = Vec<String>;

fn fail<T>(reason: impl Into<String>) -> Result<T, Reasons> {
    Err(vec![reason.into()])
}

fn decode_value(
    kind: &FieldKind,
    value: &Value,
    partial: bool,
    path: &str,
    errors: &mut Vec<SubError>,
) -> Result<Value, Reasons> {
    match kind {
        FieldKind::String => match value {
            Value::String(_) => Ok(value.clone()),
            _ => fail("Not a valid string."),
        },
        FieldKind::Integer => match integer(value) {
            Some(n) if i32::try_from(n).is_ok() => Ok(Value::from(n)),
            Some(_) => fail("Number out of range."),
            None => fail("Not a valid integer."),
        },
        FieldKind::Number => number(value)
            .map(Value::Number)
            .ok_or_else(|| vec!["Not a valid number.".to_string()]),
        FieldKind::Boolean => boolean(value)
            .map(Value::Bool)
            .ok_or_else(|| vec!["Not a valid boolean.".to_string()]),
        FieldKind::Uuid => value
            .as_str()
            .and_then(|s| Uuid::parse_str(s.trim()).ok())
            .map(|id| Value::String(id.hyphenated().to_string()))
            .ok_or_else(|| vec!["Not a valid UUID.".to_string()]),
        FieldKind::DateTime => value
            .as_str()
            .and_then(date_time)
            .map(Value::String)
            .ok_or_else(|| vec!["Not a valid datetime.".to_string()]),
        FieldKind::Date => value
            .as_str()
            .and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok())
            .map(|d| Value::String(d.format("%Y-%m-%d").to_string()))
            .ok_or_else(|| vec!["Not a valid date.".to_string()]),
        FieldKind::Decimal { .. } => decimal(value)
            .map(Value::String)
            .ok_or_else(|| vec!["Not a valid number.".to_string()]),
        FieldKind::Timestamp { .. } => timestamp(value),
        FieldKind::Dict => match value {
            Value::Object(_) => Ok(value.clone()),
            _ => fail("Not a valid mapping type."),
        },
        FieldKind::List(item) => match value {
            Value::Array(items) => decode_items(item, items, partial, path, errors),
            _ => fail("Not a valid list."),
        },
        FieldKind::QueryList(item) => match value {
            Value::Array(items) => decode_items(item, items, partial, path, errors),
            Value::String(joined) => {
                let items: Vec<Value> = joined
                    .split(',')
                    .filter(|v| !v.is_empty())
                    .map(|v| Value::String(v.to_string()))
                    .collect();
                decode_items(item, &items, partial, path, errors)
            }
            _ => fail("Not a valid list."),
        },
        FieldKind::Nested(schema) => {
            if !value.is_object() {
                return fail(INVALID_INPUT);
            }
            let nested = schema.get();
            Ok(Value::Object(decode_object(
                &nested,
                value,
                partial,
                Some(path),
                errors,
            )))
        }
        FieldKind::Enum(spec) => decode_enum(spec, value),
        FieldKind::Uri => value
            .as_str()
            .and_then(normalize_uri)
            .map(Value::String)
            .ok_or_else(|| vec!["Not a valid URL.".to_string()]),
        FieldKind::Language => match value.as_str() {
            Some(tag) if is_language_tag(tag) => Ok(value.clone()),
            _ => fail("Not a valid language tag."),
        },
        FieldKind::Computed(_) => Ok(value.clone()),
    }
}

fn decode_items(
    item: &FieldKind,
    items: &[Value],
    partial: bool,
    path: &str,
    errors: &mut Vec<SubError>,
) -> Result<Value, Reasons> {
    let mut decoded = Vec::with_capacity(items.len());
    let mut reasons = Vec::new();
    for (index, value) in items.iter().enumerate() {
        let item_path = format!("{path}.{index}");
        match decode_value(item, value, partial, &item_path, errors) {
            Ok(value) => decoded.push(value),
            Err(item_reasons) => {
                reasons.extend(item_reasons.into_iter().map(|r| format!("Item {index}: {r}")));
            }
        }
    }
    if reasons.is_empty() {
        Ok(Value::Array(decoded))
    } else {
        Err(reasons)
    }
}

fn integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < 9.0e15)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn number(value: &Value) -> Option<Number> {
    match value {
        Value::Number(n) => Some(n.clone()),
        Value::String(s) => s.trim().parse::<f64>().ok().and_then(Number::from_f64),
        _ => None,
    }
}

fn boolean(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_i64() {
            Some(1) => Some(true),
            Some(0) => Some(false),
            _ => None,
        },
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "t" | "1" | "yes" | "y" | "on" => Some(true),
            "false" | "f" | "0" | "no" | "n" | "off" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn decimal(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => {
            let trimmed = s.trim();
            trimmed.parse::<f64>().ok().filter(|f| f.is_finite())?;
            Some(trimmed.to_string())
        }
        _ => None,
    }
}

fn date_time(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.to_rfc3339());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc().to_rfc3339())
}

fn utc_offset() -> &'static Regex {
    static OFFSET: OnceLock<Regex> = OnceLock::new();
    OFFSET.get_or_init(|| {
        Regex::new(r"^(?P<local>.+T[^+\-]+)(?P<sign>[+\-])(?P<hours>\d{1,2}):?(?P<minutes>\d{2})$")
            .expect("valid regex")
    })
}

/// Seconds since the epoch. Naive strings are read as UTC; any other
/// offset is rejected.
fn timestamp(value: &Value) -> Result<Value, Reasons> {
    let raw = match value {
        Value::Number(_) => return Ok(value.clone()),
        Value::String(s) => s.trim(),
        _ => return fail("Not a valid timestamp."),
    };
    let local = if let Some(stripped) = raw.strip_suffix('Z') {
        stripped
    } else if let Some(caps) = utc_offset().captures(raw) {
        let is_zero = |name: &str| {
            caps.name(name)
                .is_some_and(|m| m.as_str().trim_start_matches('0').is_empty())
        };
        if !(is_zero("hours") && is_zero("minutes")) {
            return fail("Timestamps must be defined in UTC");
        }
        caps.name("local").map_or(raw, |m| m.as_str())
    } else {
        raw
    };
    let naive = NaiveDateTime::parse_from_str(local, "%Y-%m-%dT%H:%M:%S%.f")
        .map_err(|_| vec!["Not a valid timestamp.".to_string()])?;
    let micros = naive.and_utc().timestamp_micros();
    Number::from_f64(micros as f64 / 1_000_000.0)
        .map(Value::Number)
        .ok_or_else(|| vec!["Not a valid timestamp.".to_string()])
}

fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn decode_enum(spec: &EnumSpec, value: &Value) -> Result<Value, Reasons> {
    if spec.is_by_value() {
        let coerced = || {
            let raw = value.as_str()?.trim();
            raw.parse::<i64>()
                .ok()
                .map(Value::from)
                .or_else(|| raw.parse::<f64>().ok().map(Value::from))
        };
        spec.name_of(value)
            .or_else(|| coerced().and_then(|v| spec.name_of(&v)))
            .map(|name| Value::String(name.to_string()))
            .ok_or_else(|| vec![format!("Invalid enum value {}", display(value))])
    } else {
        match value.as_str() {
            Some(name) if spec.value_of(name).is_some() => Ok(value.clone()),
            _ => fail(format!("Invalid enum member {}", display(value))),
        }
    }
}

fn language_tag() -> &'static Regex {
    static TAG: OnceLock<Regex> = OnceLock::new();
    TAG.get_or_init(|| Regex::new(r"^[a-z]{2,3}(-[A-Z]{2}|-[0-9]{3})?$").expect("valid regex"))
}

pub(crate) fn is_language_tag(tag: &str) -> bool {
    language_tag().is_match(tag)
}
