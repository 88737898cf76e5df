//! Schemaless document handling.
//!
//! Stored records are plain BSON documents. Only a handful of fields are
//! interpreted by the service (`_id`, timestamps, `status`, `isResolved`);
//! everything else passes through untouched.

use chrono::SecondsFormat;
use mongodb::bson::{Bson, DateTime};
use serde_json::{Map, Number, Value};

pub use mongodb::bson::Document;

pub const ID_FIELD: &str = "_id";
pub const CREATED_AT: &str = "createdAt";
pub const UPDATED_AT: &str = "updatedAt";

/// Field names clients may send that would collide with the store identifier.
const CLIENT_ID_FIELDS: [&str; 2] = [ID_FIELD, "id"];

/// Render a stored document as a plain JSON object.
pub fn to_json(document: &Document) -> Value {
    Value::Object(
        document
            .iter()
            .map(|(key, value)| (key.clone(), bson_to_json(value)))
            .collect(),
    )
}

/// Convert a BSON value to the JSON the API exposes.
///
/// Identifiers become hex strings and dates RFC 3339 strings with millisecond
/// precision. Types with no natural JSON form fall back to relaxed extended
/// JSON.
pub fn bson_to_json(value: &Bson) -> Value {
    match value {
        Bson::Null | Bson::Undefined => Value::Null,
        Bson::Boolean(b) => Value::Bool(*b),
        Bson::Int32(i) => Value::from(*i),
        Bson::Int64(i) => Value::from(*i),
        Bson::Double(f) => Number::from_f64(*f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        Bson::String(s) => Value::String(s.clone()),
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::DateTime(dt) => Value::String(format_timestamp(*dt)),
        Bson::Array(items) => Value::Array(items.iter().map(bson_to_json).collect()),
        Bson::Document(doc) => to_json(doc),
        other => other.clone().into_relaxed_extjson(),
    }
}

/// Convert a JSON request body into a document.
pub fn from_json(map: Map<String, Value>) -> Document {
    map.into_iter()
        .map(|(key, value)| (key, json_to_bson(value)))
        .collect()
}

/// Structural JSON to BSON conversion.
///
/// Integers are stored as `Int32` when they fit, `Int64` otherwise; any other
/// number becomes a `Double`.
pub fn json_to_bson(value: Value) -> Bson {
    match value {
        Value::Null => Bson::Null,
        Value::Bool(b) => Bson::Boolean(b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i32::try_from(i)
                    .map(Bson::Int32)
                    .unwrap_or(Bson::Int64(i))
            } else {
                n.as_f64().map(Bson::Double).unwrap_or(Bson::Null)
            }
        }
        Value::String(s) => Bson::String(s),
        Value::Array(items) => Bson::Array(items.into_iter().map(json_to_bson).collect()),
        Value::Object(map) => Bson::Document(from_json(map)),
    }
}

pub fn format_timestamp(dt: DateTime) -> String {
    dt.to_chrono().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Drop any client-supplied identifier; ids are assigned by the store and
/// never change.
pub fn strip_identifiers(document: &mut Document) {
    for field in CLIENT_ID_FIELDS {
        document.remove(field);
    }
}

/// Prepare a create payload: no client ids, both timestamps set to `now`.
pub fn stamp_created(document: &mut Document, now: DateTime) {
    strip_identifiers(document);
    document.insert(CREATED_AT, now);
    document.insert(UPDATED_AT, now);
}

/// Prepare an update payload: no client ids, `createdAt` left alone, and
/// `updatedAt` set to `now`.
pub fn stamp_updated(changes: &mut Document, now: DateTime) {
    strip_identifiers(changes);
    changes.remove(CREATED_AT);
    changes.insert(UPDATED_AT, now);
}

/// JavaScript-style truthiness, used by the diagnostic summaries.
pub fn is_truthy(value: Option<&Bson>) -> bool {
    match value {
        None | Some(Bson::Null) | Some(Bson::Undefined) => false,
        Some(Bson::Boolean(b)) => *b,
        Some(Bson::Int32(i)) => *i != 0,
        Some(Bson::Int64(i)) => *i != 0,
        Some(Bson::Double(f)) => *f != 0.0 && !f.is_nan(),
        Some(Bson::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

/// True for a non-empty array or string.
pub fn has_items(value: Option<&Bson>) -> bool {
    match value {
        Some(Bson::Array(items)) => !items.is_empty(),
        Some(Bson::String(s)) => !s.is_empty(),
        _ => false,
    }
}

/// Fetch a field as JSON, `None` when the field is absent.
pub fn field_json(document: &Document, key: &str) -> Option<Value> {
    document.get(key).map(bson_to_json)
}
