//! Schema inference from captured values.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Number, Value};
use trawl_domain::{ObjectSchema, Schema, StringFormat};

#[allow(clippy::expect_used)]
static DATE_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}[T ]\d{2}:\d{2}(:\d{2})?").expect("valid regex")
});

#[allow(clippy::expect_used)]
static DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid regex"));

#[allow(clippy::expect_used)]
static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex"));

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// Infers the schema of a JSON value.
///
/// `null` becomes a nullable string; empty arrays get a string item
/// placeholder; object keys holding `null` are not required.
#[must_use]
pub fn infer_schema(value: &Value) -> Schema {
    match value {
        Value::Null => Schema::nullable_string(),
        Value::Array(items) => Schema::array(items.first().map_or_else(Schema::string, infer_schema)),
        Value::Object(fields) => {
            let mut object = ObjectSchema::new();
            for (name, field) in fields {
                object.insert(name.clone(), infer_schema(field), !field.is_null());
            }
            Schema::Object(object)
        }
        Value::String(text) => detect_format(text).map_or_else(Schema::string, Schema::formatted),
        Value::Number(number) => number_schema(number),
        Value::Bool(_) => Schema::Boolean,
    }
}

fn number_schema(number: &Number) -> Schema {
    if number.is_i64() || number.is_u64() {
        return Schema::Integer;
    }
    match number.as_f64() {
        Some(float) if float.fract() == 0.0 => Schema::Integer,
        _ => Schema::Number,
    }
}

/// Detects the format tag of a string value.
#[must_use]
pub fn detect_format(text: &str) -> Option<StringFormat> {
    if DATE_TIME.is_match(text) {
        Some(StringFormat::DateTime)
    } else if DATE.is_match(text) {
        Some(StringFormat::Date)
    } else if EMAIL.is_match(text) {
        Some(StringFormat::Email)
    } else if text.starts_with("http://") || text.starts_with("https://") {
        Some(StringFormat::Uri)
    } else {
        None
    }
}

/// Interprets a raw query-string value.
///
/// Tries an integer, then a finite float, then a boolean literal, and
/// falls back to a string. Returns the schema and the typed example.
#[must_use]
pub fn infer_literal(raw: &str) -> (Schema, Value) {
    if let Ok(integer) = raw.parse::<i64>() {
        return (Schema::Integer, Value::from(integer));
    }
    if let Some(number) = raw
        .parse::<f64>()
        .ok()
        .filter(|float| float.is_finite())
        .and_then(Number::from_f64)
    {
        return (Schema::Number, Value::Number(number));
    }
    match raw {
        "true" => return (Schema::Boolean, Value::Bool(true)),
        "false" => return (Schema::Boolean, Value::Bool(false)),
        _ => {}
    }
    let schema = detect_format(raw).map_or_else(Schema::string, Schema::formatted);
    (schema, Value::String(raw.to_string()))
}

/// Turns a captured body into the value its schema is inferred from.
///
/// Blank bodies are absent. String bodies are decoded as form fields when
/// the content type says so, or as JSON when they look like JSON; any other
/// string stays a string.
#[must_use]
pub fn normalize_body(body: Option<&Value>, content_type: Option<&str>) -> Option<Value> {
    match body? {
        Value::Null => None,
        Value::String(text) => normalize_text(text, content_type),
        other => Some(other.clone()),
    }
}

fn normalize_text(text: &str, content_type: Option<&str>) -> Option<Value> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    if content_type == Some(FORM_URLENCODED) {
        if let Ok(pairs) = serde_urlencoded::from_str::<Vec<(String, String)>>(trimmed) {
            let mut fields = Map::new();
            for (name, value) in pairs {
                fields.entry(name).or_insert(Value::String(value));
            }
            if !fields.is_empty() {
                return Some(Value::Object(fields));
            }
        }
    }

    let json_like = content_type.is_some_and(|ct| ct.contains("json"))
        || trimmed.starts_with('{')
        || trimmed.starts_with('[');
    if json_like {
        if let Ok(parsed) = serde_json::from_str::<Value>(trimmed) {
            return Some(parsed);
        }
    }

    Some(Value::String(text.to_string()))
}

/// Number of top-level fields in a normalized body.
#[must_use]
pub fn field_count(body: &Value) -> usize {
    body.as_object().map_or(0, Map::len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_object_required_tracks_nulls() {
        let schema = infer_schema(&json!({ "id": 7, "name": null, "tags": [] }));
        let object = schema.as_object().cloned().unwrap_or_default();

        assert_eq!(object.property("id"), Some(&Schema::Integer));
        assert_eq!(object.property("name"), Some(&Schema::nullable_string()));
        assert_eq!(object.property("tags"), Some(&Schema::array(Schema::string())));
        assert!(object.is_required("id"));
        assert!(!object.is_required("name"));
        assert!(object.is_required("tags"));
    }

    #[test]
    fn test_array_uses_first_element() {
        let schema = infer_schema(&json!([{ "a": 1 }, "ignored"]));
        let Schema::Array(items) = schema else {
            unreachable!("array expected");
        };
        assert_eq!(items.kind(), trawl_domain::SchemaKind::Object);
    }

    #[test]
    fn test_numbers() {
        assert_eq!(infer_schema(&json!(3)), Schema::Integer);
        assert_eq!(infer_schema(&json!(3.0)), Schema::Integer);
        assert_eq!(infer_schema(&json!(3.25)), Schema::Number);
        assert_eq!(infer_schema(&json!(u64::MAX)), Schema::Integer);
    }

    #[test]
    fn test_string_formats_in_priority_order() {
        assert_eq!(detect_format("2024-05-01T10:20:30Z"), Some(StringFormat::DateTime));
        assert_eq!(detect_format("2024-05-01"), Some(StringFormat::Date));
        assert_eq!(detect_format("ann@example.com"), Some(StringFormat::Email));
        assert_eq!(detect_format("https://x.io/a"), Some(StringFormat::Uri));
        assert_eq!(detect_format("hello"), None);
        assert_eq!(detect_format("2024-05-01 extra"), None);
    }

    #[test]
    fn test_infer_literal() {
        assert_eq!(infer_literal("42"), (Schema::Integer, json!(42)));
        assert_eq!(infer_literal("-1.5"), (Schema::Number, json!(-1.5)));
        assert_eq!(infer_literal("true"), (Schema::Boolean, json!(true)));
        assert_eq!(infer_literal("asc"), (Schema::string(), json!("asc")));
        assert_eq!(infer_literal("inf"), (Schema::string(), json!("inf")));
        assert_eq!(
            infer_literal("2024-01-02"),
            (Schema::formatted(StringFormat::Date), json!("2024-01-02"))
        );
    }

    #[test]
    fn test_normalize_json_text() {
        let body = json!("{\"id\": 1}");
        assert_eq!(normalize_body(Some(&body), None), Some(json!({ "id": 1 })));
    }

    #[test]
    fn test_normalize_form_body() {
        let body = json!("name=Ann&age=30&name=Bob");
        assert_eq!(
            normalize_body(Some(&body), Some("application/x-www-form-urlencoded")),
            Some(json!({ "name": "Ann", "age": "30" }))
        );
    }

    #[test]
    fn test_normalize_blank_and_raw() {
        assert_eq!(normalize_body(Some(&json!("   ")), None), None);
        assert_eq!(normalize_body(Some(&Value::Null), None), None);
        assert_eq!(normalize_body(None, None), None);
        assert_eq!(
            normalize_body(Some(&json!("plain text")), Some("text/plain")),
            Some(json!("plain text"))
        );
        assert_eq!(
            normalize_body(Some(&json!("{broken")), Some("application/json")),
            Some(json!("{broken"))
        );
    }

    #[test]
    fn test_field_count() {
        assert_eq!(field_count(&json!({ "a": 1, "b": 2 })), 2);
        assert_eq!(field_count(&json!([1, 2, 3])), 0);
    }
}
