//! Merging schemas inferred from several samples of one slot.
//!
//! Inputs are never modified; every merge builds a new schema.

use indexmap::IndexMap;
use trawl_domain::{ObjectSchema, Schema, SchemaKind};

/// Merges samples of the same logical value into one schema.
///
/// - one sample is returned unchanged;
/// - objects merge property-wise (see [`merge_objects`]);
/// - equal scalar/array kinds keep the first sample, strings keep
///   nullability if any sample was nullable;
/// - disagreeing kinds become [`Schema::Alternatives`] of the distinct
///   samples in first-seen order.
///
/// Returns `None` for an empty slice.
#[must_use]
pub fn merge_schemas(samples: &[Schema]) -> Option<Schema> {
    let (first, rest) = samples.split_first()?;
    if rest.is_empty() {
        return Some(first.clone());
    }

    let kind = first.kind();
    if rest.iter().any(|sample| sample.kind() != kind) {
        return Some(alternatives(samples));
    }

    let merged = match kind {
        SchemaKind::Object => {
            let objects: Vec<&ObjectSchema> = samples.iter().filter_map(Schema::as_object).collect();
            Schema::Object(merge_objects(&objects))
        }
        SchemaKind::String => {
            let nullable = samples.iter().any(Schema::is_nullable);
            match first {
                Schema::String { format, .. } => Schema::String {
                    format: *format,
                    nullable,
                },
                other => other.clone(),
            }
        }
        SchemaKind::Alternatives => alternatives(samples),
        _ => first.clone(),
    };
    Some(merged)
}

/// Union of properties with per-property merges.
///
/// A property is required when any sample requires it, unless some sample
/// saw it as an optional nullable value.
#[must_use]
pub fn merge_objects(objects: &[&ObjectSchema]) -> ObjectSchema {
    let mut samples: IndexMap<&str, Vec<Schema>> = IndexMap::new();
    for object in objects {
        for (name, schema) in object.properties() {
            samples.entry(name.as_str()).or_default().push(schema.clone());
        }
    }

    let mut merged = ObjectSchema::new();
    for (name, property_samples) in samples {
        let Some(schema) = merge_schemas(&property_samples) else {
            continue;
        };
        let required_somewhere = objects.iter().any(|object| object.is_required(name));
        let seen_as_null = objects.iter().any(|object| {
            !object.is_required(name) && object.property(name).is_some_and(Schema::is_nullable)
        });
        merged.insert(name, schema, required_somewhere && !seen_as_null);
    }
    merged
}

fn alternatives(samples: &[Schema]) -> Schema {
    let mut distinct: Vec<Schema> = Vec::new();
    for sample in samples {
        let options: &[Schema] = match sample {
            Schema::Alternatives(nested) => nested,
            single => std::slice::from_ref(single),
        };
        for option in options {
            if !distinct.contains(option) {
                distinct.push(option.clone());
            }
        }
    }
    Schema::Alternatives(distinct)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthesis::inference::infer_schema;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::collections::BTreeSet;
    use trawl_domain::StringFormat;

    fn object(value: serde_json::Value) -> Schema {
        infer_schema(&value)
    }

    fn names(schema: &Schema) -> (BTreeSet<String>, BTreeSet<String>) {
        let object = schema.as_object().cloned().unwrap_or_default();
        (
            object.properties().keys().cloned().collect(),
            object.required().iter().cloned().collect(),
        )
    }

    #[test]
    fn test_single_sample_unchanged() {
        let schema = object(json!({ "a": 1, "b": [true] }));
        assert_eq!(merge_schemas(std::slice::from_ref(&schema)), Some(schema));
        assert_eq!(merge_schemas(&[]), None);
    }

    #[test]
    fn test_merge_is_idempotent() {
        let schema = object(json!({ "a": 1, "b": null, "c": { "d": "x" } }));
        let once = merge_schemas(std::slice::from_ref(&schema));
        let twice = merge_schemas(&[schema.clone(), schema]);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_object_union_is_commutative() {
        let a = object(json!({ "id": 1, "name": "Ann" }));
        let b = object(json!({ "id": 2, "email": "b@x.io", "name": null }));

        let ab = merge_schemas(&[a.clone(), b.clone()]).unwrap_or(Schema::Null);
        let ba = merge_schemas(&[b, a]).unwrap_or(Schema::Null);
        assert_eq!(names(&ab), names(&ba));
    }

    #[test]
    fn test_required_is_permissive_union() {
        let a = object(json!({ "id": 1 }));
        let b = object(json!({ "id": 2, "extra": true }));
        let merged = merge_schemas(&[a, b]).unwrap_or(Schema::Null);
        let (properties, required) = names(&merged);

        assert_eq!(properties, BTreeSet::from(["extra".to_string(), "id".to_string()]));
        assert_eq!(required, properties);
    }

    #[test]
    fn test_null_sample_makes_property_optional_and_nullable() {
        let a = object(json!({ "id": 42, "name": "Ann" }));
        let b = object(json!({ "id": 7, "name": null }));
        let merged = merge_schemas(&[a, b]).unwrap_or(Schema::Null);
        let object = merged.as_object().cloned().unwrap_or_default();

        assert_eq!(object.property("name"), Some(&Schema::nullable_string()));
        assert!(!object.is_required("name"));
        assert!(object.is_required("id"));
    }

    #[test]
    fn test_disagreeing_kinds_become_alternatives() {
        let merged = merge_schemas(&[
            Schema::Integer,
            Schema::string(),
            Schema::Integer,
            Schema::Boolean,
        ]);
        assert_eq!(
            merged,
            Some(Schema::Alternatives(vec![
                Schema::Integer,
                Schema::string(),
                Schema::Boolean
            ]))
        );
    }

    #[test]
    fn test_same_scalar_kind_keeps_first() {
        let merged = merge_schemas(&[
            Schema::formatted(StringFormat::Date),
            Schema::string(),
        ]);
        assert_eq!(merged, Some(Schema::formatted(StringFormat::Date)));

        let arrays = merge_schemas(&[
            Schema::array(Schema::Integer),
            Schema::array(Schema::string()),
        ]);
        assert_eq!(arrays, Some(Schema::array(Schema::Integer)));
    }

    #[test]
    fn test_nested_objects_merge_recursively() {
        let a = object(json!({ "user": { "id": 1 } }));
        let b = object(json!({ "user": { "id": 2, "role": "admin" } }));
        let merged = merge_schemas(&[a, b]).unwrap_or(Schema::Null);
        let user = merged
            .as_object()
            .and_then(|o| o.property("user"))
            .cloned()
            .unwrap_or(Schema::Null);
        let (properties, _) = names(&user);
        assert_eq!(properties, BTreeSet::from(["id".to_string(), "role".to_string()]));
    }

    #[test]
    fn test_inputs_are_not_mutated() {
        let a = object(json!({ "id": 1 }));
        let b = object(json!({ "name": "x" }));
        let before = (a.clone(), b.clone());
        let _ = merge_schemas(&[a.clone(), b.clone()]);
        assert_eq!((a, b), before);
    }
}
