//! YAML serialization helpers.

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::SerializationError;

/// Serializes a value to YAML.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_yaml<T: Serialize>(value: &T) -> Result<String, SerializationError> {
    serde_yaml::to_string(value).map_err(SerializationError::YamlEncode)
}

/// Deserializes YAML from a string.
///
/// # Errors
///
/// Returns an error if the YAML is invalid or doesn't match the expected type.
pub fn from_yaml<T: DeserializeOwned>(yaml: &str) -> Result<T, SerializationError> {
    serde_yaml::from_str(yaml).map_err(SerializationError::YamlDecode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    #[test]
    fn test_yaml_round_trips_json_tree() {
        let value = json!({
            "openapi": "3.0.3",
            "paths": { "/users/{id}": { "get": { "responses": { "200": { "description": "OK" } } } } },
            "list": [1, 2.5, true, null, "yes", "2024-01-01"],
        });
        let yaml = to_yaml(&value).expect("serialization should work");
        let restored: Value = from_yaml(&yaml).expect("deserialization should work");
        assert_eq!(restored, value);
    }

    #[test]
    fn test_status_code_keys_stay_strings() {
        let value = json!({ "200": "ok", "404": "missing" });
        let yaml = to_yaml(&value).expect("serialization should work");
        let restored: Value = from_yaml(&yaml).expect("deserialization should work");
        assert_eq!(restored, value);
    }

    #[test]
    fn test_invalid_yaml() {
        let result: Result<Value, _> = from_yaml("key: [unclosed");
        assert!(matches!(result, Err(SerializationError::YamlDecode(_))));
    }
}
