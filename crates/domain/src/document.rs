//! `OpenAPI` 3.0 document model.
//!
//! The structs cover the parts of a document the engine reads or writes.
//! Every object keeps the keys it does not model in a flattened
//! `extensions` map, so documents loaded from elsewhere survive a
//! deserialize/serialize cycle without losing fields.

use std::ops::{Deref, DerefMut};

use indexmap::IndexMap;
use serde::de::{DeserializeOwned, Error as _};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::request::HttpMethod;

/// `openapi` version emitted for synthesized and merged documents.
pub const OPENAPI_VERSION: &str = "3.0.3";

/// Tag applied when a record carries no usable grouping tag.
pub const UNGROUPED_TAG: &str = "ungrouped";

/// Unmodelled keys of an `OpenAPI` object.
pub type Extensions = IndexMap<String, Value>;

/// A keyed map that also admits `x-*` specification extensions beside its
/// entries, as the Paths and Responses objects do.
///
/// Derefs to the typed entries; extension keys live in `extensions`.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtensibleMap<T> {
    entries: IndexMap<String, T>,
    /// `x-*` keys found beside the entries.
    pub extensions: Extensions,
}

/// Path templates mapped to their path items.
pub type Paths = ExtensibleMap<PathItem>;

/// Status codes mapped to their responses.
pub type Responses = ExtensibleMap<ReferenceOr<Response>>;

impl<T> ExtensibleMap<T> {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
            extensions: Extensions::new(),
        }
    }
}

impl<T> Default for ExtensibleMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Deref for ExtensibleMap<T> {
    type Target = IndexMap<String, T>;

    fn deref(&self) -> &Self::Target {
        &self.entries
    }
}

impl<T> DerefMut for ExtensibleMap<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.entries
    }
}

impl<'a, T> IntoIterator for &'a ExtensibleMap<T> {
    type Item = (&'a String, &'a T);
    type IntoIter = indexmap::map::Iter<'a, String, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<T> FromIterator<(String, T)> for ExtensibleMap<T> {
    fn from_iter<I: IntoIterator<Item = (String, T)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
            extensions: Extensions::new(),
        }
    }
}

impl<T: Serialize> Serialize for ExtensibleMap<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len() + self.extensions.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        for (key, value) in &self.extensions {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for ExtensibleMap<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = IndexMap::<String, Value>::deserialize(deserializer)?;
        let mut map = Self::new();
        for (key, value) in raw {
            if key.starts_with("x-") {
                map.extensions.insert(key, value);
                continue;
            }
            let entry = serde_json::from_value(value)
                .map_err(|e| D::Error::custom(format!("`{key}`: {e}")))?;
            map.entries.insert(key, entry);
        }
        Ok(map)
    }
}

/// Top-level `OpenAPI` 3.x document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenApiDocument {
    /// Specification version (`3.0.x`).
    pub openapi: String,
    /// API metadata.
    pub info: Info,
    /// Server base URLs.
    #[serde(default)]
    pub servers: Vec<Server>,
    /// Declared tags.
    #[serde(default)]
    pub tags: Vec<Tag>,
    /// Path templates mapped to their operations.
    #[serde(default)]
    pub paths: Paths,
    /// Reusable components.
    #[serde(default)]
    pub components: Components,
    /// Unmodelled top-level keys.
    #[serde(flatten)]
    pub extensions: Extensions,
}

impl OpenApiDocument {
    /// Creates an empty document with the given metadata.
    #[must_use]
    pub fn new(info: Info) -> Self {
        Self {
            openapi: OPENAPI_VERSION.to_string(),
            info,
            servers: Vec::new(),
            tags: Vec::new(),
            paths: Paths::new(),
            components: Components::default(),
            extensions: Extensions::new(),
        }
    }

    /// Iterates over every `(path, method, operation)` triple.
    pub fn operations(&self) -> impl Iterator<Item = (&str, HttpMethod, &Operation)> {
        self.paths.iter().flat_map(|(path, item)| {
            item.operations()
                .map(move |(method, operation)| (path.as_str(), method, operation))
        })
    }

    /// Returns the operation at `path`/`method`.
    #[must_use]
    pub fn operation(&self, path: &str, method: HttpMethod) -> Option<&Operation> {
        self.paths.get(path).and_then(|item| item.operation(method))
    }

    /// Operation tags that have no entry in the top-level `tags` list.
    #[must_use]
    pub fn undeclared_tags(&self) -> Vec<String> {
        let mut missing: Vec<String> = Vec::new();
        for (_, _, operation) in self.operations() {
            for tag in &operation.tags {
                let declared = self.tags.iter().any(|t| &t.name == tag);
                if !declared && !missing.contains(tag) {
                    missing.push(tag.clone());
                }
            }
        }
        missing
    }
}

/// API metadata.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Info {
    /// API title.
    #[serde(default)]
    pub title: String,
    /// API version.
    #[serde(default)]
    pub version: String,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Unmodelled keys.
    #[serde(flatten)]
    pub extensions: Extensions,
}

impl Info {
    /// Creates metadata with a title and version.
    #[must_use]
    pub fn new(title: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            version: version.into(),
            description: None,
            extensions: Extensions::new(),
        }
    }
}

/// Server entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Server {
    /// Base URL.
    pub url: String,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Unmodelled keys.
    #[serde(flatten)]
    pub extensions: Extensions,
}

impl Server {
    /// Creates a server entry for `url`.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            description: None,
            extensions: Extensions::new(),
        }
    }
}

/// Declared tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Tag name.
    pub name: String,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Unmodelled keys.
    #[serde(flatten)]
    pub extensions: Extensions,
}

impl Tag {
    /// Creates a tag with a description.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: Some(description.into()),
            extensions: Extensions::new(),
        }
    }
}

/// A `$ref` or an inline object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReferenceOr<T> {
    /// Reference to a component.
    Reference {
        /// JSON pointer of the referenced component.
        #[serde(rename = "$ref")]
        reference: String,
    },
    /// Inline object.
    Item(T),
}

impl<T> ReferenceOr<T> {
    /// Returns the inline object, if any.
    #[must_use]
    pub const fn as_item(&self) -> Option<&T> {
        match self {
            Self::Item(item) => Some(item),
            Self::Reference { .. } => None,
        }
    }
}

/// Operations available on one path template.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PathItem {
    /// Summary shared by all operations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Description shared by all operations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// GET operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub get: Option<Operation>,
    /// PUT operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub put: Option<Operation>,
    /// POST operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post: Option<Operation>,
    /// DELETE operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete: Option<Operation>,
    /// OPTIONS operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Operation>,
    /// HEAD operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head: Option<Operation>,
    /// PATCH operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patch: Option<Operation>,
    /// TRACE operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace: Option<Operation>,
    /// Parameters shared by all operations.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ReferenceOr<Parameter>>,
    /// Unmodelled keys.
    #[serde(flatten)]
    pub extensions: Extensions,
}

impl PathItem {
    /// Returns the slot holding the operation for `method`.
    pub fn slot_mut(&mut self, method: HttpMethod) -> &mut Option<Operation> {
        match method {
            HttpMethod::Get => &mut self.get,
            HttpMethod::Put => &mut self.put,
            HttpMethod::Post => &mut self.post,
            HttpMethod::Delete => &mut self.delete,
            HttpMethod::Options => &mut self.options,
            HttpMethod::Head => &mut self.head,
            HttpMethod::Patch => &mut self.patch,
            HttpMethod::Trace => &mut self.trace,
        }
    }

    /// Returns the operation for `method`.
    #[must_use]
    pub const fn operation(&self, method: HttpMethod) -> Option<&Operation> {
        let slot = match method {
            HttpMethod::Get => &self.get,
            HttpMethod::Put => &self.put,
            HttpMethod::Post => &self.post,
            HttpMethod::Delete => &self.delete,
            HttpMethod::Options => &self.options,
            HttpMethod::Head => &self.head,
            HttpMethod::Patch => &self.patch,
            HttpMethod::Trace => &self.trace,
        };
        slot.as_ref()
    }

    /// Stores `operation` under `method`, replacing any previous one.
    pub fn set_operation(&mut self, method: HttpMethod, operation: Operation) {
        *self.slot_mut(method) = Some(operation);
    }

    /// Iterates over the defined operations in method order.
    pub fn operations(&self) -> impl Iterator<Item = (HttpMethod, &Operation)> {
        HttpMethod::all()
            .iter()
            .filter_map(|method| self.operation(*method).map(|op| (*method, op)))
    }
}

/// One `(path, method)` endpoint.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    /// Grouping tags.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Short summary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Long description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Unique operation id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    /// Operation parameters.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ReferenceOr<Parameter>>,
    /// Request body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_body: Option<ReferenceOr<RequestBody>>,
    /// Responses keyed by status code.
    #[serde(default)]
    pub responses: Responses,
    /// Unmodelled keys.
    #[serde(flatten)]
    pub extensions: Extensions,
}

/// Where a parameter is carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParameterLocation {
    /// Query string.
    Query,
    /// Path segment.
    Path,
    /// Request header.
    Header,
    /// Cookie.
    Cookie,
    /// Swagger 2.0 body parameter.
    Body,
    /// Swagger 2.0 form field.
    FormData,
}

impl ParameterLocation {
    /// Returns the `in` keyword value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Path => "path",
            Self::Header => "header",
            Self::Cookie => "cookie",
            Self::Body => "body",
            Self::FormData => "formData",
        }
    }
}

/// Operation parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name.
    pub name: String,
    /// Parameter location.
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    /// Human-readable description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether the parameter must be present.
    #[serde(default)]
    pub required: bool,
    /// Value schema.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,
    /// Example value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,
    /// Unmodelled keys.
    #[serde(flatten)]
    pub extensions: Extensions,
}

impl Parameter {
    /// Returns the `(location, name)` identity used for deduplication.
    #[must_use]
    pub fn key(&self) -> (ParameterLocation, &str) {
        (self.location, self.name.as_str())
    }
}

/// Request body.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RequestBody {
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Payload schemas keyed by media type.
    #[serde(default)]
    pub content: IndexMap<String, MediaType>,
    /// Whether a body must be sent.
    #[serde(default)]
    pub required: bool,
    /// Unmodelled keys.
    #[serde(flatten)]
    pub extensions: Extensions,
}

/// Response for one status code.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Response {
    /// Response description.
    #[serde(default)]
    pub description: String,
    /// Documented response headers.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub headers: IndexMap<String, Value>,
    /// Payload schemas keyed by media type.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub content: IndexMap<String, MediaType>,
    /// Unmodelled keys.
    #[serde(flatten)]
    pub extensions: Extensions,
}

/// Payload description for one media type.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MediaType {
    /// Payload schema.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,
    /// Example payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,
    /// Unmodelled keys.
    #[serde(flatten)]
    pub extensions: Extensions,
}

/// Reusable components, one map per category.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Components {
    /// `schemas`
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub schemas: IndexMap<String, Value>,
    /// `responses`
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub responses: IndexMap<String, Value>,
    /// `parameters`
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub parameters: IndexMap<String, Value>,
    /// `examples`
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub examples: IndexMap<String, Value>,
    /// `requestBodies`
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub request_bodies: IndexMap<String, Value>,
    /// `headers`
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub headers: IndexMap<String, Value>,
    /// `securitySchemes`
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub security_schemes: IndexMap<String, Value>,
    /// `links`
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub links: IndexMap<String, Value>,
    /// `callbacks`
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub callbacks: IndexMap<String, Value>,
    /// `pathItems`
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub path_items: IndexMap<String, Value>,
    /// Unmodelled keys.
    #[serde(flatten)]
    pub extensions: Extensions,
}

impl Components {
    /// Returns mutable access to every component category.
    pub fn categories_mut(&mut self) -> [&mut IndexMap<String, Value>; 10] {
        [
            &mut self.schemas,
            &mut self.responses,
            &mut self.parameters,
            &mut self.examples,
            &mut self.request_bodies,
            &mut self.headers,
            &mut self.security_schemes,
            &mut self.links,
            &mut self.callbacks,
            &mut self.path_items,
        ]
    }

    /// Returns the category maps in the same order as [`Components::categories_mut`].
    #[must_use]
    pub const fn categories(&self) -> [&IndexMap<String, Value>; 10] {
        [
            &self.schemas,
            &self.responses,
            &self.parameters,
            &self.examples,
            &self.request_bodies,
            &self.headers,
            &self.security_schemes,
            &self.links,
            &self.callbacks,
            &self.path_items,
        ]
    }

    /// Returns true if no category holds an entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories().iter().all(|category| category.is_empty()) && self.extensions.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_empty_document_keeps_components() {
        let document = OpenApiDocument::new(Info::new("API", "1.0.0"));
        let value = serde_json::to_value(&document).unwrap();
        assert_eq!(value["openapi"], "3.0.3");
        assert_eq!(value["components"], json!({}));
        assert_eq!(value["paths"], json!({}));
    }

    #[test]
    fn test_unknown_fields_survive_roundtrip() {
        let raw = json!({
            "openapi": "3.0.1",
            "info": { "title": "Pets", "version": "2", "x-logo": "logo.png" },
            "paths": {
                "/pets": {
                    "get": {
                        "deprecated": true,
                        "parameters": [ { "$ref": "#/components/parameters/Limit" } ],
                        "responses": { "200": { "description": "ok" } }
                    }
                }
            },
            "components": { "schemas": { "Pet": { "type": "object" } } },
            "security": [ { "key": [] } ]
        });

        let document: OpenApiDocument = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(document.info.extensions["x-logo"], "logo.png");
        assert_eq!(document.extensions["security"], raw["security"]);

        let get = document.operation("/pets", HttpMethod::Get).unwrap();
        assert_eq!(get.extensions["deprecated"], true);
        assert!(matches!(
            &get.parameters[0],
            ReferenceOr::Reference { reference } if reference == "#/components/parameters/Limit"
        ));

        let back = serde_json::to_value(&document).unwrap();
        assert_eq!(back["components"], raw["components"]);
        assert_eq!(back["paths"]["/pets"]["get"]["deprecated"], true);
    }

    #[test]
    fn test_extension_keys_in_paths_and_responses() {
        let raw = json!({
            "openapi": "3.0.3",
            "info": { "title": "A", "version": "1" },
            "paths": {
                "x-internal": true,
                "/a": {
                    "get": {
                        "responses": { "200": { "description": "ok" }, "x-note": "hi" }
                    }
                }
            }
        });

        let document: OpenApiDocument = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(document.paths.len(), 1);
        assert_eq!(document.paths.extensions["x-internal"], true);

        let get = document.operation("/a", HttpMethod::Get).unwrap();
        assert_eq!(get.responses.keys().collect::<Vec<_>>(), vec!["200"]);
        assert_eq!(get.responses.extensions["x-note"], "hi");

        assert_eq!(serde_json::to_value(&document).unwrap()["paths"], raw["paths"]);
    }

    #[test]
    fn test_non_extension_key_must_parse() {
        let raw = json!({
            "openapi": "3.0.3",
            "info": { "title": "A", "version": "1" },
            "paths": { "/a": { "get": { "responses": { "200": 5 } } } }
        });
        assert!(serde_json::from_value::<OpenApiDocument>(raw).is_err());
    }

    #[test]
    fn test_undeclared_tags() {
        let mut document = OpenApiDocument::new(Info::new("API", "1"));
        let mut item = PathItem::default();
        item.set_operation(
            HttpMethod::Get,
            Operation {
                tags: vec!["users".into(), "admin".into()],
                ..Operation::default()
            },
        );
        document.paths.insert("/users".into(), item);
        document.tags.push(Tag::new("users", "Users"));

        assert_eq!(document.undeclared_tags(), vec!["admin".to_string()]);
    }

    #[test]
    fn test_path_item_operation_order() {
        let mut item = PathItem::default();
        item.set_operation(HttpMethod::Delete, Operation::default());
        item.set_operation(HttpMethod::Get, Operation::default());
        let methods: Vec<HttpMethod> = item.operations().map(|(m, _)| m).collect();
        assert_eq!(methods, vec![HttpMethod::Get, HttpMethod::Delete]);
    }
}
