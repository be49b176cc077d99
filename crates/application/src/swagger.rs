//! Conversions between Swagger 2.0 and `OpenAPI` 3.0 documents.
//!
//! Upgrading is used when merging foreign documents; downgrading renders a
//! synthesized document for consumers that only read 2.0.

use serde::Serialize;
use serde_json::{Map, Value, json};
use tracing::debug;
use trawl_domain::{
    MediaType, OPENAPI_VERSION, OpenApiDocument, Operation, Parameter,
    ParameterLocation, ReferenceOr, RequestBody, Response, SpecVersion,
};
use url::Url;

/// Top-level keys that only exist in Swagger 2.0 documents.
pub const SWAGGER_ONLY_FIELDS: &[&str] = &[
    "swagger",
    "host",
    "basePath",
    "schemes",
    "definitions",
    "consumes",
    "produces",
    "securityDefinitions",
];

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";
const MULTIPART: &str = "multipart/form-data";

/// Returns true if `raw` declares a 3.x `openapi` version.
#[must_use]
pub fn is_openapi3(raw: &Value) -> bool {
    raw.get("openapi")
        .and_then(Value::as_str)
        .is_some_and(|version| version.starts_with("3."))
}

/// Returns true if `raw` is a well-formed Swagger 2.0 document.
#[must_use]
pub fn is_swagger2(raw: &Value) -> bool {
    let version = raw.get("swagger").and_then(Value::as_str);
    matches!(version, Some("2.0"))
        && raw.get("info").is_some_and(Value::is_object)
        && raw.get("paths").is_some_and(Value::is_object)
}

/// Upgrades a Swagger 2.0 document to `OpenAPI` 3.0.
///
/// `host`, `basePath` and `schemes` become `servers`, `definitions` becomes
/// `components.schemas` and `securityDefinitions` becomes
/// `components.securitySchemes`. Paths, tags and info are carried over.
/// Returns `None` if `raw` is not a well-formed 2.0 document.
#[must_use]
pub fn upgrade(raw: &Value) -> Option<OpenApiDocument> {
    if !is_swagger2(raw) {
        return None;
    }
    let mut fields = raw.as_object()?.clone();

    let servers = upgrade_servers(&fields);
    let definitions = fields.shift_remove("definitions");
    let security = fields.shift_remove("securityDefinitions");
    for key in SWAGGER_ONLY_FIELDS {
        fields.shift_remove(*key);
    }
    if let Some(paths) = fields.get_mut("paths") {
        rewrite_references(paths, "#/definitions/", "#/components/schemas/");
    }

    let mut components = fields
        .shift_remove("components")
        .and_then(|value| value.as_object().cloned())
        .unwrap_or_default();
    if let Some(definitions) = definitions {
        components.insert("schemas".to_string(), definitions);
    }
    if let Some(security) = security {
        components.insert("securitySchemes".to_string(), security);
    }

    fields.insert("openapi".to_string(), json!(OPENAPI_VERSION));
    fields.insert("servers".to_string(), Value::Array(servers));
    fields.insert("components".to_string(), Value::Object(components));

    let upgraded = serde_json::from_value(Value::Object(fields));
    if let Err(error) = &upgraded {
        debug!(%error, "Swagger 2.0 document does not fit the 3.0 model");
    }
    upgraded.ok()
}

fn upgrade_servers(fields: &Map<String, Value>) -> Vec<Value> {
    let Some(host) = fields.get("host").and_then(Value::as_str) else {
        return Vec::new();
    };
    let base_path = fields.get("basePath").and_then(Value::as_str).unwrap_or_default();
    let schemes: Vec<&str> = fields
        .get("schemes")
        .and_then(Value::as_array)
        .map(|schemes| schemes.iter().filter_map(Value::as_str).collect())
        .filter(|schemes: &Vec<&str>| !schemes.is_empty())
        .unwrap_or_else(|| vec!["https"]);

    schemes
        .into_iter()
        .map(|scheme| json!({ "url": format!("{scheme}://{host}{base_path}") }))
        .collect()
}

/// Renders a 3.0 document as Swagger 2.0.
#[must_use]
pub fn downgrade(document: &OpenApiDocument) -> Value {
    let mut root = Map::new();
    root.insert("swagger".to_string(), json!("2.0"));
    root.insert("info".to_string(), to_value(&document.info));

    if let Some(server) = document.servers.first() {
        match Url::parse(&server.url) {
            Ok(url) => {
                let host = match (url.host_str(), url.port()) {
                    (Some(host), Some(port)) => format!("{host}:{port}"),
                    (Some(host), None) => host.to_string(),
                    (None, _) => String::new(),
                };
                if !host.is_empty() {
                    root.insert("host".to_string(), json!(host));
                }
                let base_path = url.path().trim_end_matches('/');
                if !base_path.is_empty() {
                    root.insert("basePath".to_string(), json!(base_path));
                }
                root.insert("schemes".to_string(), json!([url.scheme()]));
            }
            Err(_) if server.url.starts_with('/') => {
                root.insert("basePath".to_string(), json!(server.url));
            }
            Err(_) => {}
        }
    }

    let mut consumes: Vec<String> = Vec::new();
    let mut produces: Vec<String> = Vec::new();
    let mut paths = Map::new();
    for (path, item) in &document.paths {
        let mut converted = Map::new();
        for (method, operation) in item.operations() {
            let (value, op_consumes, op_produces) = downgrade_operation(operation);
            push_distinct(&mut consumes, op_consumes);
            push_distinct(&mut produces, op_produces);
            converted.insert(method.path_item_key().to_string(), value);
        }
        if !item.parameters.is_empty() {
            let shared: Vec<Value> = item.parameters.iter().map(downgrade_parameter).collect();
            converted.insert("parameters".to_string(), Value::Array(shared));
        }
        for (key, value) in &item.extensions {
            converted.entry(key.clone()).or_insert_with(|| value.clone());
        }
        paths.insert(path.clone(), Value::Object(converted));
    }
    for (key, value) in &document.paths.extensions {
        paths.entry(key.clone()).or_insert_with(|| value.clone());
    }

    if !consumes.is_empty() {
        root.insert("consumes".to_string(), json!(consumes));
    }
    if !produces.is_empty() {
        root.insert("produces".to_string(), json!(produces));
    }
    if !document.tags.is_empty() {
        root.insert("tags".to_string(), to_value(&document.tags));
    }
    root.insert("paths".to_string(), Value::Object(paths));
    if !document.components.schemas.is_empty() {
        root.insert("definitions".to_string(), to_value(&document.components.schemas));
    }
    if !document.components.security_schemes.is_empty() {
        root.insert(
            "securityDefinitions".to_string(),
            to_value(&document.components.security_schemes),
        );
    }
    for (key, value) in &document.extensions {
        root.entry(key.clone()).or_insert_with(|| value.clone());
    }

    let mut rendered = Value::Object(root);
    rewrite_schema_keywords(&mut rendered);
    rewrite_references(&mut rendered, "#/components/schemas/", "#/definitions/");
    rendered
}

/// Returns the operation value plus the media types it consumes and produces.
fn downgrade_operation(operation: &Operation) -> (Value, Vec<String>, Vec<String>) {
    let mut converted = Map::new();
    if !operation.tags.is_empty() {
        converted.insert("tags".to_string(), json!(operation.tags));
    }
    if let Some(summary) = &operation.summary {
        converted.insert("summary".to_string(), json!(summary));
    }
    if let Some(description) = &operation.description {
        converted.insert("description".to_string(), json!(description));
    }
    if let Some(id) = &operation.operation_id {
        converted.insert("operationId".to_string(), json!(id));
    }

    let mut parameters: Vec<Value> = operation.parameters.iter().map(downgrade_parameter).collect();
    let mut consumes: Vec<String> = Vec::new();
    match &operation.request_body {
        Some(ReferenceOr::Item(body)) => {
            consumes = body.content.keys().cloned().collect();
            parameters.extend(body_parameters(body));
        }
        Some(ReferenceOr::Reference { reference }) => {
            parameters.push(json!({ "name": "body", "in": "body", "schema": { "$ref": reference } }));
        }
        None => {}
    }
    if !parameters.is_empty() {
        converted.insert("parameters".to_string(), Value::Array(parameters));
    }
    if !consumes.is_empty() {
        converted.insert("consumes".to_string(), json!(consumes));
    }

    let mut produces: Vec<String> = Vec::new();
    let mut responses = Map::new();
    for (code, response) in &operation.responses {
        let value = match response {
            ReferenceOr::Item(response) => {
                push_distinct(&mut produces, response.content.keys().cloned().collect());
                downgrade_response(response)
            }
            ReferenceOr::Reference { reference } => json!({ "$ref": reference }),
        };
        responses.insert(code.clone(), value);
    }
    for (key, value) in &operation.responses.extensions {
        responses.entry(key.clone()).or_insert_with(|| value.clone());
    }
    if !produces.is_empty() {
        converted.insert("produces".to_string(), json!(produces));
    }
    converted.insert("responses".to_string(), Value::Object(responses));

    for (key, value) in &operation.extensions {
        converted.entry(key.clone()).or_insert_with(|| value.clone());
    }
    (Value::Object(converted), consumes, produces)
}

fn downgrade_parameter(parameter: &ReferenceOr<Parameter>) -> Value {
    let parameter = match parameter {
        ReferenceOr::Item(parameter) => parameter,
        ReferenceOr::Reference { reference } => return json!({ "$ref": reference }),
    };

    let mut converted = Map::new();
    converted.insert("name".to_string(), json!(parameter.name));
    converted.insert("in".to_string(), json!(parameter.location.as_str()));
    if let Some(description) = &parameter.description {
        converted.insert("description".to_string(), json!(description));
    }
    converted.insert("required".to_string(), json!(parameter.required));

    let schema = parameter.schema.as_ref().and_then(Value::as_object);
    if parameter.location == ParameterLocation::Body {
        if let Some(schema) = schema {
            converted.insert("schema".to_string(), Value::Object(schema.clone()));
        }
    } else {
        // 2.0 non-body parameters carry their type inline.
        if let Some(fields) = schema {
            let kind = fields.get("type").cloned().unwrap_or_else(|| json!("string"));
            converted.insert("type".to_string(), kind);
            for key in ["format", "items", "enum"] {
                if let Some(value) = fields.get(key) {
                    converted.insert(key.to_string(), value.clone());
                }
            }
        } else if !parameter.extensions.contains_key("type") {
            converted.insert("type".to_string(), json!("string"));
        }
    }
    if let Some(example) = &parameter.example {
        converted.insert("x-example".to_string(), example.clone());
    }
    for (key, value) in &parameter.extensions {
        converted.entry(key.clone()).or_insert_with(|| value.clone());
    }
    Value::Object(converted)
}

/// A `body` parameter, or `formData` parameters for form payloads.
fn body_parameters(body: &RequestBody) -> Vec<Value> {
    let form = body
        .content
        .iter()
        .find(|(content_type, _)| *content_type == FORM_URLENCODED || *content_type == MULTIPART);
    if let Some((_, media)) = form {
        if body.content.len() == 1 {
            return form_parameters(media);
        }
    }

    let Some(media) = body.content.values().next() else {
        return Vec::new();
    };
    let mut parameter = json!({ "name": "body", "in": "body", "required": body.required });
    if let Some(schema) = &media.schema {
        parameter["schema"] = schema.clone();
    }
    if let Some(description) = &body.description {
        parameter["description"] = json!(description);
    }
    vec![parameter]
}

fn form_parameters(media: &MediaType) -> Vec<Value> {
    let Some(schema) = media.schema.as_ref() else {
        return Vec::new();
    };
    let required: Vec<&str> = schema
        .get("required")
        .and_then(Value::as_array)
        .map(|names| names.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();
    let Some(properties) = schema.get("properties").and_then(Value::as_object) else {
        return Vec::new();
    };

    properties
        .iter()
        .map(|(name, property)| {
            let kind = property.get("type").cloned().unwrap_or_else(|| json!("string"));
            json!({
                "name": name,
                "in": "formData",
                "required": required.contains(&name.as_str()),
                "type": kind,
            })
        })
        .collect()
}

fn downgrade_response(response: &Response) -> Value {
    let mut converted = Map::new();
    converted.insert("description".to_string(), json!(response.description));

    if let Some(schema) = response.content.values().find_map(|media| media.schema.clone()) {
        converted.insert("schema".to_string(), schema);
    }

    let examples: Map<String, Value> = response
        .content
        .iter()
        .filter_map(|(content_type, media)| {
            media.example.clone().map(|example| (content_type.clone(), example))
        })
        .collect();
    if !examples.is_empty() {
        converted.insert("examples".to_string(), Value::Object(examples));
    }

    if !response.headers.is_empty() {
        let headers: Map<String, Value> = response
            .headers
            .iter()
            .map(|(name, header)| (name.clone(), downgrade_header(header)))
            .collect();
        converted.insert("headers".to_string(), Value::Object(headers));
    }

    for (key, value) in &response.extensions {
        converted.entry(key.clone()).or_insert_with(|| value.clone());
    }
    Value::Object(converted)
}

fn downgrade_header(header: &Value) -> Value {
    let mut converted = Map::new();
    if let Some(description) = header.get("description") {
        converted.insert("description".to_string(), description.clone());
    }
    let kind = header
        .pointer("/schema/type")
        .cloned()
        .unwrap_or_else(|| json!("string"));
    converted.insert("type".to_string(), kind);
    if let Some(example) = header.get("example") {
        converted.insert("x-example".to_string(), example.clone());
    }
    Value::Object(converted)
}

/// Rewrites 3.0-only schema keywords into their 2.0 spelling, in place.
///
/// `nullable` becomes `x-nullable` and `oneOf` becomes `x-oneOf`.
fn rewrite_schema_keywords(value: &mut Value) {
    match value {
        Value::Object(fields) => {
            if fields.get("nullable").is_some_and(Value::is_boolean) {
                if let Some(nullable) = fields.shift_remove("nullable") {
                    fields.insert("x-nullable".to_string(), nullable);
                }
            }
            if fields.get("oneOf").is_some_and(Value::is_array) {
                if let Some(alternatives) = fields.shift_remove("oneOf") {
                    fields.insert("x-oneOf".to_string(), alternatives);
                }
            }
            fields.values_mut().for_each(rewrite_schema_keywords);
        }
        Value::Array(items) => items.iter_mut().for_each(rewrite_schema_keywords),
        _ => {}
    }
}

/// Repoints every `$ref` starting with `from` to `to`, in place.
fn rewrite_references(value: &mut Value, from: &str, to: &str) {
    match value {
        Value::Object(fields) => {
            if let Some(Value::String(reference)) = fields.get_mut("$ref") {
                if let Some(name) = reference.strip_prefix(from) {
                    *reference = format!("{to}{name}");
                }
            }
            fields
                .values_mut()
                .for_each(|nested| rewrite_references(nested, from, to));
        }
        Value::Array(items) => items
            .iter_mut()
            .for_each(|nested| rewrite_references(nested, from, to)),
        _ => {}
    }
}

fn push_distinct(target: &mut Vec<String>, values: Vec<String>) {
    for value in values {
        if !target.contains(&value) {
            target.push(value);
        }
    }
}

fn to_value<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

/// A document in the shape requested by [`SpecVersion`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RenderedDocument {
    /// `OpenAPI` 3.0.
    OpenApi3(OpenApiDocument),
    /// Swagger 2.0.
    Swagger2(Value),
}

/// Renders `document` for `target`.
#[must_use]
pub fn render(document: &OpenApiDocument, target: SpecVersion) -> RenderedDocument {
    match target {
        SpecVersion::OpenApi3 => RenderedDocument::OpenApi3(document.clone()),
        SpecVersion::Swagger2 => RenderedDocument::Swagger2(downgrade(document)),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::synthesis::DocumentBuilder;
    use pretty_assertions::assert_eq;
    use trawl_domain::{ExchangeRecord, GenerationOptions, HttpMethod};

    fn swagger_methods(path_item: &Value) -> Vec<HttpMethod> {
        HttpMethod::all()
            .iter()
            .copied()
            .filter(|method| path_item.get(method.path_item_key()).is_some())
            .collect()
    }

    fn petstore() -> Value {
        json!({
            "swagger": "2.0",
            "info": { "title": "Petstore", "version": "1.0" },
            "host": "petstore.io",
            "basePath": "/v2",
            "schemes": ["https", "http"],
            "consumes": ["application/json"],
            "tags": [ { "name": "pet" } ],
            "paths": {
                "/pet/{petId}": {
                    "get": {
                        "tags": ["pet"],
                        "parameters": [
                            { "name": "petId", "in": "path", "required": true, "type": "integer" }
                        ],
                        "responses": { "200": { "description": "ok", "schema": { "$ref": "#/definitions/Pet" } } }
                    }
                }
            },
            "definitions": { "Pet": { "type": "object" } },
            "securityDefinitions": { "key": { "type": "apiKey", "name": "k", "in": "header" } }
        })
    }

    #[test]
    fn test_upgrade_maps_servers_and_components() {
        let document = upgrade(&petstore()).unwrap();

        assert_eq!(document.openapi, OPENAPI_VERSION);
        let urls: Vec<&str> = document.servers.iter().map(|s| s.url.as_str()).collect();
        assert_eq!(urls, vec!["https://petstore.io/v2", "http://petstore.io/v2"]);
        assert_eq!(document.components.schemas["Pet"], json!({ "type": "object" }));
        assert!(document.components.security_schemes.contains_key("key"));
        let get = document.operation("/pet/{petId}", HttpMethod::Get).unwrap();
        let ok = get.responses["200"].as_item().unwrap();
        assert_eq!(ok.extensions["schema"]["$ref"], "#/components/schemas/Pet");

        let value = serde_json::to_value(&document).unwrap();
        for key in SWAGGER_ONLY_FIELDS {
            assert!(value.get(key).is_none(), "{key} should be stripped");
        }
    }

    #[test]
    fn test_upgrade_defaults_scheme_to_https() {
        let mut raw = petstore();
        raw.as_object_mut().unwrap().remove("schemes");
        raw.as_object_mut().unwrap().remove("basePath");
        let document = upgrade(&raw).unwrap();
        assert_eq!(document.servers[0].url, "https://petstore.io");
    }

    #[test]
    fn test_upgrade_rejects_malformed() {
        assert!(upgrade(&json!({ "swagger": "2.0", "info": {} })).is_none());
        assert!(upgrade(&json!({ "swagger": "1.2", "info": {}, "paths": {} })).is_none());
        assert!(upgrade(&json!({ "openapi": "3.0.0" })).is_none());
    }

    #[test]
    fn test_downgrade_synthesized_document() {
        let records = vec![
            ExchangeRecord::new("POST", "https://api.x.com:8443/v1/users?dry=true", 201)
                .with_request_body(json!({ "name": "Ann", "nick": null }))
                .with_response_header("Content-Type", "application/json")
                .with_response_body(json!({ "id": 1 })),
        ];
        let options = GenerationOptions::default().with_server_url("https://api.x.com:8443/v1");
        let document = DocumentBuilder::new(options).build(&records).unwrap().document;

        let swagger = downgrade(&document);
        assert_eq!(swagger["swagger"], "2.0");
        assert_eq!(swagger["host"], "api.x.com:8443");
        assert_eq!(swagger["basePath"], "/v1");
        assert_eq!(swagger["schemes"], json!(["https"]));
        assert!(swagger.get("openapi").is_none());
        assert!(swagger.get("components").is_none());

        let post = &swagger["paths"]["/v1/users"]["post"];
        assert_eq!(swagger_methods(&swagger["paths"]["/v1/users"]), vec![HttpMethod::Post]);
        assert!(post.get("requestBody").is_none());
        assert_eq!(post["consumes"], json!(["application/json"]));

        let parameters = post["parameters"].as_array().unwrap();
        let dry = parameters.iter().find(|p| p["name"] == "dry").unwrap();
        assert_eq!(dry["type"], "boolean");
        assert!(dry.get("schema").is_none());

        let body = parameters.iter().find(|p| p["in"] == "body").unwrap();
        assert_eq!(body["schema"]["properties"]["nick"]["x-nullable"], true);

        let created = &post["responses"]["201"];
        assert_eq!(created["description"], "Created");
        assert_eq!(created["schema"]["type"], "object");
        assert_eq!(created["headers"]["content-type"]["type"], "string");
        assert!(created.get("content").is_none());
    }

    #[test]
    fn test_downgrade_form_body_as_form_data() {
        let record = ExchangeRecord::new("POST", "https://a.io/login", 200)
            .with_request_header("Content-Type", "application/x-www-form-urlencoded")
            .with_request_body("user=ann&remember=1");
        let document = DocumentBuilder::new(GenerationOptions::default())
            .build(&[record])
            .unwrap()
            .document;

        let swagger = downgrade(&document);
        let parameters = swagger["paths"]["/login"]["post"]["parameters"].as_array().unwrap();
        let form: Vec<&str> = parameters
            .iter()
            .filter(|p| p["in"] == "formData")
            .filter_map(|p| p["name"].as_str())
            .collect();
        assert_eq!(form, vec!["user", "remember"]);
    }

    #[test]
    fn test_downgrade_rewrites_component_references() {
        let mut document = upgrade(&petstore()).unwrap();
        document.servers.clear();
        let swagger = downgrade(&document);
        assert_eq!(
            swagger["paths"]["/pet/{petId}"]["get"]["responses"]["200"]["schema"]["$ref"],
            "#/definitions/Pet"
        );
        assert_eq!(swagger["definitions"]["Pet"], json!({ "type": "object" }));
        assert!(swagger.get("host").is_none());

        let pet_id = &swagger["paths"]["/pet/{petId}"]["get"]["parameters"][0];
        assert_eq!(pet_id["type"], "integer");
    }

    #[test]
    fn test_downgrade_keeps_extension_keys() {
        let mut document = upgrade(&petstore()).unwrap();
        document.paths.extensions.insert("x-internal".to_string(), json!(true));
        let item = document.paths.get_mut("/pet/{petId}").unwrap();
        let get = item.get.as_mut().unwrap();
        get.responses.extensions.insert("x-note".to_string(), json!("hi"));

        let swagger = downgrade(&document);
        assert_eq!(swagger["paths"]["x-internal"], true);
        assert_eq!(swagger["paths"]["/pet/{petId}"]["get"]["responses"]["x-note"], "hi");
    }

    #[test]
    fn test_render_targets() {
        let document = OpenApiDocument::new(trawl_domain::Info::new("A", "1"));
        assert!(matches!(
            render(&document, SpecVersion::OpenApi3),
            RenderedDocument::OpenApi3(_)
        ));
        let RenderedDocument::Swagger2(value) = render(&document, SpecVersion::Swagger2) else {
            unreachable!("swagger rendering expected");
        };
        assert_eq!(value["swagger"], "2.0");
    }
}
