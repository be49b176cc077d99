//! Inferred JSON-Schema shapes.
//!
//! [`Schema`] is a closed variant describing the shape observed in captured
//! bodies and parameters. It renders to the `OpenAPI` 3.0 schema object
//! dialect through [`Schema::to_value`].

use indexmap::{IndexMap, IndexSet};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value, json};

/// Format tags detected on string values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StringFormat {
    /// ISO-8601 date-time.
    DateTime,
    /// Calendar date `YYYY-MM-DD`.
    Date,
    /// E-mail address.
    Email,
    /// Absolute http(s) URI.
    Uri,
    /// Canonical 8-4-4-4-12 UUID.
    Uuid,
}

impl StringFormat {
    /// Returns the `format` keyword value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DateTime => "date-time",
            Self::Date => "date",
            Self::Email => "email",
            Self::Uri => "uri",
            Self::Uuid => "uuid",
        }
    }
}

/// Top-level kind of a [`Schema`], used when merging samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaKind {
    /// `object`
    Object,
    /// `array`
    Array,
    /// `string`
    String,
    /// `number`
    Number,
    /// `integer`
    Integer,
    /// `boolean`
    Boolean,
    /// `null`
    Null,
    /// Incompatible alternatives.
    Alternatives,
}

/// Object schema: ordered properties plus the set of required names.
///
/// Every required name is also a property key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectSchema {
    properties: IndexMap<String, Schema>,
    required: IndexSet<String>,
}

impl ObjectSchema {
    /// Creates an object schema without properties.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a property.
    pub fn insert(&mut self, name: impl Into<String>, schema: Schema, required: bool) {
        let name = name.into();
        if required {
            self.required.insert(name.clone());
        } else {
            self.required.shift_remove(&name);
        }
        self.properties.insert(name, schema);
    }

    /// Builder form of [`ObjectSchema::insert`].
    #[must_use]
    pub fn with_property(mut self, name: impl Into<String>, schema: Schema, required: bool) -> Self {
        self.insert(name, schema, required);
        self
    }

    /// Property schemas in insertion order.
    #[must_use]
    pub const fn properties(&self) -> &IndexMap<String, Schema> {
        &self.properties
    }

    /// Required property names in insertion order.
    #[must_use]
    pub const fn required(&self) -> &IndexSet<String> {
        &self.required
    }

    /// Returns true if `name` is required.
    #[must_use]
    pub fn is_required(&self, name: &str) -> bool {
        self.required.contains(name)
    }

    /// Returns the property schema for `name`.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&Schema> {
        self.properties.get(name)
    }

    /// Returns the number of properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Returns true if there are no properties.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

/// Structural description of a JSON value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Schema {
    /// Object with named properties.
    Object(ObjectSchema),
    /// Array with one item schema.
    Array(Box<Self>),
    /// String, optionally with a detected format.
    String {
        /// Detected format.
        format: Option<StringFormat>,
        /// Whether `null` was observed in this slot.
        nullable: bool,
    },
    /// Number with a fractional part.
    Number,
    /// Whole number.
    Integer,
    /// Boolean.
    Boolean,
    /// Explicit null.
    Null,
    /// Samples whose types could not be unified (`oneOf`).
    Alternatives(Vec<Self>),
}

impl Schema {
    /// Plain string schema.
    #[must_use]
    pub const fn string() -> Self {
        Self::String {
            format: None,
            nullable: false,
        }
    }

    /// String schema carrying a format tag.
    #[must_use]
    pub const fn formatted(format: StringFormat) -> Self {
        Self::String {
            format: Some(format),
            nullable: false,
        }
    }

    /// Nullable string schema, used for observed `null` values.
    #[must_use]
    pub const fn nullable_string() -> Self {
        Self::String {
            format: None,
            nullable: true,
        }
    }

    /// Array schema with the given item schema.
    #[must_use]
    pub fn array(items: Self) -> Self {
        Self::Array(Box::new(items))
    }

    /// Returns the top-level kind.
    #[must_use]
    pub const fn kind(&self) -> SchemaKind {
        match self {
            Self::Object(_) => SchemaKind::Object,
            Self::Array(_) => SchemaKind::Array,
            Self::String { .. } => SchemaKind::String,
            Self::Number => SchemaKind::Number,
            Self::Integer => SchemaKind::Integer,
            Self::Boolean => SchemaKind::Boolean,
            Self::Null => SchemaKind::Null,
            Self::Alternatives(_) => SchemaKind::Alternatives,
        }
    }

    /// Returns true if this schema admits `null`.
    #[must_use]
    pub const fn is_nullable(&self) -> bool {
        matches!(self, Self::String { nullable: true, .. } | Self::Null)
    }

    /// Returns the object schema, if this is one.
    #[must_use]
    pub const fn as_object(&self) -> Option<&ObjectSchema> {
        match self {
            Self::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Renders the schema as an `OpenAPI` 3.0 schema object.
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Object(object) => {
                let properties: Map<String, Value> = object
                    .properties
                    .iter()
                    .map(|(name, schema)| (name.clone(), schema.to_value()))
                    .collect();
                let mut rendered = Map::new();
                rendered.insert("type".into(), json!("object"));
                rendered.insert("properties".into(), Value::Object(properties));
                if !object.required.is_empty() {
                    rendered.insert("required".into(), json!(object.required));
                }
                Value::Object(rendered)
            }
            Self::Array(items) => json!({ "type": "array", "items": items.to_value() }),
            Self::String { format, nullable } => {
                let mut rendered = Map::new();
                rendered.insert("type".into(), json!("string"));
                if let Some(format) = format {
                    rendered.insert("format".into(), json!(format.as_str()));
                }
                if *nullable {
                    rendered.insert("nullable".into(), Value::Bool(true));
                }
                Value::Object(rendered)
            }
            Self::Number => json!({ "type": "number" }),
            Self::Integer => json!({ "type": "integer" }),
            Self::Boolean => json!({ "type": "boolean" }),
            Self::Null => json!({ "nullable": true }),
            Self::Alternatives(options) => {
                json!({ "oneOf": options.iter().map(Self::to_value).collect::<Vec<_>>() })
            }
        }
    }
}

impl Serialize for Schema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}
