//! Concrete URL paths to parameterized templates.
//!
//! Numeric segments become `{id}`, canonical UUID segments become `{uuid}`.
//! Repeated kinds in one path are numbered (`{id}`, `{id2}`, ...), so two
//! URLs with the same segment pattern always yield the same template.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use trawl_domain::{Schema, StringFormat};
use url::Url;

#[allow(clippy::expect_used)]
static UUID_SEGMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .expect("valid regex")
});

/// Kind of a parameterized path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    /// All-digit segment.
    Id,
    /// 8-4-4-4-12 hex segment.
    Uuid,
}

impl SegmentKind {
    /// Classifies a raw segment.
    #[must_use]
    pub fn classify(segment: &str) -> Option<Self> {
        if !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit()) {
            Some(Self::Id)
        } else if UUID_SEGMENT.is_match(segment) {
            Some(Self::Uuid)
        } else {
            None
        }
    }

    /// Placeholder base name.
    #[must_use]
    pub const fn base_name(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Uuid => "uuid",
        }
    }

    /// Schema of values in this kind of segment.
    #[must_use]
    pub const fn schema(self) -> Schema {
        match self {
            Self::Id => Schema::Integer,
            Self::Uuid => Schema::formatted(StringFormat::Uuid),
        }
    }

    fn example(self, segment: &str) -> Value {
        match self {
            Self::Id => segment
                .parse::<i64>()
                .map(Value::from)
                .or_else(|_| segment.parse::<u64>().map(Value::from))
                .unwrap_or_else(|_| Value::String(segment.to_string())),
            Self::Uuid => Value::String(segment.to_string()),
        }
    }
}

/// One placeholder extracted from a concrete path.
#[derive(Debug, Clone, PartialEq)]
pub struct PathParameter {
    /// Placeholder name (`id`, `id2`, `uuid`, ...).
    pub name: String,
    /// Segment kind.
    pub kind: SegmentKind,
    /// Observed segment value.
    pub example: Value,
}

/// Template string plus its placeholders, left to right.
#[derive(Debug, Clone, PartialEq)]
pub struct PathTemplate {
    /// Path with placeholders.
    pub template: String,
    /// Placeholders in order of occurrence.
    pub parameters: Vec<PathParameter>,
}

impl PathTemplate {
    /// Template for a path that is used verbatim.
    #[must_use]
    pub fn literal(path: impl Into<String>) -> Self {
        Self {
            template: path.into(),
            parameters: Vec::new(),
        }
    }

    /// Parameterizes an already-extracted URL path.
    #[must_use]
    pub fn from_path(path: &str) -> Self {
        let mut parameters: Vec<PathParameter> = Vec::new();
        let mut id_count = 0_usize;
        let mut uuid_count = 0_usize;

        let segments: Vec<String> = path
            .split('/')
            .map(|segment| {
                let Some(kind) = SegmentKind::classify(segment) else {
                    return segment.to_string();
                };
                let counter = match kind {
                    SegmentKind::Id => &mut id_count,
                    SegmentKind::Uuid => &mut uuid_count,
                };
                *counter += 1;
                let name = if *counter == 1 {
                    kind.base_name().to_string()
                } else {
                    format!("{}{}", kind.base_name(), counter)
                };
                parameters.push(PathParameter {
                    name: name.clone(),
                    kind,
                    example: kind.example(segment),
                });
                format!("{{{name}}}")
            })
            .collect();

        Self {
            template: segments.join("/"),
            parameters,
        }
    }

    /// Parameterizes the path of an absolute URL.
    ///
    /// An unparseable URL yields the raw string as template with no
    /// parameters.
    #[must_use]
    pub fn from_url(url: &str) -> Self {
        Url::parse(url).map_or_else(|_| Self::literal(url), |parsed| Self::from_path(parsed.path()))
    }

    /// Template for `url`, parameterized or verbatim.
    #[must_use]
    pub fn for_url(url: &str, parameterize: bool) -> Self {
        if parameterize {
            return Self::from_url(url);
        }
        Url::parse(url).map_or_else(|_| Self::literal(url), |parsed| Self::literal(parsed.path()))
    }
}

/// Last non-empty segment of a template with placeholder braces removed.
#[must_use]
pub fn resource_name(template: &str) -> Option<String> {
    template
        .split('/')
        .rev()
        .find(|segment| !segment.is_empty())
        .map(|segment| segment.trim_start_matches('{').trim_end_matches('}').to_string())
        .filter(|segment| !segment.is_empty())
}
