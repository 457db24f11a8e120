use serde::{Deserialize, Serialize};

/// How a field is extracted from a record and how it is presented.
///
/// `Nested`, `Address` and `Compose` change extraction; the remaining kinds
/// change presentation only. `Default` and `Unknown` use a direct key lookup
/// and the default text rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Default,
    /// Dot-separated traversal into the record. `None` when the schema omits `path`.
    Nested { path: Option<String> },
    /// Joined with `", "` and rendered one part per line.
    Address { compose: Option<Vec<String>> },
    /// Joined with a single space.
    Compose { compose: Option<Vec<String>> },
    Multiline,
    Files,
    Email,
    Url,
    Phone,
    Date,
    Array,
    /// A `type` tag this crate does not know. Kept so the schema round-trips.
    Unknown(String),
}

impl FieldKind {
    /// Wire tag for this kind, as written in the `type` property.
    pub fn tag(&self) -> &str {
        match self {
            FieldKind::Default => "default",
            FieldKind::Nested { .. } => "nested",
            FieldKind::Address { .. } => "address",
            FieldKind::Compose { .. } => "compose",
            FieldKind::Multiline => "multiline",
            FieldKind::Files => "files",
            FieldKind::Email => "email",
            FieldKind::Url => "url",
            FieldKind::Phone => "phone",
            FieldKind::Date => "date",
            FieldKind::Array => "array",
            FieldKind::Unknown(tag) => tag,
        }
    }

    pub fn is_files(&self) -> bool {
        matches!(self, FieldKind::Files)
    }
}

/// One entry of a section's field list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawField", into = "RawField")]
pub struct FieldSchema {
    pub key: String,
    pub label: String,
    pub kind: FieldKind,
}

impl FieldSchema {
    pub fn new(key: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            kind,
        }
    }
}

/// Wire form of a field: `{key, label, type, path?, compose?}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawField {
    key: String,
    label: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    compose: Option<Vec<String>>,
}

impl From<RawField> for FieldSchema {
    fn from(raw: RawField) -> Self {
        let kind = match raw.kind.as_deref() {
            None | Some("default") => FieldKind::Default,
            Some("nested") => FieldKind::Nested { path: raw.path },
            Some("address") => FieldKind::Address {
                compose: raw.compose,
            },
            Some("compose") => FieldKind::Compose {
                compose: raw.compose,
            },
            Some("multiline") => FieldKind::Multiline,
            Some("files") => FieldKind::Files,
            Some("email") => FieldKind::Email,
            Some("url") => FieldKind::Url,
            Some("phone") => FieldKind::Phone,
            Some("date") => FieldKind::Date,
            Some("array") => FieldKind::Array,
            Some(other) => FieldKind::Unknown(other.to_string()),
        };
        FieldSchema {
            key: raw.key,
            label: raw.label,
            kind,
        }
    }
}

impl From<FieldSchema> for RawField {
    fn from(field: FieldSchema) -> Self {
        let tag = match &field.kind {
            FieldKind::Default => None,
            other => Some(other.tag().to_string()),
        };
        let (path, compose) = match field.kind {
            FieldKind::Nested { path } => (path, None),
            FieldKind::Address { compose } | FieldKind::Compose { compose } => (None, compose),
            _ => (None, None),
        };
        RawField {
            key: field.key,
            label: field.label,
            kind: tag,
            path,
            compose,
        }
    }
}

/// A titled, ordered group of fields rendered as one block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionSchema {
    pub title: String,
    #[serde(default)]
    pub fields: Vec<FieldSchema>,
}

impl SectionSchema {
    pub fn new(title: impl Into<String>, fields: Vec<FieldSchema>) -> Self {
        Self {
            title: title.into(),
            fields,
        }
    }
}

/// Parse an ordered list of sections from JSON.
pub fn sections_from_json(json: &str) -> crate::FieldsResult<Vec<SectionSchema>> {
    Ok(serde_json::from_str(json)?)
}

/// Parse an ordered list of sections from YAML.
pub fn sections_from_yaml(yaml: &str) -> crate::FieldsResult<Vec<SectionSchema>> {
    Ok(serde_yaml::from_str(yaml)?)
}
