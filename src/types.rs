//! IIIF Presentation API v2 document model shared by every stage.
//!
//! A fetched manifest is kept twice: the document exactly as received, and
//! a typed view of the fields the gallery reads. [`CollectedManifest`] pairs
//! the two. Exports write the document, so every `null`, empty list and
//! unknown key (`@context`, `thumbnail`, `structures`, ...) survives; the
//! typed view is read-only and never serialized.
//!
//! ```text
//! Manifest
//! ├── metadata: [MetadataEntry]
//! ├── related:  "url" | { "@id": "url" }
//! └── sequences[0]
//!     └── canvases: [Canvas]
//!         ├── metadata: [MetadataEntry]
//!         └── images[0].resource.service["@id"]   ← image service
//! ```
//!
//! A `null` list reads as an empty one. IIIF v3 structures (`items`,
//! `body`) are not modelled.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// A text-bearing JSON value.
///
/// IIIF v2 allows a plain string, a list of strings, or language-tagged
/// objects (`{"@value": "...", "@language": "en"}`) in label and value
/// positions. Anything that is neither a string nor a list of strings is
/// kept verbatim as [`TextValue::Other`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TextValue {
    Text(String),
    List(Vec<String>),
    Other(Value),
}

impl TextValue {
    /// The string itself, only for the plain-string shape.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            TextValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// First textual entry: the string, the first list element, or the
    /// first `@value` of a language-tagged value.
    pub fn first_text(&self) -> Option<&str> {
        match self {
            TextValue::Text(s) => Some(s),
            TextValue::List(items) => items.first().map(String::as_str),
            TextValue::Other(value) => localized_values(value).into_iter().next(),
        }
    }

    /// Human-readable rendering. Lists are joined with `", "`.
    pub fn to_display(&self) -> String {
        match self {
            TextValue::Text(s) => s.clone(),
            TextValue::List(items) => items.join(", "),
            TextValue::Other(value) => localized_values(value).join(", "),
        }
    }
}

impl From<&str> for TextValue {
    fn from(s: &str) -> Self {
        TextValue::Text(s.to_string())
    }
}

/// Collect `@value` strings from a language-tagged object or a list of them.
fn localized_values(value: &Value) -> Vec<&str> {
    match value {
        Value::String(s) => vec![s.as_str()],
        Value::Object(map) => map
            .get("@value")
            .and_then(Value::as_str)
            .into_iter()
            .collect(),
        Value::Array(items) => items.iter().flat_map(localized_values).collect(),
        _ => Vec::new(),
    }
}

/// One `{label, value}` pair from a `metadata` list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MetadataEntry {
    #[serde(default)]
    pub label: Option<TextValue>,
    #[serde(default)]
    pub value: Option<TextValue>,
}

impl MetadataEntry {
    pub fn new(label: &str, value: TextValue) -> Self {
        Self {
            label: Some(TextValue::from(label)),
            value: Some(value),
        }
    }

    /// Exact, case-sensitive label match against a plain-string label.
    pub fn has_label(&self, label: &str) -> bool {
        self.label.as_ref().and_then(TextValue::as_str) == Some(label)
    }
}

/// The manifest-level `related` link: a bare string or a linked resource.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Related {
    Link(String),
    Resource(LinkedResource),
    Other(Value),
}

/// A JSON-LD node that is referenced by its `@id`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LinkedResource {
    #[serde(rename = "@id", default)]
    pub id: Option<String>,
}

/// `resource.service` may be a single service or a list of services.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ServiceRef {
    One(LinkedResource),
    Many(Vec<LinkedResource>),
    Other(Value),
}

impl ServiceRef {
    /// First non-empty service `@id`.
    pub fn id(&self) -> Option<&str> {
        fn non_empty(r: &LinkedResource) -> Option<&str> {
            r.id.as_deref().filter(|id| !id.is_empty())
        }
        match self {
            ServiceRef::One(resource) => non_empty(resource),
            ServiceRef::Many(resources) => resources.iter().find_map(non_empty),
            ServiceRef::Other(_) => None,
        }
    }
}

/// The image resource painted onto a canvas.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ImageResource {
    #[serde(default)]
    pub service: Option<ServiceRef>,
}

/// An entry of `canvas.images`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ImageAnnotation {
    #[serde(default)]
    pub resource: Option<ImageResource>,
}

/// One page/image within a manifest.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Canvas {
    #[serde(rename = "@id", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub label: Option<TextValue>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub metadata: Vec<MetadataEntry>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub images: Vec<ImageAnnotation>,
}

impl Canvas {
    /// The image service `@id` of the first painted image, if any.
    pub fn image_service_id(&self) -> Option<&str> {
        self.images
            .first()?
            .resource
            .as_ref()?
            .service
            .as_ref()?
            .id()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Sequence {
    #[serde(default)]
    pub canvases: Option<Vec<Canvas>>,
}

/// A IIIF manifest: one object (book, map, print) as an ordered set of canvases.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Manifest {
    #[serde(rename = "@id", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub label: Option<TextValue>,
    #[serde(default)]
    pub attribution: Option<TextValue>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub metadata: Vec<MetadataEntry>,
    #[serde(default)]
    pub related: Option<Related>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub sequences: Vec<Sequence>,
}

impl Manifest {
    /// Canvases of the first sequence. Later sequences are alternate
    /// orderings of the same canvases and are not displayed.
    pub fn canvases(&self) -> &[Canvas] {
        self.sequences
            .first()
            .and_then(|s| s.canvases.as_deref())
            .unwrap_or(&[])
    }

    /// Display label, falling back to the `@id`.
    pub fn display_name(&self) -> String {
        self.label
            .as_ref()
            .map(TextValue::to_display)
            .filter(|s| !s.trim().is_empty())
            .or_else(|| self.id.clone())
            .unwrap_or_else(|| "(untitled manifest)".to_string())
    }
}

/// A manifest as collected: the document exactly as received, and its typed view.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectedManifest {
    document: Value,
    manifest: Manifest,
}

impl CollectedManifest {
    /// Read the typed view out of `document`, keeping the document itself.
    pub fn from_document(document: Value) -> Result<Self, serde_json::Error> {
        let manifest = Manifest::deserialize(&document)?;
        Ok(Self { document, manifest })
    }

    /// The document as received. This is what gets exported.
    pub fn document(&self) -> &Value {
        &self.document
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }
}

/// `null` where a list is expected reads as an empty list.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
