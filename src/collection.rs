//! Combined collection manifests: export and re-import.
//!
//! The curated set is saved as a single IIIF v2 collection whose `items` are
//! the collected manifests, verbatim and in ingestion order:
//!
//! ```json
//! {
//!   "@context": "http://iiif.io/api/presentation/2/context.json",
//!   "@type": "sc:Collection",
//!   "@id": "https://example.org/collection/<name>",
//!   "label": "<name>",
//!   "items": [ <manifest>, <manifest>, ... ]
//! }
//! ```
//!
//! Each item is the document that was fetched, so fields the gallery never
//! reads, `null` values and empty lists are written back unchanged.
//!
//! Export does not validate or deduplicate: a manifest added twice appears
//! twice. [`import`] is the inverse of [`export`], so
//! `import(to_json(export(name, set))).items` are the documents of `set`.
//! Import only checks the collection envelope and returns every item as
//! written; deciding which items can be shown is left to
//! [`crate::ingest::check_item`], which both loading and `inspect` use.

use crate::types::CollectedManifest;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

pub const PRESENTATION_CONTEXT: &str = "http://iiif.io/api/presentation/2/context.json";
pub const COLLECTION_TYPE: &str = "sc:Collection";
pub const DEFAULT_ID_BASE: &str = "https://example.org/collection/";

#[derive(Error, Debug)]
pub enum CollectionError {
    #[error("{0}")]
    Validation(String),
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{0}")]
    Shape(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A collection of manifests, as written to disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedManifest {
    #[serde(rename = "@context", default = "default_context")]
    pub context: String,
    #[serde(rename = "@type", default = "default_type")]
    pub kind: String,
    #[serde(rename = "@id", default)]
    pub id: String,
    #[serde(default)]
    pub label: String,
    pub items: Vec<Value>,
}

fn default_context() -> String {
    PRESENTATION_CONTEXT.to_string()
}

fn default_type() -> String {
    COLLECTION_TYPE.to_string()
}

/// Wrap the collected manifests under `name`, using [`DEFAULT_ID_BASE`].
pub fn export(
    name: &str,
    manifests: &[CollectedManifest],
) -> Result<CombinedManifest, CollectionError> {
    export_with_id_base(name, manifests, DEFAULT_ID_BASE)
}

/// Wrap the collected manifests; `@id` is `id_base` followed by the name.
///
/// The name is trimmed first. An empty name or an empty set is refused.
pub fn export_with_id_base(
    name: &str,
    manifests: &[CollectedManifest],
    id_base: &str,
) -> Result<CombinedManifest, CollectionError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CollectionError::Validation(
            "Please enter a name for the manifest.".to_string(),
        ));
    }
    if manifests.is_empty() {
        return Err(CollectionError::Validation(
            "No manifests to export. Please add some manifests first.".to_string(),
        ));
    }

    Ok(CombinedManifest {
        context: default_context(),
        kind: default_type(),
        id: format!("{id_base}{name}"),
        label: name.to_string(),
        items: manifests
            .iter()
            .map(|collected| collected.document().clone())
            .collect(),
    })
}

/// Pretty-printed JSON for a collection.
pub fn to_json(collection: &CombinedManifest) -> Result<String, CollectionError> {
    Ok(serde_json::to_string_pretty(collection)?)
}

/// Parse an exported collection.
///
/// Malformed JSON is a parse error; a document without an `items` list is a
/// shape error.
pub fn import(raw: &str) -> Result<CombinedManifest, CollectionError> {
    let value: Value = serde_json::from_str(raw)?;
    if !value.get("items").is_some_and(Value::is_array) {
        return Err(CollectionError::Shape(
            "No valid items found in the manifest data.".to_string(),
        ));
    }
    Ok(CombinedManifest::deserialize(&value)?)
}

/// File name for an exported collection: `<label>.json`.
///
/// Path separators in the label are replaced so the file always lands in
/// the chosen directory.
pub fn file_name(collection: &CombinedManifest) -> String {
    let stem: String = collection
        .label
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '-' } else { c })
        .collect();
    format!("{stem}.json")
}

/// Write the collection to `<dir>/<label>.json` and return the path.
pub fn write_collection(dir: &Path, collection: &CombinedManifest) -> Result<PathBuf, CollectionError> {
    fs::create_dir_all(dir)?;
    let path = dir.join(file_name(collection));
    fs::write(&path, to_json(collection)?)?;
    info!(path = %path.display(), items = collection.items.len(), "exported collection");
    Ok(path)
}

/// Read and [`import`] a collection file.
pub fn read_collection(path: &Path) -> Result<CombinedManifest, CollectionError> {
    let raw = fs::read_to_string(path)?;
    import(&raw)
}
