//! Shared test utilities for the iiif-gallery test suite.
//!
//! Fixture loaders for the manifests and collections under `fixtures/`,
//! small builders for metadata and manifests, and a [`StubFetcher`] that
//! stands in for the network.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let manifest = load_manifest_fixture("rumsey.json");
//! let collected = collected_fixture("loc.json");
//! let fetcher = StubFetcher::new()
//!     .with_body("https://m.example/1", load_fixture("manifests/loc.json"))
//!     .with_status("https://m.example/2", 404);
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;

use serde_json::{Value, json};

use crate::ingest::{IngestError, ManifestFetcher};
use crate::types::{CollectedManifest, Manifest, MetadataEntry, TextValue};

// =========================================================================
// Fixtures
// =========================================================================

/// Absolute path of a file under `fixtures/`.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join(name)
}

/// Raw contents of a file under `fixtures/`.
pub fn load_fixture(name: &str) -> String {
    let path = fixture_path(name);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read fixture {}: {e}", path.display()))
}

/// Parse a manifest from `fixtures/manifests/`.
pub fn load_manifest_fixture(name: &str) -> Manifest {
    serde_json::from_str(&load_fixture(&format!("manifests/{name}")))
        .unwrap_or_else(|e| panic!("fixture {name} is not a manifest: {e}"))
}

/// A manifest from `fixtures/manifests/`, kept with its document.
pub fn collected_fixture(name: &str) -> CollectedManifest {
    let document: Value = serde_json::from_str(&load_fixture(&format!("manifests/{name}"))).unwrap();
    CollectedManifest::from_document(document).unwrap()
}

// =========================================================================
// Builders
// =========================================================================

pub fn manifest_from_json(value: Value) -> Manifest {
    serde_json::from_value(value).unwrap()
}

pub fn entry(label: &str, value: &str) -> MetadataEntry {
    MetadataEntry::new(label, TextValue::from(value))
}

pub fn list_entry(label: &str, values: &[&str]) -> MetadataEntry {
    MetadataEntry::new(
        label,
        TextValue::List(values.iter().map(|v| v.to_string()).collect()),
    )
}

/// A collected manifest whose `@id` and label are both `id`, with
/// `canvases` canvases that each carry an image service.
pub fn simple_manifest(id: &str, canvases: usize) -> CollectedManifest {
    let canvases: Vec<Value> = (0..canvases)
        .map(|i| {
            json!({
                "@id": format!("{id}/canvas/{i}"),
                "label": format!("{id} {i}"),
                "images": [{
                    "resource": {
                        "service": {"@id": format!("https://img.example.org/iiif/{id}/{i}")}
                    }
                }]
            })
        })
        .collect();
    CollectedManifest::from_document(json!({
        "@id": id,
        "label": id,
        "sequences": [{"canvases": canvases}]
    }))
    .unwrap()
}

// =========================================================================
// Network stub
// =========================================================================

enum StubResponse {
    Body(String),
    Status(u16),
}

/// In-memory [`ManifestFetcher`]. Unknown URLs fail like an unreachable host.
#[derive(Default)]
pub struct StubFetcher {
    responses: HashMap<String, StubResponse>,
    requested: RefCell<Vec<String>>,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_body(mut self, url: &str, body: String) -> Self {
        self.responses
            .insert(url.to_string(), StubResponse::Body(body));
        self
    }

    pub fn with_status(mut self, url: &str, status: u16) -> Self {
        self.responses
            .insert(url.to_string(), StubResponse::Status(status));
        self
    }

    /// Every URL fetched so far, in call order.
    pub fn requested(&self) -> Vec<String> {
        self.requested.borrow().clone()
    }
}

impl ManifestFetcher for StubFetcher {
    fn fetch(&self, url: &str) -> Result<String, IngestError> {
        self.requested.borrow_mut().push(url.to_string());
        match self.responses.get(url) {
            Some(StubResponse::Body(body)) => Ok(body.clone()),
            Some(StubResponse::Status(status)) => Err(IngestError::Network {
                url: url.to_string(),
                message: format!("server responded with HTTP {status}"),
            }),
            None => Err(IngestError::Network {
                url: url.to_string(),
                message: "host not found".to_string(),
            }),
        }
    }
}
