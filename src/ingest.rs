//! Manifest ingestion: from a URL, or from a previously exported collection.
//!
//! ## From a URL
//!
//! ```text
//! fetch ──▶ parse JSON ──▶ shape check ──▶ typed Manifest ──▶ register + cards
//!   │            │              │
//! Network      Parse          Shape          (nothing registered on any error)
//! ```
//!
//! The shape check requires `sequences[0].canvases` to be a non-empty list.
//! It runs on the raw JSON before the typed parse. A document that is valid
//! JSON but does not fit the typed model (`"@id": 5`, `"metadata": {}`) is
//! also a shape problem; only malformed JSON is a parse error. The session
//! is only touched after every check passed, and it keeps the document as
//! received next to the typed view.
//!
//! Several URLs are processed strictly one after another, in input order:
//! the collected set then matches the order the operator typed. A failing
//! URL is reported and the next one is still attempted. Nothing is retried.
//!
//! ## From memory
//!
//! A loaded collection replaces the session wholesale. Each entry of its
//! `items` list goes through [`check_item`] on its own; entries that fail
//! are skipped with a warning and the rest are kept.
//!
//! ## Fetching
//!
//! [`ManifestFetcher`] is the network seam. [`HttpFetcher`] is the blocking
//! `ureq` implementation with a configurable global timeout, so a hung
//! server cannot stall the remaining queue forever.

use crate::card::{GalleryCard, cards_for_manifest};
use crate::config::FetchConfig;
use crate::session::Session;
use crate::types::{CollectedManifest, Manifest};
use serde_json::Value;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info, warn};

/// Upper bound on a manifest body. Large atlases run to a few megabytes.
const MAX_MANIFEST_BYTES: u64 = 64 * 1024 * 1024;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("network error fetching {url}: {message}")]
    Network { url: String, message: String },
    #[error("{0}")]
    Shape(String),
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Retrieves the raw body of a manifest.
pub trait ManifestFetcher {
    fn fetch(&self, url: &str) -> Result<String, IngestError>;
}

/// HTTP GET with `ureq`.
pub struct HttpFetcher {
    agent: ureq::Agent,
    user_agent: String,
}

impl HttpFetcher {
    pub fn new(config: &FetchConfig) -> Self {
        let timeout = match config.timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };
        let agent_config = ureq::Agent::config_builder()
            .timeout_global(timeout)
            .build();
        Self {
            agent: agent_config.into(),
            user_agent: config.user_agent.clone(),
        }
    }
}

impl ManifestFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String, IngestError> {
        let parsed = url::Url::parse(url).map_err(|source| IngestError::Network {
            url: url.to_string(),
            message: format!("invalid URL: {source}"),
        })?;

        let mut response = self
            .agent
            .get(parsed.as_str())
            .header("User-Agent", self.user_agent.as_str())
            .header("Accept", "application/json, application/ld+json")
            .call()
            .map_err(|source| network_error(url, source))?;

        response
            .body_mut()
            .with_config()
            .limit(MAX_MANIFEST_BYTES)
            .read_to_string()
            .map_err(|source| network_error(url, source))
    }
}

fn network_error(url: &str, source: ureq::Error) -> IngestError {
    let message = match source {
        ureq::Error::StatusCode(status) => format!("server responded with HTTP {status}"),
        other => other.to_string(),
    };
    IngestError::Network {
        url: url.to_string(),
        message,
    }
}

/// Result of registering one manifest.
#[derive(Debug, Clone)]
pub struct Ingested {
    /// URL or collection position the manifest came from.
    pub source: String,
    pub title: String,
    pub cards: Vec<GalleryCard>,
    /// Canvases without an image service.
    pub skipped_canvases: usize,
}

impl Ingested {
    fn new(source: String, manifest: &Manifest) -> Self {
        let cards = cards_for_manifest(manifest);
        Self {
            source,
            title: manifest.display_name(),
            cards: cards.cards,
            skipped_canvases: cards.skipped,
        }
    }
}

/// Outcome for one URL of a batch.
#[derive(Debug)]
pub struct UrlOutcome {
    pub url: String,
    pub result: Result<Ingested, IngestError>,
}

/// Require a non-empty `sequences[0].canvases` list.
pub fn check_shape(value: &Value) -> Result<(), IngestError> {
    let canvases = value
        .get("sequences")
        .and_then(Value::as_array)
        .and_then(|sequences| sequences.first())
        .and_then(|sequence| sequence.get("canvases"))
        .and_then(Value::as_array);

    match canvases {
        Some(canvases) if !canvases.is_empty() => Ok(()),
        Some(_) => Err(IngestError::Shape(
            "Manifest's first sequence has no canvases.".to_string(),
        )),
        None => Err(IngestError::Shape(
            "Manifest does not contain sequences or canvases in the expected format.".to_string(),
        )),
    }
}

/// Shape-check one manifest document and read its typed view.
///
/// Used for fetched bodies and for every item of a loaded collection.
pub fn check_item(document: &Value) -> Result<CollectedManifest, IngestError> {
    check_shape(document)?;
    CollectedManifest::from_document(document.clone()).map_err(|err| {
        IngestError::Shape(format!(
            "Manifest does not match the expected structure: {err}"
        ))
    })
}

/// Parse a manifest body and validate its shape.
pub fn parse_manifest(body: &str) -> Result<CollectedManifest, IngestError> {
    let value: Value = serde_json::from_str(body)?;
    check_item(&value)
}

/// Split operator input on commas, trimming and dropping blank entries.
pub fn split_urls(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(String::from)
        .collect()
}

/// Fetch one manifest and register it.
pub fn ingest_from_url(
    session: &mut Session,
    fetcher: &dyn ManifestFetcher,
    url: &str,
) -> Result<Ingested, IngestError> {
    let body = fetcher.fetch(url)?;
    let manifest = parse_manifest(&body)?;
    let ingested = Ingested::new(url.to_string(), manifest.manifest());
    info!(
        url,
        title = %ingested.title,
        cards = ingested.cards.len(),
        "registered manifest"
    );
    session.register(manifest);
    Ok(ingested)
}

/// Ingest several URLs strictly in order. Failures don't stop the batch.
pub fn ingest_urls(
    session: &mut Session,
    fetcher: &dyn ManifestFetcher,
    urls: &[String],
) -> Vec<UrlOutcome> {
    urls.iter()
        .map(|url| {
            let result = ingest_from_url(session, fetcher, url);
            if let Err(err) = &result {
                error!(url = url.as_str(), %err, "error fetching IIIF manifest");
            }
            UrlOutcome {
                url: url.clone(),
                result,
            }
        })
        .collect()
}

/// Replace the session with the manifests in a parsed collection document.
///
/// Fails only when `items` is missing or not a list; the session is left
/// untouched in that case.
pub fn ingest_from_memory(
    session: &mut Session,
    data: &Value,
) -> Result<Vec<Ingested>, IngestError> {
    let items = data.get("items").and_then(Value::as_array).ok_or_else(|| {
        IngestError::Shape("No valid items found in the manifest data.".to_string())
    })?;

    let mut manifests = Vec::with_capacity(items.len());
    let mut ingested = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let source = format!("items[{index}]");
        match check_item(item) {
            Ok(manifest) => {
                ingested.push(Ingested::new(source, manifest.manifest()));
                manifests.push(manifest);
            }
            Err(err) => warn!(item = %source, %err, "skipping collection item"),
        }
    }

    info!(
        kept = manifests.len(),
        total = items.len(),
        "loaded collection"
    );
    session.replace(manifests);
    Ok(ingested)
}

/// Read a collection file from disk and load it into the session.
pub fn ingest_from_file(session: &mut Session, path: &Path) -> Result<Vec<Ingested>, IngestError> {
    let content = std::fs::read_to_string(path)?;
    let data: Value = serde_json::from_str(&content)?;
    ingest_from_memory(session, &data)
}
