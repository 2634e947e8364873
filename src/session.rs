//! Session state: the ordered set of collected manifests.
//!
//! Each entry is a [`CollectedManifest`], the received document plus its
//! typed view. Cards come from the typed view; exports write the document.
//!
//! The controller (the CLI in `main.rs`) owns one [`Session`] and passes it
//! to ingestion and export explicitly. Order is ingestion order and is what
//! gets exported; reordering cards on screen never touches it (see
//! [`crate::gallery`]).
//!
//! Lifecycle:
//!
//! ```text
//! empty ──register()──▶ appended (ingest from URL)
//!       ──replace()───▶ replaced wholesale (collection reload)
//!       ──clear()─────▶ empty
//! ```

use crate::card::{GalleryCard, cards_for_manifest};
use crate::types::CollectedManifest;

#[derive(Debug, Clone, Default)]
pub struct Session {
    manifests: Vec<CollectedManifest>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn manifests(&self) -> &[CollectedManifest] {
        &self.manifests
    }

    pub fn len(&self) -> usize {
        self.manifests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.manifests.is_empty()
    }

    /// Append a manifest. Duplicates are kept; the set is not deduplicated.
    pub fn register(&mut self, manifest: CollectedManifest) {
        self.manifests.push(manifest);
    }

    /// Replace the whole set, as when a collection file is loaded.
    pub fn replace(&mut self, manifests: Vec<CollectedManifest>) {
        self.manifests = manifests;
    }

    pub fn clear(&mut self) {
        self.manifests.clear();
    }

    /// Rebuild every card, manifest by manifest, canvas by canvas.
    pub fn cards(&self) -> Vec<GalleryCard> {
        self.manifests
            .iter()
            .flat_map(|collected| cards_for_manifest(collected.manifest()).cards)
            .collect()
    }
}
