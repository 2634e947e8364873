//! # IIIF Gallery
//!
//! Collects IIIF Presentation v2 manifests from the web, turns every canvas
//! that carries an image service into a uniform gallery card, and saves the
//! curated set as a single IIIF collection that can be loaded again later.
//!
//! # Architecture
//!
//! ```text
//! URLs ──▶ ingest ──▶ session ──▶ card ──▶ gallery ──▶ generate (index.html)
//!            ▲           │
//!   collection file      └──▶ collection::export ──▶ <name>.json
//! ```
//!
//! The session holds the collected manifests in the order they were added.
//! Cards are derived from it on demand and never stored back, so what gets
//! exported is always the verbatim manifests, not the rendered view.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`types`] | Lenient serde model of the IIIF v2 manifest subset we read |
//! | [`metadata`] | Label lookup in metadata lists and first-available fallback |
//! | [`location`] | Ordered providers for the "View Item" link, URL absolutizing |
//! | [`card`] | Canvas + manifest → [`card::GalleryCard`] |
//! | [`session`] | The collected manifests, in ingestion order |
//! | [`ingest`] | Fetch, shape-check and register manifests; reload collections |
//! | [`collection`] | Export and re-import of the combined collection |
//! | [`gallery`] | Presentation order: move and hide cards |
//! | [`generate`] | Static HTML rendering of the gallery with Maud |
//! | [`config`] | `config.toml` loading, merging over stock defaults, CSS variables |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Lenient Input, Strict Shape
//!
//! Manifests in the wild disagree on whether a field is a string, a list, or
//! an object. The [`types`] model accepts all three and keeps unknown keys,
//! so a manifest survives a round trip through export unchanged. The only
//! hard requirement is a non-empty `sequences[0].canvases`, checked before
//! anything is registered.
//!
//! ## Sequential Fetching
//!
//! URLs are fetched one after another. The collected set then matches the
//! order the operator gave, and a failure never leaves a half-registered
//! manifest behind. Requests carry a timeout so one hung server cannot
//! stall the rest of the queue.

pub mod card;
pub mod collection;
pub mod config;
pub mod gallery;
pub mod generate;
pub mod ingest;
pub mod location;
pub mod metadata;
pub mod output;
pub mod session;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
