//! CLI output formatting for every command.
//!
//! # Information-First Display
//!
//! Output is organised around what the operator curates: each manifest is a
//! header line (position, title, image count) and each card is an indented
//! line with its title, followed by its metadata and links as context lines.
//! Where something came from (URL, collection slot) is secondary context.
//!
//! ```text
//! 001 Carte de la Louisiane (1 image)
//!     Source: https://www.davidrumsey.com/.../manifest
//!     001 Carte de la Louisiane
//!         Author: Delisle, Guillaume
//!         Date: 1718
//!         Collection: David Rumsey Historical Map Collection
//!         Attribution: David Rumsey Map Collection, ...
//!         Item: https://www.davidrumsey.com/luna/servlet/detail/...
//!         Manifest: https://www.davidrumsey.com/.../manifest
//!         Image: https://www.davidrumsey.com/.../info.json
//! 002 A new map of the whole continent of America (1 image)
//!     Source: https://www.loc.gov/item/2003623159/manifest.json
//!     Skipped: 1 canvas without an image service
//!     ...
//! ```
//!
//! # Architecture
//!
//! Each output has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects. Operator alerts go to
//! stderr through [`print_alert`].

use crate::card::GalleryCard;
use crate::collection::CombinedManifest;
use crate::ingest::{self, Ingested};
use crate::types::Manifest;
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(count: usize, noun: &str) -> String {
    match (count, noun.ends_with('s')) {
        (1, _) => format!("1 {noun}"),
        (_, true) => format!("{count} {noun}es"),
        (_, false) => format!("{count} {noun}s"),
    }
}

/// Format an entity header: positional index + title + image count.
///
/// ```text
/// 001 Carte de la Louisiane (1 image)
/// ```
fn entity_header(index: usize, title: &str, images: usize) -> String {
    format!(
        "{} {} ({})",
        format_index(index),
        title,
        plural(images, "image")
    )
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let head: String = text.chars().take(max).collect();
        format!("{head}...")
    }
}

const MAX_FIELD_LEN: usize = 80;

// ============================================================================
// Cards
// ============================================================================

/// A card line at `depth`, with its fields one level deeper.
pub fn format_card(index: usize, card: &GalleryCard, depth: usize) -> Vec<String> {
    let pad = indent(depth + 1);
    vec![
        format!("{}{} {}", indent(depth), format_index(index), card.title),
        format!("{pad}Author: {}", card.author),
        format!("{pad}Date: {}", card.date),
        format!("{pad}Collection: {}", card.collection),
        format!("{pad}Attribution: {}", truncate(&card.attribution, MAX_FIELD_LEN)),
        format!("{pad}Item: {}", card.location_link),
        format!("{pad}Manifest: {}", card.manifest_link),
        format!("{pad}Image: {}", card.deep_zoom_info_url),
    ]
}

// ============================================================================
// Ingestion
// ============================================================================

/// One registered manifest with its cards.
pub fn format_ingested(index: usize, ingested: &Ingested) -> Vec<String> {
    let mut lines = vec![
        entity_header(index, &ingested.title, ingested.cards.len()),
        format!("{}Source: {}", indent(1), ingested.source),
    ];
    if ingested.skipped_canvases > 0 {
        lines.push(format!(
            "{}Skipped: {} without an image service",
            indent(1),
            plural(ingested.skipped_canvases, "canvas")
        ));
    }
    for (idx, card) in ingested.cards.iter().enumerate() {
        lines.extend(format_card(idx + 1, card, 1));
    }
    lines
}

pub fn format_ingest_summary(ingested: &[Ingested]) -> Vec<String> {
    let mut lines: Vec<String> = ingested
        .iter()
        .enumerate()
        .flat_map(|(idx, item)| format_ingested(idx + 1, item))
        .collect();
    let cards: usize = ingested.iter().map(|item| item.cards.len()).sum();
    lines.push(String::new());
    lines.push(format!(
        "Collected {}, {}",
        plural(ingested.len(), "manifest"),
        plural(cards, "image")
    ));
    lines
}

pub fn print_ingest_summary(ingested: &[Ingested]) {
    for line in format_ingest_summary(ingested) {
        println!("{}", line);
    }
}

/// Operator-facing message for a manifest that could not be added.
pub fn format_fetch_failure(url: &str, error: &dyn std::error::Error) -> String {
    format!("There was an error fetching the IIIF Manifest {url}: {error}")
}

/// Write an operator alert to stderr.
pub fn print_alert(message: &str) {
    eprintln!("{}", message);
}

// ============================================================================
// Collections
// ============================================================================

/// Summary of a parsed collection file.
///
/// Items that loading would skip are listed with the reason.
pub fn format_collection(collection: &CombinedManifest) -> Vec<String> {
    let mut lines = vec![
        format!("{} ({})", collection.label, plural(collection.items.len(), "manifest")),
        format!("{}Id: {}", indent(1), collection.id),
    ];
    for (idx, item) in collection.items.iter().enumerate() {
        let line = match ingest::check_item(item) {
            Ok(collected) => format!(
                "{} ({})",
                collected.manifest().display_name(),
                plural(collected.manifest().canvases().len(), "canvas")
            ),
            Err(err) => format!("{} (skipped on load: {err})", item_name(item)),
        };
        lines.push(format!("{}{} {}", indent(1), format_index(idx + 1), line));
    }
    lines
}

/// Best-effort name for an item that may not read as a manifest.
fn item_name(item: &Value) -> String {
    Manifest::deserialize(item)
        .map(|manifest| manifest.display_name())
        .ok()
        .or_else(|| item.get("@id").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| "(untitled manifest)".to_string())
}

pub fn print_collection(collection: &CombinedManifest) {
    for line in format_collection(collection) {
        println!("{}", line);
    }
}

pub fn format_export(path: &Path, collection: &CombinedManifest) -> String {
    format!(
        "Manifest \"{}\" has been exported successfully: {} ({})",
        collection.label,
        path.display(),
        plural(collection.items.len(), "manifest")
    )
}

// ============================================================================
// Rendering
// ============================================================================

pub fn format_render(path: &Path, cards: usize) -> String {
    format!("==> Gallery written: {} ({})", path.display(), plural(cards, "card"))
}
