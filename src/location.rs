//! External "View Item" link resolution.
//!
//! Every card links back to the holding institution's page for the item.
//! There is no standard field for this in IIIF v2, so the link is taken from
//! the first source in this list that has a non-empty value:
//!
//! | # | Source | Seen at |
//! |---|--------|---------|
//! | 1 | `manifest.related["@id"]` | David Rumsey / LUNA |
//! | 2 | `manifest.related` (string) | LUNA |
//! | 3 | canvas `Identifier`, first match | |
//! | 4 | manifest `Identifier`, last match unwrapped | institutional repositories |
//! | 5 | canvas `Item Url` | Library of Congress |
//! | 6 | manifest `Item Url` | Library of Congress |
//! | 7 | canvas `@id` | |
//! | 8 | [`NO_LINK`] | |
//!
//! Whatever wins is made absolute: values without an `http://` or `https://`
//! scheme get `https://` prepended. Some manifests store bare hostnames such
//! as `rumsey.org/x` as identifiers.

use crate::metadata::resolve;
use crate::types::{Canvas, Manifest, Related, TextValue};
use tracing::debug;

/// Sentinel used when no source has a link.
pub const NO_LINK: &str = "no link available";

/// A single link source in the fallback chain.
pub type LinkSource = fn(&Manifest, &Canvas) -> Option<String>;

/// Link sources in priority order, named for diagnostics.
pub const LINK_SOURCES: &[(&str, LinkSource)] = &[
    ("related @id", related_id),
    ("related", related_string),
    ("canvas Identifier", canvas_identifier),
    ("manifest Identifier", manifest_identifier),
    ("canvas Item Url", canvas_item_url),
    ("manifest Item Url", manifest_item_url),
    ("canvas @id", canvas_id),
];

/// Resolve the absolute external link for a canvas.
pub fn resolve_location_link(manifest: &Manifest, canvas: &Canvas) -> String {
    let chosen = LINK_SOURCES.iter().find_map(|(name, source)| {
        source(manifest, canvas)
            .map(|link| link.trim().to_string())
            .filter(|link| !link.is_empty())
            .map(|link| (*name, link))
    });

    match chosen {
        Some((source, link)) => {
            let link = make_absolute(&link);
            debug!(source, %link, "resolved location link");
            link
        }
        None => NO_LINK.to_string(),
    }
}

/// Prefix `https://` unless the link already has an http(s) scheme.
///
/// The [`NO_LINK`] sentinel is returned unchanged.
pub fn make_absolute(link: &str) -> String {
    if link == NO_LINK || is_absolute_url(link) {
        link.to_string()
    } else {
        format!("https://{link}")
    }
}

/// Case-insensitive check for a leading `http://` or `https://`.
pub fn is_absolute_url(link: &str) -> bool {
    ["http://", "https://"].iter().any(|scheme| {
        link.get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}

fn related_id(manifest: &Manifest, _canvas: &Canvas) -> Option<String> {
    match manifest.related.as_ref()? {
        Related::Resource(resource) => resource.id.clone(),
        _ => None,
    }
}

fn related_string(manifest: &Manifest, _canvas: &Canvas) -> Option<String> {
    match manifest.related.as_ref()? {
        Related::Link(link) => Some(link.clone()),
        _ => None,
    }
}

fn canvas_identifier(_manifest: &Manifest, canvas: &Canvas) -> Option<String> {
    link_text(resolve(&canvas.metadata, "Identifier", false))
}

fn manifest_identifier(manifest: &Manifest, _canvas: &Canvas) -> Option<String> {
    link_text(resolve(&manifest.metadata, "Identifier", true))
}

fn canvas_item_url(_manifest: &Manifest, canvas: &Canvas) -> Option<String> {
    link_text(resolve(&canvas.metadata, "Item Url", false))
}

fn manifest_item_url(manifest: &Manifest, _canvas: &Canvas) -> Option<String> {
    link_text(resolve(&manifest.metadata, "Item Url", false))
}

fn canvas_id(_manifest: &Manifest, canvas: &Canvas) -> Option<String> {
    canvas.id.clone()
}

/// A link can only be one URL, so list values contribute their first entry.
fn link_text(value: Option<TextValue>) -> Option<String> {
    value?.first_text().map(String::from)
}
