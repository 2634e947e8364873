//! Canvas normalization into display cards.
//!
//! A [`GalleryCard`] is the flat record the gallery shows for one canvas. It
//! is derived entirely from the canvas and its owning manifest, so it is
//! never stored: cards are rebuilt from the collected manifests whenever
//! they are needed.
//!
//! ## Field resolution
//!
//! | Field | Sources, first non-empty wins |
//! |-------|-------------------------------|
//! | title | manifest label → canvas label → `"No title"` |
//! | author, date, collection | canvas metadata → manifest metadata → `"Unknown"` |
//! | attribution | manifest attribution → `"No attribution"` |
//! | location link | see [`crate::location`] |
//! | manifest link | manifest `@id` when it is an http(s) URL → `"#"` |
//!
//! Image URLs are built from the IIIF Image API service `@id` with fixed
//! templates: a `!200,200` best-fit thumbnail and the `info.json` used by
//! deep-zoom viewers. A canvas without an image service cannot be shown and
//! yields no card.

use crate::location::{is_absolute_url, resolve_location_link};
use crate::metadata::{field_text, first_available};
use crate::types::{Canvas, Manifest, TextValue};
use serde::Serialize;
use tracing::warn;

pub const NO_TITLE: &str = "No title";
pub const UNKNOWN: &str = "Unknown";
pub const NO_ATTRIBUTION: &str = "No attribution";
pub const NO_MANIFEST_LINK: &str = "#";

/// Display record for one canvas.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GalleryCard {
    pub title: String,
    pub author: String,
    pub date: String,
    pub collection: String,
    pub attribution: String,
    pub thumbnail_url: String,
    pub deep_zoom_info_url: String,
    pub location_link: String,
    pub manifest_link: String,
}

/// Cards for every displayable canvas of a manifest.
#[derive(Debug, Clone, Default)]
pub struct ManifestCards {
    pub cards: Vec<GalleryCard>,
    /// Canvases dropped for lack of an image service.
    pub skipped: usize,
}

/// IIIF Image API request for a thumbnail fitting in 200×200.
pub fn thumbnail_url(service_id: &str) -> String {
    format!("{service_id}/full/!200,200/0/default.jpg")
}

/// IIIF Image API information document, the entry point for deep zoom.
pub fn deep_zoom_info_url(service_id: &str) -> String {
    format!("{service_id}/info.json")
}

/// Build the card for `canvas`, or `None` when it has no image service.
pub fn normalize(canvas: &Canvas, manifest: &Manifest) -> Option<GalleryCard> {
    let Some(service_id) = canvas.image_service_id() else {
        warn!(
            canvas = canvas.id.as_deref().unwrap_or("(no @id)"),
            manifest = manifest.id.as_deref().unwrap_or("(no @id)"),
            "image service is missing or has no @id, skipping canvas"
        );
        return None;
    };

    let label_text = |label: &Option<TextValue>| label.as_ref().map(TextValue::to_display);
    let title = first_available([label_text(&manifest.label), label_text(&canvas.label)])
        .unwrap_or_else(|| NO_TITLE.to_string());

    let field = |label: &str| {
        field_text(&canvas.metadata, &manifest.metadata, label)
            .unwrap_or_else(|| UNKNOWN.to_string())
    };

    let attribution = first_available([label_text(&manifest.attribution)])
        .unwrap_or_else(|| NO_ATTRIBUTION.to_string());

    let manifest_link = manifest
        .id
        .clone()
        .filter(|id| is_absolute_url(id))
        .unwrap_or_else(|| NO_MANIFEST_LINK.to_string());

    Some(GalleryCard {
        title,
        author: field("Author"),
        date: field("Date"),
        collection: field("Collection"),
        attribution,
        thumbnail_url: thumbnail_url(service_id),
        deep_zoom_info_url: deep_zoom_info_url(service_id),
        location_link: resolve_location_link(manifest, canvas),
        manifest_link,
    })
}

/// Normalize every canvas of the manifest's first sequence, in order.
pub fn cards_for_manifest(manifest: &Manifest) -> ManifestCards {
    let mut result = ManifestCards::default();
    for canvas in manifest.canvases() {
        match normalize(canvas, manifest) {
            Some(card) => result.cards.push(card),
            None => result.skipped += 1,
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::NO_LINK;
    use crate::test_helpers::{load_manifest_fixture, manifest_from_json};
    use serde_json::json;

    const SERVICE: &str = "https://img.example.org/iiif/2/abc";

    fn canvas_json(service: Option<&str>) -> serde_json::Value {
        match service {
            Some(id) => json!({
                "@id": "https://example.org/canvas/1",
                "label": "Sheet 1",
                "images": [{"resource": {"service": {"@id": id}}}]
            }),
            None => json!({"@id": "https://example.org/canvas/1", "label": "Sheet 1"}),
        }
    }

    fn single_card(raw: serde_json::Value) -> Option<GalleryCard> {
        let manifest = manifest_from_json(raw);
        normalize(&manifest.canvases()[0], &manifest)
    }

    #[test]
    fn image_urls_use_fixed_templates() {
        let card = single_card(json!({"sequences": [{"canvases": [canvas_json(Some(SERVICE))]}]}))
            .unwrap();
        assert_eq!(
            card.thumbnail_url,
            "https://img.example.org/iiif/2/abc/full/!200,200/0/default.jpg"
        );
        assert_eq!(
            card.deep_zoom_info_url,
            "https://img.example.org/iiif/2/abc/info.json"
        );
    }

    #[test]
    fn missing_service_yields_none() {
        assert!(single_card(json!({"sequences": [{"canvases": [canvas_json(None)]}]})).is_none());
    }

    #[test]
    fn defaults_when_nothing_present() {
        let card = single_card(json!({"sequences": [{"canvases": [{
            "images": [{"resource": {"service": {"@id": SERVICE}}}]
        }]}]}))
        .unwrap();
        assert_eq!(card.title, NO_TITLE);
        assert_eq!(card.author, UNKNOWN);
        assert_eq!(card.date, UNKNOWN);
        assert_eq!(card.collection, UNKNOWN);
        assert_eq!(card.attribution, NO_ATTRIBUTION);
        assert_eq!(card.location_link, NO_LINK);
        assert_eq!(card.manifest_link, NO_MANIFEST_LINK);
    }

    #[test]
    fn manifest_link_requires_http_scheme() {
        let manifest = |id: &str| {
            json!({"@id": id, "sequences": [{"canvases": [canvas_json(Some(SERVICE))]}]})
        };

        let card = single_card(manifest("https://example.org/iiif/manifest.json")).unwrap();
        assert_eq!(card.manifest_link, "https://example.org/iiif/manifest.json");

        for id in [
            "javascript:alert(document.cookie)",
            "JavaScript:alert(1)",
            "data:text/html,<script>alert(1)</script>",
            "example.org/manifest.json",
            "",
        ] {
            let card = single_card(manifest(id)).unwrap();
            assert_eq!(card.manifest_link, NO_MANIFEST_LINK, "for @id {id:?}");
        }
    }

    #[test]
    fn title_prefers_manifest_label() {
        let card = single_card(json!({
            "label": "Atlas of the World",
            "sequences": [{"canvases": [canvas_json(Some(SERVICE))]}]
        }))
        .unwrap();
        assert_eq!(card.title, "Atlas of the World");

        let card = single_card(json!({"sequences": [{"canvases": [canvas_json(Some(SERVICE))]}]}))
            .unwrap();
        assert_eq!(card.title, "Sheet 1");
    }

    #[test]
    fn metadata_fields_canvas_before_manifest() {
        let card = single_card(json!({
            "metadata": [
                {"label": "Author", "value": "Manifest Author"},
                {"label": "Date", "value": "1790"}
            ],
            "sequences": [{"canvases": [{
                "metadata": [{"label": "Author", "value": "Canvas Author"}],
                "images": [{"resource": {"service": {"@id": SERVICE}}}]
            }]}]
        }))
        .unwrap();
        assert_eq!(card.author, "Canvas Author");
        assert_eq!(card.date, "1790");
        assert_eq!(card.collection, UNKNOWN);
    }

    #[test]
    fn attribution_and_manifest_link() {
        let card = single_card(json!({
            "@id": "https://example.org/manifest.json",
            "attribution": "Courtesy of the Library",
            "sequences": [{"canvases": [canvas_json(Some(SERVICE))]}]
        }))
        .unwrap();
        assert_eq!(card.attribution, "Courtesy of the Library");
        assert_eq!(card.manifest_link, "https://example.org/manifest.json");
    }

    #[test]
    fn cards_for_manifest_counts_skipped_canvases() {
        let manifest = manifest_from_json(json!({
            "sequences": [{"canvases": [
                canvas_json(Some(SERVICE)),
                canvas_json(None),
                canvas_json(Some("https://img.example.org/iiif/2/def"))
            ]}]
        }));
        let result = cards_for_manifest(&manifest);
        assert_eq!(result.cards.len(), 2);
        assert_eq!(result.skipped, 1);
        assert!(result.cards[1].thumbnail_url.contains("/def/"));
    }

    #[test]
    fn rumsey_fixture_card() {
        let manifest = load_manifest_fixture("rumsey.json");
        let result = cards_for_manifest(&manifest);
        assert_eq!(result.skipped, 0);
        let card = &result.cards[0];
        assert_eq!(card.title, "Carte de la Louisiane");
        assert_eq!(card.author, "Delisle, Guillaume");
        assert_eq!(card.date, "1718");
        assert_eq!(card.collection, "David Rumsey Historical Map Collection");
        assert_eq!(
            card.location_link,
            "https://www.davidrumsey.com/luna/servlet/detail/RUMSEY~8~1~2807~290059"
        );
    }

    #[test]
    fn loc_fixture_skips_canvas_without_service() {
        let manifest = load_manifest_fixture("loc.json");
        let result = cards_for_manifest(&manifest);
        assert_eq!(result.cards.len(), 1);
        assert_eq!(result.skipped, 1);
        assert_eq!(result.cards[0].location_link, "https://www.loc.gov/item/2003623159/");
    }
}
