//! HTML gallery generation.
//!
//! Renders the cards of a [`Gallery`] into a single static page. This is the
//! rendering side of the card contract: it only reads [`GalleryCard`]s and
//! never looks at manifests.
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! └── index.html     # Card grid, CSS inlined
//! ```
//!
//! ## Cards
//!
//! Each card shows the thumbnail, title, author, date, collection and
//! attribution, a "View Item" link to the holding institution and a "View
//! IIIF Manifest" link. The thumbnail links to the image's `info.json`
//! and carries it in `data-info-url` for a deep-zoom viewer to pick up.
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! All interpolated metadata is escaped; manifest text is untrusted input.

use crate::card::GalleryCard;
use crate::config::{self, GalleryConfig};
use crate::gallery::Gallery;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

const CSS_STATIC: &str = include_str!("../static/gallery.css");

/// Write `index.html` for the gallery into `output_dir`.
pub fn generate(
    gallery: &Gallery,
    title: &str,
    config: &GalleryConfig,
    output_dir: &Path,
) -> Result<PathBuf, GenerateError> {
    fs::create_dir_all(output_dir)?;
    let page = render_gallery_page(gallery, title, config);
    let path = output_dir.join("index.html");
    fs::write(&path, page.into_string())?;
    info!(path = %path.display(), cards = gallery.len(), "generated gallery page");
    Ok(path)
}

/// Full stylesheet: config-driven custom properties, then the static rules.
pub fn stylesheet(config: &GalleryConfig) -> String {
    format!(
        "{}\n\n{}\n\n{}",
        config::generate_color_css(&config.colors),
        config::generate_theme_css(&config.theme),
        CSS_STATIC
    )
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure
fn base_document(title: &str, css: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (PreEscaped(css)) }
            }
            body {
                (content)
            }
        }
    }
}

/// Renders one card
pub fn render_card(card: &GalleryCard) -> Markup {
    html! {
        div.card {
            a.deep-zoom href=(card.deep_zoom_info_url) data-info-url=(card.deep_zoom_info_url) {
                img src=(card.thumbnail_url) alt=(card.title) loading="lazy";
            }
            p { strong { "Title:" } " " (card.title) }
            p { strong { "Author:" } " " (card.author) }
            p { strong { "Date:" } " " (card.date) }
            p { strong { "Collection:" } " " (card.collection) }
            p { strong { "Attribution:" } " " (card.attribution) }
            p {
                a href=(card.location_link) target="_blank" rel="noopener" { "View Item" }
            }
            p {
                a.manifest-link href=(card.manifest_link) target="_blank" rel="noopener" {
                    "View IIIF Manifest"
                }
            }
        }
    }
}

// ============================================================================
// Page Renderers
// ============================================================================

/// Renders the gallery page with every card in presentation order
pub fn render_gallery_page(gallery: &Gallery, title: &str, config: &GalleryConfig) -> Markup {
    let count_label = match gallery.len() {
        1 => "1 image".to_string(),
        n => format!("{n} images"),
    };

    let content = html! {
        header.site-header {
            h1 { (title) }
            span.card-count { (count_label) }
        }
        @if gallery.is_empty() {
            p.empty-gallery { "No images yet. Add a IIIF manifest to get started." }
        } @else {
            main.gallery id="gallery" {
                @for card in gallery.cards() {
                    (render_card(card))
                }
            }
        }
    };

    base_document(title, &stylesheet(config), content)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{NO_MANIFEST_LINK, cards_for_manifest};
    use crate::session::Session;
    use crate::test_helpers::{collected_fixture, load_manifest_fixture, manifest_from_json};
    use serde_json::json;
    use tempfile::TempDir;

    fn one_canvas(mut manifest: serde_json::Value) -> crate::types::Manifest {
        manifest["sequences"] = json!([{"canvases": [{
            "images": [{"resource": {"service": {"@id": "https://img.example.org/iiif/x"}}}]
        }]}]);
        manifest_from_json(manifest)
    }

    fn fixture_gallery() -> Gallery {
        let mut session = Session::new();
        session.register(collected_fixture("rumsey.json"));
        session.register(collected_fixture("loc.json"));
        Gallery::from_session(&session)
    }

    #[test]
    fn card_shows_metadata_and_links() {
        let manifest = load_manifest_fixture("rumsey.json");
        let card = &cards_for_manifest(&manifest).cards[0];
        let html = render_card(card).into_string();

        assert!(html.contains("Carte de la Louisiane"));
        assert!(html.contains("Delisle, Guillaume"));
        assert!(html.contains("<strong>Date:</strong> 1718"));
        assert!(html.contains("View Item"));
        assert!(html.contains(r#"class="manifest-link""#));
        assert!(html.contains("/full/!200,200/0/default.jpg"));
        assert!(html.contains(r#"data-info-url="https://www.davidrumsey.com/luna/servlet/iiif/RUMSEY~8~1~2807~290059/info.json""#));
    }

    #[test]
    fn page_lists_cards_in_gallery_order() {
        let mut gallery = fixture_gallery();
        let html = render_gallery_page(&gallery, "Maps", &GalleryConfig::default()).into_string();
        let rumsey = html.find("Carte de la Louisiane").unwrap();
        let loc = html.find("A new map of the whole continent").unwrap();
        assert!(rumsey < loc);

        gallery.move_card(1, 0);
        let html = render_gallery_page(&gallery, "Maps", &GalleryConfig::default()).into_string();
        let rumsey = html.find("Carte de la Louisiane").unwrap();
        let loc = html.find("A new map of the whole continent").unwrap();
        assert!(loc < rumsey);
    }

    #[test]
    fn page_includes_doctype_title_and_count() {
        let html =
            render_gallery_page(&fixture_gallery(), "Maps", &GalleryConfig::default()).into_string();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Maps</title>"));
        assert!(html.contains("2 images"));
    }

    #[test]
    fn empty_gallery_message() {
        let html =
            render_gallery_page(&Gallery::default(), "Empty", &GalleryConfig::default()).into_string();
        assert!(html.contains("empty-gallery"));
        assert!(!html.contains(r#"class="card""#));
    }

    #[test]
    fn stylesheet_uses_config() {
        let mut config = GalleryConfig::default();
        config.colors.light.background = "#fdf6e3".to_string();
        config.theme.card_width = "300px".to_string();
        let css = stylesheet(&config);
        assert!(css.contains("--color-bg: #fdf6e3"));
        assert!(css.contains("--card-width: 300px"));
        assert!(css.contains(".gallery"));
    }

    #[test]
    fn card_without_manifest_id_links_placeholder() {
        let manifest = one_canvas(json!({"label": "x"}));
        let card = &cards_for_manifest(&manifest).cards[0];
        let html = render_card(card).into_string();
        assert!(html.contains(&format!(r#"href="{NO_MANIFEST_LINK}""#)));
    }

    #[test]
    fn script_manifest_id_never_reaches_href() {
        let manifest = one_canvas(json!({"@id": "javascript:alert(document.cookie)"}));
        let card = &cards_for_manifest(&manifest).cards[0];
        let html = render_card(card).into_string();
        assert!(!html.contains("javascript:"));
        assert!(html.contains(&format!(r#"href="{NO_MANIFEST_LINK}""#)));
    }

    #[test]
    fn metadata_is_escaped() {
        let manifest = one_canvas(json!({"label": "<script>alert('xss')</script>"}));
        let card = &cards_for_manifest(&manifest).cards[0];
        let html = render_card(card).into_string();
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn generate_writes_index() {
        let tmp = TempDir::new().unwrap();
        let path = generate(
            &fixture_gallery(),
            "Maps",
            &GalleryConfig::default(),
            &tmp.path().join("dist"),
        )
        .unwrap();
        assert_eq!(path, tmp.path().join("dist/index.html"));
        let html = fs::read_to_string(path).unwrap();
        assert!(html.contains("Carte de la Louisiane"));
    }
}
