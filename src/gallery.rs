//! Presentation order of the card gallery.
//!
//! A [`Gallery`] is a snapshot of the session's cards that can be rearranged
//! and pruned for display. Its changes never flow back: the collected
//! manifests, and therefore the export, keep ingestion order and keep every
//! manifest even when its cards were removed from view.

use crate::card::GalleryCard;
use crate::session::Session;

#[derive(Debug, Clone, Default)]
pub struct Gallery {
    cards: Vec<GalleryCard>,
}

impl Gallery {
    pub fn from_session(session: &Session) -> Self {
        Self {
            cards: session.cards(),
        }
    }

    pub fn from_cards(cards: Vec<GalleryCard>) -> Self {
        Self { cards }
    }

    pub fn cards(&self) -> &[GalleryCard] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Drop the card at `from` onto the card at `to` (0-based).
    ///
    /// Dragging forward lands after the target, dragging backward lands
    /// before it; either way the moved card ends up at index `to`.
    /// Returns `false` when an index is out of range or both are equal.
    pub fn move_card(&mut self, from: usize, to: usize) -> bool {
        if from == to || from >= self.cards.len() || to >= self.cards.len() {
            return false;
        }
        let card = self.cards.remove(from);
        self.cards.insert(to, card);
        true
    }

    /// Remove a card from view.
    pub fn remove_card(&mut self, index: usize) -> Option<GalleryCard> {
        (index < self.cards.len()).then(|| self.cards.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::export;
    use crate::test_helpers::simple_manifest;

    fn titles(gallery: &Gallery) -> Vec<&str> {
        gallery.cards().iter().map(|c| c.title.as_str()).collect()
    }

    fn gallery_of(names: &[&str]) -> (Session, Gallery) {
        let mut session = Session::new();
        for name in names {
            session.register(simple_manifest(name, 1));
        }
        let gallery = Gallery::from_session(&session);
        (session, gallery)
    }

    #[test]
    fn move_forward_lands_after_target() {
        let (_, mut gallery) = gallery_of(&["a", "b", "c", "d"]);
        assert!(gallery.move_card(0, 2));
        assert_eq!(titles(&gallery), vec!["b", "c", "a", "d"]);
    }

    #[test]
    fn move_backward_lands_before_target() {
        let (_, mut gallery) = gallery_of(&["a", "b", "c", "d"]);
        assert!(gallery.move_card(3, 1));
        assert_eq!(titles(&gallery), vec!["a", "d", "b", "c"]);
    }

    #[test]
    fn invalid_moves_are_ignored() {
        let (_, mut gallery) = gallery_of(&["a", "b"]);
        assert!(!gallery.move_card(0, 0));
        assert!(!gallery.move_card(0, 5));
        assert!(!gallery.move_card(7, 0));
        assert_eq!(titles(&gallery), vec!["a", "b"]);
    }

    #[test]
    fn remove_card_only_affects_view() {
        let (session, mut gallery) = gallery_of(&["a", "b", "c"]);
        let removed = gallery.remove_card(1).unwrap();
        assert_eq!(removed.title, "b");
        assert!(gallery.remove_card(9).is_none());
        assert_eq!(titles(&gallery), vec!["a", "c"]);
        assert_eq!(session.len(), 3);
    }

    #[test]
    fn reordering_does_not_change_export_order() {
        let (session, mut gallery) = gallery_of(&["a", "b", "c"]);
        gallery.move_card(2, 0);
        let exported = export("Order", session.manifests()).unwrap();
        let ids: Vec<_> = exported
            .items
            .iter()
            .map(|item| item["@id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(titles(&gallery), vec!["c", "a", "b"]);
    }
}
