//! Metadata lookup across IIIF `metadata` lists.
//!
//! IIIF v2 metadata is free-form: a list of `{label, value}` pairs with no
//! controlled vocabulary, repeated labels, and values that may be a string
//! or a list of strings. Providers disagree on where they put things (some
//! on the manifest, some on each canvas), so every displayed field is
//! resolved through a fallback chain.
//!
//! ## Label lookup
//!
//! [`resolve`] filters entries by exact, case-sensitive label and picks one:
//!
//! - **first match** (`prefer_last = false`): the value is returned as-is,
//!   list values included.
//! - **last match** (`prefer_last = true`): a list value is unwrapped to its
//!   first element. Used for `Identifier`, where institutions list several
//!   identifiers and put the canonical item URL last.
//!
//! The two paths unwrap differently on purpose; callers depend on both.
//!
//! ## Fallback chains
//!
//! [`first_available`] walks candidates in priority order and returns the
//! first non-empty value. It consumes a lazy iterator, so sources after the
//! winning one are never evaluated.

use crate::types::{MetadataEntry, TextValue};
use tracing::debug;

/// Look up the value for `label` in `entries`.
///
/// Returns `None` when no entry has the label (or the chosen entry has no
/// value, or the last match holds an empty list).
pub fn resolve(entries: &[MetadataEntry], label: &str, prefer_last: bool) -> Option<TextValue> {
    let mut matches = entries.iter().filter(|entry| entry.has_label(label));

    if prefer_last {
        match matches.last()?.value.as_ref()? {
            TextValue::List(items) => items.first().cloned().map(TextValue::Text),
            other => Some(other.clone()),
        }
    } else {
        matches.next()?.value.clone()
    }
}

/// Return the first candidate that is a non-blank value, trimmed.
///
/// ```text
/// author: first_available([canvas Author, manifest Author])
/// ```
pub fn first_available<I>(candidates: I) -> Option<String>
where
    I: IntoIterator<Item = Option<String>>,
{
    candidates.into_iter().find_map(|candidate| {
        candidate
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    })
}

/// Resolve a display field: canvas metadata first, then manifest metadata.
///
/// Both lookups take the first matching entry. List values are joined for
/// display.
pub fn field_text(
    canvas_metadata: &[MetadataEntry],
    manifest_metadata: &[MetadataEntry],
    label: &str,
) -> Option<String> {
    let resolved = first_available(
        [canvas_metadata, manifest_metadata]
            .into_iter()
            .map(|entries| resolve(entries, label, false).map(|v| v.to_display())),
    );
    debug!(label, value = ?resolved, "resolved metadata field");
    resolved
}
