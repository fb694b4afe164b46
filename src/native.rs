//! Mapping of embedded outlines (bookmarks) onto the output shape.
//!
//! No inference happens here: depth is clamped to three levels, titles are
//! cleaned, and entries without any letter are dropped.

use unicode_normalization::UnicodeNormalization;

use crate::model::{HeadingLevel, NativeOutlineEntry, OutlineEntry};

/// Page reported for bookmarks whose destination cannot be resolved.
pub const UNRESOLVED_PAGE: u32 = 0;

/// Check if text contains at least one alphabetic character.
pub fn has_alphabetic_content(text: &str) -> bool {
    text.chars().any(char::is_alphabetic)
}

/// Trim and NFC-normalize a bookmark title.
pub fn clean_text(text: &str) -> String {
    text.trim().nfc().collect()
}

/// Map native outline entries to outline entries, preserving order.
pub fn map_native_outline(entries: &[NativeOutlineEntry]) -> Vec<OutlineEntry> {
    entries
        .iter()
        .filter_map(|entry| {
            let text = clean_text(&entry.text);
            if !has_alphabetic_content(&text) {
                log::debug!("Skipping bookmark without letters: {:?}", entry.text);
                return None;
            }
            Some(OutlineEntry::new(
                HeadingLevel::from_depth(entry.depth),
                text,
                entry.page.unwrap_or(UNRESOLVED_PAGE),
            ))
        })
        .collect()
}
