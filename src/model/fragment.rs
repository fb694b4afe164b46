//! Text fragments: the unit of input for outline inference.

use serde::{Deserialize, Serialize};

/// Hyphen-delimited family-name segments that mark a bold face (e.g. `Arial-B`).
const BOLD_SUFFIXES: &[&str] = &["b"];

/// A run of text with its font and position on the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFragment {
    /// Raw text content (may be empty or padded with whitespace)
    pub text: String,
    /// Font family name (e.g., "Helvetica-Bold"), subset prefix removed
    pub font_family: String,
    /// Font size in points, rounded to one decimal by [`TextFragment::new`]
    pub font_size: f32,
    /// Whether the fragment is set in a bold face
    pub bold: bool,
    /// Page number (1-indexed)
    pub page: u32,
    /// Vertical offset from the top of the page (smaller = higher)
    pub position: f32,
}

impl TextFragment {
    /// Create a new fragment. The font size is rounded to one decimal.
    pub fn new(
        text: impl Into<String>,
        font_family: impl Into<String>,
        font_size: f32,
        bold: bool,
        page: u32,
        position: f32,
    ) -> Self {
        Self {
            text: text.into(),
            font_family: font_family.into(),
            font_size: round_size(font_size),
            bold,
            page,
            position,
        }
    }

    /// Font size in tenths of a point, used as an exact map key.
    pub fn size_key(&self) -> i32 {
        size_key(self.font_size)
    }

    /// Number of characters in the raw text.
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// Round a font size to one decimal place.
pub fn round_size(size: f32) -> f32 {
    (size * 10.0).round() / 10.0
}

/// Convert a font size to tenths of a point.
pub fn size_key(size: f32) -> i32 {
    (size * 10.0).round() as i32
}

/// Convert tenths of a point back to a font size.
pub fn size_from_key(key: i32) -> f32 {
    key as f32 / 10.0
}

/// Decide whether a font renders bold.
///
/// Any of three signals is enough: the family name mentions "bold", the font
/// descriptor flags say so, or one of the hyphen-delimited segments of the
/// family name is a bold marker such as `-B`.
pub fn is_bold_font(font_family: &str, flags_bold: bool) -> bool {
    let lower = font_family.to_lowercase();
    lower.contains("bold")
        || flags_bold
        || lower.split('-').any(|part| BOLD_SUFFIXES.contains(&part))
}

/// Strip a subset tag (`ABCDEF+`) from a base font name.
pub fn strip_subset_prefix(base_font: &str) -> &str {
    match base_font.split_once('+') {
        Some((tag, rest))
            if tag.len() == 6 && tag.chars().all(|c| c.is_ascii_uppercase()) =>
        {
            rest
        }
        _ => base_font,
    }
}
