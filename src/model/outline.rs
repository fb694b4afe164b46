//! Outline types: heading levels, entries and the per-document artifact.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Heading level of an outline entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
}

impl HeadingLevel {
    /// Map a 1-based outline depth onto a heading level.
    ///
    /// Depths beyond three collapse into H3.
    pub fn from_depth(depth: u32) -> Self {
        match depth {
            0 | 1 => HeadingLevel::H1,
            2 => HeadingLevel::H2,
            _ => HeadingLevel::H3,
        }
    }

    /// Label used in the JSON artifact.
    pub fn as_str(&self) -> &'static str {
        match self {
            HeadingLevel::H1 => "H1",
            HeadingLevel::H2 => "H2",
            HeadingLevel::H3 => "H3",
        }
    }
}

impl fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A heading before ordering and deduplication.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadingCandidate {
    /// Classified level
    pub level: HeadingLevel,
    /// Trimmed heading text
    pub text: String,
    /// Page number (1-indexed)
    pub page: u32,
    /// Vertical offset on the page, used for ordering only
    pub position: f32,
}

impl HeadingCandidate {
    /// Drop the ordering position and produce the emitted entry.
    pub fn into_entry(self) -> OutlineEntry {
        OutlineEntry {
            level: self.level,
            text: self.text,
            page: self.page,
        }
    }
}

/// A single heading in the emitted outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineEntry {
    /// Heading level
    pub level: HeadingLevel,
    /// Heading text
    pub text: String,
    /// Target page number (1-indexed)
    pub page: u32,
}

impl OutlineEntry {
    /// Create a new outline entry.
    pub fn new(level: HeadingLevel, text: impl Into<String>, page: u32) -> Self {
        Self {
            level,
            text: text.into(),
            page,
        }
    }
}

/// An entry of a document's embedded outline (bookmarks), flattened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeOutlineEntry {
    /// Nesting depth (1 = top level)
    pub depth: u32,
    /// Bookmark title as stored in the document
    pub text: String,
    /// Destination page (1-indexed), if it could be resolved
    pub page: Option<u32>,
}

impl NativeOutlineEntry {
    /// Create a new native outline entry.
    pub fn new(depth: u32, text: impl Into<String>, page: Option<u32>) -> Self {
        Self {
            depth,
            text: text.into(),
            page,
        }
    }
}

/// Title and outline of one document: the terminal artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentOutline {
    /// Document title
    pub title: String,
    /// Headings in reading order
    pub outline: Vec<OutlineEntry>,
}

impl DocumentOutline {
    /// Create an outline with the given title and no entries.
    pub fn empty(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            outline: Vec::new(),
        }
    }

    /// Create an outline from a title and entries.
    pub fn new(title: impl Into<String>, outline: Vec<OutlineEntry>) -> Self {
        Self {
            title: title.into(),
            outline,
        }
    }

    /// The artifact written for a document that could not be processed.
    pub fn error_artifact(stem: &str, message: &str) -> Self {
        Self {
            title: format!("{}{}", ERROR_TITLE_PREFIX, stem),
            outline: vec![OutlineEntry::new(HeadingLevel::H1, message, 1)],
        }
    }

    /// Whether this artifact reports a processing failure.
    pub fn is_error(&self) -> bool {
        self.title.starts_with(ERROR_TITLE_PREFIX)
    }

    /// Number of headings.
    pub fn len(&self) -> usize {
        self.outline.len()
    }

    /// Check if the outline has no headings.
    pub fn is_empty(&self) -> bool {
        self.outline.is_empty()
    }
}

/// Title prefix marking an error artifact.
pub const ERROR_TITLE_PREFIX: &str = "Processing Error for ";
