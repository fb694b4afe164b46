//! In-memory document source.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::model::{NativeOutlineEntry, TextFragment};

use super::backend::DocumentSource;

/// A [`DocumentSource`] built from fragments held in memory.
///
/// Useful for embedding the engine behind another parser and for tests.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    title: Option<String>,
    outline: Vec<NativeOutlineEntry>,
    page_count: u32,
    fragments: Vec<TextFragment>,
    failures: HashMap<u32, String>,
}

impl MemorySource {
    /// Create a source with the given number of pages and no content.
    pub fn new(page_count: u32) -> Self {
        Self {
            page_count,
            ..Default::default()
        }
    }

    /// Set the metadata title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Append a native outline entry.
    pub fn with_outline_entry(mut self, entry: NativeOutlineEntry) -> Self {
        self.outline.push(entry);
        self
    }

    /// Append a fragment. Its page must be within the page count.
    pub fn with_fragment(mut self, fragment: TextFragment) -> Self {
        self.fragments.push(fragment);
        self
    }

    /// Append several fragments.
    pub fn with_fragments<I>(mut self, fragments: I) -> Self
    where
        I: IntoIterator<Item = TextFragment>,
    {
        self.fragments.extend(fragments);
        self
    }

    /// Make reading the given page fail with a message.
    pub fn fail_on_page(mut self, page: u32, message: impl Into<String>) -> Self {
        self.failures.insert(page, message.into());
        self
    }
}

impl DocumentSource for MemorySource {
    fn metadata_title(&self) -> Option<String> {
        self.title.clone()
    }

    fn native_outline(&self) -> Result<Vec<NativeOutlineEntry>> {
        Ok(self.outline.clone())
    }

    fn page_count(&self) -> u32 {
        self.page_count
    }

    fn page_fragments(&self, page: u32) -> Result<Vec<TextFragment>> {
        if page == 0 || page > self.page_count {
            return Err(Error::PageOutOfRange(page, self.page_count));
        }
        if let Some(message) = self.failures.get(&page) {
            return Err(Error::TextExtract(format!("Page {}: {}", page, message)));
        }
        Ok(self
            .fragments
            .iter()
            .filter(|f| f.page == page)
            .cloned()
            .collect())
    }
}
