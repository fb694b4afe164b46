//! Document source abstraction.
//!
//! Provides a trait-based interface for everything the outline engine needs
//! from a parsed document, isolating the concrete PDF library (lopdf) from
//! the inference logic.

use crate::error::Result;
use crate::model::{NativeOutlineEntry, TextFragment};

use super::options::ErrorMode;

/// Abstract interface for a parsed document.
///
/// Implementations expose the metadata title, the embedded outline and the
/// text fragments of each page, without exposing any concrete PDF library
/// types. Pages are numbered from 1.
pub trait DocumentSource {
    /// Title from the document's metadata, if any.
    fn metadata_title(&self) -> Option<String>;

    /// Embedded outline flattened in document order (depth starts at 1).
    ///
    /// An empty vector means the document has no outline.
    fn native_outline(&self) -> Result<Vec<NativeOutlineEntry>>;

    /// Number of pages.
    fn page_count(&self) -> u32;

    /// Text fragments of one page, in content order.
    fn page_fragments(&self, page: u32) -> Result<Vec<TextFragment>>;
}

/// Gather the fragments of every page in increasing page order.
///
/// In lenient mode a page that fails is logged and skipped; in strict mode
/// the first failure is returned.
pub fn collect_fragments<S>(source: &S, mode: ErrorMode) -> Result<Vec<TextFragment>>
where
    S: DocumentSource + ?Sized,
{
    let mut fragments = Vec::new();
    for page in 1..=source.page_count() {
        match source.page_fragments(page) {
            Ok(page_fragments) => fragments.extend(page_fragments),
            Err(e) => {
                if mode == ErrorMode::Strict {
                    return Err(e);
                }
                log::warn!("Failed to extract text from page {}: {}", page, e);
            }
        }
    }
    Ok(fragments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::MemorySource;

    fn source() -> MemorySource {
        MemorySource::new(3)
            .with_fragment(TextFragment::new("page three", "F", 10.0, false, 3, 0.0))
            .with_fragment(TextFragment::new("page one", "F", 10.0, false, 1, 0.0))
            .fail_on_page(2, "broken content stream")
    }

    #[test]
    fn test_collect_strict_fails() {
        let result = collect_fragments(&source(), ErrorMode::Strict);
        assert!(result.is_err());
    }

    #[test]
    fn test_collect_lenient_skips_page() {
        let fragments = collect_fragments(&source(), ErrorMode::Lenient).unwrap();
        let texts: Vec<&str> = fragments.iter().map(|f| f.text.as_str()).collect();
        assert_eq!(texts, vec!["page one", "page three"]);
    }
}
