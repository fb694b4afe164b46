//! Integration tests for the embedded-outline path.

use pdfoutline::render::{to_json, JsonFormat};
use pdfoutline::{
    HeadingLevel, MemorySource, NativeOutlineEntry, OutlineEntry, OutlineExtractor, TextFragment,
};

#[test]
fn test_native_outline_mapping() {
    let source = MemorySource::new(2)
        .with_outline_entry(NativeOutlineEntry::new(1, "Introduction", Some(1)))
        .with_outline_entry(NativeOutlineEntry::new(3, "Details", Some(2)));

    let outline = OutlineExtractor::new()
        .extract_source(&source, "manual")
        .unwrap();

    assert_eq!(outline.title, "manual");
    assert_eq!(
        outline.outline,
        vec![
            OutlineEntry::new(HeadingLevel::H1, "Introduction", 1),
            OutlineEntry::new(HeadingLevel::H3, "Details", 2),
        ]
    );

    let json = to_json(&outline, JsonFormat::Compact).unwrap();
    assert_eq!(
        json,
        r#"{"title":"manual","outline":[{"level":"H1","text":"Introduction","page":1},{"level":"H3","text":"Details","page":2}]}"#
    );
}

#[test]
fn test_native_outline_keeps_metadata_title() {
    let source = MemorySource::new(1)
        .with_title("Installation Guide")
        .with_outline_entry(NativeOutlineEntry::new(1, "Overview", Some(1)));

    let outline = OutlineExtractor::new()
        .extract_source(&source, "guide_v2")
        .unwrap();

    // The title is never inferred on this path.
    assert_eq!(outline.title, "Installation Guide");
}

#[test]
fn test_native_outline_is_not_filtered_by_heuristics() {
    // Short, captioned and numbered bookmarks survive as long as they have
    // a letter; only letterless titles are dropped.
    let source = MemorySource::new(3)
        .with_outline_entry(NativeOutlineEntry::new(1, "A", Some(1)))
        .with_outline_entry(NativeOutlineEntry::new(2, "Figure 1", Some(2)))
        .with_outline_entry(NativeOutlineEntry::new(2, "3.1", Some(2)))
        .with_outline_entry(NativeOutlineEntry::new(2, "Figure 1", Some(2)))
        .with_outline_entry(NativeOutlineEntry::new(7, "  Deep  ", Some(3)));

    let outline = OutlineExtractor::new()
        .extract_source(&source, "doc")
        .unwrap();

    let texts: Vec<&str> = outline.outline.iter().map(|e| e.text.as_str()).collect();
    assert_eq!(texts, vec!["A", "Figure 1", "Figure 1", "Deep"]);
    assert_eq!(outline.outline[3].level, HeadingLevel::H3);
}

#[test]
fn test_native_outline_ignores_page_text() {
    let source = MemorySource::new(1)
        .with_outline_entry(NativeOutlineEntry::new(1, "Only Bookmark", Some(1)))
        .with_fragment(TextFragment::new(
            "Giant Bold Heading",
            "Arial-Bold",
            40.0,
            true,
            1,
            10.0,
        ))
        .fail_on_page(1, "never read");

    let outline = OutlineExtractor::new()
        .extract_source(&source, "doc")
        .unwrap();

    assert_eq!(outline.outline.len(), 1);
    assert_eq!(outline.outline[0].text, "Only Bookmark");
}

#[test]
fn test_unresolved_bookmark_page() {
    let source =
        MemorySource::new(1).with_outline_entry(NativeOutlineEntry::new(1, "Dangling", None));

    let outline = OutlineExtractor::new()
        .extract_source(&source, "doc")
        .unwrap();

    assert_eq!(outline.outline[0].page, 0);
}
