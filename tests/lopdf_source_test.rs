//! Integration tests for the lopdf document source, using PDFs built in
//! memory.

#![cfg(feature = "lopdf-backend")]

use lopdf::{dictionary, Document, Object, ObjectId, Stream};

use pdfoutline::{
    DocumentSource, Error, HeadingLevel, LopdfSource, OutlineEntry, OutlineExtractor,
};

const BODY_LINES: usize = 8;

/// Page content: a heading line followed by body lines.
fn page_content(heading_font: &str, heading_size: u32, heading: &str) -> String {
    let mut content = format!(
        "BT /{} {} Tf 72 760 Td ({}) Tj ET\n",
        heading_font, heading_size, heading
    );
    content.push_str("BT /F1 10 Tf 72 700 Td 12 TL\n");
    for i in 0..BODY_LINES {
        content.push_str(&format!(
            "T* (Body line {} with ordinary running text for statistics.) Tj\n",
            i
        ));
    }
    content.push_str("ET\n");
    content
}

/// Builds a document with Helvetica as /F1 and Helvetica-Bold as /F2.
struct PdfBuilder {
    doc: Document,
    pages_id: ObjectId,
    resources: Object,
    page_ids: Vec<ObjectId>,
}

impl PdfBuilder {
    fn new() -> Self {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let regular = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let bold = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica-Bold",
        });
        let resources = Object::Dictionary(dictionary! {
            "Font" => Object::Dictionary(dictionary! {
                "F1" => regular,
                "F2" => bold,
            }),
        });
        Self {
            doc,
            pages_id,
            resources,
            page_ids: Vec::new(),
        }
    }

    fn add_font(&mut self, name: &str, font: lopdf::Dictionary) {
        let font_id = self.doc.add_object(font);
        if let Object::Dictionary(resources) = &mut self.resources {
            if let Ok(Object::Dictionary(fonts)) = resources.get_mut(b"Font") {
                fonts.set(name, font_id);
            }
        }
    }

    fn add_page(&mut self, content: &str) -> ObjectId {
        let content_id = self.doc.add_object(Object::Stream(Stream::new(
            lopdf::Dictionary::new(),
            content.as_bytes().to_vec(),
        )));
        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "Contents" => content_id,
            "Resources" => self.resources.clone(),
        });
        self.page_ids.push(page_id);
        page_id
    }

    fn set_title(&mut self, title: &str) {
        let info_id = self.doc.add_object(dictionary! {
            "Title" => Object::string_literal(title),
        });
        self.doc.trailer.set("Info", info_id);
    }

    /// Finish with an optional catalog entry (e.g. Outlines, Dests).
    fn build(mut self, catalog_extra: Vec<(&str, Object)>) -> Vec<u8> {
        let kids: Vec<Object> = self.page_ids.iter().map(|id| Object::from(*id)).collect();
        let count = kids.len() as i64;
        self.doc.objects.insert(
            self.pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );

        let mut catalog = dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        };
        for (key, value) in catalog_extra {
            catalog.set(key, value);
        }
        let catalog_id = self.doc.add_object(catalog);
        self.doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        self.doc.save_to(&mut buf).unwrap();
        buf
    }
}

#[test]
fn test_page_fragments_fonts_and_positions() {
    let mut builder = PdfBuilder::new();
    builder.add_page(&page_content("F2", 24, "Quarterly Results"));
    let data = builder.build(vec![]);

    let source = LopdfSource::from_bytes(&data).unwrap();
    assert_eq!(source.page_count(), 1);

    let fragments = source.page_fragments(1).unwrap();
    assert_eq!(fragments.len(), 1 + BODY_LINES);

    let heading = &fragments[0];
    assert_eq!(heading.text, "Quarterly Results");
    assert_eq!(heading.font_family, "Helvetica-Bold");
    assert_eq!(heading.font_size, 24.0);
    assert!(heading.bold);
    assert_eq!(heading.page, 1);

    let body = &fragments[1];
    assert_eq!(body.font_family, "Helvetica");
    assert_eq!(body.font_size, 10.0);
    assert!(!body.bold);

    // Headings at the top of the page sit above the body lines, and each
    // body line sits below the previous one.
    assert!(heading.position < body.position);
    for pair in fragments[1..].windows(2) {
        assert!(pair[0].position < pair[1].position);
    }
}

#[test]
fn test_page_out_of_range() {
    let mut builder = PdfBuilder::new();
    builder.add_page(&page_content("F2", 24, "Heading"));
    let source = LopdfSource::from_bytes(&builder.build(vec![])).unwrap();

    assert!(matches!(
        source.page_fragments(5),
        Err(Error::PageOutOfRange(5, 1))
    ));
}

#[test]
fn test_transform_scales_size_and_position() {
    let mut builder = PdfBuilder::new();
    builder.add_page("q 2 0 0 2 0 0 cm BT /F1 10 Tf 36 360 Td (Scaled text) Tj ET Q");
    let source = LopdfSource::from_bytes(&builder.build(vec![])).unwrap();

    let fragments = source.page_fragments(1).unwrap();
    assert_eq!(fragments.len(), 1);
    assert_eq!(fragments[0].font_size, 20.0);
    // 842 - (720 + 20 * 0.8)
    assert!((fragments[0].position - 106.0).abs() < 0.01);
}

#[test]
fn test_subset_prefix_and_descriptor_bold() {
    let mut builder = PdfBuilder::new();
    let descriptor = builder.doc.add_object(dictionary! {
        "Type" => "FontDescriptor",
        "FontName" => "ABCDEF+Garamond",
        "Flags" => 262_178i64,
    });
    builder.add_font(
        "F3",
        dictionary! {
            "Type" => "Font",
            "Subtype" => "TrueType",
            "BaseFont" => "ABCDEF+Garamond",
            "FontDescriptor" => descriptor,
        },
    );
    builder.add_page("BT /F3 14 Tf 72 700 Td (Descriptor Bold) Tj ET");
    let source = LopdfSource::from_bytes(&builder.build(vec![])).unwrap();

    let fragments = source.page_fragments(1).unwrap();
    assert_eq!(fragments[0].font_family, "Garamond");
    assert!(fragments[0].bold);
}

#[test]
fn test_heuristic_outline_from_pdf() {
    let mut builder = PdfBuilder::new();
    builder.add_page(&page_content("F2", 24, "Quarterly Results"));
    builder.add_page(&page_content("F2", 14, "Revenue Breakdown"));
    let data = builder.build(vec![]);

    let outline = OutlineExtractor::new()
        .extract_bytes(&data, "q3_report")
        .unwrap();

    assert_eq!(outline.title, "Quarterly Results");
    assert_eq!(
        outline.outline,
        vec![
            OutlineEntry::new(HeadingLevel::H1, "Quarterly Results", 1),
            OutlineEntry::new(HeadingLevel::H2, "Revenue Breakdown", 2),
        ]
    );
}

#[test]
fn test_blank_text_reaches_statistics() {
    let mut builder = PdfBuilder::new();
    builder.add_page(
        "BT /F2 8 Tf 72 800 Td ( ) Tj ( ) Tj ( ) Tj ET\n\
         BT /F2 12 Tf 72 760 Td (Heading Bold) Tj 0 -30 Td (Another One) Tj ET",
    );
    let data = builder.build(vec![]);

    let source = LopdfSource::from_bytes(&data).unwrap();
    let fragments = source.page_fragments(1).unwrap();
    assert_eq!(fragments.len(), 5);
    for blank in &fragments[..3] {
        assert!(blank.text.trim().is_empty());
        assert_eq!(blank.font_size, 8.0);
    }
    assert_eq!(fragments[3].text, "Heading Bold");
    assert_eq!(fragments[4].text, "Another One");

    // Blank runs make 8pt the body size, so both 12pt lines clear H2.
    let outline = OutlineExtractor::new().extract_bytes(&data, "doc").unwrap();
    assert_eq!(outline.title, "doc");
    assert_eq!(
        outline.outline,
        vec![
            OutlineEntry::new(HeadingLevel::H2, "Heading Bold", 1),
            OutlineEntry::new(HeadingLevel::H2, "Another One", 1),
        ]
    );
}

#[test]
fn test_metadata_title() {
    let mut builder = PdfBuilder::new();
    builder.set_title("Annual Report 2024");
    builder.add_page(&page_content("F2", 24, "Quarterly Results"));
    let data = builder.build(vec![]);

    let source = LopdfSource::from_bytes(&data).unwrap();
    assert_eq!(source.metadata_title(), Some("Annual Report 2024".to_string()));

    let outline = OutlineExtractor::new().extract_bytes(&data, "ar").unwrap();
    assert_eq!(outline.title, "Annual Report 2024");
}

#[test]
fn test_native_outline_from_pdf() {
    let mut builder = PdfBuilder::new();
    let page1 = builder.add_page(&page_content("F2", 24, "Ignored Heading"));
    let page2 = builder.add_page(&page_content("F2", 24, "Also Ignored"));

    let outlines_id = builder.doc.new_object_id();
    let intro_id = builder.doc.new_object_id();
    let details_id = builder.doc.new_object_id();
    let appendix_id = builder.doc.new_object_id();

    builder.doc.objects.insert(
        details_id,
        Object::Dictionary(dictionary! {
            "Title" => Object::string_literal("Details"),
            "Parent" => intro_id,
            "Dest" => vec![Object::from(page1), "Fit".into()],
        }),
    );
    builder.doc.objects.insert(
        intro_id,
        Object::Dictionary(dictionary! {
            "Title" => Object::string_literal("Introduction"),
            "Parent" => outlines_id,
            "First" => details_id,
            "Last" => details_id,
            "Next" => appendix_id,
            "Dest" => vec![Object::from(page1), "Fit".into()],
        }),
    );
    // Named destination reached through a GoTo action.
    builder.doc.objects.insert(
        appendix_id,
        Object::Dictionary(dictionary! {
            "Title" => Object::string_literal("Appendix"),
            "Parent" => outlines_id,
            "Prev" => intro_id,
            "A" => Object::Dictionary(dictionary! {
                "S" => "GoTo",
                "D" => Object::Name(b"appendix".to_vec()),
            }),
        }),
    );
    builder.doc.objects.insert(
        outlines_id,
        Object::Dictionary(dictionary! {
            "Type" => "Outlines",
            "First" => intro_id,
            "Last" => appendix_id,
            "Count" => 3i64,
        }),
    );
    let dests = Object::Dictionary(dictionary! {
        "appendix" => vec![Object::from(page2), "Fit".into()],
    });
    let data = builder.build(vec![("Outlines", Object::from(outlines_id)), ("Dests", dests)]);

    let source = LopdfSource::from_bytes(&data).unwrap();
    let native = source.native_outline().unwrap();
    let flat: Vec<(u32, &str, Option<u32>)> = native
        .iter()
        .map(|e| (e.depth, e.text.as_str(), e.page))
        .collect();
    assert_eq!(
        flat,
        vec![
            (1, "Introduction", Some(1)),
            (2, "Details", Some(1)),
            (1, "Appendix", Some(2)),
        ]
    );

    let outline = OutlineExtractor::new().extract_bytes(&data, "manual").unwrap();
    assert_eq!(outline.title, "manual");
    assert_eq!(
        outline.outline,
        vec![
            OutlineEntry::new(HeadingLevel::H1, "Introduction", 1),
            OutlineEntry::new(HeadingLevel::H2, "Details", 1),
            OutlineEntry::new(HeadingLevel::H1, "Appendix", 2),
        ]
    );
}

#[test]
fn test_outline_cycle_terminates() {
    let mut builder = PdfBuilder::new();
    let page1 = builder.add_page(&page_content("F2", 24, "Heading"));

    let outlines_id = builder.doc.new_object_id();
    let item_id = builder.doc.new_object_id();
    builder.doc.objects.insert(
        item_id,
        Object::Dictionary(dictionary! {
            "Title" => Object::string_literal("Loop"),
            "Parent" => outlines_id,
            "Next" => item_id,
            "Dest" => vec![Object::from(page1), "Fit".into()],
        }),
    );
    builder.doc.objects.insert(
        outlines_id,
        Object::Dictionary(dictionary! {
            "Type" => "Outlines",
            "First" => item_id,
        }),
    );
    let data = builder.build(vec![("Outlines", Object::from(outlines_id))]);

    let source = LopdfSource::from_bytes(&data).unwrap();
    let native = source.native_outline().unwrap();
    assert_eq!(native.len(), 1);
    assert_eq!(native[0].text, "Loop");
}

#[test]
fn test_extract_file_and_error_artifact() {
    let dir = tempfile::tempdir().unwrap();

    let mut builder = PdfBuilder::new();
    builder.add_page(&page_content("F2", 24, "Quarterly Results"));
    let good = dir.path().join("good.pdf");
    std::fs::write(&good, builder.build(vec![])).unwrap();

    let bad = dir.path().join("x.pdf");
    std::fs::write(&bad, b"this is not a pdf").unwrap();

    let extractor = OutlineExtractor::new();
    let outline = extractor.extract_file(&good).unwrap();
    assert_eq!(outline.title, "Quarterly Results");

    assert!(matches!(extractor.extract_file(&bad), Err(Error::UnknownFormat)));
    let artifact = extractor.extract_or_report(&bad);
    assert!(artifact.is_error());
    assert_eq!(artifact.title, "Processing Error for x");
    assert_eq!(artifact.outline.len(), 1);
    assert_eq!(artifact.outline[0].level, HeadingLevel::H1);
    assert!(artifact.outline[0].text.starts_with("Error: "));
}

#[test]
fn test_analyze_fonts() {
    let dir = tempfile::tempdir().unwrap();
    let mut builder = PdfBuilder::new();
    builder.add_page(&page_content("F2", 24, "Quarterly Results"));
    let path = dir.path().join("stats.pdf");
    std::fs::write(&path, builder.build(vec![])).unwrap();

    let thresholds = OutlineExtractor::new().analyze_fonts(&path).unwrap().unwrap();
    assert_eq!(thresholds.body, 10.0);
    assert!((thresholds.h1 - 16.0).abs() < 0.001);
}
