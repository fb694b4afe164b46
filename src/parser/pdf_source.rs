//! lopdf-backed document source.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::io::Read;
use std::path::Path;

use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId};

use crate::detect::{detect_version_from_bytes, detect_version_from_path};
use crate::error::{Error, Result};
use crate::model::{strip_subset_prefix, NativeOutlineEntry, TextFragment};

use super::backend::DocumentSource;
use super::content::{decode_text_simple, get_number, ContentWalker, PageFont};

/// FontDescriptor flag bit 19: ForceBold.
const FORCE_BOLD_FLAG: i64 = 1 << 18;

/// FontWeight at or above this is treated as bold.
const BOLD_WEIGHT: f32 = 700.0;

/// Letter height, used when no MediaBox is found.
const DEFAULT_PAGE_HEIGHT: f32 = 792.0;

/// Bounds recursion through indirect destinations and name trees.
const MAX_RESOLVE_DEPTH: u8 = 32;

/// A PDF document loaded with lopdf.
pub struct LopdfSource {
    doc: LopdfDocument,
    pages: BTreeMap<u32, ObjectId>,
}

impl LopdfSource {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        // Verify it's a PDF
        detect_version_from_path(path)?;

        let doc = LopdfDocument::load(path).map_err(|e| match e {
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::from(e),
        })?;
        Ok(Self::from_document(doc))
    }

    /// Parse a PDF from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        detect_version_from_bytes(data)?;

        let doc = LopdfDocument::load_mem(data).map_err(|e| match e {
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::from(e),
        })?;
        Ok(Self::from_document(doc))
    }

    /// Parse a PDF from a reader.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(&data)
    }

    /// Wrap an already loaded lopdf document.
    pub fn from_document(doc: LopdfDocument) -> Self {
        let pages = doc.get_pages();
        if doc.is_encrypted() {
            log::warn!("Document is encrypted; text may not be readable");
        }
        Self { doc, pages }
    }

    /// PDF version from the file header.
    pub fn version(&self) -> String {
        self.doc.version.to_string()
    }

    fn page_id(&self, page: u32) -> Result<ObjectId> {
        self.pages
            .get(&page)
            .copied()
            .ok_or(Error::PageOutOfRange(page, self.pages.len() as u32))
    }

    fn page_number(&self, id: ObjectId) -> Option<u32> {
        self.pages
            .iter()
            .find(|(_, page_id)| **page_id == id)
            .map(|(num, _)| *num)
    }

    /// Follow a reference to its object; other objects are returned as is.
    fn resolve<'a>(&'a self, obj: &'a Object) -> &'a Object {
        match obj {
            Object::Reference(id) => self.doc.get_object(*id).unwrap_or(obj),
            _ => obj,
        }
    }

    fn resolve_dict<'a>(&'a self, obj: &'a Object) -> Option<&'a Dictionary> {
        match self.resolve(obj) {
            Object::Dictionary(d) => Some(d),
            Object::Stream(s) => Some(&s.dict),
            _ => None,
        }
    }

    fn dict_string(&self, dict: &Dictionary, key: &[u8]) -> Option<String> {
        dict.get(key)
            .ok()
            .and_then(|obj| pdf_string(self.resolve(obj)))
    }

    /// Page height from the MediaBox, inherited through the page tree.
    fn page_height(&self, page_id: ObjectId) -> f32 {
        let mut current = self.doc.get_dictionary(page_id).ok();
        let mut hops = 0;
        while let Some(dict) = current {
            let media_box = dict
                .get(b"MediaBox")
                .ok()
                .map(|o| self.resolve(o))
                .and_then(|o| o.as_array().ok());
            if let Some(array) = media_box {
                if array.len() >= 4 {
                    let y0 = get_number(self.resolve(&array[1])).unwrap_or(0.0);
                    let y1 = get_number(self.resolve(&array[3])).unwrap_or(DEFAULT_PAGE_HEIGHT);
                    return (y1 - y0).abs();
                }
            }
            hops += 1;
            if hops > MAX_RESOLVE_DEPTH {
                break;
            }
            current = dict.get(b"Parent").ok().and_then(|p| self.resolve_dict(p));
        }
        DEFAULT_PAGE_HEIGHT
    }

    /// Resolve the page's font resources to family names and bold flags.
    fn page_fonts(&self, lopdf_fonts: &BTreeMap<Vec<u8>, &Dictionary>) -> HashMap<Vec<u8>, PageFont> {
        lopdf_fonts
            .iter()
            .map(|(name, font)| {
                let base_font = font
                    .get(b"BaseFont")
                    .ok()
                    .and_then(|o| o.as_name().ok())
                    .map(|n| String::from_utf8_lossy(n).to_string())
                    .unwrap_or_else(|| String::from_utf8_lossy(name).to_string());
                let info = PageFont {
                    family: strip_subset_prefix(&base_font).to_string(),
                    flags_bold: self.descriptor_bold(font),
                };
                (name.clone(), info)
            })
            .collect()
    }

    /// Bold according to the FontDescriptor, looking through Type0
    /// descendant fonts.
    fn descriptor_bold(&self, font: &Dictionary) -> bool {
        let descriptor = font
            .get(b"FontDescriptor")
            .ok()
            .and_then(|d| self.resolve_dict(d))
            .or_else(|| {
                font.get(b"DescendantFonts")
                    .ok()
                    .and_then(|o| self.resolve(o).as_array().ok())
                    .and_then(|fonts| fonts.first())
                    .and_then(|f| self.resolve_dict(f))
                    .and_then(|f| f.get(b"FontDescriptor").ok())
                    .and_then(|d| self.resolve_dict(d))
            });

        let Some(descriptor) = descriptor else {
            return false;
        };
        let flags = descriptor
            .get(b"Flags")
            .ok()
            .and_then(|o| o.as_i64().ok())
            .unwrap_or(0);
        let weight = descriptor
            .get(b"FontWeight")
            .ok()
            .and_then(|o| get_number(self.resolve(o)))
            .unwrap_or(0.0);

        flags & FORCE_BOLD_FLAG != 0 || weight >= BOLD_WEIGHT
    }

    /// Get destination page from an outline item.
    fn outline_destination(&self, item: &Dictionary) -> Option<u32> {
        if let Ok(dest) = item.get(b"Dest") {
            return self.resolve_destination(dest, 0);
        }

        // GoTo action, inline or referenced
        let action = item.get(b"A").ok().and_then(|a| self.resolve_dict(a))?;
        let dest = action.get(b"D").ok()?;
        self.resolve_destination(dest, 0)
    }

    /// Resolve an explicit or named destination to a page number.
    fn resolve_destination(&self, dest: &Object, depth: u8) -> Option<u32> {
        if depth > MAX_RESOLVE_DEPTH {
            return None;
        }

        match self.resolve(dest) {
            Object::Array(dest_array) => match dest_array.first()? {
                Object::Reference(page_ref) => self.page_number(*page_ref),
                // Remote destinations carry a zero-based page index.
                Object::Integer(index) => u32::try_from(*index).ok().map(|i| i + 1),
                _ => None,
            },
            Object::Dictionary(d) => d
                .get(b"D")
                .ok()
                .and_then(|inner| self.resolve_destination(inner, depth + 1)),
            Object::Name(name) | Object::String(name, _) => self
                .named_destination(name)
                .and_then(|inner| self.resolve_destination(inner, depth + 1)),
            _ => None,
        }
    }

    /// Look a name up in the catalog's /Dests dictionary or the /Names tree.
    fn named_destination(&self, name: &[u8]) -> Option<&Object> {
        let catalog = self.doc.catalog().ok()?;

        if let Some(dests) = catalog.get(b"Dests").ok().and_then(|d| self.resolve_dict(d)) {
            if let Ok(dest) = dests.get(name) {
                return Some(dest);
            }
        }

        let names = catalog.get(b"Names").ok().and_then(|n| self.resolve_dict(n))?;
        let tree = names.get(b"Dests").ok().and_then(|d| self.resolve_dict(d))?;
        self.lookup_name_tree(tree, name, 0)
    }

    fn lookup_name_tree<'a>(
        &'a self,
        node: &'a Dictionary,
        key: &[u8],
        depth: u8,
    ) -> Option<&'a Object> {
        if depth > MAX_RESOLVE_DEPTH {
            return None;
        }

        if let Some(names) = node
            .get(b"Names")
            .ok()
            .and_then(|n| self.resolve(n).as_array().ok())
        {
            for pair in names.chunks_exact(2) {
                if let Object::String(k, _) = self.resolve(&pair[0]) {
                    if k.as_slice() == key {
                        return Some(&pair[1]);
                    }
                }
            }
        }

        let kids = node
            .get(b"Kids")
            .ok()
            .and_then(|k| self.resolve(k).as_array().ok())?;
        kids.iter()
            .filter_map(|kid| self.resolve_dict(kid))
            .find_map(|kid| self.lookup_name_tree(kid, key, depth + 1))
    }
}

impl DocumentSource for LopdfSource {
    fn metadata_title(&self) -> Option<String> {
        let info = self.doc.trailer.get(b"Info").ok()?;
        let info_dict = self.resolve_dict(info)?;
        self.dict_string(info_dict, b"Title")
    }

    fn native_outline(&self) -> Result<Vec<NativeOutlineEntry>> {
        let mut entries = Vec::new();

        let first = self
            .doc
            .catalog()
            .ok()
            .and_then(|catalog| catalog.get(b"Outlines").ok())
            .and_then(|outlines| self.resolve_dict(outlines))
            .and_then(|outlines| outlines.get(b"First").ok())
            .and_then(|first| first.as_reference().ok());
        let Some(first) = first else {
            return Ok(entries);
        };

        // Preorder walk: a node's children come before its next sibling.
        let mut visited = HashSet::new();
        let mut stack = vec![(first, 1u32)];
        while let Some((item_ref, depth)) = stack.pop() {
            if !visited.insert(item_ref) {
                log::warn!("Outline item {:?} visited twice; skipping cycle", item_ref);
                continue;
            }
            let Ok(item) = self.doc.get_dictionary(item_ref) else {
                continue;
            };

            let title = self.dict_string(item, b"Title").unwrap_or_default();
            let page = self.outline_destination(item);
            if page.is_none() {
                log::warn!("Could not resolve the page of bookmark {:?}", title);
            }
            entries.push(NativeOutlineEntry::new(depth, title, page));

            if let Ok(next) = item.get(b"Next").and_then(Object::as_reference) {
                stack.push((next, depth));
            }
            if let Ok(child) = item.get(b"First").and_then(Object::as_reference) {
                stack.push((child, depth + 1));
            }
        }

        Ok(entries)
    }

    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn page_fragments(&self, page: u32) -> Result<Vec<TextFragment>> {
        let page_id = self.page_id(page)?;

        let lopdf_fonts = self
            .doc
            .get_page_fonts(page_id)
            .map_err(|e| Error::TextExtract(format!("Page {}: {}", page, e)))?;
        let fonts = self.page_fonts(&lopdf_fonts);

        let content = self
            .doc
            .get_page_content(page_id)
            .map_err(|e| Error::TextExtract(format!("Page {}: {}", page, e)))?;

        let walker = ContentWalker::new(
            &self.doc,
            &fonts,
            &lopdf_fonts,
            page,
            self.page_height(page_id),
        );
        walker.walk(&content)
    }
}

/// Decode a PDF text string (UTF-16BE with BOM, UTF-8, or Latin-1).
fn pdf_string(obj: &Object) -> Option<String> {
    match obj {
        Object::String(bytes, _) => Some(decode_text_simple(bytes)),
        Object::Name(bytes) => String::from_utf8(bytes.clone()).ok(),
        _ => None,
    }
}
