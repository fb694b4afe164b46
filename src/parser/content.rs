//! Content stream walker producing text fragments.
//!
//! Tracks just enough graphics and text state (CTM, text matrix, leading,
//! current font) to place every text-showing operator on the page and to
//! measure its rendered font size.

use std::collections::{BTreeMap, HashMap};

use lopdf::content::Content;
use lopdf::{Dictionary, Document as LopdfDocument, Object};

use crate::error::{Error, Result};
use crate::model::{is_bold_font, TextFragment};

/// Fraction of the font size above the baseline used as the glyph top.
const ASCENT_RATIO: f32 = 0.8;

/// TJ adjustment (thousandths of an em) treated as a word break.
const SPACE_THRESHOLD: f32 = 200.0;

/// Resolved font information for one resource name on a page.
#[derive(Debug, Clone)]
pub(crate) struct PageFont {
    /// Base font name without subset tag
    pub family: String,
    /// Bold according to the font descriptor
    pub flags_bold: bool,
}

/// Affine transform `[a b c d e f]` as used by PDF.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Matrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Matrix {
    const IDENTITY: Matrix = Matrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    fn from_operands(operands: &[Object]) -> Option<Self> {
        if operands.len() < 6 {
            return None;
        }
        Some(Self {
            a: get_number(&operands[0]).unwrap_or(1.0),
            b: get_number(&operands[1]).unwrap_or(0.0),
            c: get_number(&operands[2]).unwrap_or(0.0),
            d: get_number(&operands[3]).unwrap_or(1.0),
            e: get_number(&operands[4]).unwrap_or(0.0),
            f: get_number(&operands[5]).unwrap_or(0.0),
        })
    }

    /// `self × other`
    fn multiply(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    fn translated(&self, tx: f32, ty: f32) -> Matrix {
        Matrix {
            e: tx,
            f: ty,
            ..Matrix::IDENTITY
        }
        .multiply(self)
    }

    /// Length of the transformed unit vertical vector.
    fn vertical_scale(&self) -> f32 {
        (self.c * self.c + self.d * self.d).sqrt()
    }
}

/// Text state inside a BT/ET block.
#[derive(Debug, Clone)]
struct TextState {
    font_key: Vec<u8>,
    font_size: f32,
    leading: f32,
    matrix: Matrix,
    line_matrix: Matrix,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            font_key: Vec::new(),
            font_size: 12.0,
            leading: 0.0,
            matrix: Matrix::IDENTITY,
            line_matrix: Matrix::IDENTITY,
        }
    }
}

impl TextState {
    fn begin(&mut self) {
        self.matrix = Matrix::IDENTITY;
        self.line_matrix = Matrix::IDENTITY;
    }

    fn move_line(&mut self, tx: f32, ty: f32) {
        self.line_matrix = self.line_matrix.translated(tx, ty);
        self.matrix = self.line_matrix;
    }

    fn next_line(&mut self) {
        self.move_line(0.0, -self.leading);
    }
}

/// Walks one page's content stream.
pub(crate) struct ContentWalker<'a> {
    doc: &'a LopdfDocument,
    fonts: &'a HashMap<Vec<u8>, PageFont>,
    lopdf_fonts: &'a BTreeMap<Vec<u8>, &'a Dictionary>,
    page: u32,
    page_height: f32,
}

impl<'a> ContentWalker<'a> {
    pub(crate) fn new(
        doc: &'a LopdfDocument,
        fonts: &'a HashMap<Vec<u8>, PageFont>,
        lopdf_fonts: &'a BTreeMap<Vec<u8>, &'a Dictionary>,
        page: u32,
        page_height: f32,
    ) -> Self {
        Self {
            doc,
            fonts,
            lopdf_fonts,
            page,
            page_height,
        }
    }

    /// Decode the stream and emit one fragment per text-showing operator.
    pub(crate) fn walk(&self, content: &[u8]) -> Result<Vec<TextFragment>> {
        let content = Content::decode(content)
            .map_err(|e| Error::TextExtract(format!("Page {}: {}", self.page, e)))?;

        let mut fragments = Vec::new();
        let mut ctm = Matrix::IDENTITY;
        let mut ctm_stack: Vec<Matrix> = Vec::new();
        let mut state = TextState::default();
        let mut in_text_block = false;

        for op in content.operations {
            match op.operator.as_str() {
                "q" => ctm_stack.push(ctm),
                "Q" => {
                    if let Some(saved) = ctm_stack.pop() {
                        ctm = saved;
                    }
                }
                "cm" => {
                    if let Some(m) = Matrix::from_operands(&op.operands) {
                        ctm = m.multiply(&ctm);
                    }
                }
                "BT" => {
                    in_text_block = true;
                    state.begin();
                }
                "ET" => {
                    in_text_block = false;
                }
                "Tf" => {
                    if op.operands.len() >= 2 {
                        if let Object::Name(font_name) = &op.operands[0] {
                            state.font_key = font_name.clone();
                        }
                        state.font_size = get_number(&op.operands[1]).unwrap_or(12.0);
                    }
                }
                "TL" => {
                    if let Some(leading) = op.operands.first().and_then(get_number) {
                        state.leading = leading;
                    }
                }
                "Td" | "TD" => {
                    if op.operands.len() >= 2 {
                        let tx = get_number(&op.operands[0]).unwrap_or(0.0);
                        let ty = get_number(&op.operands[1]).unwrap_or(0.0);
                        if op.operator == "TD" {
                            state.leading = -ty;
                        }
                        state.move_line(tx, ty);
                    }
                }
                "Tm" => {
                    if let Some(m) = Matrix::from_operands(&op.operands) {
                        state.matrix = m;
                        state.line_matrix = m;
                    }
                }
                "T*" => state.next_line(),
                "Tj" => {
                    if in_text_block {
                        if let Some(Object::String(bytes, _)) = op.operands.first() {
                            let text = self.decode(&state.font_key, bytes);
                            self.emit(text, &state, &ctm, &mut fragments);
                        }
                    }
                }
                "TJ" => {
                    if in_text_block {
                        if let Some(Object::Array(items)) = op.operands.first() {
                            let text = self.decode_array(&state.font_key, items);
                            self.emit(text, &state, &ctm, &mut fragments);
                        }
                    }
                }
                "'" | "\"" => {
                    state.next_line();
                    if in_text_block {
                        let text_idx = if op.operator == "\"" { 2 } else { 0 };
                        if let Some(Object::String(bytes, _)) = op.operands.get(text_idx) {
                            let text = self.decode(&state.font_key, bytes);
                            self.emit(text, &state, &ctm, &mut fragments);
                        }
                    }
                }
                _ => {}
            }
        }

        Ok(fragments)
    }

    /// Decode a string operand with the font's encoding when available.
    fn decode(&self, font_key: &[u8], bytes: &[u8]) -> String {
        let encoding = self
            .lopdf_fonts
            .get(font_key)
            .and_then(|f| f.get_font_encoding(self.doc).ok());

        match encoding {
            Some(ref enc) => LopdfDocument::decode_text(enc, bytes).unwrap_or_default(),
            None => decode_text_simple(bytes),
        }
    }

    /// Decode a TJ array, turning large negative adjustments into spaces.
    fn decode_array(&self, font_key: &[u8], items: &[Object]) -> String {
        let mut combined = String::new();
        for item in items {
            match item {
                Object::String(bytes, _) => combined.push_str(&self.decode(font_key, bytes)),
                Object::Integer(_) | Object::Real(_) => {
                    let adjustment = -get_number(item).unwrap_or(0.0);
                    if adjustment > SPACE_THRESHOLD && needs_space(&combined) {
                        combined.push(' ');
                    }
                }
                _ => {}
            }
        }
        combined
    }

    /// Record one text-showing operation. Blank text is kept: it still
    /// counts toward the font statistics and is rejected later.
    fn emit(&self, text: String, state: &TextState, ctm: &Matrix, out: &mut Vec<TextFragment>) {
        let rendering = state.matrix.multiply(ctm);
        let size = (state.font_size * rendering.vertical_scale()).abs();
        if size.is_nan() || size <= 0.0 {
            return;
        }

        let font = self.fonts.get(&state.font_key);
        let family = font
            .map(|f| f.family.clone())
            .unwrap_or_else(|| String::from_utf8_lossy(&state.font_key).to_string());
        let bold = is_bold_font(&family, font.is_some_and(|f| f.flags_bold));
        let top = rendering.f + size * ASCENT_RATIO;

        out.push(TextFragment::new(
            text,
            family,
            size,
            bold,
            self.page,
            self.page_height - top,
        ));
    }
}

/// Whether a word-break adjustment should insert a space after `text`.
fn needs_space(text: &str) -> bool {
    match text.chars().last() {
        Some(c) => c != ' ' && c != '\u{00A0}' && !is_spaceless_script_char(c),
        None => false,
    }
}

/// Helper to extract number from PDF object.
pub(crate) fn get_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Check if character is from a script that doesn't use word spaces.
/// Chinese and Japanese don't use spaces between words, but Korean does.
fn is_spaceless_script_char(c: char) -> bool {
    let code = c as u32;

    // CJK Unified Ideographs and Extension A
    (0x4E00..=0x9FFF).contains(&code)
    || (0x3400..=0x4DBF).contains(&code)
    // Extensions B-F
    || (0x20000..=0x2EBEF).contains(&code)
    // Hiragana, Katakana
    || (0x3040..=0x30FF).contains(&code)
    // CJK Symbols and Punctuation
    || (0x3000..=0x303F).contains(&code)
}

/// Text decoding fallback when no encoding is available.
pub(crate) fn decode_text_simple(bytes: &[u8]) -> String {
    // UTF-16BE with BOM
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&utf16);
    }

    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    // Latin-1
    bytes.iter().map(|&b| b as char).collect()
}
