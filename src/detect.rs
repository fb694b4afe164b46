//! PDF header detection.
//!
//! Inputs are checked for the `%PDF-` marker before they are handed to the
//! parser, so that non-PDF files fail fast with [`Error::UnknownFormat`].

use crate::error::{Error, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
const VERSION_LEN: usize = 3; // e.g., "1.7"

/// Readers tolerate junk before the header within this many bytes.
const HEADER_SEARCH_LIMIT: usize = 1024;

/// Detect the PDF version of a file.
///
/// # Returns
/// * `Ok(version)` if the file starts with a PDF header
/// * `Err(Error::UnknownFormat)` if the file is not a PDF
pub fn detect_version_from_path<P: AsRef<Path>>(path: P) -> Result<String> {
    let file = File::open(path)?;
    let mut header = Vec::with_capacity(HEADER_SEARCH_LIMIT);
    file.take(HEADER_SEARCH_LIMIT as u64)
        .read_to_end(&mut header)?;
    detect_version_from_bytes(&header)
}

/// Detect the PDF version from the first bytes of a document.
pub fn detect_version_from_bytes(data: &[u8]) -> Result<String> {
    let window = &data[..data.len().min(HEADER_SEARCH_LIMIT)];
    let start = window
        .windows(PDF_MAGIC.len())
        .position(|w| w == PDF_MAGIC)
        .ok_or(Error::UnknownFormat)?;

    let version_start = start + PDF_MAGIC.len();
    let version_bytes = data
        .get(version_start..version_start + VERSION_LEN)
        .ok_or(Error::UnknownFormat)?;
    let version = String::from_utf8_lossy(version_bytes).to_string();

    if !is_valid_version(&version) {
        return Err(Error::UnknownFormat);
    }
    Ok(version)
}

/// Check if a version string looks like `1.7`.
fn is_valid_version(version: &str) -> bool {
    let chars: Vec<char> = version.chars().collect();
    chars.len() == 3 && chars[0].is_ascii_digit() && chars[1] == '.' && chars[2].is_ascii_digit()
}

/// Check if a file is a PDF.
pub fn is_pdf<P: AsRef<Path>>(path: P) -> bool {
    detect_version_from_path(path).is_ok()
}

/// Check if bytes represent a PDF.
pub fn is_pdf_bytes(data: &[u8]) -> bool {
    detect_version_from_bytes(data).is_ok()
}
