//! Error types for pdfoutline.

use std::io;
use thiserror::Error;

/// Result type alias for pdfoutline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while extracting an outline.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading inputs or writing artifacts.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file is not recognized as PDF.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The PDF document is encrypted and cannot be read.
    #[error("Document is encrypted")]
    Encrypted,

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// Error extracting text fragments from a page.
    #[error("Text extraction error: {0}")]
    TextExtract(String),

    /// Error serializing the outline artifact.
    #[error("Rendering error: {0}")]
    Render(String),

    /// Invalid outline configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// No PDF backend was compiled into this build.
    #[error("PDF backend not available. Rebuild with the `lopdf-backend` feature.")]
    BackendUnavailable,
}

impl Error {
    /// Whether this error means the environment cannot parse PDFs at all,
    /// as opposed to a fault in one particular document.
    pub fn is_environment_fault(&self) -> bool {
        matches!(self, Error::BackendUnavailable)
    }
}

#[cfg(feature = "lopdf-backend")]
impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            Error::Io(err.into())
        } else {
            Error::Render(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Encrypted;
        assert_eq!(err.to_string(), "Document is encrypted");

        let err = Error::PageOutOfRange(10, 5);
        assert_eq!(
            err.to_string(),
            "Page 10 is out of range (document has 5 pages)"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_environment_fault() {
        assert!(Error::BackendUnavailable.is_environment_fault());
        assert!(!Error::Encrypted.is_environment_fault());
        assert!(!Error::UnknownFormat.is_environment_fault());
    }
}
