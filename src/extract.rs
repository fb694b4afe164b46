//! Per-document extraction: chooses between the embedded outline and
//! heuristic inference, and turns failures into error artifacts.
//!
//! # Example
//!
//! ```no_run
//! use pdfoutline::{OutlineConfig, OutlineExtractor, ParseOptions};
//!
//! fn main() -> pdfoutline::Result<()> {
//!     let extractor = OutlineExtractor::new()
//!         .with_config(OutlineConfig::default())
//!         .with_options(ParseOptions::new().lenient());
//!
//!     let outline = extractor.extract_file("report.pdf")?;
//!     println!("{} headings", outline.len());
//!     Ok(())
//! }
//! ```

use std::path::Path;

use crate::config::OutlineConfig;
use crate::error::{Error, Result};
use crate::infer::{InferenceEngine, Thresholds};
use crate::model::DocumentOutline;
use crate::native::map_native_outline;
use crate::parser::{collect_fragments, DocumentSource, ParseOptions};

/// Stem used when a path has no usable file name.
const FALLBACK_STEM: &str = "document";

/// Extracts the title and outline of single documents.
#[derive(Debug, Clone, Default)]
pub struct OutlineExtractor {
    engine: InferenceEngine,
    options: ParseOptions,
}

impl OutlineExtractor {
    /// Create an extractor with default configuration and options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the heuristic configuration.
    pub fn with_config(mut self, config: OutlineConfig) -> Self {
        self.engine = InferenceEngine::new(config);
        self
    }

    /// Set the parse options.
    pub fn with_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    /// Get the heuristic configuration.
    pub fn config(&self) -> &OutlineConfig {
        self.engine.config()
    }

    /// Get the parse options.
    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Extract the outline of a PDF file.
    pub fn extract_file<P: AsRef<Path>>(&self, path: P) -> Result<DocumentOutline> {
        let path = path.as_ref();
        let source = open_source(path)?;
        self.extract_source(source.as_ref(), &file_stem(path))
    }

    /// Extract the outline of a PDF held in memory.
    ///
    /// `stem` plays the role of the filename stem for the title fallback.
    pub fn extract_bytes(&self, data: &[u8], stem: &str) -> Result<DocumentOutline> {
        let source = source_from_bytes(data)?;
        self.extract_source(source.as_ref(), stem)
    }

    /// Extract the outline from any document source.
    pub fn extract_source<S>(&self, source: &S, stem: &str) -> Result<DocumentOutline>
    where
        S: DocumentSource + ?Sized,
    {
        let title = source
            .metadata_title()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| stem.to_string());

        let native = source.native_outline()?;
        if !native.is_empty() {
            log::info!("Using embedded outline with {} entries", native.len());
            return Ok(DocumentOutline::new(title, map_native_outline(&native)));
        }

        log::info!("No embedded outline; inferring headings from font statistics");
        let fragments = collect_fragments(source, self.options.error_mode)?;
        log::debug!(
            "Collected {} fragments from {} pages",
            fragments.len(),
            source.page_count()
        );
        Ok(self.engine.infer(&fragments, &title, stem))
    }

    /// Extract the outline of a file, producing an error artifact on failure.
    pub fn extract_or_report<P: AsRef<Path>>(&self, path: P) -> DocumentOutline {
        let path = path.as_ref();
        match self.extract_file(path) {
            Ok(outline) => outline,
            Err(e) => failure_artifact(path, &e),
        }
    }

    /// Estimate body size and heading thresholds of a file without
    /// classifying anything.
    pub fn analyze_fonts<P: AsRef<Path>>(&self, path: P) -> Result<Option<Thresholds>> {
        let source = open_source(path.as_ref())?;
        let fragments = collect_fragments(source.as_ref(), self.options.error_mode)?;
        Ok(self.engine.analyze(&fragments))
    }
}

/// Build the artifact written for a document that failed.
///
/// Environment faults (no PDF backend) carry a fixed diagnostic; any other
/// failure carries `Error: <description>`.
pub fn failure_artifact(path: &Path, err: &Error) -> DocumentOutline {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let stem = file_stem(path);

    if err.is_environment_fault() {
        log::error!("Cannot process {}: {}", name, err);
        return DocumentOutline::error_artifact(&stem, &err.to_string());
    }

    log::error!(
        "An unexpected error occurred during PDF processing for {}: {}",
        name,
        err
    );
    DocumentOutline::error_artifact(&stem, &format!("Error: {}", err))
}

/// Filename without its final extension.
pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| FALLBACK_STEM.to_string())
}

/// Open a PDF file with the compiled-in backend.
#[cfg(feature = "lopdf-backend")]
pub fn open_source(path: &Path) -> Result<Box<dyn DocumentSource>> {
    Ok(Box::new(crate::parser::LopdfSource::open(path)?))
}

/// Open a PDF file with the compiled-in backend.
#[cfg(not(feature = "lopdf-backend"))]
pub fn open_source(_path: &Path) -> Result<Box<dyn DocumentSource>> {
    Err(Error::BackendUnavailable)
}

#[cfg(feature = "lopdf-backend")]
fn source_from_bytes(data: &[u8]) -> Result<Box<dyn DocumentSource>> {
    Ok(Box::new(crate::parser::LopdfSource::from_bytes(data)?))
}

#[cfg(not(feature = "lopdf-backend"))]
fn source_from_bytes(_data: &[u8]) -> Result<Box<dyn DocumentSource>> {
    Err(Error::BackendUnavailable)
}
