//! # pdfoutline
//!
//! Document outline extraction from PDF files.
//!
//! For every PDF this library produces a title and a flat, ordered list of
//! headings (H1, H2, H3) with the page each appears on. Documents that carry
//! embedded bookmarks use them directly; all others go through a font-size
//! and weight heuristic that infers headings from the page text.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdfoutline::{extract_outline, render};
//!
//! fn main() -> pdfoutline::Result<()> {
//!     let outline = extract_outline("document.pdf")?;
//!
//!     let json = render::to_json(&outline, render::JsonFormat::Pretty)?;
//!     println!("{}", json);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Batch processing
//!
//! ```no_run
//! use pdfoutline::{BatchProcessor, OutlineExtractor};
//!
//! fn main() -> pdfoutline::Result<()> {
//!     let report = BatchProcessor::new(OutlineExtractor::new())
//!         .process_dir("/app/input", "/app/output")?;
//!     println!("{} of {} extracted", report.extracted(), report.total());
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Embedded outlines first**: bookmarks are mapped without inference
//! - **Heuristic fallback**: body size estimation, noise filtering, title
//!   promotion
//! - **Failure isolation**: a broken document yields an error artifact
//! - **Parallel batches**: uses Rayon across documents

pub mod batch;
pub mod config;
pub mod detect;
pub mod error;
pub mod extract;
pub mod infer;
pub mod model;
pub mod native;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use batch::{BatchProcessor, BatchReport, DocumentReport, DocumentStatus};
pub use config::{OutlineConfig, TitleOverride};
pub use detect::{is_pdf, is_pdf_bytes};
pub use error::{Error, Result};
pub use extract::{failure_artifact, OutlineExtractor};
pub use infer::{InferenceEngine, Thresholds};
pub use model::{
    DocumentOutline, HeadingLevel, NativeOutlineEntry, OutlineEntry, TextFragment,
};
pub use parser::{DocumentSource, ErrorMode, MemorySource, ParseOptions};
#[cfg(feature = "lopdf-backend")]
pub use parser::LopdfSource;
pub use render::JsonFormat;

use std::path::Path;

/// Extract the title and outline of a PDF file.
///
/// # Example
///
/// ```no_run
/// use pdfoutline::extract_outline;
///
/// let outline = extract_outline("document.pdf").unwrap();
/// println!("{}: {} headings", outline.title, outline.len());
/// ```
pub fn extract_outline<P: AsRef<Path>>(path: P) -> Result<DocumentOutline> {
    OutlineExtractor::new().extract_file(path)
}

/// Extract the outline of a PDF file with a custom heuristic configuration.
///
/// # Example
///
/// ```no_run
/// use pdfoutline::{extract_outline_with_config, OutlineConfig};
///
/// let config = OutlineConfig::default().with_factors(1.8, 1.4, 1.15);
/// let outline = extract_outline_with_config("document.pdf", config).unwrap();
/// ```
pub fn extract_outline_with_config<P: AsRef<Path>>(
    path: P,
    config: OutlineConfig,
) -> Result<DocumentOutline> {
    OutlineExtractor::new().with_config(config).extract_file(path)
}

/// Extract the outline of a PDF held in memory.
///
/// `stem` is used as the title when the document has no metadata title.
pub fn extract_outline_bytes(data: &[u8], stem: &str) -> Result<DocumentOutline> {
    OutlineExtractor::new().extract_bytes(data, stem)
}

/// Process every PDF of `input_dir` into `<stem>.json` files in
/// `output_dir`, using default settings.
pub fn process_directory<P, Q>(input_dir: P, output_dir: Q) -> Result<BatchReport>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    BatchProcessor::default().process_dir(input_dir, output_dir)
}
