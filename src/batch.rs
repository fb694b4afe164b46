//! Batch processing of a directory of PDFs into JSON artifacts.
//!
//! Every `*.pdf` file in the input directory yields `<stem>.json` in the
//! output directory. A document that cannot be processed yields an error
//! artifact instead; only a failure to write an artifact is reported
//! without one, and it never stops the remaining documents.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::error::Result;
use crate::extract::{file_stem, OutlineExtractor};
use crate::render::{write_json, JsonFormat};

/// Outcome for one input document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentStatus {
    /// The outline was extracted and written
    Extracted {
        /// Number of outline entries
        headings: usize,
    },
    /// Processing failed and an error artifact was written
    Failed,
    /// The artifact could not be written
    WriteFailed(String),
}

/// Report for one input document.
#[derive(Debug, Clone)]
pub struct DocumentReport {
    /// Input PDF path
    pub input: PathBuf,
    /// Output JSON path
    pub output: PathBuf,
    /// What happened
    pub status: DocumentStatus,
}

/// Summary of a batch run, in input order.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// Per-document reports
    pub documents: Vec<DocumentReport>,
}

impl BatchReport {
    /// Number of documents seen.
    pub fn total(&self) -> usize {
        self.documents.len()
    }

    /// Documents whose outline was extracted.
    pub fn extracted(&self) -> usize {
        self.count(|s| matches!(s, DocumentStatus::Extracted { .. }))
    }

    /// Documents that produced an error artifact.
    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, DocumentStatus::Failed))
    }

    /// Documents whose artifact could not be written.
    pub fn write_failures(&self) -> usize {
        self.count(|s| matches!(s, DocumentStatus::WriteFailed(_)))
    }

    fn count(&self, pred: impl Fn(&DocumentStatus) -> bool) -> usize {
        self.documents.iter().filter(|d| pred(&d.status)).count()
    }
}

/// Processes every PDF of a directory.
#[derive(Debug, Clone, Default)]
pub struct BatchProcessor {
    extractor: OutlineExtractor,
    format: JsonFormat,
}

impl BatchProcessor {
    /// Create a processor around an extractor.
    pub fn new(extractor: OutlineExtractor) -> Self {
        Self {
            extractor,
            format: JsonFormat::default(),
        }
    }

    /// Set the JSON output format.
    pub fn with_format(mut self, format: JsonFormat) -> Self {
        self.format = format;
        self
    }

    /// Get the extractor.
    pub fn extractor(&self) -> &OutlineExtractor {
        &self.extractor
    }

    /// List the `*.pdf` files of a directory (extension matched
    /// case-insensitively), sorted by path.
    pub fn find_pdfs<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            let is_pdf = path
                .extension()
                .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case("pdf"));
            if is_pdf && path.is_file() {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    /// Process every PDF of `input_dir` into `output_dir`.
    pub fn process_dir<P, Q>(&self, input_dir: P, output_dir: Q) -> Result<BatchReport>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        self.process_dir_with_progress(input_dir, output_dir, |_| {})
    }

    /// Process every PDF of `input_dir`, calling `progress` after each
    /// document. With parallel processing enabled the callback runs on
    /// worker threads in completion order.
    pub fn process_dir_with_progress<P, Q, F>(
        &self,
        input_dir: P,
        output_dir: Q,
        progress: F,
    ) -> Result<BatchReport>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
        F: Fn(&DocumentReport) + Sync,
    {
        let output_dir = output_dir.as_ref();
        let files = Self::find_pdfs(input_dir.as_ref())?;
        if files.is_empty() {
            log::warn!("No PDF files found in {}", input_dir.as_ref().display());
            return Ok(BatchReport::default());
        }
        fs::create_dir_all(output_dir)?;
        log::info!("Processing {} PDF files", files.len());

        let run = |path: &PathBuf| {
            let report = self.process_file(path, output_dir);
            progress(&report);
            report
        };
        let documents = if self.extractor.options().parallel {
            files.par_iter().map(run).collect()
        } else {
            files.iter().map(run).collect()
        };

        Ok(BatchReport { documents })
    }

    /// Process one PDF into `<output_dir>/<stem>.json`.
    pub fn process_file(&self, input: &Path, output_dir: &Path) -> DocumentReport {
        log::info!("Processing {}", input.display());
        let outline = self.extractor.extract_or_report(input);
        let output = output_dir.join(format!("{}.json", file_stem(input)));

        let status = match write_json(&outline, &output, self.format) {
            Ok(()) if outline.is_error() => DocumentStatus::Failed,
            Ok(()) => DocumentStatus::Extracted {
                headings: outline.len(),
            },
            Err(e) => {
                log::error!("Error writing output file {}: {}", output.display(), e);
                DocumentStatus::WriteFailed(e.to_string())
            }
        };

        DocumentReport {
            input: input.to_path_buf(),
            output,
            status,
        }
    }
}
