//! Heuristic outline inference from font statistics.
//!
//! Used when a document carries no embedded outline. The engine runs four
//! stages strictly in order over one document's fragments:
//!
//! 1. [`FontStatistics`] counts characters per font family, size and weight.
//! 2. [`Thresholds`] estimates the body font size and scales it into H1-H3
//!    minimum sizes.
//! 3. [`Classifier`] rejects layout noise and assigns heading levels.
//! 4. [`sequence`] restores reading order and removes duplicates, and
//!    [`resolve_title`] may promote the first heading into the title.
//!
//! Statistics are collected in a full pass before any fragment is
//! classified, because every threshold depends on the complete histogram.

mod classify;
mod sequence;
mod stats;
mod thresholds;

pub use classify::{is_all_uppercase, is_title_case, Classifier, NoiseFilter, RejectReason};
pub use sequence::{resolve_title, sequence};
pub use stats::{FontStatEntry, FontStatistics};
pub use thresholds::Thresholds;

use crate::config::OutlineConfig;
use crate::model::{DocumentOutline, TextFragment};

/// Runs the inference stages for one document at a time.
///
/// The engine holds configuration only; nothing carries over between
/// documents, so one engine can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct InferenceEngine {
    config: OutlineConfig,
}

impl InferenceEngine {
    /// Create an engine with the given configuration.
    pub fn new(config: OutlineConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    pub fn config(&self) -> &OutlineConfig {
        &self.config
    }

    /// Estimate body size and heading thresholds without classifying.
    pub fn analyze(&self, fragments: &[TextFragment]) -> Option<Thresholds> {
        let stats = FontStatistics::collect(fragments);
        Thresholds::estimate(&stats, &self.config)
    }

    /// Infer a title and outline from a document's fragments.
    ///
    /// `title` is the best title known so far (metadata or filename) and
    /// `placeholder` the filename-derived default it is compared against.
    pub fn infer(
        &self,
        fragments: &[TextFragment],
        title: &str,
        placeholder: &str,
    ) -> DocumentOutline {
        let stats = FontStatistics::collect(fragments);
        let thresholds = match Thresholds::estimate(&stats, &self.config) {
            Some(t) => t,
            None => {
                log::info!("No text found; emitting an empty outline");
                return DocumentOutline::empty(title);
            }
        };
        log::info!("Estimated thresholds: {}", thresholds);

        let candidates = Classifier::new(thresholds, &self.config).classify_all(fragments);
        let entries = sequence(candidates);
        let title = resolve_title(title, placeholder, &entries, &self.config);

        DocumentOutline::new(title, entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::HeadingLevel;

    #[test]
    fn test_infer_empty_document() {
        let engine = InferenceEngine::default();
        let outline = engine.infer(&[], "report", "report");
        assert_eq!(outline, DocumentOutline::empty("report"));
    }

    #[test]
    fn test_infer_basic_document() {
        let engine = InferenceEngine::default();
        let mut fragments = vec![TextFragment::new(
            "Overview",
            "Helvetica-Bold",
            18.0,
            true,
            1,
            40.0,
        )];
        for i in 0..10 {
            fragments.push(TextFragment::new(
                "Body text that fills the page with ordinary prose.",
                "Helvetica",
                10.0,
                false,
                1,
                80.0 + i as f32 * 12.0,
            ));
        }

        let outline = engine.infer(&fragments, "report", "report");
        assert_eq!(outline.title, "Overview");
        assert_eq!(outline.outline.len(), 1);
        assert_eq!(outline.outline[0].level, HeadingLevel::H1);
    }

    #[test]
    fn test_blank_fragments_set_body_but_are_never_emitted() {
        let engine = InferenceEngine::default();
        let mut fragments: Vec<TextFragment> = ["", " ", "  "]
            .iter()
            .enumerate()
            .map(|(i, text)| TextFragment::new(*text, "Arial-Bold", 8.0, true, 1, i as f32))
            .collect();
        fragments.push(TextFragment::new("Heading Bold", "Arial-Bold", 12.0, true, 1, 10.0));
        fragments.push(TextFragment::new("Another One", "Arial-Bold", 12.0, true, 1, 30.0));

        assert_eq!(engine.analyze(&fragments).unwrap().body, 8.0);

        let outline = engine.infer(&fragments, "doc", "doc");
        assert_eq!(outline.title, "doc");
        assert_eq!(outline.outline.len(), 2);
        assert!(outline
            .outline
            .iter()
            .all(|e| e.level == HeadingLevel::H2 && !e.text.trim().is_empty()));
    }

    #[test]
    fn test_analyze() {
        let engine = InferenceEngine::default();
        let fragments = vec![TextFragment::new("plain body", "Times", 9.0, false, 1, 0.0)];
        let t = engine.analyze(&fragments).unwrap();
        assert_eq!(t.body, 9.0);
        assert!(engine.analyze(&[]).is_none());
    }
}
