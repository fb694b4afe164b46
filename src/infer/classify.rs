//! Heading candidate classification and layout-noise filtering.

use std::sync::OnceLock;

use regex::Regex;

use crate::config::OutlineConfig;
use crate::model::{round_size, HeadingCandidate, HeadingLevel, TextFragment};

use super::thresholds::Thresholds;

/// Why a fragment was discarded before classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Nothing left after trimming
    Empty,
    /// Fewer characters than the configured minimum
    TooShort,
    /// Digits only (page numbers)
    Numeric,
    /// Enumeration marker such as `12.`
    EnumerationMarker,
    /// Roman numeral marker such as `IV.`
    RomanMarker,
    /// Contains a configured noise literal
    NoiseLiteral,
    /// Starts with a caption or label prefix
    CaptionPrefix,
}

fn enumeration_marker() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d+\.\s*$").unwrap())
}

fn roman_marker() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[IVXLCDM]+\.$").unwrap())
}

/// Content-pattern rules that exclude captions, page numbers and boilerplate.
#[derive(Debug, Clone)]
pub struct NoiseFilter {
    min_chars: usize,
    noise_literals: Vec<String>,
    caption_prefixes: Vec<String>,
}

impl NoiseFilter {
    /// Build a filter from configuration.
    pub fn new(config: &OutlineConfig) -> Self {
        Self {
            min_chars: config.min_heading_chars,
            noise_literals: config.noise_literals.clone(),
            caption_prefixes: config
                .caption_prefixes
                .iter()
                .map(|p| p.to_lowercase())
                .collect(),
        }
    }

    /// Return the first rule that rejects the trimmed text, if any.
    pub fn rejection(&self, text: &str) -> Option<RejectReason> {
        if text.is_empty() {
            return Some(RejectReason::Empty);
        }
        if text.chars().count() < self.min_chars {
            return Some(RejectReason::TooShort);
        }
        if text.chars().all(char::is_numeric) {
            return Some(RejectReason::Numeric);
        }
        if enumeration_marker().is_match(text) {
            return Some(RejectReason::EnumerationMarker);
        }
        if roman_marker().is_match(text) {
            return Some(RejectReason::RomanMarker);
        }
        if self.noise_literals.iter().any(|l| text.contains(l.as_str())) {
            return Some(RejectReason::NoiseLiteral);
        }
        let lower = text.to_lowercase();
        if self
            .caption_prefixes
            .iter()
            .any(|p| lower.starts_with(p.as_str()))
        {
            return Some(RejectReason::CaptionPrefix);
        }
        None
    }

    /// Check if the trimmed text is layout noise.
    pub fn is_noise(&self, text: &str) -> bool {
        self.rejection(text).is_some()
    }
}

/// Assigns heading levels to fragments using size, weight and casing.
#[derive(Debug, Clone)]
pub struct Classifier {
    thresholds: Thresholds,
    filter: NoiseFilter,
}

impl Classifier {
    /// Create a classifier for one document's thresholds.
    pub fn new(thresholds: Thresholds, config: &OutlineConfig) -> Self {
        Self {
            thresholds,
            filter: NoiseFilter::new(config),
        }
    }

    /// Classify every fragment, keeping scan order.
    pub fn classify_all(&self, fragments: &[TextFragment]) -> Vec<HeadingCandidate> {
        let mut rejected = 0usize;
        let candidates: Vec<HeadingCandidate> = fragments
            .iter()
            .filter_map(|fragment| {
                let text = fragment.text.trim();
                if let Some(reason) = self.filter.rejection(text) {
                    if reason != RejectReason::Empty {
                        rejected += 1;
                    }
                    return None;
                }
                self.candidate(fragment, text)
            })
            .collect();

        log::debug!(
            "Classified {} heading candidates ({} fragments rejected as noise)",
            candidates.len(),
            rejected
        );
        candidates
    }

    /// Classify a single fragment.
    pub fn classify(&self, fragment: &TextFragment) -> Option<HeadingCandidate> {
        let text = fragment.text.trim();
        if self.filter.is_noise(text) {
            return None;
        }
        self.candidate(fragment, text)
    }

    fn candidate(&self, fragment: &TextFragment, text: &str) -> Option<HeadingCandidate> {
        self.level_for(fragment, text).map(|level| HeadingCandidate {
            level,
            text: text.to_string(),
            page: fragment.page,
            position: fragment.position,
        })
    }

    /// Heading level for a fragment that passed the noise filter.
    ///
    /// Bold text qualifies on size alone. Regular text must be larger than
    /// the body and corroborated by title case or all caps.
    fn level_for(&self, fragment: &TextFragment, text: &str) -> Option<HeadingLevel> {
        let t = &self.thresholds;
        let size = round_size(fragment.font_size);

        if fragment.bold {
            if size >= t.h1 {
                Some(HeadingLevel::H1)
            } else if size >= t.h2 {
                Some(HeadingLevel::H2)
            } else if size >= t.h3 {
                Some(HeadingLevel::H3)
            } else {
                None
            }
        } else if size > t.body && (is_title_case(text) || is_all_uppercase(text)) {
            if size >= t.h2 {
                Some(HeadingLevel::H2)
            } else {
                Some(HeadingLevel::H3)
            }
        } else {
            None
        }
    }
}

/// Every word starts with an uppercase letter followed only by lowercase
/// letters, and there is at least one letter.
pub fn is_title_case(text: &str) -> bool {
    let mut has_cased = false;
    let mut prev_cased = false;
    for c in text.chars() {
        if c.is_uppercase() {
            if prev_cased {
                return false;
            }
            prev_cased = true;
            has_cased = true;
        } else if c.is_lowercase() {
            if !prev_cased {
                return false;
            }
            prev_cased = true;
            has_cased = true;
        } else {
            prev_cased = false;
        }
    }
    has_cased
}

/// At least one letter, and no lowercase letters.
pub fn is_all_uppercase(text: &str) -> bool {
    text.chars().any(char::is_uppercase) && !text.chars().any(char::is_lowercase)
}
