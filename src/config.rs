//! Tuning and policy configuration for outline inference.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default H1 threshold as a multiple of the body font size.
pub const DEFAULT_H1_FACTOR: f32 = 1.6;
/// Default H2 threshold as a multiple of the body font size.
pub const DEFAULT_H2_FACTOR: f32 = 1.3;
/// Default H3 threshold as a multiple of the body font size.
pub const DEFAULT_H3_FACTOR: f32 = 1.1;
/// Default minimum heading length in characters.
pub const DEFAULT_MIN_HEADING_CHARS: usize = 5;
/// Default exclusive upper bound on the length of a promoted title.
pub const DEFAULT_MAX_TITLE_CHARS: usize = 50;

/// Configuration for the heuristic inference engine.
///
/// Every field has a default, so a JSON config file only needs to list the
/// values it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlineConfig {
    /// H1 threshold factor
    pub h1_factor: f32,
    /// H2 threshold factor
    pub h2_factor: f32,
    /// H3 threshold factor
    pub h3_factor: f32,
    /// Fragments shorter than this (after trimming) are never headings
    pub min_heading_chars: usize,
    /// A first heading is promoted to title only if shorter than this
    pub max_title_chars: usize,
    /// Fragments containing any of these literals are discarded
    pub noise_literals: Vec<String>,
    /// Fragments starting with any of these (case-insensitive) are discarded
    pub caption_prefixes: Vec<String>,
    /// Title rewrites applied when the title is inferred from page 1
    pub title_overrides: Vec<TitleOverride>,
}

/// Replace the inferred title when it contains a marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleOverride {
    /// Substring looked up in the upper-cased title (compared upper-cased)
    pub marker: String,
    /// Title used when the marker is present
    pub title: String,
}

impl TitleOverride {
    /// Create a new title override rule.
    pub fn new(marker: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
            title: title.into(),
        }
    }

    /// Check whether the rule fires for a title.
    pub fn matches(&self, title: &str) -> bool {
        title.to_uppercase().contains(&self.marker.to_uppercase())
    }
}

impl OutlineConfig {
    /// Create a configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from a JSON file and validate it.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&data)
    }

    /// Parse a configuration from a JSON string and validate it.
    pub fn from_json_str(data: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(data)
            .map_err(|e| Error::Config(format!("malformed config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the threshold factors are positive and ordered.
    pub fn validate(&self) -> Result<()> {
        if self.h3_factor.is_nan() || self.h3_factor <= 0.0 {
            return Err(Error::Config(format!(
                "h3_factor must be positive, got {}",
                self.h3_factor
            )));
        }
        if self.h2_factor < self.h3_factor || self.h1_factor < self.h2_factor {
            return Err(Error::Config(format!(
                "factors must satisfy h1 >= h2 >= h3, got {} / {} / {}",
                self.h1_factor, self.h2_factor, self.h3_factor
            )));
        }
        if self.title_overrides.iter().any(|o| o.marker.is_empty()) {
            return Err(Error::Config("title override marker is empty".to_string()));
        }
        Ok(())
    }

    /// Set the three threshold factors.
    pub fn with_factors(mut self, h1: f32, h2: f32, h3: f32) -> Self {
        self.h1_factor = h1;
        self.h2_factor = h2;
        self.h3_factor = h3;
        self
    }

    /// Set the minimum heading length.
    pub fn with_min_heading_chars(mut self, chars: usize) -> Self {
        self.min_heading_chars = chars;
        self
    }

    /// Set the title length cap.
    pub fn with_max_title_chars(mut self, chars: usize) -> Self {
        self.max_title_chars = chars;
        self
    }

    /// Add a noise literal.
    pub fn with_noise_literal(mut self, literal: impl Into<String>) -> Self {
        self.noise_literals.push(literal.into());
        self
    }

    /// Add a caption prefix.
    pub fn with_caption_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.caption_prefixes.push(prefix.into());
        self
    }

    /// Add a title override rule.
    pub fn with_title_override(mut self, rule: TitleOverride) -> Self {
        self.title_overrides.push(rule);
        self
    }
}

impl Default for OutlineConfig {
    fn default() -> Self {
        Self {
            h1_factor: DEFAULT_H1_FACTOR,
            h2_factor: DEFAULT_H2_FACTOR,
            h3_factor: DEFAULT_H3_FACTOR,
            min_heading_chars: DEFAULT_MIN_HEADING_CHARS,
            max_title_chars: DEFAULT_MAX_TITLE_CHARS,
            noise_literals: Vec::new(),
            caption_prefixes: ["figure", "table", "formula", "example", "source:"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            title_overrides: Vec::new(),
        }
    }
}
