//! Heading size thresholds derived from the body font size.

use std::fmt;

use crate::config::OutlineConfig;

use super::stats::FontStatistics;

/// Body font size and the minimum size of each heading level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    /// Estimated body font size
    pub body: f32,
    /// Minimum H1 size
    pub h1: f32,
    /// Minimum H2 size
    pub h2: f32,
    /// Minimum H3 size
    pub h3: f32,
}

impl Thresholds {
    /// Scale a body size by the configured factors.
    pub fn from_body(body: f32, config: &OutlineConfig) -> Self {
        Self {
            body,
            h1: body * config.h1_factor,
            h2: body * config.h2_factor,
            h3: body * config.h3_factor,
        }
    }

    /// Estimate thresholds from document statistics.
    ///
    /// Returns `None` when the document has no text at all.
    pub fn estimate(stats: &FontStatistics, config: &OutlineConfig) -> Option<Self> {
        let body = stats.body_size()?;
        if body <= 0.0 {
            return None;
        }
        Some(Self::from_body(body, config))
    }
}

impl fmt::Display for Thresholds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "body {:.1}pt, H1 >= {:.1}pt, H2 >= {:.1}pt, H3 >= {:.1}pt",
            self.body, self.h1, self.h2, self.h3
        )
    }
}
