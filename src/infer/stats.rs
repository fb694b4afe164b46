//! Font statistics for body size estimation.

use indexmap::IndexMap;

use crate::model::{size_from_key, TextFragment};

/// Character counts for one (font family, size) combination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FontStatEntry {
    /// Characters set in a bold face
    pub bold_chars: usize,
    /// Characters set in a regular face
    pub normal_chars: usize,
}

/// Font usage gathered from every fragment of a document.
///
/// Maps keep first-seen order so that ties are always broken the same way.
#[derive(Debug, Clone, Default)]
pub struct FontStatistics {
    /// family -> size (tenths of a point) -> counts
    by_font: IndexMap<String, IndexMap<i32, FontStatEntry>>,
    /// size (tenths of a point) -> number of fragments
    size_histogram: IndexMap<i32, usize>,
    fragment_count: usize,
}

impl FontStatistics {
    /// Create empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect statistics over a fragment sequence.
    pub fn collect<'a, I>(fragments: I) -> Self
    where
        I: IntoIterator<Item = &'a TextFragment>,
    {
        let mut stats = Self::new();
        for fragment in fragments {
            stats.add_fragment(fragment);
        }
        stats
    }

    /// Record one fragment. Noise is counted too.
    pub fn add_fragment(&mut self, fragment: &TextFragment) {
        let key = fragment.size_key();
        let chars = fragment.char_count();

        let entry = self
            .by_font
            .entry(fragment.font_family.clone())
            .or_default()
            .entry(key)
            .or_default();
        if fragment.bold {
            entry.bold_chars += chars;
        } else {
            entry.normal_chars += chars;
        }

        *self.size_histogram.entry(key).or_insert(0) += 1;
        self.fragment_count += 1;
    }

    /// Check if no fragment was recorded.
    pub fn is_empty(&self) -> bool {
        self.fragment_count == 0
    }

    /// Number of fragments recorded.
    pub fn fragment_count(&self) -> usize {
        self.fragment_count
    }

    /// Counts for a (family, size) pair.
    pub fn entry(&self, font_family: &str, font_size: f32) -> Option<&FontStatEntry> {
        self.by_font
            .get(font_family)
            .and_then(|sizes| sizes.get(&crate::model::size_key(font_size)))
    }

    /// Most frequent size by fragment count; ties go to the size seen first.
    pub fn most_frequent_size(&self) -> Option<f32> {
        let mut best: Option<(i32, usize)> = None;
        for (&key, &count) in &self.size_histogram {
            match best {
                Some((_, best_count)) if count <= best_count => {}
                _ => best = Some((key, count)),
            }
        }
        best.map(|(key, _)| size_from_key(key))
    }

    /// Size of the (family, size) pair with the most regular-weight characters.
    ///
    /// Pairs with no regular characters never qualify.
    pub fn dominant_normal_size(&self) -> Option<f32> {
        let mut best_key = None;
        let mut max_normal = 0;
        for sizes in self.by_font.values() {
            for (&key, entry) in sizes {
                if entry.normal_chars > max_normal {
                    max_normal = entry.normal_chars;
                    best_key = Some(key);
                }
            }
        }
        best_key.map(size_from_key)
    }

    /// Estimated body font size.
    ///
    /// Regular-weight running text is preferred over raw size frequency;
    /// the frequency estimate is the fallback when everything is bold.
    pub fn body_size(&self) -> Option<f32> {
        self.dominant_normal_size()
            .or_else(|| self.most_frequent_size())
    }
}
