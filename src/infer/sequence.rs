//! Reading-order sequencing, deduplication and title resolution.

use std::collections::HashSet;

use crate::config::OutlineConfig;
use crate::model::{HeadingCandidate, HeadingLevel, OutlineEntry};

/// Sort candidates into reading order and drop duplicates.
///
/// Order is page first, then vertical position; the sort is stable so
/// candidates at the same spot keep their scan order. A candidate is dropped
/// when an earlier one has the same level, page and case-folded text.
pub fn sequence(mut candidates: Vec<HeadingCandidate>) -> Vec<OutlineEntry> {
    candidates.sort_by(|a, b| {
        a.page
            .cmp(&b.page)
            .then_with(|| a.position.total_cmp(&b.position))
    });

    let mut seen: HashSet<(HeadingLevel, String, u32)> = HashSet::new();
    let mut entries = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let key = (candidate.level, candidate.text.to_lowercase(), candidate.page);
        if seen.insert(key) {
            entries.push(candidate.into_entry());
        } else {
            log::debug!(
                "Dropping duplicate {} '{}' on page {}",
                candidate.level,
                candidate.text,
                candidate.page
            );
        }
    }
    entries
}

/// Pick the final title.
///
/// Only a title still equal to the filename placeholder is replaced: by the
/// first entry when it is a short H1 on page 1, then by any matching
/// override rule.
pub fn resolve_title(
    title: &str,
    placeholder: &str,
    entries: &[OutlineEntry],
    config: &OutlineConfig,
) -> String {
    if title != placeholder {
        return title.to_string();
    }
    let first = match entries.first() {
        Some(first) if first.page == 1 => first,
        _ => return title.to_string(),
    };

    let mut resolved = title.to_string();
    if first.level == HeadingLevel::H1 && first.text.chars().count() < config.max_title_chars {
        log::debug!("Promoting first heading '{}' to title", first.text);
        resolved = first.text.clone();
    }
    if let Some(rule) = config.title_overrides.iter().find(|r| r.matches(&resolved)) {
        log::debug!("Title override '{}' applied", rule.marker);
        resolved = rule.title.clone();
    }
    resolved
}
