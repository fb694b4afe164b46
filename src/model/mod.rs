//! Data model for outline extraction.
//!
//! Fragments flow in from a document source; candidates, entries and the
//! final `DocumentOutline` flow out of the inference engine. Everything here
//! is owned by a single document's run and never shared.

mod fragment;
mod outline;

pub use fragment::{
    is_bold_font, round_size, size_from_key, size_key, strip_subset_prefix, TextFragment,
};
pub use outline::{
    DocumentOutline, HeadingCandidate, HeadingLevel, NativeOutlineEntry, OutlineEntry,
    ERROR_TITLE_PREFIX,
};
