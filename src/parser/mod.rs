//! Document sources: where fragments, metadata and bookmarks come from.

mod backend;
#[cfg(feature = "lopdf-backend")]
mod content;
mod memory;
mod options;
#[cfg(feature = "lopdf-backend")]
mod pdf_source;

pub use backend::{collect_fragments, DocumentSource};
pub use memory::MemorySource;
pub use options::{ErrorMode, ParseOptions};
#[cfg(feature = "lopdf-backend")]
pub use pdf_source::LopdfSource;
