//! reStructuredText output for Sphinx.
//!
//! [`TreeEmitter`] writes one file per chapter, named section and article,
//! plus a top-level index, all linked through `toctree` directives.

mod markup;
mod writer;

pub use markup::{
    chapter_document, index_header, section_document, toctree_entry, underline, TOCTREE,
};
pub use writer::{EmitReport, TreeEmitter};
