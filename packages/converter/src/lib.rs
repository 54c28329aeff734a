//! Normattiva Converter - Turn Italian legislative XML into reStructuredText.
//!
//! This crate reads a Normattiva XML export (chapters, sections, articles and
//! paragraphs), restores the accented characters that the export spells with
//! apostrophes, and writes a Sphinx-ready tree with one file per chapter,
//! named section and article.
//!
//! # Example
//!
//! ```
//! use normattiva_converter::config::file_name;
//! use normattiva_converter::text::normalize_accents;
//!
//! assert_eq!(normalize_accents("Liberta' di accesso"), "Libertà di accesso");
//! assert_eq!(file_name("II", Some("I"), Some("20"), "rst"), "capo_II-sezione_I-articolo_20.rst");
//! ```
//!
//! # Architecture
//!
//! - [`config`]: Constants, conversion options and validation
//! - [`types`]: The chapter → section → article tree
//! - [`error`]: Error types and Result alias
//! - [`text`]: Accent normalization
//! - [`xml`]: Owned XML tree and navigation helpers
//! - [`parser`]: Heading extraction, article segmentation and the tree pass
//! - [`rst`]: reStructuredText emission
//! - [`cli`]: Command-line interface
//! - [`converter`]: Main converter service

pub mod cli;
pub mod config;
pub mod converter;
pub mod error;
pub mod parser;
pub mod rst;
pub mod text;
pub mod types;
pub mod xml;

// Re-export main functions
pub use converter::{convert_file, convert_str, parse_tree};

// Re-export commonly used items
pub use config::{ConvertOptions, DuplicateChapterPolicy, IndexLocation};
pub use error::{ConverterError, Result};
pub use rst::{EmitReport, TreeEmitter};
pub use types::{Article, Chapter, DocumentTree, Section};
