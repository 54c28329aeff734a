//! Error types for the converter.
//!
//! Every failure is fatal for the run: structural problems in the source XML,
//! lookups that were expected to match, and state violations during the
//! single parse pass all surface to the caller unchanged.

use thiserror::Error;

/// Main error type for the converter library.
#[derive(Debug, Error)]
pub enum ConverterError {
    /// XML parsing failed.
    #[error("XML parsing failed: {0}")]
    XmlParse(#[from] roxmltree::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Options file could not be parsed.
    #[error("Invalid options file: {0}")]
    ConfigParse(#[from] serde_yaml_ng::Error),

    /// Invalid output file extension.
    #[error("Invalid file extension: '{0}'. Expected a bare extension such as 'rst'")]
    InvalidExtension(String),

    /// An article has no paragraph starting with the designator leader.
    #[error("Article {article} has no designator line (no paragraph starts with 'Art')")]
    MissingDesignator { article: String },

    /// A pattern that must match (chapter code, section code, article id) found nothing.
    #[error("Could not extract {what} from '{text}'")]
    Extraction { what: &'static str, text: String },

    /// A section or article node was reached before any chapter was opened.
    #[error("Article/section encountered before any chapter (node id '{node_id}')")]
    NoActiveChapter { node_id: String },

    /// A chapter identifier was reopened while duplicates are rejected.
    #[error("Chapter '{0}' is opened more than once")]
    DuplicateChapter(String),
}

/// Result type alias for converter operations.
pub type Result<T> = std::result::Result<T, ConverterError>;
