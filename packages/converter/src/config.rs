//! Configuration constants, conversion options and validation.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use crate::error::{ConverterError, Result};

/// Default output directory for the generated files.
///
/// The index is written to its parent, so `docs/` ends up holding a Sphinx
/// `index.rst` that points into `_rst/`.
pub const DEFAULT_OUTPUT_DIR: &str = "docs/_rst";

/// Default extension of generated files.
pub const DEFAULT_EXTENSION: &str = "rst";

/// Name (without extension) of the top-level index file.
pub const INDEX_FILE_STEM: &str = "index";

/// Default document title written at the top of the index.
pub const DEFAULT_DOCUMENT_TITLE: &str = "Codice dell'amministrazione digitale";

/// Default document subtitle written below the title in the index.
pub const DEFAULT_DOCUMENT_SUBTITLE: &str = "Decreto Legislativo 7 marzo 2005, n. 82";

/// Token that opens a chapter heading.
pub const CHAPTER_MARKER: &str = "Capo";

/// Token that opens a section heading.
pub const SECTION_MARKER: &str = "Sezione";

/// Leader token of an article designator line ("Art. 20").
pub const DESIGNATOR_LEADER: &str = "Art";

/// Extension pattern: letters and digits only.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static EXTENSION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9]+$").expect("valid regex"));

/// Where the top-level index file is written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum IndexLocation {
    /// In the parent of the output directory, linking to `<dir>/capo_X.ext`.
    #[default]
    Parent,
    /// Inside the output directory, linking to bare file names.
    Inside,
}

/// What to do when a chapter identifier is opened a second time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DuplicateChapterPolicy {
    /// Drop the earlier chapter's sections; the chapter keeps its index position.
    #[default]
    Replace,
    /// Keep the earlier sections and append the new ones.
    Merge,
    /// Fail the run.
    Error,
}

/// Options controlling a conversion run.
///
/// Can be built in code with the `with_*` methods or loaded from YAML:
///
/// ```yaml
/// extension: txt
/// index_location: inside
/// document_title: Codice della privacy
/// duplicate_chapters: error
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConvertOptions {
    /// Extension for every generated file, without the dot.
    pub extension: String,

    /// Placement of the index file.
    pub index_location: IndexLocation,

    /// First heading of the index file.
    pub document_title: String,

    /// Second heading of the index file.
    pub document_subtitle: String,

    /// Handling of reopened chapter identifiers.
    pub duplicate_chapters: DuplicateChapterPolicy,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            extension: DEFAULT_EXTENSION.to_string(),
            index_location: IndexLocation::default(),
            document_title: DEFAULT_DOCUMENT_TITLE.to_string(),
            document_subtitle: DEFAULT_DOCUMENT_SUBTITLE.to_string(),
            duplicate_chapters: DuplicateChapterPolicy::default(),
        }
    }
}

impl ConvertOptions {
    /// Load options from a YAML file. Missing keys keep their defaults.
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Load options from a YAML string. Missing keys keep their defaults.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let options: Self = serde_yaml_ng::from_str(content)?;
        options.validate()?;
        Ok(options)
    }

    /// Check the options for values that would produce unusable output.
    pub fn validate(&self) -> Result<()> {
        validate_extension(&self.extension)
    }

    #[must_use]
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    #[must_use]
    pub fn with_index_location(mut self, location: IndexLocation) -> Self {
        self.index_location = location;
        self
    }

    #[must_use]
    pub fn with_document_title(mut self, title: impl Into<String>) -> Self {
        self.document_title = title.into();
        self
    }

    #[must_use]
    pub fn with_document_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.document_subtitle = subtitle.into();
        self
    }

    #[must_use]
    pub fn with_duplicate_chapters(mut self, policy: DuplicateChapterPolicy) -> Self {
        self.duplicate_chapters = policy;
        self
    }
}

/// Validate an output file extension.
///
/// # Examples
/// ```
/// use normattiva_converter::config::validate_extension;
///
/// assert!(validate_extension("rst").is_ok());
/// assert!(validate_extension(".rst").is_err());
/// assert!(validate_extension("").is_err());
/// ```
pub fn validate_extension(extension: &str) -> Result<()> {
    if EXTENSION_PATTERN.is_match(extension) {
        Ok(())
    } else {
        Err(ConverterError::InvalidExtension(extension.to_string()))
    }
}

/// Build the deterministic file name for a chapter, section or article.
///
/// Non-empty parts among `capo_<chapter>`, `sezione_<section>` and
/// `articolo_<article>` are joined with `-`, then the extension is appended.
/// An empty section identifier means "no named section".
///
/// # Examples
/// ```
/// use normattiva_converter::config::file_name;
///
/// assert_eq!(file_name("I", None, None, "rst"), "capo_I.rst");
/// assert_eq!(file_name("I", Some("A"), None, "rst"), "capo_I-sezione_A.rst");
/// assert_eq!(file_name("I", Some(""), Some("3"), "rst"), "capo_I-articolo_3.rst");
/// ```
pub fn file_name(
    chapter_id: &str,
    section_id: Option<&str>,
    article_id: Option<&str>,
    extension: &str,
) -> String {
    let mut parts = vec![format!("capo_{chapter_id}")];

    if let Some(s) = section_id.filter(|s| !s.is_empty()) {
        parts.push(format!("sezione_{s}"));
    }
    if let Some(a) = article_id.filter(|a| !a.is_empty()) {
        parts.push(format!("articolo_{a}"));
    }

    format!("{}.{extension}", parts.join("-"))
}
