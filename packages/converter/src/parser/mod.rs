//! Single-pass parser from Normattiva XML to a [`DocumentTree`].
//!
//! Chapter membership depends on document order: a `<capo>` whose heading
//! does not open a chapter belongs to the most recently opened one. That
//! state is carried explicitly through the walk.

mod article;
mod heading;

pub use article::{
    article_paragraphs, extract_article_id, segment_article, segment_paragraphs, SegmentedArticle,
};
pub use heading::{
    chapter_code, chapter_title, clean_heading_text, extract_heading, section_for, Heading,
};

use crate::config::{DuplicateChapterPolicy, CHAPTER_MARKER};
use crate::error::{ConverterError, Result};
use crate::types::{Chapter, DocumentTree};
use crate::xml::{find_descendants, find_descendants_within, XmlNode};

/// Tag of chapter and section containers.
const CONTAINER_TAG: &str = "capo";

/// Tag of article containers.
const ARTICLE_TAG: &str = "articolo";

impl DocumentTree {
    /// Build the tree from the root of a parsed export.
    ///
    /// Every `<capo>` is visited in document order. A heading starting with
    /// "Capo" opens a chapter; any container may also open a named section.
    /// The articles of a container become one section of the active chapter.
    ///
    /// # Errors
    /// - [`ConverterError::NoActiveChapter`] when a container comes before any chapter
    /// - [`ConverterError::MissingDesignator`] when an article has no designator line
    /// - [`ConverterError::Extraction`] when a chapter code or article id cannot be read
    /// - [`ConverterError::DuplicateChapter`] when `policy` rejects a reopened chapter
    pub fn parse(root: &XmlNode, policy: DuplicateChapterPolicy) -> Result<Self> {
        let mut tree = Self::new();
        let mut active_chapter: Option<String> = None;

        for container in find_descendants(root, CONTAINER_TAG) {
            let heading = extract_heading(container);

            if heading.text.starts_with(CHAPTER_MARKER) {
                let code = chapter_code(&heading.text)?;
                let title = chapter_title(&heading.text)?;
                tracing::debug!(chapter = %code, title = %title, "Opening chapter");
                tree.open_chapter(Chapter::new(code.clone(), title), policy)?;
                active_chapter = Some(code);
            }

            let Some(chapter_id) = active_chapter.as_deref() else {
                return Err(ConverterError::NoActiveChapter {
                    node_id: heading.raw_id,
                });
            };

            let mut section = section_for(&heading.text);
            for node in find_descendants_within(container, ARTICLE_TAG, CONTAINER_TAG) {
                let segmented = segment_article(node)?;
                section.add_article(segmented.article, segmented.intro);
            }

            tracing::debug!(
                chapter = %chapter_id,
                section = %section.id,
                articles = section.articles.len(),
                "Adding section"
            );
            tree.push_section(chapter_id, section)?;
        }

        tracing::info!(
            chapters = tree.chapters.len(),
            sections = tree.section_count(),
            articles = tree.article_count(),
            "Parsed document"
        );
        Ok(tree)
    }
}
