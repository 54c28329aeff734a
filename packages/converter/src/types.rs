//! Core data types: the chapter → section → article tree.
//!
//! The tree is built in one pass by `DocumentTree::parse` in the parser
//! and written once by the emitter. Entities are only appended, never edited
//! after the pass moves on.

use crate::config::DuplicateChapterPolicy;
use crate::error::{ConverterError, Result};

/// A formatted article ready to be written to its own file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    /// Identifier taken from the designator line (e.g. "20", "20-bis").
    pub id: String,

    /// Title line, caret underline, blank line and body paragraphs.
    pub text: String,
}

impl Article {
    #[must_use]
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }

    /// First line of the formatted text.
    #[must_use]
    pub fn title(&self) -> &str {
        self.text.lines().next().unwrap_or_default()
    }
}

/// A section (sezione) of a chapter.
///
/// An empty `id` marks the unnamed section holding articles that sit directly
/// under a chapter heading.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Section {
    pub id: String,
    pub title: String,

    /// Preamble text found before an article's designator line.
    pub intro: Option<String>,

    pub articles: Vec<Article>,
}

impl Section {
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            intro: None,
            articles: Vec::new(),
        }
    }

    /// Whether this section gets a file of its own.
    #[must_use]
    pub fn is_named(&self) -> bool {
        !self.id.is_empty()
    }

    /// Append an article; a non-empty intro replaces any earlier one.
    pub fn add_article(&mut self, article: Article, intro: Option<String>) {
        if let Some(intro) = intro {
            if self.intro.is_some() {
                tracing::debug!(
                    section = %self.id,
                    article = %article.id,
                    "Replacing earlier section intro"
                );
            }
            self.intro = Some(intro);
        }
        self.articles.push(article);
    }
}

/// A chapter (capo) with its sections in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    pub id: String,
    pub title: String,
    pub sections: Vec<Section>,
}

impl Chapter {
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            sections: Vec::new(),
        }
    }

    /// Number of articles across all sections.
    #[must_use]
    pub fn article_count(&self) -> usize {
        self.sections.iter().map(|s| s.articles.len()).sum()
    }
}

/// The parsed document: chapters in creation order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentTree {
    pub chapters: Vec<Chapter>,
}

impl DocumentTree {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a chapter by identifier.
    #[must_use]
    pub fn chapter(&self, id: &str) -> Option<&Chapter> {
        self.chapters.iter().find(|c| c.id == id)
    }

    fn chapter_mut(&mut self, id: &str) -> Option<&mut Chapter> {
        self.chapters.iter_mut().find(|c| c.id == id)
    }

    /// Open a chapter, applying `policy` when the identifier is already taken.
    ///
    /// A replaced chapter keeps its original position, so the index order is
    /// the order in which identifiers were first seen.
    pub fn open_chapter(&mut self, chapter: Chapter, policy: DuplicateChapterPolicy) -> Result<()> {
        let Some(existing) = self.chapter_mut(&chapter.id) else {
            self.chapters.push(chapter);
            return Ok(());
        };

        match policy {
            DuplicateChapterPolicy::Replace => {
                tracing::warn!(
                    chapter = %chapter.id,
                    dropped_sections = existing.sections.len(),
                    dropped_articles = existing.article_count(),
                    "Chapter reopened, replacing earlier entry"
                );
                *existing = chapter;
            }
            DuplicateChapterPolicy::Merge => {
                tracing::warn!(chapter = %chapter.id, "Chapter reopened, merging sections");
                existing.sections.extend(chapter.sections);
            }
            DuplicateChapterPolicy::Error => {
                return Err(ConverterError::DuplicateChapter(chapter.id));
            }
        }
        Ok(())
    }

    /// Append a section to the chapter with the given identifier.
    pub fn push_section(&mut self, chapter_id: &str, section: Section) -> Result<()> {
        let chapter = self
            .chapter_mut(chapter_id)
            .ok_or_else(|| ConverterError::NoActiveChapter {
                node_id: section.id.clone(),
            })?;
        chapter.sections.push(section);
        Ok(())
    }

    /// Total number of sections, named or not.
    #[must_use]
    pub fn section_count(&self) -> usize {
        self.chapters.iter().map(|c| c.sections.len()).sum()
    }

    /// Total number of articles.
    #[must_use]
    pub fn article_count(&self) -> usize {
        self.chapters.iter().map(Chapter::article_count).sum()
    }
}
