//! Writes a [`DocumentTree`] as a tree of reStructuredText files.

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use super::markup::{chapter_document, index_header, section_document, toctree_entry};
use crate::config::{file_name, ConvertOptions, IndexLocation, INDEX_FILE_STEM};
use crate::error::{ConverterError, Result};
use crate::parser::extract_article_id;
use crate::types::{Article, Chapter, DocumentTree};

/// Summary of an emission run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitReport {
    /// Path of the top-level index file.
    pub index: PathBuf,
    pub chapters: usize,
    pub sections: usize,
    pub articles: usize,
    /// Articles whose file name was already written in the same run; the
    /// later article replaced the earlier one's file.
    pub overwritten: usize,
}

impl EmitReport {
    /// Number of files written, index included.
    #[must_use]
    pub fn files_written(&self) -> usize {
        1 + self.chapters + self.sections + self.articles - self.overwritten
    }
}

/// Serializes a document tree into an index, chapter, section and article
/// files linked by toctree directives.
#[derive(Debug, Clone, Copy)]
pub struct TreeEmitter<'a> {
    options: &'a ConvertOptions,
}

impl<'a> TreeEmitter<'a> {
    #[must_use]
    pub fn new(options: &'a ConvertOptions) -> Self {
        Self { options }
    }

    /// Write every file of `tree` below `output_dir`.
    ///
    /// The directory is created if missing. Existing files with the same
    /// names are replaced; other files are left alone.
    ///
    /// # Returns
    /// Counts of the files written and the path of the index.
    pub fn dump(&self, tree: &DocumentTree, output_dir: &Path) -> Result<EmitReport> {
        self.options.validate()?;
        fs::create_dir_all(output_dir)?;

        let (index_dir, prefix) = self.index_placement(output_dir);
        let index = index_dir.join(format!("{INDEX_FILE_STEM}.{}", self.options.extension));

        let mut report = EmitReport {
            index: index.clone(),
            chapters: 0,
            sections: 0,
            articles: 0,
            overwritten: 0,
        };

        let mut index_text = index_header(
            &self.options.document_title,
            &self.options.document_subtitle,
        );
        for chapter in &tree.chapters {
            self.dump_chapter(chapter, output_dir, &mut report)?;
            let name = file_name(&chapter.id, None, None, &self.options.extension);
            index_text.push_str(&toctree_entry(&format!("{prefix}{name}")));
            index_text.push('\n');
        }

        fs::create_dir_all(&index_dir)?;
        write_atomic(&index, &index_text)?;

        tracing::info!(
            index = %index.display(),
            chapters = report.chapters,
            sections = report.sections,
            articles = report.articles,
            overwritten = report.overwritten,
            "Wrote document tree"
        );
        Ok(report)
    }

    /// Directory of the index file and the prefix of its toctree entries.
    fn index_placement(&self, output_dir: &Path) -> (PathBuf, String) {
        if self.options.index_location == IndexLocation::Parent {
            if let Some(name) = output_dir.file_name() {
                let parent = output_dir
                    .parent()
                    .filter(|p| !p.as_os_str().is_empty())
                    .unwrap_or(Path::new("."));
                return (parent.to_path_buf(), format!("{}/", name.to_string_lossy()));
            }
            tracing::warn!(
                output_dir = %output_dir.display(),
                "Output directory has no name, writing the index inside it"
            );
        }
        (output_dir.to_path_buf(), String::new())
    }

    fn dump_chapter(
        &self,
        chapter: &Chapter,
        output_dir: &Path,
        report: &mut EmitReport,
    ) -> Result<()> {
        let ext = &self.options.extension;
        let mut intros: Vec<&str> = Vec::new();
        let mut entries = Vec::new();
        // Article file names carry the chapter id, so reuse can only happen here.
        let mut article_names = HashSet::new();

        for section in &chapter.sections {
            let mut section_entries = Vec::new();
            for article in &section.articles {
                let name = self.dump_article(&chapter.id, &section.id, article, output_dir)?;
                report.articles += 1;
                if !article_names.insert(name.clone()) {
                    tracing::warn!(
                        file = %name,
                        chapter = %chapter.id,
                        "Article file written twice, the earlier article is overwritten"
                    );
                    report.overwritten += 1;
                    continue;
                }
                section_entries.push(toctree_entry(&name));
            }

            if section.is_named() {
                let name = file_name(&chapter.id, Some(&section.id), None, ext);
                let text =
                    section_document(&section.title, section.intro.as_deref(), &section_entries);
                write_atomic(&output_dir.join(&name), &text)?;
                tracing::debug!(file = %name, articles = section.articles.len(), "Wrote section");
                entries.push(toctree_entry(&name));
                report.sections += 1;
            } else {
                if let Some(intro) = section.intro.as_deref() {
                    intros.push(intro);
                }
                entries.extend(section_entries);
            }
        }

        let name = file_name(&chapter.id, None, None, ext);
        let text = chapter_document(&chapter.title, &intros, &entries);
        write_atomic(&output_dir.join(&name), &text)?;
        tracing::debug!(file = %name, sections = chapter.sections.len(), "Wrote chapter");
        report.chapters += 1;
        Ok(())
    }

    /// Write one article file and return its name.
    fn dump_article(
        &self,
        chapter_id: &str,
        section_id: &str,
        article: &Article,
        output_dir: &Path,
    ) -> Result<String> {
        let id = extract_article_id(&article.text)?;
        if id != article.id {
            return Err(ConverterError::Extraction {
                what: "article id",
                text: article.title().to_string(),
            });
        }

        let ext = &self.options.extension;
        let name = file_name(chapter_id, Some(section_id), Some(&id), ext);
        write_atomic(&output_dir.join(&name), &article.text)?;
        tracing::debug!(file = %name, "Wrote article");
        Ok(name)
    }
}

/// Write a file atomically: temp file, sync, rename.
fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let temp_file = path.with_file_name(format!(".{file_name}.tmp"));

    {
        let mut file = File::create(&temp_file)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
    }

    // On Windows, rename fails if the destination already exists
    #[cfg(target_os = "windows")]
    if path.exists() {
        fs::remove_file(path)?;
    }

    fs::rename(&temp_file, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Section;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn article(id: &str, headline: &str) -> Article {
        let title = format!("Art. {id}. {headline}");
        let underline = "^".repeat(title.chars().count());
        Article::new(id, format!("{title}\n{underline}\n\nTesto.\n\n"))
    }

    fn sample_tree() -> DocumentTree {
        let mut unnamed = Section::new("", "");
        let intro = Some("Premessa\n\n\n".to_string());
        unnamed.add_article(article("1", "Definizioni"), intro);

        let mut named = Section::new("I", "Sezione I Documento");
        let intro = Some("Introduzione\n\n\n".to_string());
        named.add_article(article("20", "Documento"), intro);
        named.add_article(article("20-bis", "Copie"), None);

        let mut first = Chapter::new("I", "Capo I. Principi");
        first.sections.push(unnamed);
        let mut second = Chapter::new("II", "Capo II. Documento");
        second.sections.push(named);

        DocumentTree {
            chapters: vec![first, second],
        }
    }

    #[test]
    fn test_dump_with_index_in_parent() {
        let temp = tempdir().unwrap();
        let output_dir = temp.path().join("_rst");
        let options = ConvertOptions::default()
            .with_document_title("Codice")
            .with_document_subtitle("Decreto");

        let report = TreeEmitter::new(&options)
            .dump(&sample_tree(), &output_dir)
            .unwrap();
        assert_eq!(report.index, temp.path().join("index.rst"));
        assert_eq!(report.files_written(), 1 + 2 + 1 + 3);

        let index = fs::read_to_string(&report.index).unwrap();
        assert_eq!(
            index,
            "\nCodice\n######\n\nDecreto\n#######\n\n\
             .. toctree::\n\n   _rst/capo_I.rst\n   _rst/capo_II.rst\n"
        );

        let chapter = fs::read_to_string(output_dir.join("capo_I.rst")).unwrap();
        assert_eq!(
            chapter,
            "Capo I. Principi\n==================\n\nPremessa\n\n\n\n\n\
             .. toctree::\n\n   capo_I-articolo_1.rst\n\n"
        );

        let chapter = fs::read_to_string(output_dir.join("capo_II.rst")).unwrap();
        assert!(chapter.contains("\n   capo_II-sezione_I.rst\n"));

        let section = fs::read_to_string(output_dir.join("capo_II-sezione_I.rst")).unwrap();
        let heading = "Sezione I Documento\n---------------------\n\nIntroduzione\n";
        assert!(section.starts_with(heading));
        assert!(section.ends_with(
            "   capo_II-sezione_I-articolo_20.rst\n   capo_II-sezione_I-articolo_20-bis.rst\n\n"
        ));

        let text = output_dir.join("capo_II-sezione_I-articolo_20-bis.rst");
        let text = fs::read_to_string(text).unwrap();
        assert!(text.starts_with("Art. 20-bis. Copie\n^^^^^^^^^^^^^^^^^^\n"));
    }

    #[test]
    fn test_dump_with_index_inside() {
        let temp = tempdir().unwrap();
        let options = ConvertOptions::default()
            .with_index_location(IndexLocation::Inside)
            .with_extension("txt");

        let report = TreeEmitter::new(&options)
            .dump(&sample_tree(), temp.path())
            .unwrap();
        assert_eq!(report.index, temp.path().join("index.txt"));

        let index = fs::read_to_string(&report.index).unwrap();
        assert!(index.ends_with("   capo_I.txt\n   capo_II.txt\n"));
        assert!(temp.path().join("capo_I-articolo_1.txt").exists());
    }

    #[test]
    fn test_no_temp_files_left_behind() {
        let temp = tempdir().unwrap();
        let options = ConvertOptions::default().with_index_location(IndexLocation::Inside);
        TreeEmitter::new(&options)
            .dump(&sample_tree(), temp.path())
            .unwrap();

        let leftovers: Vec<_> = fs::read_dir(temp.path())
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_article_without_designator_fails() {
        let temp = tempdir().unwrap();
        let mut section = Section::new("", "");
        section.add_article(Article::new("1", "Premessa senza designatore\n"), None);
        let mut chapter = Chapter::new("I", "Capo I");
        chapter.sections.push(section);
        let tree = DocumentTree {
            chapters: vec![chapter],
        };

        let options = ConvertOptions::default();
        let err = TreeEmitter::new(&options)
            .dump(&tree, temp.path())
            .unwrap_err();
        assert!(matches!(err, ConverterError::Extraction { what: "article id", .. }));
    }

    #[test]
    fn test_rejects_invalid_extension() {
        let temp = tempdir().unwrap();
        let options = ConvertOptions::default().with_extension("../x");
        let err = TreeEmitter::new(&options)
            .dump(&sample_tree(), temp.path())
            .unwrap_err();
        assert!(matches!(err, ConverterError::InvalidExtension(_)));
    }

    #[test]
    fn test_reused_article_name_is_listed_once() {
        let temp = tempdir().unwrap();
        let mut section = Section::new("I", "Sezione I Documento");
        section.add_article(article("20", "Prima stesura"), None);
        section.add_article(article("20", "Seconda stesura"), None);
        let mut chapter = Chapter::new("II", "Capo II. Documento");
        chapter.sections.push(section);
        let tree = DocumentTree {
            chapters: vec![chapter],
        };

        let options = ConvertOptions::default().with_index_location(IndexLocation::Inside);
        let report = TreeEmitter::new(&options)
            .dump(&tree, temp.path())
            .unwrap();
        assert_eq!(report.articles, 2);
        assert_eq!(report.overwritten, 1);
        assert_eq!(report.files_written(), 4);

        let section = fs::read_to_string(temp.path().join("capo_II-sezione_I.rst")).unwrap();
        assert_eq!(section.matches("capo_II-sezione_I-articolo_20.rst").count(), 1);

        let name = temp.path().join("capo_II-sezione_I-articolo_20.rst");
        let text = fs::read_to_string(name).unwrap();
        assert!(text.starts_with("Art. 20. Seconda stesura\n"));
    }
}
