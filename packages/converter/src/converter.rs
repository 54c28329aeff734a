//! Main converter service that ties all components together.

use std::path::Path;

use crate::config::{ConvertOptions, DuplicateChapterPolicy};
use crate::error::Result;
use crate::rst::{EmitReport, TreeEmitter};
use crate::types::DocumentTree;
use crate::xml::parse_document;

/// Parse a Normattiva XML export into a document tree.
pub fn parse_tree(xml: &str, policy: DuplicateChapterPolicy) -> Result<DocumentTree> {
    let root = parse_document(xml)?;
    DocumentTree::parse(&root, policy)
}

/// Convert an in-memory XML export and write the file tree to `output_dir`.
///
/// Options are validated before anything is parsed, so a bad extension
/// never leaves partial output behind.
pub fn convert_str(xml: &str, output_dir: &Path, options: &ConvertOptions) -> Result<EmitReport> {
    options.validate()?;
    let tree = parse_tree(xml, options.duplicate_chapters)?;
    TreeEmitter::new(options).dump(&tree, output_dir)
}

/// Convert an XML export file and write the file tree to `output_dir`.
///
/// # Arguments
/// * `input` - Path of the Normattiva XML export
/// * `output_dir` - Directory receiving chapter, section and article files
/// * `options` - Extension, index placement, headings and duplicate policy
pub fn convert_file(
    input: &Path,
    output_dir: &Path,
    options: &ConvertOptions,
) -> Result<EmitReport> {
    tracing::info!(input = %input.display(), output = %output_dir.display(), "Converting");
    let xml = std::fs::read_to_string(input)?;
    convert_str(&xml, output_dir, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IndexLocation;
    use crate::error::ConverterError;
    use tempfile::tempdir;

    const XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<NIR xmlns="http://www.normeinrete.it/nir/2.2/">
  <DecretoLegislativo>
    <articolato>
      <capo id="1">
        <num>Capo I </num>
        <rubrica>(Principi generali)</rubrica>
        <articolo id="1">
          <corpo>
            <p>Art. 1</p>
            <p>(Definizioni)</p>
            <p>1. Ai fini del presente codice si intende per:</p>
            <p>a) documento informatico: la rappresentazione informatica di atti;</p>
            <p>b) firma elettronica: l'insieme dei dati in forma elettronica.</p>
          </corpo>
        </articolo>
      </capo>
    </articolato>
  </DecretoLegislativo>
</NIR>"#;

    #[test]
    fn test_parse_tree() {
        let tree = parse_tree(XML, DuplicateChapterPolicy::Replace).unwrap();
        assert_eq!(tree.chapters.len(), 1);
        assert_eq!(tree.chapters[0].title, "Capo I. Principi generali");
        assert_eq!(tree.article_count(), 1);
    }

    #[test]
    fn test_convert_str() {
        let temp = tempdir().unwrap();
        let options = ConvertOptions::default().with_index_location(IndexLocation::Inside);
        let report = convert_str(XML, temp.path(), &options).unwrap();

        assert_eq!(report.files_written(), 3);
        let article = std::fs::read_to_string(temp.path().join("capo_I-articolo_1.rst")).unwrap();
        assert!(article.starts_with("Art. 1. Definizioni\n^^^^^^^^^^^^^^^^^^^\n\n"));
        assert!(article.contains("\n  a) documento informatico"));
    }

    #[test]
    fn test_convert_str_invalid_xml() {
        let temp = tempdir().unwrap();
        let err = convert_str("<NIR><capo>", temp.path(), &ConvertOptions::default()).unwrap_err();
        assert!(matches!(err, ConverterError::XmlParse(_)));
    }

    #[test]
    fn test_convert_str_invalid_options_writes_nothing() {
        let temp = tempdir().unwrap();
        let options = ConvertOptions::default().with_extension("");
        assert!(convert_str(XML, temp.path(), &options).is_err());
        assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_convert_file_missing_input() {
        let temp = tempdir().unwrap();
        let err = convert_file(
            &temp.path().join("missing.xml"),
            temp.path(),
            &ConvertOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ConverterError::Io(_)));
    }
}
