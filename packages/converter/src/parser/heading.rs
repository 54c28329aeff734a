//! Chapter and section headings.
//!
//! In Normattiva exports both chapters and sections are `<capo>` containers;
//! which one a container opens is only visible from its heading text
//! ("Capo I (Principi generali)", "Sezione II Documento informatico", or both
//! at once).

use std::sync::LazyLock;

use regex::Regex;

use crate::config::SECTION_MARKER;
use crate::error::{ConverterError, Result};
use crate::text::normalize_accents;
use crate::types::Section;
use crate::xml::{child_element_text, XmlNode};

/// "Capo <code> (<description>)" at end of text, parentheses optional.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static CHAPTER_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(Capo [^ ]+) \(*([^)]+)\)*$").expect("valid regex"));

/// Chapter code, with an optional Latin suffix ("Capo IV", "Capo I-bis").
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static CHAPTER_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Capo ([A-Z0-9]+(?:-[a-z]+)?)").expect("valid regex"));

/// Chapter title before an embedded section marker (greedy, like the export).
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static CHAPTER_TITLE_BEFORE_SECTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(Capo .*)(Sezione.*)").expect("valid regex"));

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static CHAPTER_TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(capo .*)").expect("valid regex"));

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static SECTION_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Sezione ([A-Z0-9]+(?:-[a-z]+)?)").expect("valid regex"));

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static SECTION_TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(Sezione .*)").expect("valid regex"));

/// Identifier and normalized heading text of a `<capo>` container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    /// Raw `id` attribute of the container (empty when missing).
    pub raw_id: String,

    /// Cleaned, accent-normalized heading text.
    pub text: String,
}

/// Read the heading of a chapter or section container.
///
/// The words come from the text directly inside the container's child
/// elements. Surrounding whitespace, hyphens and opening parentheses are
/// stripped, line breaks become spaces, and a parenthesized chapter
/// description is turned into "Capo <code>. <description>".
///
/// # Examples
/// ```
/// use normattiva_converter::parser::extract_heading;
/// use normattiva_converter::xml::parse_document;
///
/// let xml = r#"<capo id="1"><num>Capo I </num><rubrica>(Principi generali)</rubrica></capo>"#;
/// let heading = extract_heading(&parse_document(xml).unwrap());
/// assert_eq!(heading.raw_id, "1");
/// assert_eq!(heading.text, "Capo I. Principi generali");
/// ```
pub fn extract_heading(node: &XmlNode) -> Heading {
    let raw_id = node.attribute("id").unwrap_or_default().to_string();
    Heading {
        raw_id,
        text: clean_heading_text(&child_element_text(node)),
    }
}

/// Clean raw heading text; see [`extract_heading`].
pub fn clean_heading_text(raw: &str) -> String {
    let text = raw
        .trim()
        .trim_matches(|c: char| c == ' ' || c == '-')
        .trim_matches('(')
        .replace(['\r', '\n'], " ");

    let text = match CHAPTER_HEADING.captures(&text) {
        Some(caps) => format!("{}. {}", &caps[1], &caps[2]),
        None => text,
    };

    normalize_accents(&text)
}

/// Chapter code of a heading that opens a chapter ("Capo IV ..." → "IV").
pub fn chapter_code(text: &str) -> Result<String> {
    CHAPTER_CODE
        .captures(text)
        .map(|caps| caps[1].to_string())
        .ok_or_else(|| ConverterError::Extraction {
            what: "chapter code",
            text: text.to_string(),
        })
}

/// Chapter title: the heading up to an embedded section marker, if any.
pub fn chapter_title(text: &str) -> Result<String> {
    let pattern = if text.contains(SECTION_MARKER) {
        &*CHAPTER_TITLE_BEFORE_SECTION
    } else {
        &*CHAPTER_TITLE
    };

    pattern
        .captures(text)
        .map(|caps| caps[1].trim_end().to_string())
        .ok_or_else(|| ConverterError::Extraction {
            what: "chapter title",
            text: text.to_string(),
        })
}

/// The section a heading opens.
///
/// Headings without a section code yield the unnamed section (empty id),
/// whose articles are listed directly in the chapter file.
pub fn section_for(text: &str) -> Section {
    let id = SECTION_CODE
        .captures(text)
        .map(|caps| caps[1].to_string())
        .unwrap_or_default();
    let title = SECTION_TITLE
        .captures(text)
        .map(|caps| normalize_accents(&caps[1]))
        .unwrap_or_default();
    Section::new(id, title)
}
