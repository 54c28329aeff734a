//! reStructuredText building blocks: underlined headings and toctrees.

/// Underline character of the index headings.
const INDEX_UNDERLINE: char = '#';

/// Underline character of chapter headings.
const CHAPTER_UNDERLINE: char = '=';

/// Underline character of section headings.
const SECTION_UNDERLINE: char = '-';

/// Extra underline characters under chapter and section titles.
const HEADING_OVERHANG: usize = 2;

/// A toctree directive, preceded by a blank line and followed by one.
pub const TOCTREE: &str = "\n.. toctree::\n";

/// Underline `title` with `marker`, `extra` characters longer than its
/// display length.
///
/// # Examples
/// ```
/// use normattiva_converter::rst::underline;
///
/// assert_eq!(underline("Libertà", '=', 2), "=========");
/// ```
pub fn underline(title: &str, marker: char, extra: usize) -> String {
    marker.to_string().repeat(title.chars().count() + extra)
}

/// One line of a toctree directive.
pub fn toctree_entry(path: &str) -> String {
    format!("   {path}")
}

/// Header of the top-level index: title and subtitle, then an open toctree.
pub fn index_header(title: &str, subtitle: &str) -> String {
    format!(
        "\n{title}\n{}\n\n{subtitle}\n{}\n\n.. toctree::\n\n",
        underline(title, INDEX_UNDERLINE, 0),
        underline(subtitle, INDEX_UNDERLINE, 0),
    )
}

/// A chapter document.
///
/// Intro texts of unnamed sections sit between the heading and the toctree.
pub fn chapter_document(title: &str, intros: &[&str], entries: &[String]) -> String {
    let mut lines = vec![
        title.to_string(),
        underline(title, CHAPTER_UNDERLINE, HEADING_OVERHANG),
    ];
    for intro in intros {
        lines.push(String::new());
        lines.push((*intro).to_string());
    }
    lines.push(TOCTREE.to_string());
    lines.extend(entries.iter().cloned());
    finish(lines)
}

/// A section document: heading, intro (possibly empty) and toctree.
pub fn section_document(title: &str, intro: Option<&str>, entries: &[String]) -> String {
    let mut lines = vec![
        title.to_string(),
        underline(title, SECTION_UNDERLINE, HEADING_OVERHANG),
        String::new(),
        intro.unwrap_or_default().to_string(),
        TOCTREE.to_string(),
    ];
    lines.extend(entries.iter().cloned());
    finish(lines)
}

fn finish(lines: Vec<String>) -> String {
    let mut text = lines.join("\n");
    text.push_str("\n\n");
    text
}
