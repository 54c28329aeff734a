//! Article segmentation.
//!
//! An `<articolo>` carries its text as a flat stream of `<p>` paragraphs under
//! `<corpo>`: sometimes a few lines of preamble that belong to the enclosing
//! chapter, then the designator ("Art. 20"), the headline, and the body. The
//! stream is walked once by a small state machine that finds these parts and
//! re-flows numbered lists into indented reStructuredText list items.

use std::sync::LazyLock;

use regex::Regex;

use crate::config::DESIGNATOR_LEADER;
use crate::error::{ConverterError, Result};
use crate::text::normalize_accents;
use crate::types::Article;
use crate::xml::{find_children, find_descendants, XmlNode};

/// Line consisting only of dashes.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static DASHES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^---+\s*$").expect("valid regex"));

/// List label such as "1)", "a)", "2-bis." at the start of a paragraph.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static LIST_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9a-z\-]+)([).])\s*").expect("valid regex"));

/// Article identifier following the designator leader ("Art. 20-bis" → "20-bis").
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static ARTICLE_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Art[^ ]* ([0-9a-zA-Z\-]+)").expect("valid regex"));

/// Line break inside a paragraph, with the indentation around it.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static LINE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*[\r\n]\s*").expect("valid regex"));

/// Blank line inserted between a list and the text around it.
const SEPARATOR: &str = "\n";

/// Character repeated under an article title.
const TITLE_UNDERLINE: &str = "^";

/// Position of the segmenter in the paragraph stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Before the designator line.
    Intro,
    /// Designator seen, waiting for the headline.
    Title,
    /// Plain body paragraphs.
    Body,
    /// Inside a numbered list.
    ListItem,
}

/// One paragraph after cleanup.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Paragraph {
    /// A dash rule, kept as a blank line.
    Separator,
    /// A numbered or lettered list entry.
    Labelled {
        label: String,
        delimiter: char,
        rest: String,
    },
    Plain(String),
}

impl Paragraph {
    fn classify(raw: &str) -> Self {
        let text = LINE_BREAK.replace_all(raw.trim(), " ");
        if DASHES.is_match(&text) {
            return Self::Separator;
        }

        let text = strip_repeal_markers(&text);
        match LIST_LABEL.captures(text) {
            Some(caps) => {
                let whole = caps.get(0).map_or(0, |m| m.end());
                Self::Labelled {
                    label: caps[1].to_string(),
                    delimiter: caps[2].chars().next().unwrap_or(')'),
                    rest: text[whole..].to_string(),
                }
            }
            None => Self::Plain(text.to_string()),
        }
    }

    fn is_labelled(&self) -> bool {
        matches!(self, Self::Labelled { .. })
    }

    fn is_designator(&self) -> bool {
        matches!(self, Self::Plain(text) if text.starts_with(DESIGNATOR_LEADER))
    }

    /// Text as written in the output stream.
    ///
    /// List entries start on their own line, indented by two spaces, so the
    /// joined output has a blank line before every entry.
    fn render(&self) -> String {
        match self {
            Self::Separator => SEPARATOR.to_string(),
            Self::Labelled {
                label,
                delimiter,
                rest,
            } if rest.is_empty() => format!("\n  {label}{delimiter}"),
            Self::Labelled {
                label,
                delimiter,
                rest,
            } => format!("\n  {label}{delimiter} {rest}"),
            Self::Plain(text) => text.clone(),
        }
    }

    /// Text without list re-flow, used for the title parts.
    fn plain_text(&self) -> String {
        match self {
            Self::Separator => String::new(),
            Self::Labelled {
                label,
                delimiter,
                rest,
            } => format!("{label}{delimiter} {rest}")
                .trim_end()
                .to_string(),
            Self::Plain(text) => text.clone(),
        }
    }
}

/// Remove the "((...))" wrapper that marks repealed or amended text.
fn strip_repeal_markers(text: &str) -> &str {
    let text = text.strip_prefix("((").unwrap_or(text);
    let text = text.strip_suffix("))").unwrap_or(text);
    text.trim()
}

/// Result of segmenting one article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentedArticle {
    /// Preamble found before the designator, normalized; `None` when the
    /// designator is the first paragraph.
    pub intro: Option<String>,

    pub article: Article,
}

/// Walks the paragraph stream once.
#[derive(Debug)]
struct Segmenter {
    state: State,
    previous_labelled: bool,
    intro: Vec<String>,
    designator: String,
    headline: String,
    body: Vec<String>,
}

impl Segmenter {
    fn new() -> Self {
        Self {
            state: State::Intro,
            previous_labelled: false,
            intro: Vec::new(),
            designator: String::new(),
            headline: String::new(),
            body: Vec::new(),
        }
    }

    fn feed(&mut self, paragraph: &Paragraph) {
        let labelled = paragraph.is_labelled();
        let closes_list = self.previous_labelled && !labelled;
        self.previous_labelled = labelled;

        match self.state {
            State::Intro => {
                if closes_list {
                    self.intro.push(SEPARATOR.to_string());
                }
                if paragraph.is_designator() {
                    self.designator = paragraph.plain_text();
                    self.state = State::Title;
                } else {
                    self.intro.push(paragraph.render());
                }
            }
            State::Title => {
                self.headline = paragraph.plain_text();
                self.state = if labelled {
                    State::ListItem
                } else {
                    State::Body
                };
            }
            State::Body => {
                self.body.push(paragraph.render());
                if labelled {
                    self.state = State::ListItem;
                }
            }
            State::ListItem => {
                if !labelled {
                    self.body.push(SEPARATOR.to_string());
                    self.state = State::Body;
                }
                self.body.push(paragraph.render());
            }
        }
    }

    fn finish(self, article_ref: &str) -> Result<SegmentedArticle> {
        if self.state == State::Intro {
            return Err(ConverterError::MissingDesignator {
                article: article_ref.to_string(),
            });
        }

        let title = normalize_accents(&title_line(&self.designator, &self.headline));
        let id = extract_article_id(&title)?;
        let underline = TITLE_UNDERLINE.repeat(title.chars().count());

        let mut lines = vec![title, underline, String::new()];
        lines.extend(self.body);
        lines.push(String::new());
        let text = normalize_accents(&format!("{}\n", lines.join("\n")));

        let intro = if self.intro.is_empty() {
            None
        } else {
            let mut parts = self.intro;
            parts.push(SEPARATOR.to_string());
            Some(normalize_accents(&parts.join("\n\n")))
        };

        Ok(SegmentedArticle {
            intro,
            article: Article::new(id, text),
        })
    }
}

/// Build "<designator>. <headline>" with the headline's wrapping trimmed.
fn title_line(designator: &str, headline: &str) -> String {
    let designator = designator.trim();
    let designator = designator
        .strip_suffix('.')
        .unwrap_or(designator)
        .trim_end();

    let headline = headline
        .trim()
        .trim_start_matches('(')
        .trim_end_matches(|c: char| matches!(c, ')' | '.' | ',' | ';' | ':') || c.is_whitespace())
        .trim();

    if headline.is_empty() {
        designator.to_string()
    } else {
        format!("{designator}. {headline}")
    }
}

/// Extract the article identifier from a designator or formatted article text.
///
/// # Examples
/// ```
/// use normattiva_converter::parser::extract_article_id;
///
/// assert_eq!(extract_article_id("Art. 20-bis. Titolo").unwrap(), "20-bis");
/// assert!(extract_article_id("Premessa").is_err());
/// ```
pub fn extract_article_id(text: &str) -> Result<String> {
    ARTICLE_ID
        .captures(text)
        .map(|caps| caps[1].to_string())
        .ok_or_else(|| ConverterError::Extraction {
            what: "article id",
            text: text.lines().next().unwrap_or_default().to_string(),
        })
}

/// Collect the paragraph texts of an article in document order.
///
/// Every `<p>` under any `<corpo>` contributes its full text; empty
/// paragraphs are skipped. Line breaks inside a paragraph are folded into
/// single spaces when the paragraph is classified.
pub fn article_paragraphs(node: &XmlNode) -> Vec<String> {
    find_descendants(node, "corpo")
        .into_iter()
        .flat_map(|corpo| find_children(corpo, "p"))
        .map(|p| p.text_content().trim().to_string())
        .filter(|text| !text.is_empty())
        .collect()
}

/// Segment an `<articolo>` element.
pub fn segment_article(node: &XmlNode) -> Result<SegmentedArticle> {
    let article_ref = node.attribute("id").unwrap_or("<unnamed>");
    segment_paragraphs(&article_paragraphs(node), article_ref)
}

/// Segment a paragraph stream into intro and formatted article text.
///
/// `article_ref` only identifies the article in errors.
pub fn segment_paragraphs<S: AsRef<str>>(
    paragraphs: &[S],
    article_ref: &str,
) -> Result<SegmentedArticle> {
    let mut segmenter = Segmenter::new();
    for raw in paragraphs {
        segmenter.feed(&Paragraph::classify(raw.as_ref()));
    }
    let segmented = segmenter.finish(article_ref)?;

    tracing::debug!(
        article = %segmented.article.id,
        has_intro = segmented.intro.is_some(),
        "Segmented article"
    );
    Ok(segmented)
}
