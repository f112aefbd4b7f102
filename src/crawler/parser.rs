//! HTML parser for extracting anchors
//!
//! Anchors are returned raw: the href is the attribute value as written and
//! no resolution or filtering happens here. Classification is left to
//! [`classify_link`](super::classify_link).

use crate::FetchError;
use scraper::{Html, Selector};

/// One `<a>` element from a parsed page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Anchor {
    /// The raw `href` attribute, if present
    pub href: Option<String>,

    /// Trimmed text content, `None` when blank
    pub text: Option<String>,
}

/// Decodes a page body as UTF-8
///
/// A body that is not valid UTF-8 cannot be parsed for anchors, so the
/// page is reported as a markup failure.
pub fn decode_page(body: Vec<u8>) -> Result<String, FetchError> {
    String::from_utf8(body).map_err(|e| FetchError::Markup(e.to_string()))
}

/// Extracts every anchor from the document in parse order
///
/// # Example
///
/// ```
/// use ballot_harvest::crawler::parse_anchors;
///
/// let anchors = parse_anchors(r#"<a href="results.csv">Download</a>"#);
/// assert_eq!(anchors[0].href.as_deref(), Some("results.csv"));
/// assert_eq!(anchors[0].text.as_deref(), Some("Download"));
/// ```
pub fn parse_anchors(html: &str) -> Vec<Anchor> {
    let document = Html::parse_document(html);
    let mut anchors = Vec::new();

    if let Ok(a_selector) = Selector::parse("a") {
        for element in document.select(&a_selector) {
            let href = element.value().attr("href").map(String::from);

            let text = element.text().collect::<String>();
            let text = Some(text.trim().to_string()).filter(|t| !t.is_empty());

            anchors.push(Anchor { href, text });
        }
    }

    anchors
}
