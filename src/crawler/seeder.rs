//! Entry-point discovery on the top-level results page
//!
//! Each anchor whose text starts with a year (`2022 — House of
//! Representatives`) becomes one crawl root, written under
//! `<output root>/<year>/<topic>`.

use crate::crawler::parser::parse_anchors;
use regex::Regex;
use std::sync::OnceLock;
use url::Url;

fn entry_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^([0-9]+)[^a-z0-9]*(.*)").expect("entry pattern is valid"))
}

/// One per-year crawl root found on a top-level page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedEntry {
    /// Absolute URL of the year's entry page
    pub url: String,

    /// Leading digit run of the anchor text
    pub year: String,

    /// Remaining anchor text with every non-alphabetic character removed
    pub topic: String,
}

/// Derives the `(year, topic)` folder pair from an anchor's text
///
/// # Examples
///
/// ```
/// use ballot_harvest::crawler::derive_folders;
///
/// assert_eq!(
///     derive_folders("2022 — House of Representatives"),
///     Some(("2022".to_string(), "houseofrepresentatives".to_string()))
/// );
/// assert_eq!(derive_folders("About the results"), None);
/// ```
pub fn derive_folders(text: &str) -> Option<(String, String)> {
    let lowered = text.to_lowercase();
    let captures = entry_pattern().captures(&lowered)?;

    let year = captures.get(1)?.as_str().to_string();
    let topic = captures
        .get(2)
        .map(|m| m.as_str())
        .unwrap_or_default()
        .chars()
        .filter(|c| c.is_alphabetic())
        .collect();

    Some((year, topic))
}

/// Collects the crawl roots from a top-level page, in document order
///
/// Hrefs are resolved against `page_url`, so both absolute and relative
/// entry links work. Anchors without text, without an href, or whose
/// text does not start with digits are ignored.
pub fn seed_entries(html: &str, page_url: &str) -> Vec<SeedEntry> {
    let base = Url::parse(page_url).ok();

    parse_anchors(html)
        .into_iter()
        .filter_map(|anchor| {
            let text = anchor.text?;
            let href = anchor.href.filter(|h| !h.is_empty())?;
            let (year, topic) = derive_folders(&text)?;

            let url = base
                .as_ref()
                .and_then(|b| b.join(&href).ok())
                .map(|u| u.to_string())
                .unwrap_or(href);

            Some(SeedEntry { url, year, topic })
        })
        .collect()
}
