//! Link classification
//!
//! Decides, for each anchor on a page, whether it names a result file to
//! download, a page to descend into, or nothing worth fetching.

use crate::config::CrawlerConfig;

/// What the crawler does with a link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkAction {
    /// Hand the link to the downloader
    Download,
    /// Crawl the linked page one level deeper
    Follow,
    /// Ignore the link
    Skip,
}

/// Classifies a link
///
/// Rules, first match wins:
///
/// 1. No href → Skip
/// 2. href ends with a target extension → Download
/// 3. href starts with a blocked scheme or ends with a blocked extension → Skip
/// 4. No anchor text → Skip
/// 5. depth is 0, depth is not a multiple of the throttle interval, or the
///    text contains the follow text (case-insensitive) → Follow
/// 6. Otherwise → Skip
///
/// Past the root, unlabelled links are only explored on levels that are not
/// multiples of the throttle interval, which bounds the fan-out on deep
/// result pages without losing unlabelled structure for good.
///
/// # Examples
///
/// ```
/// use ballot_harvest::config::CrawlerConfig;
/// use ballot_harvest::crawler::{classify_link, LinkAction};
///
/// let config = CrawlerConfig::default();
/// assert_eq!(
///     classify_link(Some("HouseDopByDivision.csv"), None, 4, &config),
///     LinkAction::Download
/// );
/// assert_eq!(
///     classify_link(Some("tel:+61262717000"), Some("Download"), 0, &config),
///     LinkAction::Skip
/// );
/// ```
pub fn classify_link(
    href: Option<&str>,
    text: Option<&str>,
    depth: u32,
    config: &CrawlerConfig,
) -> LinkAction {
    let Some(href) = href.filter(|h| !h.is_empty()) else {
        return LinkAction::Skip;
    };

    if config
        .target_extensions
        .iter()
        .any(|ext| href.ends_with(ext.as_str()))
    {
        return LinkAction::Download;
    }

    let blocked_scheme = config
        .blocked_schemes
        .iter()
        .any(|scheme| href.starts_with(scheme.as_str()));
    let blocked_extension = config
        .blocked_extensions
        .iter()
        .any(|ext| href.ends_with(ext.as_str()));
    if blocked_scheme || blocked_extension {
        return LinkAction::Skip;
    }

    let Some(text) = text else {
        return LinkAction::Skip;
    };

    let throttle = config.throttle_interval.max(1);
    let labelled = text
        .to_lowercase()
        .contains(&config.follow_text.to_lowercase());

    if depth == 0 || depth % throttle != 0 || labelled {
        LinkAction::Follow
    } else {
        LinkAction::Skip
    }
}
