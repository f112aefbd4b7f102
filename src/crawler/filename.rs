//! Destination naming for downloaded files
//!
//! The filename comes from the response's content-disposition header when
//! it has one, and from the URL's last path segment otherwise. The folder
//! below the year/topic root is built from the words in that filename.

use crate::segment::Segmenter;
use regex::Regex;
use reqwest::header::{HeaderMap, CONTENT_DISPOSITION};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

fn filename_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"filename=(.+)").expect("filename pattern is valid"))
}

/// Resolves the filename a response should be saved under
///
/// Returns `None` when neither the header nor the URL yields a usable
/// name. Names containing a path separator, `.` and `..` are not usable.
///
/// # Examples
///
/// ```
/// use ballot_harvest::crawler::resolve_filename;
/// use reqwest::header::HeaderMap;
///
/// let headers = HeaderMap::new();
/// assert_eq!(
///     resolve_filename(&headers, "https://example.com/data/2022/house/results.csv"),
///     Some("results.csv".to_string())
/// );
/// ```
pub fn resolve_filename(headers: &HeaderMap, url: &str) -> Option<String> {
    let from_header = headers
        .get(CONTENT_DISPOSITION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| filename_pattern().captures(v))
        .and_then(|c| c.get(1))
        .map(|m| clean_header_filename(m.as_str()))
        .filter(|name| is_usable(name));

    from_header.or_else(|| {
        url.rsplit('/')
            .next()
            .map(str::to_string)
            .filter(|name| is_usable(name))
    })
}

/// Strips trailing parameters, whitespace and one pair of quotes
fn clean_header_filename(raw: &str) -> String {
    let value = raw.split(';').next().unwrap_or(raw).trim();
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
        .to_string()
}

fn is_usable(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
}

/// Builds the directory a file is written to
///
/// The lower-cased filename is split into words and each word becomes one
/// nested directory under `base`, in order. `HouseDopByDivision.csv` under
/// `2022/federalelection` lands in
/// `2022/federalelection/house/dop/by/division/csv`.
pub fn derive_folder(base: &Path, filename: &str, segmenter: &Segmenter) -> PathBuf {
    segmenter
        .segment(&filename.to_lowercase())
        .into_iter()
        .fold(base.to_path_buf(), |path, fragment| path.join(fragment))
}
