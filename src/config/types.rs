use serde::Deserialize;

/// Main configuration structure for Ballot-Harvest
///
/// Every section falls back to the built-in constants, so an empty file
/// (or no file at all) describes the default crawl.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub seeder: SeederConfig,
    pub crawler: CrawlerConfig,
    pub download: DownloadConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
    pub segmentation: SegmentationConfig,
}

/// Top-level pages whose anchors name the per-year entry points
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SeederConfig {
    /// Pages scanned for `<year> <contest>` anchors
    pub pages: Vec<String>,
}

impl Default for SeederConfig {
    fn default() -> Self {
        Self {
            pages: vec!["https://results.aec.gov.au/".to_string()],
        }
    }
}

/// Link classification and descent limits
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Pages at this depth or deeper are never fetched
    pub max_depth: u32,

    /// Every Nth level below the root, links without the follow text are
    /// not followed
    pub throttle_interval: u32,

    /// Anchor text substring (case-insensitive) that always earns a follow
    pub follow_text: String,

    /// Href suffixes that mark a downloadable result file
    pub target_extensions: Vec<String>,

    /// Href prefixes that are never fetched
    pub blocked_schemes: Vec<String>,

    /// Href suffixes that are never fetched
    pub blocked_extensions: Vec<String>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: 8,
            throttle_interval: 3,
            follow_text: "download".to_string(),
            target_extensions: vec![".csv".to_string()],
            blocked_schemes: ["mailto:", "tel:", "javascript:", "ftp:"]
                .into_iter()
                .map(String::from)
                .collect(),
            blocked_extensions: [
                ".pdf", ".zip", ".xml", ".jpg", ".jpeg", ".png", ".gif", ".doc", ".docx", ".xls",
                ".xlsx",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

/// Gates applied to every candidate file before its body is fetched
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct DownloadConfig {
    /// Largest accepted content-length, in bytes
    pub max_file_size: u64,

    /// When set, the probed content-type must equal this exactly
    pub target_content_type: Option<String>,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            max_file_size: 200_000_000,
            target_content_type: None,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct UserAgentConfig {
    /// Name of the crawler
    pub crawler_name: String,

    /// Version of the crawler
    pub crawler_version: String,

    /// URL with information about the crawler
    pub contact_url: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "ballot-harvest".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://github.com/ballot-harvest/ballot-harvest".to_string(),
        }
    }
}

impl UserAgentConfig {
    /// Formats the header value: `Name/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{})",
            self.crawler_name, self.crawler_version, self.contact_url
        )
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory under which the `year/topic` trees are created
    pub root: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            root: "results".to_string(),
        }
    }
}

/// Word-segmentation dictionary location
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SegmentationConfig {
    /// `word<TAB>count` unigram file; the embedded dictionary when absent
    pub dictionary: Option<String>,
}
