//! Ballot-Harvest: an election results downloader
//!
//! This crate walks a hierarchical results website, picks out downloadable
//! result files and saves them into a local tree keyed by year and contest,
//! never fetching the same URL or saving the same filename twice in a run.

pub mod config;
pub mod crawler;
pub mod segment;
pub mod state;

use thiserror::Error;

/// Main error type for Ballot-Harvest operations
///
/// Every variant here is fatal for the run. Recoverable fetch failures are
/// [`FetchError`]s and never leave the crawler unless their
/// [`Recovery`] is [`Recovery::Fatal`].
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Segmentation error: {0}")]
    Segment(#[from] SegmentError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Unrecoverable failure at {url}: {source}")]
    Fetch { url: String, source: FetchError },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Word-segmentation dictionary errors
#[derive(Debug, Error)]
pub enum SegmentError {
    #[error("Failed to read dictionary: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed dictionary line {line}: {content}")]
    Malformed { line: usize, content: String },

    #[error("Dictionary is empty")]
    Empty,
}

/// A classified failure while probing, fetching or saving a single resource
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("unsupported or missing URL scheme: {0}")]
    Scheme(String),

    #[error("secure transport negotiation failed: {0}")]
    SecureTransport(String),

    #[error("unparseable markup: {0}")]
    Markup(String),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("size exceeds {limit} bytes (content-length: {length:?})")]
    SizeExceeded { length: Option<f64>, limit: u64 },

    #[error("wrong type: {0}")]
    TypeMismatch(String),

    #[error("can't guess filename")]
    FilenameUnresolvable,

    #[error("host unreachable: {0}")]
    Unreachable(String),

    #[error("unclassified transport failure: {0}")]
    Unclassified(String),
}

/// What the crawler does after a [`FetchError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    /// Abandon the page and everything below it
    SkipBranch,
    /// Abandon this file only
    SkipFile,
    /// Stop the run
    Fatal,
}

impl FetchError {
    /// Maps each failure class to its recovery action
    ///
    /// | Failure               | Recovery   |
    /// |-----------------------|------------|
    /// | Scheme                | SkipBranch |
    /// | SecureTransport       | SkipBranch |
    /// | Markup                | SkipBranch |
    /// | Status                | SkipBranch |
    /// | SizeExceeded          | SkipFile   |
    /// | TypeMismatch          | SkipFile   |
    /// | FilenameUnresolvable  | SkipFile   |
    /// | Unreachable           | Fatal      |
    /// | Unclassified          | Fatal      |
    pub fn recovery(&self) -> Recovery {
        match self {
            Self::Scheme(_) | Self::SecureTransport(_) | Self::Markup(_) | Self::Status(_) => {
                Recovery::SkipBranch
            }
            Self::SizeExceeded { .. } | Self::TypeMismatch(_) | Self::FilenameUnresolvable => {
                Recovery::SkipFile
            }
            Self::Unreachable(_) | Self::Unclassified(_) => Recovery::Fatal,
        }
    }

    /// Returns true if the run cannot continue past this failure
    pub fn is_fatal(&self) -> bool {
        self.recovery() == Recovery::Fatal
    }
}

/// Result type alias for Ballot-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{classify_link, Coordinator, LinkAction};
pub use segment::Segmenter;
pub use state::{Registry, VisitedSet};
