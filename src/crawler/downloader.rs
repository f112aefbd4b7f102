//! Gated file download
//!
//! A candidate file is probed with HEAD first. Only when its type and size
//! pass the configured gates is the body fetched, named and written.

use crate::config::DownloadConfig;
use crate::crawler::fetcher::{Fetched, HttpTransport, Probe};
use crate::crawler::filename::{derive_folder, resolve_filename};
use crate::segment::Segmenter;
use crate::state::Registry;
use crate::{FetchError, HarvestError};
use std::path::{Path, PathBuf};

/// What happened to one download candidate
#[derive(Debug)]
pub enum DownloadOutcome {
    /// The body was written to this path
    Saved(PathBuf),

    /// The URL was already probed earlier in the run
    AlreadyVisited,

    /// A file with this name was already saved earlier in the run
    DuplicateFilename(String),

    /// The file was abandoned after a recoverable failure
    Skipped(FetchError),
}

/// Checks a HEAD probe against the download gates
///
/// # Gates
///
/// | Condition                                         | Failure       |
/// |---------------------------------------------------|---------------|
/// | Status is not 2xx                                 | Status        |
/// | Target type configured and probed type differs    | TypeMismatch  |
/// | Length absent, non-positive or above the ceiling  | SizeExceeded  |
pub fn check_probe(probe: &Probe, config: &DownloadConfig) -> Result<(), FetchError> {
    if !probe.is_success() {
        return Err(FetchError::Status(probe.status));
    }

    if let Some(target) = &config.target_content_type {
        let actual = probe.content_type.clone().unwrap_or_default();
        if actual != target.trim().to_lowercase() {
            return Err(FetchError::TypeMismatch(actual));
        }
    }

    match probe.content_length {
        Some(length) if length > 0.0 && length <= config.max_file_size as f64 => Ok(()),
        length => Err(FetchError::SizeExceeded {
            length,
            limit: config.max_file_size,
        }),
    }
}

/// Fetches result files into the destination tree
pub struct Downloader<'a> {
    transport: &'a HttpTransport,
    config: &'a DownloadConfig,
    segmenter: &'a Segmenter,
}

impl<'a> Downloader<'a> {
    pub fn new(
        transport: &'a HttpTransport,
        config: &'a DownloadConfig,
        segmenter: &'a Segmenter,
    ) -> Self {
        Self {
            transport,
            config,
            segmenter,
        }
    }

    /// Downloads `url` into the tree under `folder`
    ///
    /// The URL is registered before anything is fetched, so a failed
    /// candidate is never tried again in the same run. The filename is
    /// registered just before writing; a second resource resolving to the
    /// same name is fetched but not written.
    ///
    /// # Returns
    ///
    /// * `Ok(DownloadOutcome)` - The file was saved, deduplicated or skipped
    /// * `Err(HarvestError)` - A fatal transport failure or a filesystem error
    pub async fn fetch(
        &self,
        registry: &mut Registry,
        url: &str,
        folder: &Path,
    ) -> Result<DownloadOutcome, HarvestError> {
        if !registry.urls.register(url) {
            tracing::trace!("Already probed {}", url);
            return Ok(DownloadOutcome::AlreadyVisited);
        }

        let fetched = match self.fetch_gated(url).await {
            Ok(fetched) => fetched,
            Err(failure) => return skip_or_fail(url, failure),
        };

        let Some(filename) = resolve_filename(&fetched.headers, url) else {
            return skip_or_fail(url, FetchError::FilenameUnresolvable);
        };

        if !registry.filenames.register(&filename) {
            tracing::warn!(
                "Didn't download {}. A file named {} was already saved",
                url,
                filename
            );
            return Ok(DownloadOutcome::DuplicateFilename(filename));
        }

        let directory = derive_folder(folder, &filename, self.segmenter);
        tokio::fs::create_dir_all(&directory).await?;

        let path = directory.join(&filename);
        tokio::fs::write(&path, &fetched.body).await?;
        tracing::info!(
            "Saved {} ({} bytes) to {}",
            url,
            fetched.body.len(),
            path.display()
        );

        Ok(DownloadOutcome::Saved(path))
    }

    /// Probes, gates and then fetches the body
    async fn fetch_gated(&self, url: &str) -> Result<Fetched, FetchError> {
        let probe = self.transport.head(url).await?;
        check_probe(&probe, self.config)?;

        let fetched = self.transport.get(url).await?;
        if !fetched.is_success() {
            return Err(FetchError::Status(fetched.status));
        }
        if fetched.final_url != url {
            tracing::debug!("{} redirected to {}", url, fetched.final_url);
        }
        Ok(fetched)
    }
}

/// Turns a failure into a skipped outcome, or an error when it is fatal
fn skip_or_fail(url: &str, failure: FetchError) -> Result<DownloadOutcome, HarvestError> {
    if failure.is_fatal() {
        return Err(HarvestError::Fetch {
            url: url.to_string(),
            source: failure,
        });
    }

    tracing::warn!("Didn't download {}. {}", url, failure);
    Ok(DownloadOutcome::Skipped(failure))
}
