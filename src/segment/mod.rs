//! Dictionary-driven word segmentation
//!
//! Splits a run-together token such as `housedopbydivision` into the most
//! probable sequence of words under a unigram language model. Known words
//! score `count / total`; unknown words are penalised by their length so a
//! long unrecognised run is kept whole rather than shattered into letters.

use crate::SegmentError;
use std::collections::HashMap;
use std::path::Path;

/// Dictionary shipped with the crate, tab-separated `word count` lines
const EMBEDDED_UNIGRAMS: &str = include_str!("../../data/unigrams.txt");

/// Longest candidate word considered during the search
const MAX_WORD_LEN: usize = 24;

/// Unigram word segmenter
#[derive(Debug, Clone)]
pub struct Segmenter {
    unigrams: HashMap<String, f64>,
    total: f64,
}

impl Segmenter {
    /// Loads the dictionary once at startup
    ///
    /// # Arguments
    ///
    /// * `dictionary` - Optional `word<TAB>count` file; the embedded
    ///   dictionary is used when `None`
    pub fn load(dictionary: Option<&Path>) -> Result<Self, SegmentError> {
        match dictionary {
            Some(path) => {
                let text = std::fs::read_to_string(path)?;
                let segmenter = Self::from_counts(&text)?;
                tracing::debug!(
                    "Loaded {} dictionary words from {}",
                    segmenter.unigrams.len(),
                    path.display()
                );
                Ok(segmenter)
            }
            None => Self::from_counts(EMBEDDED_UNIGRAMS),
        }
    }

    /// Builds a segmenter from dictionary text
    ///
    /// Blank lines and lines starting with `#` are ignored. Fields may be
    /// separated by any whitespace.
    pub fn from_counts(text: &str) -> Result<Self, SegmentError> {
        let mut unigrams = HashMap::new();

        for (index, line) in text.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let malformed = || SegmentError::Malformed {
                line: index + 1,
                content: line.to_string(),
            };

            let mut fields = trimmed.split_whitespace();
            let (Some(word), Some(count), None) = (fields.next(), fields.next(), fields.next())
            else {
                return Err(malformed());
            };
            let count: f64 = count.parse().map_err(|_| malformed())?;
            if !count.is_finite() || count <= 0.0 {
                return Err(malformed());
            }

            unigrams.insert(word.to_lowercase(), count);
        }

        if unigrams.is_empty() {
            return Err(SegmentError::Empty);
        }

        let total = unigrams.values().sum();
        Ok(Self { unigrams, total })
    }

    /// Number of dictionary words
    pub fn len(&self) -> usize {
        self.unigrams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.unigrams.is_empty()
    }

    /// Splits `token` into word fragments
    ///
    /// The token is lower-cased and reduced to ASCII letters and digits
    /// first, so `Results.CSV` segments as `resultscsv`.
    pub fn segment(&self, token: &str) -> Vec<String> {
        let clean: String = token
            .chars()
            .map(|c| c.to_ascii_lowercase())
            .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
            .collect();

        let n = clean.len();
        if n == 0 {
            return Vec::new();
        }

        // best[end] = (log10 probability of clean[..end], start of its last word)
        let mut best: Vec<(f64, usize)> = vec![(f64::NEG_INFINITY, 0); n + 1];
        best[0] = (0.0, 0);

        for end in 1..=n {
            for start in end.saturating_sub(MAX_WORD_LEN)..end {
                let score = best[start].0 + self.log_score(&clean[start..end]);
                if score > best[end].0 {
                    best[end] = (score, start);
                }
            }
        }

        let mut words = Vec::new();
        let mut end = n;
        while end > 0 {
            let start = best[end].1;
            words.push(clean[start..end].to_string());
            end = start;
        }
        words.reverse();
        words
    }

    fn log_score(&self, word: &str) -> f64 {
        match self.unigrams.get(word) {
            Some(count) => (count / self.total).log10(),
            None => 1.0 - self.total.log10() - word.len() as f64,
        }
    }
}
