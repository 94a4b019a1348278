//! Summary normalization.
//!
//! The publisher titles sessions like
//! `FORMULA 1 ARAMCO PRE-SEASON TESTING 2024 - PRACTICE 1`. The
//! [`SummaryNormalizer`] turns that into `Practice 1 (Aramco Pre-Season Testing)`:
//!
//! 1. lower-case the summary
//! 2. strip the brand prefix
//! 3. split on the first `" - "` into event and session names
//! 4. strip the event year from the end of the event name
//! 5. compose `"{session} ({event})"` and title-case it
//! 6. restore brand casing from the [`CasingCorrections`] table
//!
//! Anything after the first delimiter belongs to the session name, further
//! dashes included.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::titlecase::titlecase;

/// Brand prefix the publisher puts in front of every summary.
pub const DEFAULT_BRAND_PREFIX: &str = "formula 1";

const DELIMITER: &str = " - ";

/// Errors produced by [`SummaryNormalizer::normalize`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SummaryError {
    /// No `" - "` separates the event from the session.
    #[error("summary {summary:?} has no \" - \" delimiter")]
    MissingDelimiter { summary: String },

    /// The brand prefix is required but absent.
    #[error("summary {summary:?} does not start with {prefix:?}")]
    MissingPrefix { summary: String, prefix: String },

    /// Nothing is left of the event name once prefix and year are removed.
    #[error("summary {summary:?} has an empty event name")]
    EmptyEventName { summary: String },
}

/// One exact-match casing fix, applied to whole words after title-casing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CasingCorrection {
    pub from: String,
    pub to: String,
}

impl CasingCorrection {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Ordered table of casing corrections for sponsor and brand names a generic
/// title-caser gets wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CasingCorrections {
    entries: Vec<CasingCorrection>,
}

impl Default for CasingCorrections {
    fn default() -> Self {
        Self::builtin()
    }
}

impl CasingCorrections {
    /// The corrections known for current title sponsors.
    pub fn builtin() -> Self {
        Self::new(vec![
            CasingCorrection::new("crypto.com", "Crypto.com"),
            CasingCorrection::new("Msc", "MSC"),
            CasingCorrection::new("Aws", "AWS"),
            CasingCorrection::new("Stc", "STC"),
            CasingCorrection::new("Dhl", "DHL"),
        ])
    }

    pub fn new(entries: Vec<CasingCorrection>) -> Self {
        Self { entries }
    }

    /// An empty table.
    pub fn none() -> Self {
        Self::new(Vec::new())
    }

    /// Appends a correction; it runs after the existing ones.
    #[must_use]
    pub fn with(mut self, correction: CasingCorrection) -> Self {
        self.entries.push(correction);
        self
    }

    pub fn entries(&self) -> &[CasingCorrection] {
        &self.entries
    }

    /// Applies every correction in order.
    pub fn apply(&self, title: &str) -> String {
        self.entries
            .iter()
            .filter(|c| !c.from.is_empty())
            .fold(title.to_string(), |acc, c| {
                replace_whole_word(&acc, &c.from, &c.to)
            })
    }
}

/// Replaces occurrences of `from` that are not part of a longer word.
fn replace_whole_word(haystack: &str, from: &str, to: &str) -> String {
    let mut out = String::with_capacity(haystack.len());
    let mut last = 0;

    for (idx, _) in haystack.match_indices(from) {
        if idx < last {
            continue;
        }
        let end = idx + from.len();
        let before_ok = haystack[..idx]
            .chars()
            .next_back()
            .is_none_or(|c| !c.is_alphanumeric());
        let after_ok = haystack[end..]
            .chars()
            .next()
            .is_none_or(|c| !c.is_alphanumeric());

        if before_ok && after_ok {
            out.push_str(&haystack[last..idx]);
            out.push_str(to);
            last = end;
        }
    }

    out.push_str(&haystack[last..]);
    out
}

/// Turns raw publisher summaries into canonical `"Session (Event)"` titles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryNormalizer {
    brand_prefix: String,
    require_prefix: bool,
    corrections: CasingCorrections,
}

impl Default for SummaryNormalizer {
    fn default() -> Self {
        Self {
            brand_prefix: DEFAULT_BRAND_PREFIX.to_string(),
            require_prefix: false,
            corrections: CasingCorrections::builtin(),
        }
    }
}

impl SummaryNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the brand prefix; matching is case-insensitive.
    #[must_use]
    pub fn with_brand_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.brand_prefix = prefix.into().trim().to_lowercase();
        self
    }

    /// When set, a summary without the brand prefix is an error.
    #[must_use]
    pub fn require_prefix(mut self, require: bool) -> Self {
        self.require_prefix = require;
        self
    }

    #[must_use]
    pub fn with_corrections(mut self, corrections: CasingCorrections) -> Self {
        self.corrections = corrections;
        self
    }

    pub fn brand_prefix(&self) -> &str {
        &self.brand_prefix
    }

    pub fn corrections(&self) -> &CasingCorrections {
        &self.corrections
    }

    /// Normalizes one summary. `event_year` is stripped from the end of the
    /// event name.
    ///
    /// A summary with nothing before the delimiter, such as
    /// `"FORMULA 1 2024 - Race"`, is rejected with
    /// [`SummaryError::EmptyEventName`] rather than rendered as `"Race ()"`.
    pub fn normalize(&self, raw_summary: &str, event_year: i32) -> Result<String, SummaryError> {
        let lowered = raw_summary.to_lowercase();

        let without_prefix = match lowered.strip_prefix(self.brand_prefix.as_str()) {
            Some(rest) if !self.brand_prefix.is_empty() => rest,
            _ if self.require_prefix => {
                return Err(SummaryError::MissingPrefix {
                    summary: raw_summary.to_string(),
                    prefix: self.brand_prefix.clone(),
                });
            }
            _ => lowered.as_str(),
        }
        .trim();

        let Some((event_name, session_name)) = without_prefix.split_once(DELIMITER) else {
            return Err(SummaryError::MissingDelimiter {
                summary: raw_summary.to_string(),
            });
        };

        let event_name = event_name.trim();
        let year = event_year.to_string();
        let event_name = event_name.strip_suffix(year.as_str()).unwrap_or(event_name).trim();
        let session_name = session_name.trim();

        if event_name.is_empty() {
            return Err(SummaryError::EmptyEventName {
                summary: raw_summary.to_string(),
            });
        }

        let titled = titlecase(&format!("{session_name} ({event_name})"));
        Ok(self.corrections.apply(&titled))
    }
}
