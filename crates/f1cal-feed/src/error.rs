//! Error types for feed processing.
//!
//! Every failure aborts the whole run; nothing is written when any event
//! cannot be read or transformed.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use f1cal_core::{SummaryError, UnknownVenue};
use thiserror::Error;

/// Failure turning one [`RawEvent`](crate::RawEvent) into a canonical event.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    /// The location label has no registry entry.
    #[error("event {uid}: {source}")]
    UnknownVenue { uid: String, source: UnknownVenue },

    /// The summary does not follow the publisher's title layout.
    #[error("event {uid}: {source}")]
    Summary { uid: String, source: SummaryError },

    #[error("event {uid}: end {end} is before start {start}")]
    InvertedInterval {
        uid: String,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

impl TransformError {
    /// UID of the offending event.
    pub fn uid(&self) -> &str {
        match self {
            Self::UnknownVenue { uid, .. }
            | Self::Summary { uid, .. }
            | Self::InvertedInterval { uid, .. } => uid,
        }
    }
}

/// Failure obtaining a `VTIMEZONE` definition.
#[derive(Debug, Error)]
pub enum TimezoneError {
    #[error("no timezone definition for {tzid}")]
    NotFound { tzid: String },

    #[error("failed to read timezone definition for {tzid} from {}: {source}", path.display())]
    Io {
        tzid: String,
        path: PathBuf,
        source: std::io::Error,
    },

    /// The file exists but holds no `VTIMEZONE` component for the zone.
    #[error("timezone definition for {tzid} has no VTIMEZONE block")]
    MissingBlock { tzid: String },
}

/// Top-level error of a feed run.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("feed is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    #[error("feed is not a valid calendar: {0}")]
    Syntax(String),

    /// A required property is absent. `record` is the UID, or the event's
    /// position in the feed when the UID itself is missing.
    #[error("event {record}: missing required property {field}")]
    MissingField { record: String, field: &'static str },

    #[error("event {record}: invalid {field} {value:?}: {reason}")]
    InvalidField {
        record: String,
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error(transparent)]
    Timezone(#[from] TimezoneError),
}

impl FeedError {
    /// Short machine-readable name, used as a structured log field.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Encoding(_) => "encoding",
            Self::Syntax(_) => "syntax",
            Self::MissingField { .. } => "missing_field",
            Self::InvalidField { .. } => "invalid_field",
            Self::Transform(TransformError::UnknownVenue { .. }) => "unknown_venue",
            Self::Transform(TransformError::Summary { .. }) => "invalid_summary",
            Self::Transform(TransformError::InvertedInterval { .. }) => "inverted_interval",
            Self::Timezone(_) => "timezone",
        }
    }
}

/// Result alias for feed operations.
pub type FeedResult<T> = Result<T, FeedError>;
