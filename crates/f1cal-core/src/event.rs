//! Canonical event types.
//!
//! - [`CanonicalEvent`]: one racing session, ready for publication
//! - [`PublisherIdentity`]: the organizer stamped on every republished event
//! - [`Geo`]: venue coordinates

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geo {
    pub latitude: f64,
    pub longitude: f64,
}

impl Geo {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// The identity republished events are organized by.
///
/// It replaces whatever organizer the upstream feed carried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublisherIdentity {
    /// Common name (`CN` parameter).
    pub name: String,
    /// Contact address, without the `mailto:` scheme.
    pub email: String,
}

impl Default for PublisherIdentity {
    fn default() -> Self {
        Self {
            name: "Formula 1 Calendar".to_string(),
            email: "calendar@georgewitteman.com".to_string(),
        }
    }
}

impl PublisherIdentity {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }

    /// Returns the `mailto:` URI for this identity.
    pub fn mailto(&self) -> String {
        format!("mailto:{}", self.email)
    }
}

/// A racing session after venue resolution, timezone conversion and title
/// normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalEvent {
    /// UID copied byte-for-byte from the source event.
    pub uid: String,
    /// Normalized `"Session (Event)"` title.
    pub summary: String,
    /// Venue display name.
    pub location: String,
    /// Start, expressed in the venue timezone.
    pub start: DateTime<Tz>,
    /// End, expressed in the venue timezone.
    pub end: DateTime<Tz>,
    /// Official event page, when the description links one.
    pub url: Option<String>,
    pub geo: Option<Geo>,
    pub description: String,
    pub organizer: PublisherIdentity,
    /// DTSTAMP of the source event.
    pub stamp: DateTime<Utc>,
    pub status: String,
    pub sequence: u32,
    /// TRANSP value.
    pub transparency: String,
    /// X-MICROSOFT-CDO-BUSYSTATUS value.
    pub busy_status: String,
    pub last_modified: Option<DateTime<Utc>>,
}

impl CanonicalEvent {
    /// Returns the venue timezone both start and end are expressed in.
    pub fn timezone(&self) -> Tz {
        self.start.timezone()
    }

    pub fn timezone_id(&self) -> &'static str {
        self.timezone().name()
    }

    pub fn duration(&self) -> Duration {
        self.end.signed_duration_since(&self.start)
    }
}
