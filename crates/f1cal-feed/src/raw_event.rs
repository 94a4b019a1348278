//! Raw event type read from the publisher's feed.
//!
//! [`RawEvent`] holds the properties of one source `VEVENT` exactly as the
//! feed published them. Required properties are plain fields; a feed event
//! without one of them never becomes a `RawEvent` (see [`crate::ics`]).

use chrono::{DateTime, Datelike, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

/// How an instant was written in the source feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceZone {
    /// `20240901T130000Z`
    Utc,
    /// A date-time without zone or `TZID`, read as UTC.
    Floating,
    /// A date-time with a `TZID` parameter.
    Named(Tz),
}

/// An absolute instant plus the representation it was published in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawInstant {
    instant: DateTime<Utc>,
    zone: SourceZone,
}

impl RawInstant {
    pub fn utc(instant: DateTime<Utc>) -> Self {
        Self {
            instant,
            zone: SourceZone::Utc,
        }
    }

    pub fn floating(local: NaiveDateTime) -> Self {
        Self {
            instant: Utc.from_utc_datetime(&local),
            zone: SourceZone::Floating,
        }
    }

    /// Resolves a wall-clock time in `tz`.
    ///
    /// Returns `None` for times skipped by a DST transition. Times repeated by
    /// a transition resolve to the earlier instant.
    pub fn zoned(local: NaiveDateTime, tz: Tz) -> Option<Self> {
        let resolved = tz.from_local_datetime(&local).earliest()?;
        Some(Self {
            instant: resolved.with_timezone(&Utc),
            zone: SourceZone::Named(tz),
        })
    }

    /// The absolute instant.
    pub fn instant(&self) -> DateTime<Utc> {
        self.instant
    }

    pub fn zone(&self) -> SourceZone {
        self.zone
    }

    /// Calendar year in the source representation.
    pub fn year(&self) -> i32 {
        match self.zone {
            SourceZone::Named(tz) => self.instant.with_timezone(&tz).year(),
            SourceZone::Utc | SourceZone::Floating => self.instant.year(),
        }
    }
}

/// One source event, read verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEvent {
    pub uid: String,
    /// DTSTAMP
    pub stamp: DateTime<Utc>,
    /// ORGANIZER as published; never republished.
    pub organizer: Option<String>,
    pub status: String,
    pub description: String,
    /// X-MICROSOFT-CDO-BUSYSTATUS
    pub busy_status: String,
    /// TRANSP
    pub transparency: String,
    pub sequence: u32,
    pub last_modified: Option<DateTime<Utc>>,
    pub summary: String,
    /// Location label, the key into the venue registry.
    pub location: String,
    pub start: RawInstant,
    pub end: RawInstant,
}

impl RawEvent {
    /// Creates an event with the given identity and times; the remaining
    /// properties take the values the publisher normally uses.
    pub fn new(uid: impl Into<String>, start: RawInstant, end: RawInstant) -> Self {
        Self {
            uid: uid.into(),
            stamp: start.instant(),
            organizer: None,
            status: "CONFIRMED".to_string(),
            description: String::new(),
            busy_status: "BUSY".to_string(),
            transparency: "OPAQUE".to_string(),
            sequence: 0,
            last_modified: None,
            summary: String::new(),
            location: String::new(),
            start,
            end,
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_organizer(mut self, organizer: impl Into<String>) -> Self {
        self.organizer = Some(organizer.into());
        self
    }

    pub fn with_sequence(mut self, sequence: u32) -> Self {
        self.sequence = sequence;
        self
    }

    pub fn with_last_modified(mut self, last_modified: DateTime<Utc>) -> Self {
        self.last_modified = Some(last_modified);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn naive(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn utc_instant() {
        let instant = Utc.with_ymd_and_hms(2024, 9, 1, 13, 0, 0).unwrap();
        let raw = RawInstant::utc(instant);
        assert_eq!(raw.instant(), instant);
        assert_eq!(raw.zone(), SourceZone::Utc);
        assert_eq!(raw.year(), 2024);
    }

    #[test]
    fn floating_reads_as_utc() {
        let raw = RawInstant::floating(naive(2024, 9, 1, 13, 0));
        assert_eq!(raw.instant(), Utc.with_ymd_and_hms(2024, 9, 1, 13, 0, 0).unwrap());
        assert_eq!(raw.zone(), SourceZone::Floating);
    }

    #[test]
    fn zoned_instant_resolves_offset() {
        let raw = RawInstant::zoned(naive(2024, 9, 1, 15, 0), chrono_tz::Europe::Rome).unwrap();
        assert_eq!(raw.instant(), Utc.with_ymd_and_hms(2024, 9, 1, 13, 0, 0).unwrap());
        assert_eq!(raw.zone(), SourceZone::Named(chrono_tz::Europe::Rome));
    }

    #[test]
    fn zoned_gap_is_rejected_and_overlap_takes_earliest() {
        let london = chrono_tz::Europe::London;
        assert!(RawInstant::zoned(naive(2024, 3, 31, 1, 30), london).is_none());

        let repeated = RawInstant::zoned(naive(2024, 10, 27, 1, 30), london).unwrap();
        assert_eq!(
            repeated.instant(),
            Utc.with_ymd_and_hms(2024, 10, 27, 0, 30, 0).unwrap()
        );
    }

    #[test]
    fn year_uses_source_representation() {
        // 2024-12-31 23:30 UTC is already 2025 in Abu Dhabi.
        let instant = Utc.with_ymd_and_hms(2024, 12, 31, 23, 30, 0).unwrap();
        assert_eq!(RawInstant::utc(instant).year(), 2024);

        let zoned =
            RawInstant::zoned(naive(2025, 1, 1, 3, 30), chrono_tz::Asia::Dubai).unwrap();
        assert_eq!(zoned.instant(), instant);
        assert_eq!(zoned.year(), 2025);
    }

    #[test]
    fn builder_defaults() {
        let start = RawInstant::utc(Utc.with_ymd_and_hms(2024, 9, 1, 13, 0, 0).unwrap());
        let end = RawInstant::utc(Utc.with_ymd_and_hms(2024, 9, 1, 15, 0, 0).unwrap());
        let event = RawEvent::new("uid-1", start, end)
            .with_summary("FORMULA 1 ITALIAN GRAND PRIX 2024 - Race")
            .with_location("Monza")
            .with_sequence(3);

        assert_eq!(event.uid, "uid-1");
        assert_eq!(event.stamp, start.instant());
        assert_eq!(event.status, "CONFIRMED");
        assert_eq!(event.sequence, 3);
        assert!(event.organizer.is_none());
        assert!(event.last_modified.is_none());
    }
}
