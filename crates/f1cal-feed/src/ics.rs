//! Reading the publisher's ICS feed into [`RawEvent`]s.
//!
//! Parsing and line unfolding are delegated to `icalendar`; this module pulls
//! out the properties the pipeline republishes and checks that the required
//! ones are present and well-formed.
//!
//! `icalendar` already unescapes the standard TEXT properties. `X-` properties
//! come back escaped and go through [`unescape_text`] here.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use icalendar::{
    Calendar, CalendarComponent, CalendarDateTime, Component, DatePerhapsTime, Event,
};
use tracing::debug;

use f1cal_core::{ICAL_LOCAL_FORMAT, ICAL_UTC_FORMAT, parse_timezone};

use crate::error::{FeedError, FeedResult};
use crate::raw_event::{RawEvent, RawInstant};

const CALENDAR_NAME: &str = "X-WR-CALNAME";

/// The parts of the source calendar the pipeline uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFeed {
    /// `X-WR-CALNAME`, when the feed sets one.
    pub calendar_name: Option<String>,
    /// Events in feed order.
    pub events: Vec<RawEvent>,
}

/// Parses raw feed bytes.
///
/// # Errors
///
/// Fails on invalid UTF-8, unparseable ICS, and on the first event with a
/// missing or malformed required property.
pub fn parse_feed(bytes: &[u8]) -> FeedResult<SourceFeed> {
    let text = std::str::from_utf8(bytes)?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let calendar: Calendar = text
        .parse()
        .map_err(|e| FeedError::Syntax(format!("{e}")))?;

    let calendar_name = calendar
        .properties
        .iter()
        .find(|p| p.key().eq_ignore_ascii_case(CALENDAR_NAME))
        .map(|p| unescape_text(p.value()));

    let events = calendar
        .iter()
        .filter_map(|component| match component {
            CalendarComponent::Event(event) => Some(event),
            _ => None,
        })
        .enumerate()
        .map(|(index, event)| read_event(event, index))
        .collect::<FeedResult<Vec<_>>>()?;

    debug!(events = events.len(), name = ?calendar_name, "Parsed source feed");

    Ok(SourceFeed {
        calendar_name,
        events,
    })
}

/// Property access for one event, tagging errors with the event's identity.
struct EventReader<'a> {
    event: &'a Event,
    record: String,
}

impl EventReader<'_> {
    fn raw(&self, key: &'static str) -> Option<&str> {
        self.event.property_value(key)
    }

    fn required_raw(&self, key: &'static str) -> FeedResult<&str> {
        self.raw(key).ok_or_else(|| FeedError::MissingField {
            record: self.record.clone(),
            field: key,
        })
    }

    fn text(&self, key: &'static str) -> FeedResult<String> {
        self.required_raw(key).map(str::to_string)
    }

    fn extension_text(&self, key: &'static str) -> FeedResult<String> {
        self.required_raw(key).map(unescape_text)
    }

    fn invalid(&self, field: &'static str, value: &str, reason: impl Into<String>) -> FeedError {
        FeedError::InvalidField {
            record: self.record.clone(),
            field,
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    fn utc_stamp(&self, key: &'static str, value: &str) -> FeedResult<DateTime<Utc>> {
        parse_utc_stamp(value).ok_or_else(|| self.invalid(key, value, "not a date-time"))
    }

    fn instant(&self, key: &'static str) -> FeedResult<RawInstant> {
        let value = self.required_raw(key)?;
        let parsed = match key {
            "DTSTART" => self.event.get_start(),
            _ => self.event.get_end(),
        };

        match parsed {
            Some(DatePerhapsTime::DateTime(date_time)) => self.resolve(key, value, date_time),
            Some(DatePerhapsTime::Date(_)) => {
                Err(self.invalid(key, value, "all-day dates are not supported"))
            }
            None => Err(self.invalid(key, value, "not a date-time")),
        }
    }

    fn resolve(
        &self,
        key: &'static str,
        value: &str,
        date_time: CalendarDateTime,
    ) -> FeedResult<RawInstant> {
        match date_time {
            CalendarDateTime::Utc(instant) => Ok(RawInstant::utc(instant)),
            CalendarDateTime::Floating(local) => Ok(RawInstant::floating(local)),
            CalendarDateTime::WithTimezone { date_time, tzid } => {
                let tz = parse_timezone(&tzid)
                    .ok_or_else(|| self.invalid(key, value, format!("unknown TZID {tzid}")))?;
                RawInstant::zoned(date_time, tz).ok_or_else(|| {
                    self.invalid(key, value, format!("local time does not exist in {tzid}"))
                })
            }
        }
    }
}

fn read_event(event: &Event, index: usize) -> FeedResult<RawEvent> {
    let record = event
        .get_uid()
        .map(str::to_string)
        .unwrap_or_else(|| format!("#{}", index + 1));
    let reader = EventReader { event, record };

    let uid = reader.required_raw("UID")?.to_string();

    let stamp_value = reader.required_raw("DTSTAMP")?;
    let stamp = reader.utc_stamp("DTSTAMP", stamp_value)?;

    let sequence_value = reader.required_raw("SEQUENCE")?;
    let sequence = sequence_value
        .trim()
        .parse::<u32>()
        .map_err(|e| reader.invalid("SEQUENCE", sequence_value, e.to_string()))?;

    let last_modified = reader
        .raw("LAST-MODIFIED")
        .map(|value| reader.utc_stamp("LAST-MODIFIED", value))
        .transpose()?;

    let start = reader.instant("DTSTART")?;
    let end = reader.instant("DTEND")?;

    let raw = RawEvent {
        uid,
        stamp,
        organizer: reader.raw("ORGANIZER").map(str::to_string),
        status: reader.text("STATUS")?,
        description: reader.text("DESCRIPTION")?,
        busy_status: reader.extension_text("X-MICROSOFT-CDO-BUSYSTATUS")?,
        transparency: reader.text("TRANSP")?,
        sequence,
        last_modified,
        summary: reader.text("SUMMARY")?,
        location: reader.text("LOCATION")?,
        start,
        end,
    };

    debug!(uid = %raw.uid, summary = %raw.summary, location = %raw.location, "Read source event");
    Ok(raw)
}

/// Parses `20240801T120000Z`; a value without `Z` is read as UTC.
fn parse_utc_stamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    NaiveDateTime::parse_from_str(value, ICAL_UTC_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(value, ICAL_LOCAL_FORMAT))
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Reverses RFC 5545 TEXT escaping (`\\`, `\;`, `\,`, `\n`).
pub fn unescape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n' | 'N') => out.push('\n'),
            Some(escaped @ ('\\' | ';' | ',')) => out.push(escaped),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
