//! Output calendar assembly and deterministic serialization.
//!
//! [`CalendarAssembler`] collects canonical events and timezone definitions;
//! [`OutputCalendar::serialize`] writes them in a fixed order so the same
//! input always yields the same bytes.

use std::collections::{BTreeMap, BTreeSet};

use f1cal_core::{CanonicalEvent, format_local, format_utc};

use crate::timezone::TimezoneDefinition;
use crate::writer::IcsWriter;

/// PRODID of every calendar this crate writes.
pub const PRODUCT_ID: &str = "+//IDN georgewitteman.com//Formula 1 Calendar//EN";

/// Formula 1 red.
pub const DEFAULT_COLOR: &str = "#E10600";

/// Calendar name used when the source feed has none.
pub const DEFAULT_CALENDAR_NAME: &str = "Formula 1";

/// Source calendar names replaced on output.
const CALENDAR_RENAMES: &[(&str, &str)] = &[
    ("FORMULA 1", "Formula 1"),
    ("Formula One", "Formula 1"),
    ("FORMULA ONE", "Formula 1"),
];

/// Calendar-level properties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarMeta {
    /// X-WR-CALNAME
    pub name: String,
    /// X-APPLE-CALENDAR-COLOR
    pub color: String,
}

impl Default for CalendarMeta {
    fn default() -> Self {
        Self {
            name: DEFAULT_CALENDAR_NAME.to_string(),
            color: DEFAULT_COLOR.to_string(),
        }
    }
}

impl CalendarMeta {
    /// Derives the metadata from the source calendar's name, falling back to
    /// `default_name` when the source has none.
    pub fn from_source(source_name: Option<&str>, default_name: &str) -> Self {
        let name = source_name
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(normalize_calendar_name)
            .unwrap_or_else(|| default_name.to_string());
        Self {
            name,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }
}

/// Applies the rename table to a source calendar name.
pub fn normalize_calendar_name(name: &str) -> String {
    let name = name.trim();
    CALENDAR_RENAMES
        .iter()
        .find(|(from, _)| *from == name)
        .map_or_else(|| name.to_string(), |(_, to)| (*to).to_string())
}

/// A finished calendar: events sorted by UID, timezones sorted by id.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputCalendar {
    meta: CalendarMeta,
    timezones: Vec<TimezoneDefinition>,
    events: Vec<CanonicalEvent>,
}

impl OutputCalendar {
    pub fn meta(&self) -> &CalendarMeta {
        &self.meta
    }

    pub fn timezones(&self) -> &[TimezoneDefinition] {
        &self.timezones
    }

    pub fn events(&self) -> &[CanonicalEvent] {
        &self.events
    }

    /// Serializes the calendar as UTF-8 ICS bytes.
    pub fn serialize(&self) -> Vec<u8> {
        self.to_ics_string().into_bytes()
    }

    pub fn to_ics_string(&self) -> String {
        let mut writer = IcsWriter::new();
        writer.begin("VCALENDAR");
        writer.property("VERSION", "2.0");
        writer.property("PRODID", PRODUCT_ID);
        writer.property("CALSCALE", "GREGORIAN");
        writer.property("METHOD", "PUBLISH");
        writer.text("X-WR-CALNAME", &self.meta.name);
        writer.property("X-APPLE-CALENDAR-COLOR", &self.meta.color);

        for timezone in &self.timezones {
            for line in timezone.lines() {
                writer.raw_line(line);
            }
        }

        for event in &self.events {
            write_event(&mut writer, event);
        }

        writer.end("VCALENDAR");
        writer.finish()
    }
}

fn write_event(writer: &mut IcsWriter, event: &CanonicalEvent) {
    let tzid = event.timezone_id();

    writer.begin("VEVENT");
    writer.property("UID", &event.uid);
    writer.property("DTSTAMP", &format_utc(&event.stamp));
    writer.property("SEQUENCE", &event.sequence.to_string());
    writer.property("STATUS", &event.status);
    writer.text("SUMMARY", &event.summary);
    writer.text("LOCATION", &event.location);
    if let Some(geo) = event.geo {
        writer.property("GEO", &format!("{};{}", geo.latitude, geo.longitude));
    }
    writer.property_with_params("DTSTART", &[("TZID", tzid)], &format_local(&event.start));
    writer.property_with_params("DTEND", &[("TZID", tzid)], &format_local(&event.end));
    if !event.description.is_empty() {
        writer.text("DESCRIPTION", &event.description);
    }
    if let Some(url) = &event.url {
        writer.property("URL", url);
    }
    writer.property_with_params(
        "ORGANIZER",
        &[("CN", event.organizer.name.as_str())],
        &event.organizer.mailto(),
    );
    writer.property("TRANSP", &event.transparency);
    writer.property("X-MICROSOFT-CDO-BUSYSTATUS", &event.busy_status);
    if let Some(modified) = &event.last_modified {
        writer.property("LAST-MODIFIED", &format_utc(modified));
    }
    writer.end("VEVENT");
}

/// Accumulates events and timezone definitions.
#[derive(Debug, Clone, Default)]
pub struct CalendarAssembler {
    meta: CalendarMeta,
    events: Vec<CanonicalEvent>,
    timezones: BTreeMap<String, TimezoneDefinition>,
}

impl CalendarAssembler {
    pub fn new(meta: CalendarMeta) -> Self {
        Self {
            meta,
            ..Self::default()
        }
    }

    pub fn add_event(&mut self, event: CanonicalEvent) {
        self.events.push(event);
    }

    /// Adds a definition; the first one registered for an id wins.
    pub fn add_timezone(&mut self, definition: TimezoneDefinition) {
        self.timezones
            .entry(definition.tzid().to_string())
            .or_insert(definition);
    }

    /// Sorts events by UID and keeps only the definitions some event uses.
    pub fn finish(self) -> OutputCalendar {
        let mut events = self.events;
        events.sort_by(|a, b| a.uid.cmp(&b.uid));

        let used: BTreeSet<&str> = events.iter().map(CanonicalEvent::timezone_id).collect();
        let timezones = self
            .timezones
            .into_values()
            .filter(|definition| used.contains(definition.tzid()))
            .collect();

        OutputCalendar {
            meta: self.meta,
            timezones,
            events,
        }
    }
}

/// Builds an [`OutputCalendar`] in one call.
pub fn assemble(
    events: impl IntoIterator<Item = CanonicalEvent>,
    timezones: impl IntoIterator<Item = TimezoneDefinition>,
    meta: CalendarMeta,
) -> OutputCalendar {
    let mut assembler = CalendarAssembler::new(meta);
    for event in events {
        assembler.add_event(event);
    }
    for definition in timezones {
        assembler.add_timezone(definition);
    }
    assembler.finish()
}

/// Serializes a calendar; see [`OutputCalendar::serialize`].
pub fn serialize(calendar: &OutputCalendar) -> Vec<u8> {
    calendar.serialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use chrono_tz::Tz;
    use f1cal_core::{Geo, PublisherIdentity};

    fn event(uid: &str, tz: Tz) -> CanonicalEvent {
        let start = Utc.with_ymd_and_hms(2024, 9, 1, 13, 0, 0).unwrap();
        CanonicalEvent {
            uid: uid.to_string(),
            summary: "Race (Pirelli Gran Premio D'Italia)".to_string(),
            location: "Autodromo Nazionale Monza".to_string(),
            start: start.with_timezone(&tz),
            end: (start + chrono::Duration::hours(2)).with_timezone(&tz),
            url: None,
            geo: None,
            description: String::new(),
            organizer: PublisherIdentity::default(),
            stamp: Utc.with_ymd_and_hms(2024, 8, 1, 12, 0, 0).unwrap(),
            status: "CONFIRMED".to_string(),
            sequence: 0,
            transparency: "OPAQUE".to_string(),
            busy_status: "BUSY".to_string(),
            last_modified: None,
        }
    }

    fn definition(tzid: &str) -> TimezoneDefinition {
        TimezoneDefinition::new(tzid, &format!("BEGIN:VTIMEZONE\nTZID:{tzid}\nEND:VTIMEZONE\n"))
    }

    #[test]
    fn calendar_name_renames() {
        assert_eq!(normalize_calendar_name("FORMULA 1"), "Formula 1");
        assert_eq!(normalize_calendar_name("Formula One"), "Formula 1");
        assert_eq!(normalize_calendar_name("F1 Sprint Weekends"), "F1 Sprint Weekends");

        assert_eq!(CalendarMeta::from_source(None, "Formula 1").name, "Formula 1");
        assert_eq!(CalendarMeta::from_source(Some("  "), "Races").name, "Races");
        assert_eq!(CalendarMeta::from_source(Some("FORMULA 1"), "Races").name, "Formula 1");
        assert_eq!(CalendarMeta::default().color, DEFAULT_COLOR);
    }

    #[test]
    fn events_sorted_by_uid() {
        let rome = chrono_tz::Europe::Rome;
        let calendar = assemble(
            [event("c", rome), event("a", rome), event("b", rome)],
            Vec::new(),
            CalendarMeta::default(),
        );
        let uids: Vec<_> = calendar.events().iter().map(|e| e.uid.as_str()).collect();
        assert_eq!(uids, ["a", "b", "c"]);
    }

    #[test]
    fn timezones_deduplicated_and_restricted_to_used() {
        let calendar = assemble(
            [
                event("a", chrono_tz::Europe::Rome),
                event("b", chrono_tz::Asia::Tokyo),
            ],
            [
                definition("Europe/Rome"),
                definition("Europe/London"),
                definition("Asia/Tokyo"),
                definition("Europe/Rome"),
            ],
            CalendarMeta::default(),
        );
        let ids: Vec<_> = calendar.timezones().iter().map(TimezoneDefinition::tzid).collect();
        assert_eq!(ids, ["Asia/Tokyo", "Europe/Rome"]);
    }

    #[test]
    fn serializes_event_in_fixed_order() {
        let mut monza = event("race-2024-monza@formula1.com", chrono_tz::Europe::Rome);
        monza.url = Some("https://www.formula1.com/en/racing/2024/italy.html".to_string());
        monza.geo = Some(Geo::new(45.6156, 9.2811));
        monza.description = "Lights out, 15:00".to_string();
        monza.last_modified = Some(Utc.with_ymd_and_hms(2024, 8, 15, 8, 0, 0).unwrap());

        let calendar = assemble([monza], [definition("Europe/Rome")], CalendarMeta::default());
        let text = String::from_utf8(calendar.serialize()).unwrap();

        let expected = "BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
PRODID:+//IDN georgewitteman.com//Formula 1 Calendar//EN\r\n\
CALSCALE:GREGORIAN\r\n\
METHOD:PUBLISH\r\n\
X-WR-CALNAME:Formula 1\r\n\
X-APPLE-CALENDAR-COLOR:#E10600\r\n\
BEGIN:VTIMEZONE\r\n\
TZID:Europe/Rome\r\n\
END:VTIMEZONE\r\n\
BEGIN:VEVENT\r\n\
UID:race-2024-monza@formula1.com\r\n\
DTSTAMP:20240801T120000Z\r\n\
SEQUENCE:0\r\n\
STATUS:CONFIRMED\r\n\
SUMMARY:Race (Pirelli Gran Premio D'Italia)\r\n\
LOCATION:Autodromo Nazionale Monza\r\n\
GEO:45.6156;9.2811\r\n\
DTSTART;TZID=Europe/Rome:20240901T150000\r\n\
DTEND;TZID=Europe/Rome:20240901T170000\r\n\
DESCRIPTION:Lights out\\, 15:00\r\n\
URL:https://www.formula1.com/en/racing/2024/italy.html\r\n\
ORGANIZER;CN=Formula 1 Calendar:mailto:calendar@georgewitteman.com\r\n\
TRANSP:OPAQUE\r\n\
X-MICROSOFT-CDO-BUSYSTATUS:BUSY\r\n\
LAST-MODIFIED:20240815T080000Z\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn serialization_is_deterministic() {
        let build = || {
            assemble(
                [
                    event("b", chrono_tz::Asia::Tokyo),
                    event("a", chrono_tz::Europe::Rome),
                ],
                [definition("Europe/Rome"), definition("Asia/Tokyo")],
                CalendarMeta::default(),
            )
        };
        assert_eq!(serialize(&build()), serialize(&build()));
    }

    #[test]
    fn empty_calendar_has_only_metadata() {
        let calendar = CalendarAssembler::new(CalendarMeta::default()).finish();
        let text = calendar.to_ics_string();
        assert!(text.starts_with("BEGIN:VCALENDAR\r\n"));
        assert!(text.ends_with("END:VCALENDAR\r\n"));
        assert!(!text.contains("BEGIN:VEVENT"));
        assert!(!text.contains("BEGIN:VTIMEZONE"));
    }
}
