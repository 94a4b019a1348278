//! Time helpers for moving instants between UTC and venue timezones.
//!
//! Conversions here never change the absolute instant, only the offset it is
//! displayed with.

use std::fmt::Display;

use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;

/// iCalendar UTC date-time form (`20240901T130000Z`).
pub const ICAL_UTC_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// iCalendar local date-time form, used together with a `TZID` parameter.
pub const ICAL_LOCAL_FORMAT: &str = "%Y%m%dT%H%M%S";

/// Parses an IANA timezone id.
pub fn parse_timezone(id: &str) -> Option<Tz> {
    id.trim().parse::<Tz>().ok()
}

/// Re-expresses an instant in the venue's timezone.
pub fn to_venue_time<T: TimeZone>(instant: &DateTime<T>, venue: Tz) -> DateTime<Tz> {
    instant.with_timezone(&venue)
}

/// Formats an instant as an iCalendar UTC date-time.
pub fn format_utc<T: TimeZone>(instant: &DateTime<T>) -> String {
    instant.with_timezone(&Utc).format(ICAL_UTC_FORMAT).to_string()
}

/// Formats the wall-clock part of a zoned instant, without offset.
pub fn format_local<T: TimeZone>(instant: &DateTime<T>) -> String
where
    T::Offset: Display,
{
    instant.format(ICAL_LOCAL_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    #[test]
    fn parses_iana_ids() {
        assert_eq!(parse_timezone("Europe/Rome"), Some(chrono_tz::Europe::Rome));
        assert_eq!(parse_timezone(" Asia/Tokyo "), Some(chrono_tz::Asia::Tokyo));
        assert_eq!(parse_timezone("Europe/Monza"), None);
        assert_eq!(parse_timezone(""), None);
    }

    #[test]
    fn venue_time_keeps_instant() {
        let start = utc(2024, 9, 1, 13, 0, 0);
        let local = to_venue_time(&start, chrono_tz::Europe::Rome);

        assert_eq!(format_local(&local), "20240901T150000");
        assert_eq!(local.with_timezone(&Utc), start);
    }

    #[test]
    fn round_trip_across_dst_and_date_line() {
        let instants = [
            utc(2024, 3, 31, 0, 59, 59),
            utc(2024, 3, 31, 1, 0, 0),
            utc(2024, 10, 27, 0, 30, 0),
            utc(2024, 10, 27, 1, 30, 0),
            utc(2024, 12, 31, 23, 59, 59),
        ];
        let zones = [
            chrono_tz::Europe::London,
            chrono_tz::Australia::Melbourne,
            chrono_tz::America::Sao_Paulo,
            chrono_tz::Asia::Tokyo,
        ];

        for instant in instants {
            for zone in zones {
                let local = to_venue_time(&instant, zone);
                assert_eq!(local.with_timezone(&Utc), instant, "{zone:?} {instant}");
            }
        }
    }

    #[test]
    fn local_date_can_differ_from_utc_date() {
        let start = utc(2024, 3, 23, 23, 0, 0);
        let local = to_venue_time(&start, chrono_tz::Australia::Melbourne);
        assert_eq!(local.day(), 24);
        assert_eq!(format_utc(&local), "20240323T230000Z");
    }
}
