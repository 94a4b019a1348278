//! Calendar rebuild.

use std::ffi::OsString;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use f1cal_feed::{Pipeline, ZoneinfoDir, log_failure};

use crate::config::Config;
use crate::error::CliResult;

/// Path meaning stdin for `--input` and stdout for `--output`.
const STDIO: &str = "-";

/// Reads the feed, runs the pipeline and replaces the output file.
///
/// `zoneinfo` overrides the configured timezone directory. Nothing is written
/// when the run fails.
pub fn run(config: &Config, input: &Path, output: &Path, zoneinfo: Option<PathBuf>) -> CliResult<()> {
    let feed = read_input(input)?;
    debug!(bytes = feed.len(), input = %input.display(), "Read source feed");

    let registry = config.registry()?;
    let zones = zoneinfo
        .or_else(|| config.zoneinfo_dir.clone())
        .map(ZoneinfoDir::new);

    let mut pipeline = Pipeline::new(&registry)
        .with_normalizer(config.normalizer())
        .with_publisher(config.publisher.clone())
        .with_color(config.calendar.color.as_str())
        .with_default_name(config.calendar.default_name.as_str());
    if let Some(zones) = &zones {
        pipeline = pipeline.with_timezone_source(zones);
    }

    let calendar = pipeline.run(&feed).inspect_err(log_failure)?;
    write_output(output, &calendar)?;

    info!(bytes = calendar.len(), output = %output.display(), "Wrote calendar");
    Ok(())
}

fn read_input(path: &Path) -> io::Result<Vec<u8>> {
    if path.as_os_str() == STDIO {
        let mut buf = Vec::new();
        io::stdin().lock().read_to_end(&mut buf)?;
        Ok(buf)
    } else {
        fs::read(path)
    }
}

fn write_output(path: &Path, bytes: &[u8]) -> io::Result<()> {
    if path.as_os_str() == STDIO {
        let mut stdout = io::stdout().lock();
        stdout.write_all(bytes)?;
        stdout.flush()
    } else {
        write_replacing(path, bytes)
    }
}

/// Writes `bytes` to a sibling temp file, then renames it over `path`.
pub fn write_replacing(path: &Path, bytes: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut temp_path = OsString::from(path.as_os_str());
    temp_path.push(".tmp");
    let temp_path = PathBuf::from(temp_path);

    let written = fs::write(&temp_path, bytes).and_then(|()| fs::rename(&temp_path, path));
    if written.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    written
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;

    const FEED: &str = "BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
PRODID:-//Formula 1//EN\r\n\
BEGIN:VEVENT\r\n\
UID:race-2024-zandvoort@formula1.com\r\n\
DTSTAMP:20240801T120000Z\r\n\
DTSTART:20240825T130000Z\r\n\
DTEND:20240825T150000Z\r\n\
SUMMARY:FORMULA 1 HEINEKEN DUTCH GRAND PRIX 2024 - Race\r\n\
LOCATION:Zandvoort\r\n\
DESCRIPTION:Race\r\n\
STATUS:CONFIRMED\r\n\
SEQUENCE:0\r\n\
TRANSP:OPAQUE\r\n\
X-MICROSOFT-CDO-BUSYSTATUS:BUSY\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";

    #[test]
    fn builds_calendar_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("feed.ics");
        let output = dir.path().join("out/f1.ics");
        fs::write(&input, FEED).unwrap();

        run(&Config::default(), &input, &output, None).unwrap();

        let written = fs::read_to_string(&output).unwrap();
        assert!(written.contains("SUMMARY:Race (Heineken Dutch Grand Prix)\r\n"));
        assert!(written.contains("DTSTART;TZID=Europe/Amsterdam:20240825T150000\r\n"));
        assert!(written.contains("X-WR-CALNAME:Formula 1\r\n"));
        assert!(!dir.path().join("out/f1.ics.tmp").exists());
    }

    #[test]
    fn replaces_existing_output() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("f1.ics");
        fs::write(&output, "old contents that are much longer than the new ones").unwrap();

        write_replacing(&output, b"new").unwrap();
        assert_eq!(fs::read_to_string(&output).unwrap(), "new");
    }

    #[test]
    fn failed_run_leaves_output_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("feed.ics");
        let output = dir.path().join("f1.ics");
        fs::write(&input, FEED.replace("LOCATION:Zandvoort", "LOCATION:Assen")).unwrap();
        fs::write(&output, "previous calendar").unwrap();

        let err = run(&Config::default(), &input, &output, None).unwrap_err();
        assert!(matches!(err, CliError::Feed(_)));
        assert_eq!(fs::read_to_string(&output).unwrap(), "previous calendar");
    }

    #[test]
    fn missing_input_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = run(
            &Config::default(),
            &dir.path().join("missing.ics"),
            &dir.path().join("f1.ics"),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, CliError::Io(_)));
    }

    #[test]
    fn configured_venue_and_zoneinfo_are_used() {
        let dir = tempfile::tempdir().unwrap();
        let zoneinfo = dir.path().join("zoneinfo");
        fs::create_dir_all(zoneinfo.join("Europe")).unwrap();
        fs::write(
            zoneinfo.join("Europe/Amsterdam.ics"),
            "BEGIN:VCALENDAR\nBEGIN:VTIMEZONE\nTZID:Europe/Amsterdam\nEND:VTIMEZONE\nEND:VCALENDAR\n",
        )
        .unwrap();

        let input = dir.path().join("feed.ics");
        fs::write(&input, FEED.replace("LOCATION:Zandvoort", "LOCATION:Assen")).unwrap();
        let output = dir.path().join("f1.ics");

        let config = Config::parse(
            r#"
[venues.Assen]
display_name = "TT Circuit Assen"
timezone_id = "Europe/Amsterdam"
"#,
        )
        .unwrap();
        run(&config, &input, &output, Some(zoneinfo)).unwrap();

        let written = fs::read_to_string(&output).unwrap();
        assert!(written.contains("LOCATION:TT Circuit Assen\r\n"));
        assert!(written.contains("BEGIN:VTIMEZONE\r\nTZID:Europe/Amsterdam\r\nEND:VTIMEZONE\r\n"));
    }
}
