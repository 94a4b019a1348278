//! Venue listing.

use std::fmt::Write as _;

use serde::Serialize;

use f1cal_core::{VenueInfo, VenueRegistry};

use crate::config::Config;
use crate::error::{CliError, CliResult};

#[derive(Debug, Serialize)]
struct VenueRow<'a> {
    label: &'a str,
    display_name: &'a str,
    timezone: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    longitude: Option<f64>,
}

impl<'a> VenueRow<'a> {
    fn new(label: &'a str, venue: &'a VenueInfo) -> Self {
        Self {
            label,
            display_name: venue.display_name(),
            timezone: venue.timezone_id(),
            latitude: venue.latitude(),
            longitude: venue.longitude(),
        }
    }
}

/// Prints every venue of the configured registry.
pub fn list(config: &Config, json: bool) -> CliResult<()> {
    let registry = config.registry()?;
    let rendered = if json {
        render_json(&registry)?
    } else {
        render_table(&registry)
    };
    print!("{rendered}");
    Ok(())
}

fn render_json(registry: &VenueRegistry) -> CliResult<String> {
    let rows: Vec<_> = registry.iter().map(|(label, venue)| VenueRow::new(label, venue)).collect();
    serde_json::to_string_pretty(&rows)
        .map(|json| json + "\n")
        .map_err(|e| CliError::Output(format!("failed to serialize venues: {}", e)))
}

fn render_table(registry: &VenueRegistry) -> String {
    let label_width = registry.iter().map(|(label, _)| label.chars().count()).max().unwrap_or(0);
    let name_width = registry
        .iter()
        .map(|(_, venue)| venue.display_name().chars().count())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for (label, venue) in registry.iter() {
        let coordinates = venue
            .geo()
            .map(|geo| format!("  {}, {}", geo.latitude, geo.longitude))
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "{label:<label_width$}  {name:<name_width$}  {tz}{coordinates}",
            name = venue.display_name(),
            tz = venue.timezone_id(),
        );
    }
    out
}
