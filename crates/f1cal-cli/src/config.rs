//! CLI configuration.
//!
//! All settings live in a single `config.toml` file at
//! `~/.config/f1cal/config.toml` by default. Every section is optional:
//!
//! ```toml
//! zoneinfo_dir = "/usr/share/tzurl"
//!
//! [publisher]
//! name = "Formula 1 Calendar"
//! email = "calendar@georgewitteman.com"
//!
//! [calendar]
//! color = "#E10600"
//!
//! [[summary.corrections]]
//! from = "Msc"
//! to = "MSC"
//!
//! [venues."Las Vegas"]
//! display_name = "Las Vegas Strip Circuit"
//! timezone_id = "America/Los_Angeles"
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use f1cal_core::{
    CasingCorrection, CasingCorrections, PublisherIdentity, RegistryError, SummaryNormalizer,
    VenueRegistry, VenueSpec,
};
use f1cal_core::summary::DEFAULT_BRAND_PREFIX;
use f1cal_feed::{DEFAULT_CALENDAR_NAME, DEFAULT_COLOR};

/// Configuration for the f1cal CLI.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory of `<tzid>.ics` files holding VTIMEZONE definitions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zoneinfo_dir: Option<PathBuf>,

    /// Organizer stamped on every event.
    pub publisher: PublisherIdentity,

    /// Calendar-level settings.
    pub calendar: CalendarSettings,

    /// Title normalization settings.
    pub summary: SummarySettings,

    /// Extra or overriding venues, keyed by feed location label.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub venues: BTreeMap<String, VenueSpec>,
}

/// Calendar-level settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarSettings {
    /// `X-APPLE-CALENDAR-COLOR` value.
    pub color: String,

    /// Name used when the source feed has no `X-WR-CALNAME`.
    pub default_name: String,
}

impl Default for CalendarSettings {
    fn default() -> Self {
        Self {
            color: DEFAULT_COLOR.to_string(),
            default_name: DEFAULT_CALENDAR_NAME.to_string(),
        }
    }
}

/// Title normalization settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarySettings {
    /// Brand prefix stripped from every summary.
    pub brand_prefix: String,

    /// Fail on summaries without the brand prefix.
    pub require_prefix: bool,

    /// Casing corrections applied after the builtin ones.
    pub corrections: Vec<CasingCorrection>,
}

impl Default for SummarySettings {
    fn default() -> Self {
        Self {
            brand_prefix: DEFAULT_BRAND_PREFIX.to_string(),
            require_prefix: false,
            corrections: Vec::new(),
        }
    }
}

impl SummarySettings {
    /// Builds the normalizer these settings describe.
    pub fn normalizer(&self) -> SummaryNormalizer {
        let corrections = self
            .corrections
            .iter()
            .cloned()
            .fold(CasingCorrections::builtin(), CasingCorrections::with);
        SummaryNormalizer::new()
            .with_brand_prefix(self.brand_prefix.as_str())
            .require_prefix(self.require_prefix)
            .with_corrections(corrections)
    }
}

impl Config {
    /// Loads configuration from the default path, or defaults when the file
    /// does not exist.
    pub fn load() -> Result<Self, String> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read config {}: {}", path.display(), e))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| format!("failed to parse config: {}", e))
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    /// Returns the default configuration directory.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("f1cal")
    }

    /// Builtin venues extended with the configured ones.
    pub fn registry(&self) -> Result<VenueRegistry, RegistryError> {
        self.venues
            .iter()
            .fold(VenueRegistry::builder().with_builtin(), |builder, (label, spec)| {
                builder.venue(label.as_str(), spec.clone())
            })
            .build()
    }

    pub fn normalizer(&self) -> SummaryNormalizer {
        self.summary.normalizer()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = Config::parse("").unwrap();
        assert!(config.zoneinfo_dir.is_none());
        assert_eq!(config.publisher, PublisherIdentity::default());
        assert_eq!(config.calendar, CalendarSettings::default());
        assert_eq!(config.summary, SummarySettings::default());
        assert!(config.venues.is_empty());
    }

    #[test]
    fn full_config() {
        let config = Config::parse(
            r##"
zoneinfo_dir = "/usr/share/tzurl"

[publisher]
name = "Pit Wall"
email = "pitwall@example.org"

[calendar]
color = "#000000"

[summary]
require_prefix = true

[[summary.corrections]]
from = "Bwt"
to = "BWT"

[venues."Las Vegas"]
display_name = "Las Vegas Strip Circuit"
timezone_id = "America/Los_Angeles"
latitude = 36.1147
longitude = -115.1728

[venues.Madring]
display_name = "Madring"
timezone_id = "Europe/Madrid"
"##,
        )
        .unwrap();

        assert_eq!(config.zoneinfo_dir, Some(PathBuf::from("/usr/share/tzurl")));
        assert_eq!(config.publisher.email, "pitwall@example.org");
        assert_eq!(config.calendar.color, "#000000");
        assert_eq!(config.calendar.default_name, DEFAULT_CALENDAR_NAME);
        assert!(config.summary.require_prefix);
        assert_eq!(config.summary.brand_prefix, DEFAULT_BRAND_PREFIX);

        let registry = config.registry().unwrap();
        let vegas = registry.lookup("Las Vegas").unwrap();
        assert_eq!(vegas.latitude(), Some(36.1147));
        assert_eq!(registry.lookup("Madring").unwrap().timezone_id(), "Europe/Madrid");
        assert!(registry.lookup("Monza").is_ok());
    }

    #[test]
    fn configured_corrections_extend_builtin() {
        let config = Config::parse(
            r#"
[[summary.corrections]]
from = "Bwt"
to = "BWT"
"#,
        )
        .unwrap();
        let normalizer = config.normalizer();
        assert_eq!(
            normalizer
                .normalize("FORMULA 1 MSC CRUISES BWT GRAND PRIX 2024 - Race", 2024)
                .unwrap(),
            "Race (MSC Cruises BWT Grand Prix)"
        );
    }

    #[test]
    fn invalid_venue_timezone_is_reported() {
        let config = Config::parse(
            r#"
[venues.Nowhere]
display_name = "Nowhere Ring"
timezone_id = "Mars/Olympus"
"#,
        )
        .unwrap();
        assert!(matches!(
            config.registry(),
            Err(RegistryError::UnknownTimezone { .. })
        ));
    }

    #[test]
    fn malformed_toml_is_an_error() {
        let err = Config::parse("[publisher\nname = 1").unwrap_err();
        assert!(err.starts_with("failed to parse config"));
    }

    #[test]
    fn dump_round_trips() {
        let mut config = Config::default();
        config
            .venues
            .insert("Madring".to_string(), VenueSpec::new("Madring", "Europe/Madrid"));
        let dumped = toml::to_string_pretty(&config).unwrap();
        let parsed = Config::parse(&dumped).unwrap();
        assert_eq!(parsed.venues, config.venues);
        assert_eq!(parsed.calendar, config.calendar);
    }
}
