//! Venue registry for race weekends.
//!
//! The publisher's feed only carries a short location label per event
//! (`"Monza"`, `"Yas Marina Circuit"`, ...). This module maps those labels to
//! a [`VenueInfo`]: the circuit's display name, the IANA timezone sessions are
//! held in, and optional coordinates.
//!
//! A [`VenueRegistry`] is built once through [`VenueRegistryBuilder`] and is
//! read-only afterwards. [`VenueRegistry::builtin`] returns the process-wide
//! table of known circuits.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::event::Geo;
use crate::time::parse_timezone;

/// Location label, display name, timezone id, coordinates.
type BuiltinVenue = (&'static str, &'static str, &'static str, Option<(f64, f64)>);

const BUILTIN_VENUES: &[BuiltinVenue] = &[
    (
        "Austin",
        "Circuit of The Americas",
        "America/Chicago",
        Some((30.1345808, -97.6358511)),
    ),
    ("Baku", "Baku City Circuit", "Asia/Baku", None),
    ("Catalunya", "Circuit de Barcelona-Catalunya", "Europe/Madrid", None),
    ("Hungaroring", "Hungaroring", "Europe/Budapest", None),
    ("Imola", "Autodromo Enzo e Dino Ferrari", "Europe/Rome", None),
    ("Interlagos", "Autódromo José Carlos Pace", "America/Sao_Paulo", None),
    ("Jeddah", "Jeddah Corniche Circuit", "Asia/Riyadh", None),
    ("Las Vegas", "Las Vegas Strip Circuit", "America/Los_Angeles", None),
    ("Lusail", "Lusail International Circuit", "Asia/Qatar", None),
    ("Melbourne", "Albert Park Circuit", "Australia/Melbourne", None),
    ("Mexico City", "Autódromo Hermanos Rodríguez", "America/Mexico_City", None),
    ("Miami", "Miami International Autodrome", "America/New_York", None),
    ("Monte Carlo", "Circuit de Monaco", "Europe/Monaco", None),
    ("Montreal", "Circuit Gilles-Villeneuve", "America/Toronto", None),
    ("Monza", "Autodromo Nazionale Monza", "Europe/Rome", None),
    ("Paul Ricard", "Circuit Paul Ricard", "Europe/Paris", None),
    ("Sakhir", "Bahrain International Circuit", "Asia/Bahrain", None),
    ("Shanghai", "Shanghai International Circuit", "Asia/Shanghai", None),
    ("Silverstone", "Silverstone Circuit", "Europe/London", None),
    ("Singapore", "Marina Bay Street Circuit", "Asia/Singapore", None),
    ("Spa-Francorchamps", "Circuit de Spa-Francorchamps", "Europe/Brussels", None),
    ("Spielberg", "Red Bull Ring", "Europe/Vienna", None),
    ("Suzuka", "Suzuka International Racing Course", "Asia/Tokyo", None),
    ("Yas Marina Circuit", "Yas Marina Circuit", "Asia/Dubai", None),
    ("Zandvoort", "Circuit Zandvoort", "Europe/Amsterdam", None),
];

static BUILTIN_REGISTRY: LazyLock<VenueRegistry> = LazyLock::new(|| {
    VenueRegistry::builder()
        .with_builtin()
        .build()
        .expect("builtin venue table is valid")
});

/// Returned by [`VenueRegistry::lookup`] when a label has no entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown venue {label:?}")]
pub struct UnknownVenue {
    /// The label as it appeared in the feed.
    pub label: String,
}

/// Errors raised while building a registry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistryError {
    /// The timezone id is not in the IANA database.
    #[error("venue {label:?} uses unknown timezone {timezone_id:?}")]
    UnknownTimezone { label: String, timezone_id: String },

    /// Only one of latitude/longitude was given, or a value is out of range.
    #[error("venue {label:?} has invalid coordinates")]
    InvalidCoordinates { label: String },

    /// The label is empty after trimming.
    #[error("venue label must not be empty")]
    EmptyLabel,
}

/// Unvalidated venue data, as written in the builtin table or in a config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VenueSpec {
    /// Circuit name shown as the event location.
    pub display_name: String,
    /// IANA timezone id (e.g. `Europe/Rome`).
    pub timezone_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

impl VenueSpec {
    pub fn new(display_name: impl Into<String>, timezone_id: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            timezone_id: timezone_id.into(),
            latitude: None,
            longitude: None,
        }
    }

    #[must_use]
    pub fn with_coordinates(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }
}

/// Metadata for one venue.
#[derive(Debug, Clone, PartialEq)]
pub struct VenueInfo {
    display_name: String,
    timezone: Tz,
    latitude: Option<f64>,
    longitude: Option<f64>,
}

impl VenueInfo {
    /// Returns the circuit name.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Returns the timezone sessions at this venue are held in.
    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Returns the IANA id of [`Self::timezone`].
    pub fn timezone_id(&self) -> &'static str {
        self.timezone.name()
    }

    pub fn latitude(&self) -> Option<f64> {
        self.latitude
    }

    pub fn longitude(&self) -> Option<f64> {
        self.longitude
    }

    /// Returns the coordinates only when both latitude and longitude are known.
    pub fn geo(&self) -> Option<Geo> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(Geo::new(latitude, longitude)),
            _ => None,
        }
    }

    fn from_spec(label: &str, spec: VenueSpec) -> Result<Self, RegistryError> {
        let timezone =
            parse_timezone(&spec.timezone_id).ok_or_else(|| RegistryError::UnknownTimezone {
                label: label.to_string(),
                timezone_id: spec.timezone_id.clone(),
            })?;

        let coordinates_valid = match (spec.latitude, spec.longitude) {
            (None, None) => true,
            (Some(lat), Some(lon)) => (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon),
            _ => false,
        };
        if !coordinates_valid {
            return Err(RegistryError::InvalidCoordinates {
                label: label.to_string(),
            });
        }

        Ok(Self {
            display_name: spec.display_name,
            timezone,
            latitude: spec.latitude,
            longitude: spec.longitude,
        })
    }
}

/// Collects venue entries before freezing them into a [`VenueRegistry`].
///
/// Later inserts for the same label replace earlier ones, so configuration can
/// override builtin entries.
#[derive(Debug, Clone, Default)]
pub struct VenueRegistryBuilder {
    entries: BTreeMap<String, VenueSpec>,
}

impl VenueRegistryBuilder {
    /// Adds every entry of the builtin table.
    #[must_use]
    pub fn with_builtin(mut self) -> Self {
        for &(label, display_name, timezone_id, coordinates) in BUILTIN_VENUES {
            let mut spec = VenueSpec::new(display_name, timezone_id);
            if let Some((lat, lon)) = coordinates {
                spec = spec.with_coordinates(lat, lon);
            }
            self.entries.insert(label.to_string(), spec);
        }
        self
    }

    /// Adds or replaces one venue.
    #[must_use]
    pub fn venue(mut self, label: impl Into<String>, spec: VenueSpec) -> Self {
        self.entries.insert(label.into().trim().to_string(), spec);
        self
    }

    /// Validates every entry and freezes the registry.
    pub fn build(self) -> Result<VenueRegistry, RegistryError> {
        let mut venues = BTreeMap::new();
        for (label, spec) in self.entries {
            if label.is_empty() {
                return Err(RegistryError::EmptyLabel);
            }
            let info = VenueInfo::from_spec(&label, spec)?;
            venues.insert(label, info);
        }
        Ok(VenueRegistry { venues })
    }
}

/// Immutable mapping from feed location labels to venues.
#[derive(Debug, Clone, PartialEq)]
pub struct VenueRegistry {
    venues: BTreeMap<String, VenueInfo>,
}

impl VenueRegistry {
    pub fn builder() -> VenueRegistryBuilder {
        VenueRegistryBuilder::default()
    }

    /// Returns the builtin registry shared by the whole process.
    pub fn builtin() -> &'static VenueRegistry {
        &BUILTIN_REGISTRY
    }

    /// Looks up a venue by its exact feed label (surrounding whitespace ignored).
    pub fn lookup(&self, label: &str) -> Result<&VenueInfo, UnknownVenue> {
        self.venues.get(label.trim()).ok_or_else(|| UnknownVenue {
            label: label.to_string(),
        })
    }

    /// Iterates over `(label, venue)` pairs in label order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &VenueInfo)> {
        self.venues.iter().map(|(label, info)| (label.as_str(), info))
    }

    /// Returns the distinct timezone ids used by any venue, sorted.
    pub fn timezone_ids(&self) -> BTreeSet<&'static str> {
        self.venues.values().map(VenueInfo::timezone_id).collect()
    }

    pub fn len(&self) -> usize {
        self.venues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.venues.is_empty()
    }
}
