//! VTIMEZONE definitions for the venue timezones used in a calendar.
//!
//! Definitions are looked up through a [`TimezoneSource`]:
//!
//! - [`ZoneinfoDir`] reads `<root>/<tzid>.ics` files, the layout published by
//!   tzurl.org and vzic (`Europe/Rome.ics`)
//! - [`StaticTimezones`] holds definitions in memory
//!
//! The `VTIMEZONE` block is embedded verbatim in the output calendar.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::TimezoneError;

const BEGIN: &str = "BEGIN:VTIMEZONE";
const END: &str = "END:VTIMEZONE";

/// One `VTIMEZONE` component as content lines, `BEGIN` and `END` included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimezoneDefinition {
    tzid: String,
    lines: Vec<String>,
}

impl TimezoneDefinition {
    /// Wraps a `VTIMEZONE` block. Line endings are normalized and blank lines
    /// dropped; folded continuation lines are kept as they are.
    pub fn new(tzid: impl Into<String>, block: &str) -> Self {
        Self {
            tzid: tzid.into(),
            lines: block
                .lines()
                .map(|line| line.trim_end_matches('\r'))
                .filter(|line| !line.trim().is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    /// Extracts the first `VTIMEZONE` block from a complete ICS document.
    pub fn from_ics(tzid: impl Into<String>, ics: &str) -> Result<Self, TimezoneError> {
        let tzid = tzid.into();
        let mut block = Vec::new();
        let mut inside = false;

        for line in ics.lines().map(|line| line.trim_end_matches('\r')) {
            if !inside && line.eq_ignore_ascii_case(BEGIN) {
                inside = true;
            }
            if inside && !line.trim().is_empty() {
                block.push(line.to_string());
            }
            if inside && line.eq_ignore_ascii_case(END) {
                return Ok(Self { tzid, lines: block });
            }
        }

        Err(TimezoneError::MissingBlock { tzid })
    }

    pub fn tzid(&self) -> &str {
        &self.tzid
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

/// Provides `VTIMEZONE` definitions by IANA id.
pub trait TimezoneSource {
    /// Returns the definition for `tzid`.
    fn definition(&self, tzid: &str) -> Result<TimezoneDefinition, TimezoneError>;
}

/// Definitions read from a directory of per-zone ICS files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneinfoDir {
    root: PathBuf,
}

impl ZoneinfoDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path the definition for `tzid` is read from.
    pub fn path_for(&self, tzid: &str) -> PathBuf {
        self.root.join(format!("{tzid}.ics"))
    }
}

impl TimezoneSource for ZoneinfoDir {
    fn definition(&self, tzid: &str) -> Result<TimezoneDefinition, TimezoneError> {
        if tzid.is_empty() || tzid.split('/').any(|part| part.is_empty() || part == "..") {
            return Err(TimezoneError::NotFound {
                tzid: tzid.to_string(),
            });
        }

        let path = self.path_for(tzid);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(TimezoneError::NotFound {
                    tzid: tzid.to_string(),
                });
            }
            Err(source) => {
                return Err(TimezoneError::Io {
                    tzid: tzid.to_string(),
                    path,
                    source,
                });
            }
        };

        debug!(tzid, path = %path.display(), "Loaded timezone definition");
        TimezoneDefinition::from_ics(tzid, &contents)
    }
}

/// In-memory definitions, keyed by IANA id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticTimezones {
    definitions: BTreeMap<String, TimezoneDefinition>,
}

impl StaticTimezones {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a definition, replacing any previous one for the same id.
    #[must_use]
    pub fn with(mut self, definition: TimezoneDefinition) -> Self {
        self.definitions
            .insert(definition.tzid().to_string(), definition);
        self
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl TimezoneSource for StaticTimezones {
    fn definition(&self, tzid: &str) -> Result<TimezoneDefinition, TimezoneError> {
        self.definitions
            .get(tzid)
            .cloned()
            .ok_or_else(|| TimezoneError::NotFound {
                tzid: tzid.to_string(),
            })
    }
}

/// Fetches one definition per distinct id, sorted by id.
pub fn collect_definitions<'a, S>(
    source: &S,
    tzids: impl IntoIterator<Item = &'a str>,
) -> Result<Vec<TimezoneDefinition>, TimezoneError>
where
    S: TimezoneSource + ?Sized,
{
    tzids
        .into_iter()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(|tzid| source.definition(tzid))
        .collect()
}
