//! End-to-end feed processing: bytes in, calendar bytes out.

use std::collections::BTreeSet;

use tracing::{info, warn};

use f1cal_core::{EventPageMatcher, PublisherIdentity, SummaryNormalizer, VenueRegistry};

use crate::assemble::{CalendarMeta, DEFAULT_CALENDAR_NAME, DEFAULT_COLOR, OutputCalendar, assemble};
use crate::error::{FeedError, FeedResult};
use crate::ics::parse_feed;
use crate::timezone::{TimezoneSource, collect_definitions};
use crate::transform::EventTransformer;

/// Configured feed pipeline.
///
/// ```ignore
/// let pipeline = Pipeline::new(VenueRegistry::builtin())
///     .with_timezone_source(&ZoneinfoDir::new("/usr/share/tzurl"));
/// let calendar = pipeline.run(&feed_bytes)?;
/// ```
pub struct Pipeline<'a> {
    registry: &'a VenueRegistry,
    normalizer: SummaryNormalizer,
    publisher: PublisherIdentity,
    matcher: EventPageMatcher,
    timezones: Option<&'a dyn TimezoneSource>,
    color: String,
    default_name: String,
}

impl<'a> Pipeline<'a> {
    pub fn new(registry: &'a VenueRegistry) -> Self {
        Self {
            registry,
            normalizer: SummaryNormalizer::default(),
            publisher: PublisherIdentity::default(),
            matcher: EventPageMatcher::default(),
            timezones: None,
            color: DEFAULT_COLOR.to_string(),
            default_name: DEFAULT_CALENDAR_NAME.to_string(),
        }
    }

    #[must_use]
    pub fn with_normalizer(mut self, normalizer: SummaryNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    #[must_use]
    pub fn with_publisher(mut self, publisher: PublisherIdentity) -> Self {
        self.publisher = publisher;
        self
    }

    #[must_use]
    pub fn with_event_page_matcher(mut self, matcher: EventPageMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    /// Source of `VTIMEZONE` blocks. Without one the calendar carries only
    /// `TZID` references.
    #[must_use]
    pub fn with_timezone_source(mut self, source: &'a dyn TimezoneSource) -> Self {
        self.timezones = Some(source);
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Calendar name used when the feed has no `X-WR-CALNAME`.
    #[must_use]
    pub fn with_default_name(mut self, name: impl Into<String>) -> Self {
        self.default_name = name.into();
        self
    }

    /// Runs the pipeline and returns the serialized calendar.
    ///
    /// # Errors
    ///
    /// Returns the first error encountered; no partial output is produced.
    pub fn run(&self, feed: &[u8]) -> FeedResult<Vec<u8>> {
        self.build(feed).map(|calendar| calendar.serialize())
    }

    /// Runs the pipeline up to the assembled calendar.
    pub fn build(&self, feed: &[u8]) -> FeedResult<OutputCalendar> {
        let source = parse_feed(feed)?;

        let transformer =
            EventTransformer::new(self.registry, &self.normalizer, &self.publisher, &self.matcher);
        let events = transformer.transform_all(&source.events)?;

        let used: BTreeSet<&'static str> = events.iter().map(|e| e.timezone_id()).collect();
        let definitions = match self.timezones {
            Some(timezones) => collect_definitions(timezones, used.iter().copied())?,
            None => {
                if !used.is_empty() {
                    warn!(
                        timezones = used.len(),
                        "No timezone source configured, omitting VTIMEZONE definitions"
                    );
                }
                Vec::new()
            }
        };

        let meta = CalendarMeta::from_source(source.calendar_name.as_deref(), &self.default_name)
            .with_color(self.color.clone());
        let calendar = assemble(events, definitions, meta);

        info!(
            events = calendar.events().len(),
            timezones = calendar.timezones().len(),
            name = %calendar.meta().name,
            "Assembled calendar"
        );
        Ok(calendar)
    }
}

/// Logs a failed run with its error code.
pub fn log_failure(error: &FeedError) {
    tracing::error!(code = error.code(), error = %error, "Feed run failed");
}
