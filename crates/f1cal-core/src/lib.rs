//! Core types: venues, summary normalization, canonical events, links, tracing

pub mod event;
pub mod links;
pub mod summary;
pub mod time;
pub mod titlecase;
pub mod tracing;
pub mod venue;

pub use event::{CanonicalEvent, Geo, PublisherIdentity};
pub use links::{EVENT_PAGE_PATTERN, EventPageMatcher, extract_event_page_url};
pub use summary::{CasingCorrection, CasingCorrections, SummaryError, SummaryNormalizer};
pub use time::{
    ICAL_LOCAL_FORMAT, ICAL_UTC_FORMAT, format_local, format_utc, parse_timezone, to_venue_time,
};
pub use titlecase::titlecase;
pub use self::tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
pub use venue::{
    RegistryError, UnknownVenue, VenueInfo, VenueRegistry, VenueRegistryBuilder, VenueSpec,
};
