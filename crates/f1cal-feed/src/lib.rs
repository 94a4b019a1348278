//! Feed processing for f1cal.
//!
//! ```text
//!  feed bytes ──parse_feed──▶ RawEvent ──EventTransformer──▶ CanonicalEvent
//!                                                                 │
//!  TimezoneSource ──collect_definitions──▶ TimezoneDefinition     │
//!                                                 │               │
//!                                                 ▼               ▼
//!                                           CalendarAssembler ──▶ OutputCalendar ──▶ bytes
//! ```
//!
//! [`Pipeline`] wires the stages together.

pub mod assemble;
pub mod error;
pub mod ics;
pub mod pipeline;
pub mod raw_event;
pub mod timezone;
pub mod transform;
pub mod writer;

pub use assemble::{
    CalendarAssembler, CalendarMeta, DEFAULT_CALENDAR_NAME, DEFAULT_COLOR, OutputCalendar,
    PRODUCT_ID, assemble, normalize_calendar_name, serialize,
};
pub use error::{FeedError, FeedResult, TimezoneError, TransformError};
pub use ics::{SourceFeed, parse_feed};
pub use pipeline::{Pipeline, log_failure};
pub use raw_event::{RawEvent, RawInstant, SourceZone};
pub use timezone::{
    StaticTimezones, TimezoneDefinition, TimezoneSource, ZoneinfoDir, collect_definitions,
};
pub use transform::EventTransformer;
