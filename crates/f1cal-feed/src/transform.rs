//! RawEvent to CanonicalEvent.
//!
//! The transformer resolves the venue, normalizes the title, converts start
//! and end into the venue timezone, extracts the event page link and stamps
//! the publisher identity as organizer. Everything else is copied.

use tracing::debug;

use f1cal_core::{
    CanonicalEvent, EventPageMatcher, PublisherIdentity, SummaryNormalizer, VenueRegistry,
    to_venue_time,
};

use crate::error::TransformError;
use crate::raw_event::RawEvent;

/// Turns raw feed events into canonical ones. Holds only borrowed,
/// read-only collaborators.
#[derive(Debug, Clone, Copy)]
pub struct EventTransformer<'a> {
    registry: &'a VenueRegistry,
    normalizer: &'a SummaryNormalizer,
    publisher: &'a PublisherIdentity,
    matcher: &'a EventPageMatcher,
}

impl<'a> EventTransformer<'a> {
    pub fn new(
        registry: &'a VenueRegistry,
        normalizer: &'a SummaryNormalizer,
        publisher: &'a PublisherIdentity,
        matcher: &'a EventPageMatcher,
    ) -> Self {
        Self {
            registry,
            normalizer,
            publisher,
            matcher,
        }
    }

    /// Transforms one event.
    ///
    /// # Errors
    ///
    /// - [`TransformError::Summary`] when the title is not in publisher layout
    /// - [`TransformError::UnknownVenue`] when the location label is unknown
    /// - [`TransformError::InvertedInterval`] when the event ends before it starts
    pub fn transform(&self, raw: &RawEvent) -> Result<CanonicalEvent, TransformError> {
        let summary = self
            .normalizer
            .normalize(&raw.summary, raw.start.year())
            .map_err(|source| TransformError::Summary {
                uid: raw.uid.clone(),
                source,
            })?;

        let venue =
            self.registry
                .lookup(&raw.location)
                .map_err(|source| TransformError::UnknownVenue {
                    uid: raw.uid.clone(),
                    source,
                })?;

        let (start, end) = (raw.start.instant(), raw.end.instant());
        if end < start {
            return Err(TransformError::InvertedInterval {
                uid: raw.uid.clone(),
                start,
                end,
            });
        }

        let url = self.matcher.find(&raw.description);
        debug!(
            uid = %raw.uid,
            summary = %summary,
            venue = venue.display_name(),
            tz = venue.timezone_id(),
            has_url = url.is_some(),
            "Transformed event"
        );

        Ok(CanonicalEvent {
            uid: raw.uid.clone(),
            summary,
            location: venue.display_name().to_string(),
            start: to_venue_time(&start, venue.timezone()),
            end: to_venue_time(&end, venue.timezone()),
            url,
            geo: venue.geo(),
            description: raw.description.clone(),
            organizer: self.publisher.clone(),
            stamp: raw.stamp,
            status: raw.status.clone(),
            sequence: raw.sequence,
            transparency: raw.transparency.clone(),
            busy_status: raw.busy_status.clone(),
            last_modified: raw.last_modified,
        })
    }

    /// Transforms every event, stopping at the first failure.
    pub fn transform_all<'r>(
        &self,
        events: impl IntoIterator<Item = &'r RawEvent>,
    ) -> Result<Vec<CanonicalEvent>, TransformError> {
        events.into_iter().map(|raw| self.transform(raw)).collect()
    }
}
