//! Official event-page link extraction.
//!
//! The publisher's event descriptions usually end with a link to the race
//! weekend page on formula1.com. The first such link becomes the event's
//! `URL` property.
//!
//! # Example
//!
//! ```
//! use f1cal_core::links::extract_event_page_url;
//!
//! let text = "Watch live. https://www.formula1.com/en/racing/2024/italy.html";
//! assert_eq!(
//!     extract_event_page_url(text).as_deref(),
//!     Some("https://www.formula1.com/en/racing/2024/italy.html")
//! );
//! ```

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

/// Pattern matching the publisher's event pages.
pub const EVENT_PAGE_PATTERN: &str = r"https?://www\.formula1\.com/en/racing\S+";

static EVENT_PAGE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EVENT_PAGE_PATTERN).expect("Invalid event page regex"));

/// Finds event-page URLs in free text.
#[derive(Debug, Clone)]
pub struct EventPageMatcher {
    pattern: Regex,
}

impl Default for EventPageMatcher {
    fn default() -> Self {
        Self {
            pattern: EVENT_PAGE_REGEX.clone(),
        }
    }
}

impl EventPageMatcher {
    /// Creates a matcher for a custom pattern.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
        })
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// Returns the first match that is also a well-formed URL, verbatim.
    pub fn find(&self, text: &str) -> Option<String> {
        self.pattern
            .find_iter(text.trim())
            .map(|m| m.as_str())
            .find(|candidate| Url::parse(candidate).is_ok())
            .map(str::to_string)
    }
}

/// Convenience function using the default pattern.
///
/// See [`EventPageMatcher::find`] for details.
pub fn extract_event_page_url(text: &str) -> Option<String> {
    EventPageMatcher::default().find(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_first_event_page() {
        let text = "More info: https://www.formula1.com/en/racing/2024/bahrain.html\n\
                    Tickets: https://www.formula1.com/en/racing/2024/bahrain/tickets.html";
        assert_eq!(
            extract_event_page_url(text).as_deref(),
            Some("https://www.formula1.com/en/racing/2024/bahrain.html")
        );
    }

    #[test]
    fn ignores_other_urls() {
        let text = "Stream on https://f1tv.formula1.com and https://www.formula1.com/en/latest";
        assert_eq!(extract_event_page_url(text), None);
    }

    #[test]
    fn no_url_is_not_an_error() {
        assert_eq!(extract_event_page_url(""), None);
        assert_eq!(extract_event_page_url("Practice session"), None);
    }

    #[test]
    fn accepts_plain_http() {
        assert_eq!(
            extract_event_page_url("http://www.formula1.com/en/racing/2023.html").as_deref(),
            Some("http://www.formula1.com/en/racing/2023.html")
        );
    }

    #[test]
    fn dots_in_host_are_literal() {
        assert_eq!(
            extract_event_page_url("https://wwwxformula1.com/en/racing/2024"),
            None
        );
    }

    #[test]
    fn custom_pattern() {
        let matcher = EventPageMatcher::new(r"https://example\.org/races/\S+").unwrap();
        assert_eq!(
            matcher.find("see https://example.org/races/monza").as_deref(),
            Some("https://example.org/races/monza")
        );
        assert!(EventPageMatcher::new("(").is_err());
    }
}
