//! Title-casing for session titles.
//!
//! Rules:
//! - every word is capitalized, except English minor words that are neither
//!   the first nor the last word
//! - each part of a hyphenated word is capitalized (`Pre-Season`)
//! - words with an inline period (`crypto.com`) are left untouched
//! - leading punctuation is skipped when looking for the letter to capitalize,
//!   so `(the` becomes `(The`
//! - elided `d'`, `l'` and `o'` also capitalize the following letter (`D'Italia`)
//!
//! Whitespace runs collapse to a single space.

use std::sync::LazyLock;

use regex::Regex;

const MINOR_WORDS: &[&str] = &[
    "a", "an", "and", "as", "at", "but", "by", "en", "for", "if", "in", "of", "on", "or", "the",
    "to", "v", "v.", "via", "vs", "vs.",
];

static INLINE_PERIOD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\p{L}\.\p{L}").expect("Invalid inline period regex"));

static ELIDED_ARTICLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?i)[dlo]['’]\p{L}").expect("Invalid elision regex"));

/// Title-cases `text`.
pub fn titlecase(text: &str) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    let last = words.len().saturating_sub(1);

    words
        .iter()
        .enumerate()
        .map(|(i, word)| {
            if i != 0 && i != last && is_minor(word) {
                word.to_lowercase()
            } else {
                capitalize_word(word)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_minor(word: &str) -> bool {
    let lowered = word.to_lowercase();
    MINOR_WORDS.contains(&lowered.as_str())
}

fn capitalize_word(word: &str) -> String {
    if INLINE_PERIOD.is_match(word) {
        return word.to_string();
    }
    word.split('-')
        .map(capitalize_part)
        .collect::<Vec<_>>()
        .join("-")
}

fn capitalize_part(part: &str) -> String {
    let lead = part
        .find(|c: char| c.is_alphanumeric())
        .unwrap_or(part.len());
    let (punct, rest) = part.split_at(lead);

    if !ELIDED_ARTICLE.is_match(rest) {
        return capitalize_first(part);
    }

    let mut chars = rest.chars();
    let mut out = punct.to_string();
    out.extend(chars.next().into_iter().flat_map(char::to_uppercase));
    out.extend(chars.next());
    out.push_str(&capitalize_first(chars.as_str()));
    out
}

/// Upper-cases the first alphanumeric character; digits count, so `1st` stays.
fn capitalize_first(part: &str) -> String {
    let mut out = String::with_capacity(part.len());
    let mut done = false;
    for c in part.chars() {
        if !done && c.is_alphanumeric() {
            out.extend(c.to_uppercase());
            done = true;
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capitalizes_words() {
        assert_eq!(titlecase("practice 1"), "Practice 1");
        assert_eq!(titlecase("sprint qualifying"), "Sprint Qualifying");
    }

    #[test]
    fn minor_words_stay_lower_in_the_middle() {
        assert_eq!(
            titlecase("race (grand prix of the americas)"),
            "Race (Grand Prix of the Americas)"
        );
        assert_eq!(titlecase("the race is on"), "The Race Is On");
        assert_eq!(titlecase("one to go to"), "One to Go To");
    }

    #[test]
    fn leading_punctuation_is_skipped() {
        assert_eq!(titlecase("race (the finale)"), "Race (The Finale)");
        assert_eq!(titlecase("\"quoted\" word"), "\"Quoted\" Word");
    }

    #[test]
    fn hyphenated_parts() {
        assert_eq!(
            titlecase("practice 1 (aramco pre-season testing)"),
            "Practice 1 (Aramco Pre-Season Testing)"
        );
        assert_eq!(titlecase("spa-francorchamps"), "Spa-Francorchamps");
    }

    #[test]
    fn inline_period_words_untouched() {
        assert_eq!(
            titlecase("race (crypto.com miami grand prix)"),
            "Race (crypto.com Miami Grand Prix)"
        );
    }

    #[test]
    fn elided_articles() {
        assert_eq!(titlecase("gran premio d'italia"), "Gran Premio D'Italia");
        assert_eq!(titlecase("race (l'autodromo)"), "Race (L'Autodromo)");
        assert_eq!(titlecase("don't stop"), "Don't Stop");
    }

    #[test]
    fn digits_and_accents() {
        assert_eq!(titlecase("1st practice"), "1st Practice");
        assert_eq!(titlecase("gran premio de españa"), "Gran Premio De España");
        assert_eq!(titlecase("émilie"), "Émilie");
    }

    #[test]
    fn collapses_whitespace() {
        assert_eq!(titlecase("  practice   2 "), "Practice 2");
        assert_eq!(titlecase(""), "");
    }
}
