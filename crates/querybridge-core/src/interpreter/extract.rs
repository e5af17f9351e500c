//! Regex extraction helpers shared by the interpretation pipeline.

use once_cell::sync::Lazy;
use regex::Regex;
use time::format_description::well_known::Rfc3339;
use time::{Duration, OffsetDateTime};

static NUMBERS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d+\b").expect("numbers regex"));

static QUOTED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"'([^']*)'|"([^"]*)""#).expect("quoted regex"));

/// Location phrasings tried in order; the first capture wins.
static LOCATION_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)(?:for|in|at|near)\s+([A-Za-z\s,]+?)(?:\s|$|,)",
        r"(?i)weather\s+(?:for|in|at|near)?\s*([A-Za-z\s,]+?)(?:\s|$)",
        r"(?i)temperature\s+(?:for|in|at|near)?\s*([A-Za-z\s,]+?)(?:\s|$)",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("location regex"))
    .collect()
});

/// Bare integers in declaration order.
pub(crate) fn numbers(text: &str) -> Vec<i64> {
    NUMBERS
        .find_iter(text)
        .filter_map(|found| found.as_str().parse().ok())
        .collect()
}

/// First single- or double-quoted phrase, verbatim.
pub(crate) fn first_quoted(text: &str) -> Option<String> {
    QUOTED
        .captures(text)
        .and_then(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|found| found.as_str().to_string())
}

pub(crate) fn location(lower: &str) -> Option<String> {
    LOCATION_PATTERNS.iter().find_map(|pattern| {
        pattern
            .captures(lower)
            .and_then(|caps| caps.get(1))
            .map(|found| found.as_str().trim().to_string())
            .filter(|value| !value.is_empty())
    })
}

/// The word (or words, up to the next break) following a keyword.
pub(crate) fn after_keyword(lower: &str, keyword: &str) -> Option<String> {
    let pattern = Regex::new(&format!(r"(?i){keyword}\s+([\w\s]+?)(?:\s|$)")).ok()?;
    pattern
        .captures(lower)
        .and_then(|caps| caps.get(1))
        .map(|found| found.as_str().trim().to_string())
        .filter(|value| !value.is_empty())
}

/// "today" / "yesterday" resolved to an RFC 3339 timestamp.
pub(crate) fn relative_date(lower: &str) -> Option<String> {
    let now = OffsetDateTime::now_utc();
    if lower.contains("yesterday") {
        (now - Duration::days(1)).format(&Rfc3339).ok()
    } else if lower.contains("today") {
        now.format(&Rfc3339).ok()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_bare_integers() {
        assert_eq!(numbers("list 5 repos from 2023"), vec![5, 2023]);
        assert!(numbers("no digits here").is_empty());
    }

    #[test]
    fn quoted_text_is_kept_verbatim() {
        assert_eq!(
            first_quoted("search for 'Hello World'"),
            Some("Hello World".to_string())
        );
        assert_eq!(
            first_quoted("search for \"Mixed Case\""),
            Some("Mixed Case".to_string())
        );
        assert_eq!(first_quoted("nothing quoted"), None);
    }

    #[test]
    fn quoted_text_returns_first_match() {
        assert_eq!(
            first_quoted("find 'first' and 'second'"),
            Some("first".to_string())
        );
    }

    #[test]
    fn location_prefers_prepositional_phrases() {
        assert_eq!(location("weather for london"), Some("london".to_string()));
        assert_eq!(location("temperature in paris"), Some("paris".to_string()));
        assert_eq!(location("show me the dashboard"), None);
    }

    #[test]
    fn after_keyword_grabs_the_following_word() {
        assert_eq!(
            after_keyword("commits by author alice since monday", "author"),
            Some("alice".to_string())
        );
        assert_eq!(after_keyword("no marker here", "author"), None);
    }

    #[test]
    fn relative_dates_resolve() {
        assert!(relative_date("commits since today").is_some());
        assert!(relative_date("commits since yesterday").is_some());
        assert!(relative_date("commits since march").is_none());
    }
}
