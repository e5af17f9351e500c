//! Provider-specific parameter extraction.
//!
//! A closed dispatch table keyed by (provider key, selected endpoint).
//! Each entry is an ordinary function so it can be exercised on its own;
//! providers without an entry simply get no extra parameters.

use querybridge_client::types::{Interpretation, ParamValue};

use super::extract;
use super::QueryText;

type Extractor = fn(&QueryText<'_>, &mut Interpretation);

struct ExtractionRule {
    provider: &'static str,
    /// `None` matches any selected endpoint of the provider.
    endpoint: Option<&'static str>,
    apply: Extractor,
}

static RULES: &[ExtractionRule] = &[
    ExtractionRule {
        provider: "github",
        endpoint: Some("commits"),
        apply: github_commits,
    },
    ExtractionRule {
        provider: "wordpress",
        endpoint: Some("posts"),
        apply: wordpress_posts,
    },
    ExtractionRule {
        provider: "openweather",
        endpoint: None,
        apply: weather_location,
    },
    ExtractionRule {
        provider: "weatherapi",
        endpoint: None,
        apply: weather_location,
    },
    ExtractionRule {
        provider: "twitter",
        endpoint: None,
        apply: twitter_query,
    },
    ExtractionRule {
        provider: "spotify",
        endpoint: None,
        apply: spotify_search,
    },
    ExtractionRule {
        provider: "youtube",
        endpoint: None,
        apply: youtube_search,
    },
    ExtractionRule {
        provider: "reddit",
        endpoint: None,
        apply: reddit_subreddit,
    },
    ExtractionRule {
        provider: "newsapi",
        endpoint: None,
        apply: newsapi_search,
    },
];

pub(crate) fn apply(
    provider: &str,
    endpoint: &str,
    text: &QueryText<'_>,
    interpretation: &mut Interpretation,
) {
    for rule in RULES {
        if rule.provider == provider && rule.endpoint.map_or(true, |name| name == endpoint) {
            (rule.apply)(text, interpretation);
        }
    }
}

fn github_commits(text: &QueryText<'_>, interpretation: &mut Interpretation) {
    if text.lower.contains("since") {
        if let Some(date) = extract::relative_date(&text.lower) {
            interpretation
                .params
                .insert("since".to_string(), ParamValue::Text(date));
        }
    }
    if text.lower.contains("author") {
        if let Some(author) = extract::after_keyword(&text.lower, "author") {
            interpretation
                .params
                .insert("author".to_string(), ParamValue::Text(author));
        }
    }
}

fn wordpress_posts(text: &QueryText<'_>, interpretation: &mut Interpretation) {
    if text.lower.contains("search") {
        if let Some(term) = extract::first_quoted(text.raw) {
            interpretation
                .params
                .insert("search".to_string(), ParamValue::Text(term));
        }
    }
    if text.lower.contains("category") {
        if let Some(category) = extract::after_keyword(&text.lower, "category") {
            interpretation
                .params
                .insert("categories".to_string(), ParamValue::Text(category));
        }
    }
    if text.lower.contains("published") {
        interpretation
            .params
            .insert("status".to_string(), ParamValue::from("publish"));
    }
}

fn weather_location(text: &QueryText<'_>, interpretation: &mut Interpretation) {
    if let Some(location) = extract::location(&text.lower) {
        interpretation
            .params
            .insert("q".to_string(), ParamValue::Text(location));
    }
    if text.lower.contains("forecast") {
        interpretation.endpoint = interpretation.endpoint.replace("current", "forecast");
    }
}

fn twitter_query(text: &QueryText<'_>, interpretation: &mut Interpretation) {
    if let Some(term) = extract::first_quoted(text.raw) {
        interpretation
            .params
            .insert("query".to_string(), ParamValue::Text(term));
    }
}

fn spotify_search(text: &QueryText<'_>, interpretation: &mut Interpretation) {
    if let Some(term) = extract::first_quoted(text.raw) {
        interpretation
            .params
            .insert("q".to_string(), ParamValue::Text(term));
    }
    let kind = if text.lower.contains("artist") {
        Some("artist")
    } else if text.lower.contains("album") {
        Some("album")
    } else if text.lower.contains("track") {
        Some("track")
    } else {
        None
    };
    if let Some(kind) = kind {
        interpretation
            .params
            .insert("type".to_string(), ParamValue::from(kind));
    }
}

fn youtube_search(text: &QueryText<'_>, interpretation: &mut Interpretation) {
    if let Some(term) = extract::first_quoted(text.raw) {
        interpretation
            .params
            .insert("q".to_string(), ParamValue::Text(term));
        interpretation
            .params
            .insert("part".to_string(), ParamValue::from("snippet"));
    }
}

fn reddit_subreddit(text: &QueryText<'_>, interpretation: &mut Interpretation) {
    if text.lower.contains("subreddit") {
        if let Some(name) = extract::after_keyword(&text.lower, "subreddit") {
            interpretation.endpoint = format!("/r/{name}");
        }
    }
}

fn newsapi_search(text: &QueryText<'_>, interpretation: &mut Interpretation) {
    if let Some(term) = extract::first_quoted(text.raw) {
        interpretation
            .params
            .insert("q".to_string(), ParamValue::Text(term));
    }
    if text.lower.contains("country") {
        if let Some(country) = extract::after_keyword(&text.lower, "country") {
            let code: String = country.chars().take(2).collect::<String>().to_lowercase();
            interpretation
                .params
                .insert("country".to_string(), ParamValue::Text(code));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(raw: &str) -> QueryText<'_> {
        QueryText {
            raw,
            lower: raw.to_lowercase(),
        }
    }

    #[test]
    fn github_commits_extracts_author_and_since() {
        let mut interpretation = Interpretation::default();
        github_commits(
            &text("commits by author alice since yesterday"),
            &mut interpretation,
        );
        assert_eq!(
            interpretation.params.get("author"),
            Some(&ParamValue::Text("alice".to_string()))
        );
        assert!(interpretation.params.contains_key("since"));
    }

    #[test]
    fn wordpress_posts_extracts_search_and_status() {
        let mut interpretation = Interpretation::default();
        wordpress_posts(
            &text("search published posts for 'Launch Day'"),
            &mut interpretation,
        );
        assert_eq!(
            interpretation.params.get("search"),
            Some(&ParamValue::Text("Launch Day".to_string()))
        );
        assert_eq!(
            interpretation.params.get("status"),
            Some(&ParamValue::Text("publish".to_string()))
        );
    }

    #[test]
    fn weather_rule_extracts_location_and_swaps_forecast() {
        let mut interpretation = Interpretation {
            endpoint: "/data/current".to_string(),
            ..Interpretation::default()
        };
        weather_location(&text("forecast for berlin"), &mut interpretation);
        assert_eq!(
            interpretation.params.get("q"),
            Some(&ParamValue::Text("berlin".to_string()))
        );
        assert_eq!(interpretation.endpoint, "/data/forecast");
    }

    #[test]
    fn twitter_rule_preserves_quoted_case() {
        let mut interpretation = Interpretation::default();
        twitter_query(&text("get tweets containing 'Hello World'"), &mut interpretation);
        assert_eq!(
            interpretation.params.get("query"),
            Some(&ParamValue::Text("Hello World".to_string()))
        );
    }

    #[test]
    fn spotify_rule_sets_type_from_keywords() {
        let mut interpretation = Interpretation::default();
        spotify_search(&text("search for tracks like 'So What'"), &mut interpretation);
        assert_eq!(
            interpretation.params.get("q"),
            Some(&ParamValue::Text("So What".to_string()))
        );
        assert_eq!(
            interpretation.params.get("type"),
            Some(&ParamValue::Text("track".to_string()))
        );
    }

    #[test]
    fn youtube_rule_requests_snippets() {
        let mut interpretation = Interpretation::default();
        youtube_search(&text("search videos about 'rust async'"), &mut interpretation);
        assert_eq!(
            interpretation.params.get("part"),
            Some(&ParamValue::Text("snippet".to_string()))
        );
    }

    #[test]
    fn reddit_rule_rewrites_endpoint_path() {
        let mut interpretation = Interpretation {
            endpoint: "/best".to_string(),
            ..Interpretation::default()
        };
        reddit_subreddit(&text("hot posts from subreddit rust"), &mut interpretation);
        assert_eq!(interpretation.endpoint, "/r/rust");
    }

    #[test]
    fn newsapi_rule_truncates_country_codes() {
        let mut interpretation = Interpretation::default();
        newsapi_search(
            &text("top headlines for country Germany"),
            &mut interpretation,
        );
        assert_eq!(
            interpretation.params.get("country"),
            Some(&ParamValue::Text("ge".to_string()))
        );
    }

    #[test]
    fn endpoint_scoped_rules_do_not_fire_elsewhere() {
        let mut interpretation = Interpretation::default();
        apply(
            "github",
            "issues",
            &text("issues by author alice"),
            &mut interpretation,
        );
        assert!(interpretation.params.is_empty());
    }
}
