//! Static catalog of known API providers.
//!
//! The catalog is compiled-in data: descriptors never change after process
//! start and are shared by reference. Iteration order is declaration order,
//! and `detect_by_url` deliberately returns the first matching descriptor —
//! providers that share infrastructure (the Facebook family all live on
//! `graph.facebook.com` hosts) resolve to whichever is declared first.

mod catalog;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::json;

use querybridge_client::types::AuthScheme;

/// Template segments like `{owner}` are ignored when matching hosts.
static PLACEHOLDER_SEGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{[^}]+\}").expect("placeholder regex"));

/// Static metadata for one catalogued provider.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderDescriptor {
    pub key: &'static str,
    pub name: &'static str,
    pub base_url: &'static str,
    pub auth_type: AuthScheme,
    pub description: &'static str,
    /// Endpoint name -> path template, in declaration order.
    pub endpoints: &'static [(&'static str, &'static str)],
    /// Endpoint name -> scoring keywords. Not every endpoint has patterns.
    pub query_patterns: &'static [(&'static str, &'static [&'static str])],
    pub example_queries: &'static [&'static str],
}

impl ProviderDescriptor {
    #[must_use]
    pub fn patterns_for(&self, endpoint: &str) -> Option<&'static [&'static str]> {
        self.query_patterns
            .iter()
            .find(|(name, _)| *name == endpoint)
            .map(|(_, patterns)| *patterns)
    }

    /// Full descriptor as JSON, preserving endpoint declaration order.
    #[must_use]
    pub fn detail_json(&self) -> serde_json::Value {
        json!({
            "key": self.key,
            "name": self.name,
            "baseUrl": self.base_url,
            "authType": self.auth_type,
            "description": self.description,
            "endpoints": self
                .endpoints
                .iter()
                .map(|(name, path)| json!({"name": name, "path": path}))
                .collect::<Vec<_>>(),
            "queryPatterns": self
                .query_patterns
                .iter()
                .map(|(name, keywords)| json!({"endpoint": name, "keywords": keywords}))
                .collect::<Vec<_>>(),
            "exampleQueries": self.example_queries,
        })
    }
}

/// Search hit shape for provider lookups.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderSummary {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

#[derive(Debug)]
pub struct ProviderRegistry {
    providers: &'static [ProviderDescriptor],
    categories: &'static [(&'static str, &'static [&'static str])],
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ProviderRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            providers: catalog::PROVIDERS,
            categories: catalog::CATEGORIES,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static ProviderDescriptor> {
        self.providers.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Case-insensitive exact match on the registry key.
    #[must_use]
    pub fn lookup_by_key(&self, key: &str) -> Option<&'static ProviderDescriptor> {
        self.providers
            .iter()
            .find(|descriptor| descriptor.key.eq_ignore_ascii_case(key))
    }

    /// Case-insensitive substring search across key, name, and description,
    /// returned in declaration order without ranking.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<ProviderSummary> {
        let needle = query.to_lowercase();
        self.providers
            .iter()
            .filter(|descriptor| {
                descriptor.key.contains(&needle)
                    || descriptor.name.to_lowercase().contains(&needle)
                    || descriptor.description.to_lowercase().contains(&needle)
            })
            .map(|descriptor| ProviderSummary {
                key: descriptor.key,
                name: descriptor.name,
                description: descriptor.description,
            })
            .collect()
    }

    /// Independently maintained category grouping. Not every catalogued key
    /// appears in a category.
    #[must_use]
    pub fn categories(&self) -> &'static [(&'static str, &'static [&'static str])] {
        self.categories
    }

    /// Heuristic provider detection from a connection's base URL.
    ///
    /// Both URLs are lowercased, `{placeholder}` segments are stripped from
    /// the descriptor URL, and the descriptor's host (text before the first
    /// `/` after the scheme) must appear in the candidate — or the candidate
    /// must contain the registry key itself. First declared match wins.
    /// Descriptor URLs whose host is entirely a placeholder match nothing by
    /// host and fall back to the key check.
    #[must_use]
    pub fn detect_by_url(&self, base_url: &str) -> Option<&'static ProviderDescriptor> {
        let candidate = base_url.to_lowercase();
        self.providers.iter().find(|descriptor| {
            let provider_url = descriptor.base_url.to_lowercase();
            let cleaned = PLACEHOLDER_SEGMENT.replace_all(&provider_url, "");
            let host = cleaned
                .trim_start_matches("https://")
                .trim_start_matches("http://")
                .split('/')
                .next()
                .unwrap_or("");
            (!host.is_empty() && candidate.contains(host)) || candidate.contains(descriptor.key)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_enumerated_key_resolves_through_lookup() {
        let registry = ProviderRegistry::new();
        for descriptor in registry.iter() {
            let found = registry
                .lookup_by_key(descriptor.key)
                .unwrap_or_else(|| panic!("key {} did not resolve", descriptor.key));
            assert_eq!(found.key, descriptor.key);
        }
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let registry = ProviderRegistry::new();
        let descriptor = registry.lookup_by_key("GitHub").expect("github resolves");
        assert_eq!(descriptor.key, "github");
    }

    #[test]
    fn detects_github_from_api_url() {
        let registry = ProviderRegistry::new();
        let descriptor = registry
            .detect_by_url("https://api.github.com/user")
            .expect("github detected");
        assert_eq!(descriptor.key, "github");
    }

    #[test]
    fn unknown_host_detects_nothing() {
        let registry = ProviderRegistry::new();
        assert!(registry
            .detect_by_url("https://api.unknown-host.example")
            .is_none());
    }

    #[test]
    fn placeholder_only_hosts_do_not_match_everything() {
        // woocommerce's URL template has no literal host at all; it must not
        // swallow arbitrary URLs.
        let registry = ProviderRegistry::new();
        assert!(registry.detect_by_url("https://shop.example.test").is_none());
    }

    #[test]
    fn facebook_family_resolves_to_first_declared_provider() {
        let registry = ProviderRegistry::new();
        let descriptor = registry
            .detect_by_url("https://graph.facebook.com/v18.0")
            .expect("graph url detected");
        assert_eq!(descriptor.key, "facebook");
    }

    #[test]
    fn search_matches_key_name_and_description() {
        let registry = ProviderRegistry::new();
        let by_key = registry.search("github");
        assert!(by_key.iter().any(|summary| summary.key == "github"));

        let by_description = registry.search("weather");
        assert!(by_description
            .iter()
            .any(|summary| summary.key == "openweather"));
    }

    #[test]
    fn categories_reference_catalogued_keys() {
        let registry = ProviderRegistry::new();
        for (label, keys) in registry.categories() {
            assert!(!keys.is_empty(), "category {label} is empty");
            for key in *keys {
                assert!(
                    registry.lookup_by_key(key).is_some(),
                    "category {label} references unknown key {key}"
                );
            }
        }
    }
}
