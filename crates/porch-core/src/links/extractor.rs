//! Link extraction from bot reply text.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::canonical::CanonicalUrl;

/// Markdown-style link whose target is an absolute http(s) URL containing
/// no whitespace or closing paren.
static MARKDOWN_LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]+)\]\((https?://[^\s)]+)\)").unwrap());

/// Bare http(s) URL running to the next whitespace.
static BARE_URL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"https?://\S+").unwrap());

/// A call-to-action link extracted from a bot reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    /// Absolute http(s) URL in canonical form.
    pub url: String,
    /// Button text shown to the visitor.
    pub label: String,
}

/// Scans reply text for links pointing at the allow-listed apex domain.
///
/// Extraction runs once on the full reply, before the typewriter starts;
/// the per-tick path only sanitizes, so the text is never rescanned.
#[derive(Debug, Clone)]
pub struct LinkExtractor {
    allowed_domain: String,
}

impl LinkExtractor {
    /// Creates an extractor allow-listing `allowed_domain` and its
    /// subdomains.
    pub fn new(allowed_domain: impl Into<String>) -> Self {
        Self {
            allowed_domain: allowed_domain.into(),
        }
    }

    pub fn allowed_domain(&self) -> &str {
        &self.allowed_domain
    }

    /// Extracts CTA links from a full reply text.
    ///
    /// Deterministic and pure: output follows first appearance in the
    /// text and canonical duplicates collapse to the first occurrence.
    /// Markdown links form the base candidate set when any exist; bare
    /// URLs then join only when allow-listed and "deep" (query string,
    /// or more than one path segment). With no markdown links, every
    /// bare URL is a candidate. Candidates that fail to parse as
    /// absolute http(s) URLs are silently dropped.
    pub fn extract(&self, text: &str) -> Vec<Link> {
        // Candidates keyed by byte offset so markdown and bare matches
        // interleave in appearance order.
        let mut candidates: Vec<(usize, Option<&str>, &str)> = Vec::new();
        let mut has_markdown = false;
        for caps in MARKDOWN_LINK_RE.captures_iter(text) {
            let offset = caps.get(0).map(|m| m.start()).unwrap_or(0);
            let (_, [label, url]) = caps.extract();
            candidates.push((offset, Some(label), url));
            has_markdown = true;
        }

        for found in BARE_URL_RE.find_iter(text) {
            if !has_markdown {
                candidates.push((found.start(), None, found.as_str()));
                continue;
            }
            // Bare deep links into the allowed domain still qualify;
            // generic homepage mentions do not. A bare match inside a
            // markdown target dedups against the earlier markdown entry.
            let Some(canonical) = CanonicalUrl::parse(found.as_str()) else {
                continue;
            };
            if canonical.host_allowed(&self.allowed_domain)
                && (canonical.has_query() || canonical.path_depth() > 1)
            {
                candidates.push((found.start(), None, found.as_str()));
            }
        }
        candidates.sort_by_key(|&(offset, _, _)| offset);

        let mut seen = HashSet::new();
        let mut links = Vec::new();
        for (_, label, raw) in candidates {
            let Some(canonical) = CanonicalUrl::parse(raw) else {
                continue;
            };
            if !canonical.host_allowed(&self.allowed_domain) {
                continue;
            }
            if !seen.insert(canonical.key()) {
                continue;
            }
            let label = label
                .map(str::to_string)
                .unwrap_or_else(|| canonical.display_label());
            links.push(Link {
                url: canonical.to_absolute(),
                label,
            });
        }

        tracing::debug!(count = links.len(), "extracted CTA links");
        links
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> LinkExtractor {
        LinkExtractor::new("spanmor.com.au")
    }

    #[test]
    fn test_markdown_links_preserve_first_seen_order() {
        let links = extractor().extract(
            "[Quote](https://spanmor.com.au/quote) then [Contact](https://spanmor.com.au/contact)",
        );
        let labels: Vec<&str> = links.iter().map(|l| l.label.as_str()).collect();
        assert_eq!(labels, vec!["Quote", "Contact"]);
    }

    #[test]
    fn test_canonical_duplicates_collapse_to_first() {
        let links = extractor().extract(
            "[Docs](https://spanmor.com.au/docs) and [Docs again](https://www.spanmor.com.au/docs/)",
        );
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].label, "Docs");
        assert_eq!(links[0].url, "https://spanmor.com.au/docs");
    }

    #[test]
    fn test_disallowed_host_yields_empty() {
        let links = extractor().extract("Visit https://example.com/page");
        assert!(links.is_empty());
    }

    #[test]
    fn test_tracking_params_dropped_other_params_kept() {
        let links =
            extractor().extract("[Call us](https://spanmor.com.au/contact?utm_source=fb&ref=1)");
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].url, "https://spanmor.com.au/contact?ref=1");
    }

    #[test]
    fn test_bare_urls_are_candidates_when_no_markdown() {
        let links = extractor().extract("See https://spanmor.com.au/decking for options.");
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].url, "https://spanmor.com.au/decking");
        assert_eq!(links[0].label, "spanmor.com.au/decking");
    }

    #[test]
    fn test_bare_deep_link_joins_markdown_set() {
        let links = extractor().extract(
            "[Quote](https://spanmor.com.au/quote) or go to https://spanmor.com.au/decking/composite",
        );
        assert_eq!(links.len(), 2);
        assert_eq!(links[1].url, "https://spanmor.com.au/decking/composite");
    }

    #[test]
    fn test_bare_deep_link_before_markdown_keeps_its_position() {
        let links = extractor().extract(
            "Start at https://spanmor.com.au/decking/composite then [Quote](https://spanmor.com.au/quote)",
        );
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].url, "https://spanmor.com.au/decking/composite");
        assert_eq!(links[1].label, "Quote");
    }

    #[test]
    fn test_bare_homepage_mention_ignored_when_markdown_present() {
        let links = extractor()
            .extract("[Quote](https://spanmor.com.au/quote) or see https://spanmor.com.au/about");
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].label, "Quote");
    }

    #[test]
    fn test_bare_url_with_query_counts_as_deep() {
        let links = extractor()
            .extract("[Quote](https://spanmor.com.au/quote) https://spanmor.com.au/search?q=deck");
        assert_eq!(links.len(), 2);
        assert_eq!(links[1].url, "https://spanmor.com.au/search?q=deck");
    }

    #[test]
    fn test_unparseable_candidate_silently_dropped() {
        let links = extractor().extract("[Broken](https://)");
        assert!(links.is_empty());
    }

    #[test]
    fn test_trailing_punctuation_stripped_from_bare_url() {
        let links = extractor().extract("Try https://spanmor.com.au/quote!");
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].url, "https://spanmor.com.au/quote");
    }

    #[test]
    fn test_no_duplicate_canonical_keys_in_output() {
        let links = extractor().extract(
            "[A](https://spanmor.com.au/p?b=1&a=2) [B](https://spanmor.com.au/p/?a=2&b=1&utm_x=9)",
        );
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].label, "A");
    }
}
