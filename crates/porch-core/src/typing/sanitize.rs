//! Typing-display sanitizer.
//!
//! The full reply is revealed character by character, so a URL inside a
//! markdown link is visible in fragments for many ticks. The sanitizer
//! rewrites one physical line into a stable rendering that only ever
//! shows link labels; raw URLs, complete or partial, never appear until
//! the message is finalized and full rendering takes over.

use once_cell::sync::Lazy;
use regex::Regex;

static COMPLETE_LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]+)\]\(https?://[^\s)]+\)").unwrap());

static BARE_URL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"https?://\S*").unwrap());

/// Trailing markdown-link fragment with no closing paren yet.
static PARTIAL_LINK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([^\]]*)\]\([^)]*$").unwrap());

/// Standalone prefix of `http://` or `https://` at end of line, the
/// ticks before the host starts and the bare-URL rule takes over.
static PARTIAL_SCHEME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|\s)h(?:t(?:t(?:ps?(?::/?/?)?)?)?)?$").unwrap());

/// Fixed-point iteration cap for pathological input.
const MAX_PASSES: usize = 8;

/// Rewrites one physical line of partially revealed text.
///
/// Rules, in order: complete markdown links collapse to their label, a
/// trailing scheme prefix (`h` through `https://`) is trimmed, remaining
/// bare URLs are removed outright, and a trailing incomplete `[label](`
/// fragment collapses to the label (iterated to a fixed point).
/// Idempotent on fully revealed text.
pub fn sanitize_line(line: &str) -> String {
    let mut out = COMPLETE_LINK_RE.replace_all(line, "$1").into_owned();
    out = PARTIAL_SCHEME_RE.replace(&out, "").into_owned();
    out = BARE_URL_RE.replace_all(&out, "").into_owned();
    for _ in 0..MAX_PASSES {
        let next = PARTIAL_LINK_RE.replace(&out, "$1").into_owned();
        if next == out {
            break;
        }
        out = next;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_link_collapses_to_label() {
        assert_eq!(
            sanitize_line("Click [Docs](https://spanmor.com.au/docs) now"),
            "Click Docs now"
        );
    }

    #[test]
    fn test_bare_url_removed_entirely() {
        assert_eq!(
            sanitize_line("Visit https://spanmor.com.au/quote today"),
            "Visit  today"
        );
    }

    #[test]
    fn test_partial_url_inside_link_never_shows() {
        // Mid-reveal prefix of "Click [Docs](https://spanmor.com.au/docs)".
        assert_eq!(
            sanitize_line("Click [Docs](https://spanmor.com.au/do"),
            "Click Docs"
        );
        assert_eq!(sanitize_line("Click [Docs]("), "Click Docs");
    }

    #[test]
    fn test_nested_fragments_reach_fixed_point() {
        // The trailing fragment starts at the first unclosed bracket.
        assert_eq!(sanitize_line("[a]([b]("), "a");
    }

    #[test]
    fn test_scheme_prefix_of_bare_url_never_shows() {
        // Every mid-reveal prefix of "Visit https://spanmor.com.au".
        for prefix in ["h", "ht", "htt", "http", "https", "https:", "https:/", "https://"] {
            assert_eq!(sanitize_line(&format!("Visit {prefix}")), "Visit");
        }
    }

    #[test]
    fn test_words_ending_in_h_untouched() {
        assert_eq!(sanitize_line("do the math"), "do the math");
        assert_eq!(sanitize_line("get in touch"), "get in touch");
    }

    #[test]
    fn test_idempotent_on_fully_revealed_text() {
        let full = "See [Quote](https://spanmor.com.au/quote) and https://spanmor.com.au/docs.";
        let once = sanitize_line(full);
        let twice = sanitize_line(&once);
        assert_eq!(once, twice);
        assert_eq!(once, "See Quote and ");
    }

    #[test]
    fn test_plain_text_untouched() {
        assert_eq!(sanitize_line("How big is your deck?"), "How big is your deck?");
    }

    #[test]
    fn test_pathological_input_terminates() {
        let line = "[x](".repeat(64);
        let out = sanitize_line(&line);
        assert!(!out.contains("]("));
    }
}
