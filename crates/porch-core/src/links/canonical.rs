//! URL canonicalization for CTA links.

use url::Url;

/// Punctuation that commonly trails a URL embedded in prose.
const TRAILING_PUNCTUATION: &[char] = &[')', ']', '}', '>', '.', ',', '!', '?', ':', ';'];

/// Query keys that identify tracking parameters.
fn is_tracking_param(key: &str) -> bool {
    let key = key.to_ascii_lowercase();
    key.starts_with("utm_") || key == "fbclid"
}

/// Canonical form of a candidate URL.
///
/// The host is lowercased with any leading `www.` removed, tracking
/// query parameters are dropped and the remainder re-serialized in
/// sorted order, and a trailing slash is stripped from non-root paths.
/// Two URLs that canonicalize to the same key are the same link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CanonicalUrl {
    scheme: String,
    host: String,
    path: String,
    query: Option<String>,
}

impl CanonicalUrl {
    /// Parses and canonicalizes a raw candidate.
    ///
    /// Returns `None` for anything that is not an absolute http(s) URL;
    /// such candidates are silently excluded from extraction.
    pub(crate) fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim_end_matches(TRAILING_PUNCTUATION);
        let url = Url::parse(trimmed).ok()?;
        if !matches!(url.scheme(), "http" | "https") {
            return None;
        }

        let host = url.host_str()?.to_ascii_lowercase();
        let host = host.strip_prefix("www.").unwrap_or(&host).to_string();
        if host.is_empty() {
            return None;
        }

        let mut pairs: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| !is_tracking_param(key))
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();
        pairs.sort();
        let query = if pairs.is_empty() {
            None
        } else {
            let mut serializer = url::form_urlencoded::Serializer::new(String::new());
            serializer.extend_pairs(pairs);
            Some(serializer.finish())
        };

        // Root path keeps its slash; everything else drops a trailing one.
        let path = match url.path() {
            "" | "/" => "/".to_string(),
            path => path.trim_end_matches('/').to_string(),
        };

        Some(Self {
            scheme: url.scheme().to_string(),
            host,
            path,
            query,
        })
    }

    /// True when the host is the apex domain itself or a subdomain of it.
    pub(crate) fn host_allowed(&self, apex: &str) -> bool {
        let apex = apex.to_ascii_lowercase();
        self.host == apex || self.host.ends_with(&format!(".{apex}"))
    }

    pub(crate) fn has_query(&self) -> bool {
        self.query.is_some()
    }

    /// Number of non-empty path segments.
    pub(crate) fn path_depth(&self) -> usize {
        self.path.split('/').filter(|segment| !segment.is_empty()).count()
    }

    /// Dedup key: host + path + query.
    pub(crate) fn key(&self) -> String {
        match &self.query {
            Some(query) => format!("{}{}?{}", self.host, self.path, query),
            None => format!("{}{}", self.host, self.path),
        }
    }

    /// Re-serialized absolute URL.
    pub(crate) fn to_absolute(&self) -> String {
        match &self.query {
            Some(query) => format!("{}://{}{}?{}", self.scheme, self.host, self.path, query),
            None => format!("{}://{}{}", self.scheme, self.host, self.path),
        }
    }

    /// Display label for a bare URL: host plus path, no scheme.
    pub(crate) fn display_label(&self) -> String {
        if self.path == "/" {
            self.host.clone()
        } else {
            format!("{}{}", self.host, self.path)
        }
    }
}
