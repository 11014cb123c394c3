//! HTTP request parsing for the dispatch pipeline.
//!
//! The dispatcher works on a normalized request path: query string removed,
//! percent-encoding decoded, leading slashes stripped. Route patterns and
//! asset URL shapes are stored in the same form, so matching never has to
//! re-normalize.

use http::Method;
use may_minihttp::Request;
use std::collections::HashMap;
use tracing::{debug, info};

/// Parsed HTTP request data handed to the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRequest {
    /// HTTP method.
    pub method: Method,
    /// Normalized request path, no query string and no leading slash.
    pub path: String,
    /// HTTP headers, lowercase names.
    pub headers: HashMap<String, String>,
}

impl ParsedRequest {
    /// Build a request from a method and a raw path, normalizing the path.
    #[must_use]
    pub fn new(method: Method, path: &str) -> Self {
        Self {
            method,
            path: normalize_path(path),
            headers: HashMap::new(),
        }
    }

    /// Attach a header. Names are stored lowercase.
    #[must_use]
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    /// Case-insensitive header lookup.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}

/// Strip the query string, percent-decode what remains and drop leading
/// slashes. `"/admin/users%20list?page=2"` becomes `"admin/users list"`.
fn normalize_path(raw: &str) -> String {
    let path = raw.split('?').next().unwrap_or("");
    let decoded = urlencoding::decode(path)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| path.to_string());
    decoded.trim_start_matches('/').to_string()
}

/// Extract the pieces dispatch needs from a `may_minihttp::Request`.
pub fn parse_request(req: Request) -> ParsedRequest {
    let method = req.method().parse().unwrap_or(Method::GET);
    let raw_path = req.path().to_string();
    let path = normalize_path(&raw_path);

    let headers: HashMap<String, String> = req
        .headers()
        .iter()
        .map(|h| {
            (
                h.name.to_ascii_lowercase(),
                String::from_utf8_lossy(h.value).to_string(),
            )
        })
        .collect();

    debug!(
        header_count = headers.len(),
        size_bytes = headers
            .iter()
            .map(|(k, v)| k.len() + v.len())
            .sum::<usize>(),
        "Headers extracted"
    );
    info!(method = %method, raw = %raw_path, path = %path, "HTTP request parsed");

    ParsedRequest {
        method,
        path,
        headers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_query_and_slashes() {
        assert_eq!(normalize_path("/admin/users?page=2"), "admin/users");
        assert_eq!(normalize_path("//admin"), "admin");
        assert_eq!(normalize_path("/"), "");
        assert_eq!(normalize_path(""), "");
    }

    #[test]
    fn test_normalize_percent_decodes() {
        assert_eq!(normalize_path("/files/my%20doc"), "files/my doc");
        // An encoded question mark is path data, not a query separator.
        assert_eq!(normalize_path("/q%3Fx"), "q?x");
    }

    #[test]
    fn test_normalize_keeps_trailing_slash() {
        assert_eq!(normalize_path("/blog/"), "blog/");
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let req = ParsedRequest::new(Method::GET, "/a").with_header("If-Modified-Since", "x");
        assert_eq!(req.header("if-modified-since"), Some("x"));
        assert_eq!(req.header("IF-MODIFIED-SINCE"), Some("x"));
        assert_eq!(req.header("accept"), None);
    }
}
