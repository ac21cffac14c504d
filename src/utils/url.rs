//! Upstream URL construction.
//!
//! Composing the final URL is deliberately dumb: `internal_url` and the
//! endpoint's registered `path` are concatenated, and the inbound query
//! string is appended verbatim. Nothing is re-encoded, normalised, or
//! inspected — the gateway forwards bytes, it doesn't interpret them.

/// Builds the upstream URL for a forwarded request.
///
/// `internal_url` carries no trailing path (enforced at registration);
/// `path` is the endpoint's registered path, always starting with `/`.
/// `query` is the raw query string from the inbound request, without a
/// leading `?`, or empty if there was none.
pub fn build_upstream_url(internal_url: &str, path: &str, query: &str) -> String {
    let base = internal_url.trim_end_matches('/');
    if query.is_empty() {
        format!("{base}{path}")
    } else {
        format!("{base}{path}?{query}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_base_and_path() {
        assert_eq!(
            build_upstream_url("http://echo.local:9000", "/ping", ""),
            "http://echo.local:9000/ping"
        );
    }

    #[test]
    fn appends_query_string_verbatim() {
        assert_eq!(
            build_upstream_url("http://echo.local:9000", "/ping", "a=1&b=2"),
            "http://echo.local:9000/ping?a=1&b=2"
        );
    }

    #[test]
    fn tolerates_trailing_slash_on_internal_url() {
        assert_eq!(
            build_upstream_url("http://echo.local:9000/", "/ping", ""),
            "http://echo.local:9000/ping"
        );
    }
}
