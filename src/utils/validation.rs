//! Registration input validation (§4.D) and name sanitisation.
//!
//! Every failure mode returns a distinct, stable [`GatewayError`] — nothing
//! here silently coerces bad input into something acceptable. The one
//! exception mandated by the data model is name sanitisation itself
//! (lowercasing, space-collapsing), which happens *before* validation, not
//! as a fallback after it fails.

use std::collections::HashSet;

use crate::models::error::GatewayError;
use crate::models::service::{
    EndpointDescriptor, EndpointInput, HttpMethod, RegisterRequest, DEFAULT_TIMEOUT_SECONDS,
    MAX_TIMEOUT_SECONDS, MIN_TIMEOUT_SECONDS,
};

/// Path segments that would collide with the admin/dashboard surface if a
/// service claimed them as its name.
const RESERVED_NAMES: &[&str] = &["register"];

/// Lowercases the name and collapses runs of whitespace to a single `-`,
/// per §3's "Service record" definition. This is *sanitisation*, applied
/// unconditionally before validation — it never silently repairs an
/// otherwise-invalid name (e.g. bad characters still fail [`validate_name`]).
pub fn sanitize_name(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    let mut last_was_space = false;
    for ch in lowered.chars() {
        if ch.is_whitespace() {
            if !last_was_space {
                out.push('-');
            }
            last_was_space = true;
        } else {
            out.push(ch);
            last_was_space = false;
        }
    }
    out
}

/// `[a-z0-9][a-z0-9-]*`: first character alphanumeric, rest alphanumeric or dash.
fn is_valid_name_charset(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() || c.is_ascii_digit() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

/// Validates that `internal_url` is absolute http(s) with a non-empty host.
/// Returns the URL verbatim — the spec forbids silent normalisation.
fn validate_internal_url(raw: &str) -> Result<String, GatewayError> {
    let rest = raw
        .strip_prefix("https://")
        .or_else(|| raw.strip_prefix("http://"))
        .ok_or_else(|| GatewayError::InvalidRegistration {
            field: "internal_url".to_string(),
            reason: "must be an absolute http:// or https:// URL".to_string(),
        })?;

    let host = rest.split(['/', '?', '#']).next().unwrap_or("");
    if host.is_empty() {
        return Err(GatewayError::InvalidRegistration {
            field: "internal_url".to_string(),
            reason: "host must not be empty".to_string(),
        });
    }

    Ok(raw.to_string())
}

fn validate_endpoint(input: &EndpointInput) -> Result<EndpointDescriptor, GatewayError> {
    if !input.path.starts_with('/') {
        return Err(GatewayError::InvalidRegistration {
            field: "endpoints[].path".to_string(),
            reason: format!("path '{}' must start with '/'", input.path),
        });
    }
    if input.path.contains("//") {
        return Err(GatewayError::InvalidRegistration {
            field: "endpoints[].path".to_string(),
            reason: format!("path '{}' must not contain duplicate slashes", input.path),
        });
    }
    if input.path.contains(['?', '#']) {
        return Err(GatewayError::InvalidRegistration {
            field: "endpoints[].path".to_string(),
            reason: format!("path '{}' must not contain a query string or fragment", input.path),
        });
    }

    let method = match &input.method {
        Some(raw) => raw.parse::<HttpMethod>().map_err(|_| GatewayError::InvalidRegistration {
            field: "endpoints[].method".to_string(),
            reason: format!("unsupported method '{raw}'"),
        })?,
        None => HttpMethod::Post,
    };

    let timeout_seconds = input.timeout.unwrap_or(DEFAULT_TIMEOUT_SECONDS);
    if !(MIN_TIMEOUT_SECONDS..=MAX_TIMEOUT_SECONDS).contains(&timeout_seconds) {
        return Err(GatewayError::InvalidRegistration {
            field: "endpoints[].timeout".to_string(),
            reason: format!(
                "timeout {timeout_seconds} must be between {MIN_TIMEOUT_SECONDS} and {MAX_TIMEOUT_SECONDS}"
            ),
        });
    }

    Ok(EndpointDescriptor {
        path: input.path.clone(),
        method,
        timeout_seconds,
        description: input.description.clone(),
        input_schema: input.input_schema.clone(),
    })
}

fn validate_endpoints(inputs: &[EndpointInput]) -> Result<Vec<EndpointDescriptor>, GatewayError> {
    if inputs.is_empty() {
        return Err(GatewayError::InvalidRegistration {
            field: "endpoints".to_string(),
            reason: "at least one endpoint is required".to_string(),
        });
    }

    let mut endpoints = Vec::with_capacity(inputs.len());
    let mut seen: HashSet<(HttpMethod, String)> = HashSet::with_capacity(inputs.len());

    for input in inputs {
        let endpoint = validate_endpoint(input)?;
        let key = (endpoint.method, endpoint.path.clone());
        if !seen.insert(key) {
            return Err(GatewayError::InvalidRegistration {
                field: "endpoints".to_string(),
                reason: format!(
                    "duplicate ({}, {}) within the same registration",
                    endpoint.method, endpoint.path
                ),
            });
        }
        endpoints.push(endpoint);
    }

    Ok(endpoints)
}

/// Result of validating a registration request: the sanitised name, the
/// validated `internal_url`, and the validated endpoint list, in that
/// order — matching the rule numbering in §4.D.
pub struct ValidatedRegistration {
    pub name: String,
    pub internal_url: String,
    pub endpoints: Vec<EndpointDescriptor>,
}

/// Runs the full §4.D validation pipeline over a wire-level registration
/// request, including the reserved-name check from §4.H.
pub fn validate_registration(req: &RegisterRequest) -> Result<ValidatedRegistration, GatewayError> {
    let name = sanitize_name(&req.name);

    if name.is_empty() || RESERVED_NAMES.contains(&name.as_str()) {
        return Err(GatewayError::ReservedName { name });
    }

    if !is_valid_name_charset(&name) {
        return Err(GatewayError::InvalidRegistration {
            field: "name".to_string(),
            reason: format!("'{name}' must match [a-z0-9][a-z0-9-]*"),
        });
    }

    let internal_url = validate_internal_url(&req.internal_url)?;
    let endpoints = validate_endpoints(&req.endpoints)?;

    Ok(ValidatedRegistration { name, internal_url, endpoints })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitizes_spaces_and_case() {
        assert_eq!(sanitize_name("  My Service  "), "my-service");
        assert_eq!(sanitize_name("Echo   Bot"), "echo-bot");
    }

    #[test]
    fn rejects_bad_charset() {
        assert!(!is_valid_name_charset("-leading-dash"));
        assert!(!is_valid_name_charset("Has_Underscore"));
        assert!(is_valid_name_charset("echo-1"));
    }

    #[test]
    fn reserved_name_wins_over_charset() {
        let req = RegisterRequest {
            name: "register".to_string(),
            internal_url: "http://x:1".to_string(),
            endpoints: vec![EndpointInput {
                path: "/a".to_string(),
                method: None,
                timeout: None,
                description: None,
                input_schema: None,
            }],
        };
        let err = validate_registration(&req).unwrap_err();
        assert!(matches!(err, GatewayError::ReservedName { .. }));
    }

    #[test]
    fn empty_name_is_reserved() {
        let req = RegisterRequest {
            name: "   ".to_string(),
            internal_url: "http://x:1".to_string(),
            endpoints: vec![],
        };
        let err = validate_registration(&req).unwrap_err();
        assert!(matches!(err, GatewayError::ReservedName { .. }));
    }

    #[test]
    fn rejects_url_without_scheme() {
        let req = RegisterRequest {
            name: "echo".to_string(),
            internal_url: "echo.local:8080".to_string(),
            endpoints: vec![EndpointInput {
                path: "/ping".to_string(),
                method: None,
                timeout: None,
                description: None,
                input_schema: None,
            }],
        };
        let err = validate_registration(&req).unwrap_err();
        assert!(matches!(err, GatewayError::InvalidRegistration { .. }));
    }

    #[test]
    fn rejects_timeout_out_of_range() {
        let bad = EndpointInput {
            path: "/a".to_string(),
            method: None,
            timeout: Some(0),
            description: None,
            input_schema: None,
        };
        assert!(validate_endpoint(&bad).is_err());

        let bad2 = EndpointInput { timeout: Some(601), ..bad };
        assert!(validate_endpoint(&bad2).is_err());
    }

    #[test]
    fn rejects_duplicate_method_path() {
        let inputs = vec![
            EndpointInput {
                path: "/a".to_string(),
                method: Some("GET".to_string()),
                timeout: None,
                description: None,
                input_schema: None,
            },
            EndpointInput {
                path: "/a".to_string(),
                method: Some("get".to_string()),
                timeout: None,
                description: None,
                input_schema: None,
            },
        ];
        assert!(validate_endpoints(&inputs).is_err());
    }

    #[test]
    fn rejects_path_with_query_or_fragment() {
        let with_query = EndpointInput {
            path: "/ping?x=1".to_string(),
            method: None,
            timeout: None,
            description: None,
            input_schema: None,
        };
        assert!(validate_endpoint(&with_query).is_err());

        let with_fragment = EndpointInput { path: "/ping#top".to_string(), ..with_query };
        assert!(validate_endpoint(&with_fragment).is_err());
    }

    #[test]
    fn rejects_path_missing_leading_slash() {
        let bad = EndpointInput {
            path: "ping".to_string(),
            method: None,
            timeout: None,
            description: None,
            input_schema: None,
        };
        assert!(validate_endpoint(&bad).is_err());
    }
}
