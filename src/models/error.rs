//! Gateway error taxonomy and HTTP response mapping.
//!
//! `GatewayError` is the single error type returned by registry validation,
//! route dispatch, and proxy forwarding. Each variant corresponds to one of
//! the stable error kinds in the gateway's design: wire responses carry an
//! `error` summary and a `details` string, never a stack trace or internal
//! debug representation.

use actix_web::HttpResponse;
use serde_json::json;

/// Stable error kinds surfaced to callers and to the log ring.
///
/// The string form of each variant (`ErrorKind::as_str`) is the tag used in
/// log entries; it is never exposed in the JSON response body, which only
/// carries a human summary and details.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidRegistration,
    ReservedName,
    NoRoute,
    UpstreamTimeout,
    UpstreamUnreachable,
    UpstreamMalformed,
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidRegistration => "INVALID_REGISTRATION",
            ErrorKind::ReservedName => "RESERVED_NAME",
            ErrorKind::NoRoute => "NO_ROUTE",
            ErrorKind::UpstreamTimeout => "UPSTREAM_TIMEOUT",
            ErrorKind::UpstreamUnreachable => "UPSTREAM_UNREACHABLE",
            ErrorKind::UpstreamMalformed => "UPSTREAM_MALFORMED",
            ErrorKind::Internal => "INTERNAL",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// A registration request failed §4.D validation. `field` names the
    /// first offending field, `reason` is a human-readable explanation.
    #[error("invalid registration: {field}: {reason}")]
    InvalidRegistration { field: String, reason: String },

    /// The requested service name collides with a reserved path segment
    /// (`register`, or the empty segment).
    #[error("reserved service name: {name}")]
    ReservedName { name: String },

    /// No registered `(service, method, path)` matched the inbound request.
    #[error("no route for {method} {path}")]
    NoRoute { method: String, path: String },

    /// The endpoint's configured timeout elapsed before the upstream call
    /// returned.
    #[error("upstream timeout after {seconds}s")]
    UpstreamTimeout { seconds: u64 },

    /// A transport-level failure reaching the upstream (DNS, connection
    /// refused/reset, TLS).
    #[error("upstream unreachable: {cause}")]
    UpstreamUnreachable { cause: String },

    /// The upstream response could not be read (too large or unparseable).
    #[error("malformed upstream response: {cause}")]
    UpstreamMalformed { cause: String },

    /// An unexpected internal condition, e.g. a registry invariant
    /// violation. Never raised as a panic.
    #[error("internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GatewayError::InvalidRegistration { .. } => ErrorKind::InvalidRegistration,
            GatewayError::ReservedName { .. } => ErrorKind::ReservedName,
            GatewayError::NoRoute { .. } => ErrorKind::NoRoute,
            GatewayError::UpstreamTimeout { .. } => ErrorKind::UpstreamTimeout,
            GatewayError::UpstreamUnreachable { .. } => ErrorKind::UpstreamUnreachable,
            GatewayError::UpstreamMalformed { .. } => ErrorKind::UpstreamMalformed,
            GatewayError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// `(summary, details)` pair used for both the JSON body and log entries.
    pub fn summary_details(&self) -> (String, String) {
        match self {
            GatewayError::InvalidRegistration { field, reason } => {
                ("Invalid registration".to_string(), format!("{field}: {reason}"))
            }
            GatewayError::ReservedName { name } => (
                "Reserved service name".to_string(),
                format!("'{name}' is reserved"),
            ),
            GatewayError::NoRoute { method, path } => (
                "Not found".to_string(),
                format!("no route for {method} {path}"),
            ),
            GatewayError::UpstreamTimeout { seconds } => {
                ("Upstream timeout".to_string(), format!("{seconds}s"))
            }
            GatewayError::UpstreamUnreachable { cause } => {
                ("Internal service error".to_string(), cause.clone())
            }
            GatewayError::UpstreamMalformed { cause } => {
                ("Malformed upstream response".to_string(), cause.clone())
            }
            GatewayError::Internal(msg) => ("Internal error".to_string(), msg.clone()),
        }
    }
}

impl actix_web::error::ResponseError for GatewayError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        use actix_web::http::StatusCode;
        match self {
            GatewayError::InvalidRegistration { .. } | GatewayError::ReservedName { .. } => {
                StatusCode::BAD_REQUEST
            }
            GatewayError::NoRoute { .. } => StatusCode::NOT_FOUND,
            GatewayError::UpstreamTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            GatewayError::UpstreamUnreachable { .. } | GatewayError::UpstreamMalformed { .. } => {
                StatusCode::BAD_GATEWAY
            }
            GatewayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let (error, details) = self.summary_details();
        HttpResponse::build(self.status_code()).json(json!({
            "error": error,
            "details": details,
        }))
    }
}
