//! Route dispatcher: resolves an inbound `/<service>/<rest...>` request
//! against the registry without any router mutation (§4.E).
//!
//! The gateway installs a single catch-all Actix resource at startup; new
//! routes become reachable purely by registry lookups inside that one
//! handler, never by reconfiguring Actix's router at runtime.

use crate::models::error::GatewayError;
use crate::models::service::{EndpointDescriptor, HttpMethod, ServiceRecord};
use crate::services::registry::Registry;

/// A resolved route: the owning service and the matched endpoint.
pub struct Resolved {
    pub service: ServiceRecord,
    pub endpoint: EndpointDescriptor,
}

/// Splits an inbound path into its service segment and endpoint path.
///
/// `/echo/ping` -> (`echo`, `/ping`). `/echo` (no further segment) has no
/// endpoint path and never resolves. The leading `/` is stripped once;
/// everything up to the next `/` is the service segment, the remainder
/// (including its own leading `/`) is the endpoint path.
pub fn split_path(path: &str) -> Option<(&str, &str)> {
    let rest = path.strip_prefix('/')?;
    let slash = rest.find('/')?;
    let (service, endpoint_path) = rest.split_at(slash);
    if service.is_empty() {
        return None;
    }
    Some((service, endpoint_path))
}

/// Resolves `method` and `path` against the registry. Matching is exact —
/// no prefix matching, no wildcards, no path parameters. Returns
/// [`GatewayError::NoRoute`] when the path doesn't split into a
/// service+endpoint pair or when nothing matches, including when the
/// method doesn't match an otherwise-registered path.
pub fn dispatch(registry: &Registry, method: HttpMethod, path: &str) -> Result<Resolved, GatewayError> {
    let no_route = || GatewayError::NoRoute { method: method.to_string(), path: path.to_string() };

    let (service, endpoint_path) = split_path(path).ok_or_else(no_route)?;
    match registry.find_route(service, method, endpoint_path) {
        Some((service, endpoint)) => Ok(Resolved { service, endpoint }),
        None => Err(no_route()),
    }
}
