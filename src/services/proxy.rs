//! Forwarding proxy: relays a dispatched request to its upstream and maps
//! the result back into a gateway response or error (§4.F).

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::logs::LogRing;
use crate::models::error::GatewayError;
use crate::models::log_entry::{truncate_snippet, LogCategory, LogContext, LogLevel};
use crate::models::service::{EndpointDescriptor, ServiceRecord};
use crate::services::http_client::{filter_inbound_headers, HttpClient, Outcome};
use crate::utils::url::build_upstream_url;

/// A response ready to be written back to the inbound client.
pub struct ProxyResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

/// Forwards one request to `service`'s upstream for `endpoint`, using the
/// endpoint's own configured timeout. Logs a `FORWARD` entry on every
/// outcome, success or failure.
pub async fn forward(
    http_client: &dyn HttpClient,
    log_ring: &Arc<LogRing>,
    service: &ServiceRecord,
    endpoint: &EndpointDescriptor,
    inbound_headers: HashMap<String, String>,
    query: &str,
    body: Vec<u8>,
) -> Result<ProxyResponse, GatewayError> {
    let url = build_upstream_url(&service.internal_url, &endpoint.path, query);
    let headers = filter_inbound_headers(&inbound_headers);
    let timeout = Duration::from_secs(endpoint.timeout_seconds as u64);

    let started = Instant::now();
    let outcome = http_client.call(endpoint.method, &url, headers, body, timeout).await;
    let latency_ms = started.elapsed().as_millis() as u64;

    match outcome {
        Outcome::Ok { status, headers, body_bytes } => {
            // Only Content-Type rides back to the client; the rest of the
            // upstream's headers are the upstream's business, not ours.
            let content_type = headers
                .into_iter()
                .find(|(name, _)| name.eq_ignore_ascii_case("content-type"))
                .into_iter()
                .collect();

            log_ring.push(
                LogLevel::Info,
                LogCategory::Forward,
                format!("{} {} -> {} {}", endpoint.method, endpoint.path, service.name, status),
                LogContext {
                    service: Some(service.name.clone()),
                    upstream_url: Some(url),
                    latency_ms: Some(latency_ms),
                    status_code: Some(status),
                },
            );
            Ok(ProxyResponse { status, headers: content_type, body: body_bytes })
        }
        Outcome::Timeout => {
            log_ring.push(
                LogLevel::Warn,
                LogCategory::Forward,
                format!("{} {} -> {} timed out", endpoint.method, endpoint.path, service.name),
                LogContext {
                    service: Some(service.name.clone()),
                    upstream_url: Some(url),
                    latency_ms: Some(latency_ms),
                    status_code: None,
                },
            );
            Err(GatewayError::UpstreamTimeout { seconds: endpoint.timeout_seconds as u64 })
        }
        Outcome::Unreachable { cause } => {
            log_ring.push(
                LogLevel::Error,
                LogCategory::Forward,
                format!(
                    "{} {} -> {} unreachable: {}",
                    endpoint.method,
                    endpoint.path,
                    service.name,
                    truncate_snippet(&cause)
                ),
                LogContext {
                    service: Some(service.name.clone()),
                    upstream_url: Some(url),
                    latency_ms: Some(latency_ms),
                    status_code: None,
                },
            );
            Err(GatewayError::UpstreamUnreachable { cause })
        }
        Outcome::Malformed { cause } => {
            log_ring.push(
                LogLevel::Error,
                LogCategory::Forward,
                format!(
                    "{} {} -> {} malformed response: {}",
                    endpoint.method,
                    endpoint.path,
                    service.name,
                    truncate_snippet(&cause)
                ),
                LogContext {
                    service: Some(service.name.clone()),
                    upstream_url: Some(url),
                    latency_ms: Some(latency_ms),
                    status_code: None,
                },
            );
            Err(GatewayError::UpstreamMalformed { cause })
        }
    }
}
