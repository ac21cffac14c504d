//! HTTP client abstraction used by the forwarding proxy (§4.F).
//!
//! Forwarding goes through this trait rather than calling `reqwest`
//! directly so the dispatcher/proxy can be exercised in tests with a fake
//! upstream instead of real sockets.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::{Client, Method};

use crate::models::service::HttpMethod;

/// Hop-by-hop headers omitted from the outbound request (§4.F.2).
const SKIP_REQUEST_HEADERS: &[&str] =
    &["host", "connection", "keep-alive", "proxy-", "te", "trailer", "transfer-encoding", "upgrade"];
const SKIP_RESPONSE_HEADERS: &[&str] = &["connection", "transfer-encoding", "upgrade"];

/// Result of attempting an upstream call. Distinguishes the three upstream
/// failure modes the gateway maps to distinct error kinds.
#[derive(Debug, Clone)]
pub enum Outcome {
    Ok { status: u16, headers: Vec<(String, String)>, body_bytes: Vec<u8> },
    Timeout,
    Unreachable { cause: String },
    Malformed { cause: String },
}

/// Abstraction over "make one HTTP call to an upstream and get a result
/// back". Implemented for real traffic by [`ReqwestHttpClient`] and in
/// tests by a fake that never touches the network.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn call(
        &self,
        method: HttpMethod,
        url: &str,
        headers: Vec<(String, String)>,
        body: Vec<u8>,
        timeout: Duration,
    ) -> Outcome;
}

/// Production [`HttpClient`] backed by a pooled `reqwest::Client`.
pub struct ReqwestHttpClient {
    client: Client,
    max_body_bytes: usize,
}

impl ReqwestHttpClient {
    pub fn new(max_body_bytes: usize) -> Self {
        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(30))
            .pool_max_idle_per_host(32)
            .build()
            .expect("failed to build reqwest client");
        Self { client, max_body_bytes }
    }

    fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Delete => Method::DELETE,
            HttpMethod::Patch => Method::PATCH,
        }
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn call(
        &self,
        method: HttpMethod,
        url: &str,
        headers: Vec<(String, String)>,
        body: Vec<u8>,
        timeout: Duration,
    ) -> Outcome {
        let mut header_map = reqwest::header::HeaderMap::with_capacity(headers.len());
        for (name, value) in headers {
            let lowered = name.to_lowercase();
            if SKIP_REQUEST_HEADERS.iter().any(|skip| lowered.starts_with(skip)) {
                continue;
            }
            if let (Ok(name), Ok(value)) = (
                reqwest::header::HeaderName::from_bytes(name.as_bytes()),
                reqwest::header::HeaderValue::from_bytes(value.as_bytes()),
            ) {
                header_map.insert(name, value);
            }
        }

        let request = self
            .client
            .request(Self::to_reqwest_method(method), url)
            .headers(header_map)
            .body(body)
            .timeout(timeout);

        let response = match request.send().await {
            Ok(response) => response,
            Err(err) if err.is_timeout() => return Outcome::Timeout,
            Err(err) => return Outcome::Unreachable { cause: err.to_string() },
        };

        let status = response.status().as_u16();
        let response_headers: Vec<(String, String)> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                let lowered = name.as_str().to_lowercase();
                if SKIP_RESPONSE_HEADERS.iter().any(|skip| lowered.starts_with(skip)) {
                    return None;
                }
                value.to_str().ok().map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();

        let mut body_bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            match chunk {
                Ok(bytes) => {
                    if body_bytes.len() + bytes.len() > self.max_body_bytes {
                        return Outcome::Malformed {
                            cause: format!("response body exceeded {} bytes", self.max_body_bytes),
                        };
                    }
                    body_bytes.extend_from_slice(&bytes);
                }
                Err(err) => {
                    return Outcome::Malformed { cause: err.to_string() };
                }
            }
        }

        Outcome::Ok { status, headers: response_headers, body_bytes }
    }
}

/// Headers that should never be forwarded from an inbound client request
/// to an upstream, exposed so the dispatcher/proxy can filter before
/// handing headers to an [`HttpClient`].
pub fn filter_inbound_headers(headers: &HashMap<String, String>) -> Vec<(String, String)> {
    headers
        .iter()
        .filter(|(name, _)| {
            let lowered = name.to_lowercase();
            !SKIP_REQUEST_HEADERS.iter().any(|skip| lowered.starts_with(skip))
        })
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_hop_by_hop_request_headers() {
        let mut headers = HashMap::new();
        headers.insert("Host".to_string(), "example.com".to_string());
        headers.insert("Connection".to_string(), "keep-alive".to_string());
        headers.insert("Authorization".to_string(), "Bearer xyz".to_string());

        let filtered = filter_inbound_headers(&headers);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].0, "Authorization");
    }
}
