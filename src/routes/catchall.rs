//! Catch-all public surface: every path that isn't `/register` or `/` is
//! delegated to the dispatcher (§4.H).
//!
//! New routes become reachable purely by registry lookups inside this one
//! handler; the Actix router itself is configured exactly once at startup.

use std::collections::HashMap;

use actix_web::http::header::HeaderMap;
use actix_web::{web, HttpRequest, HttpResponse, Result};

use crate::models::service::HttpMethod;
use crate::services::{dispatcher, proxy};
use crate::state::AppState;

fn actix_method_to_gateway(method: &actix_web::http::Method) -> Option<HttpMethod> {
    match method.as_str() {
        "GET" => Some(HttpMethod::Get),
        "POST" => Some(HttpMethod::Post),
        "PUT" => Some(HttpMethod::Put),
        "DELETE" => Some(HttpMethod::Delete),
        "PATCH" => Some(HttpMethod::Patch),
        _ => None,
    }
}

fn collect_headers(headers: &HeaderMap) -> HashMap<String, String> {
    headers
        .iter()
        .filter_map(|(name, value)| value.to_str().ok().map(|v| (name.as_str().to_string(), v.to_string())))
        .collect()
}

pub async fn handle(req: HttpRequest, body: web::Bytes, state: web::Data<AppState>) -> Result<HttpResponse> {
    let method = match actix_method_to_gateway(req.method()) {
        Some(method) => method,
        None => {
            return Err(crate::models::error::GatewayError::NoRoute {
                method: req.method().to_string(),
                path: req.path().to_string(),
            }
            .into());
        }
    };

    let resolved = dispatcher::dispatch(&state.registry, method, req.path())?;
    let headers = collect_headers(req.headers());
    let query = req.query_string();

    let response = proxy::forward(
        state.http_client.as_ref(),
        &state.log_ring,
        &resolved.service,
        &resolved.endpoint,
        headers,
        query,
        body.to_vec(),
    )
    .await?;

    let mut builder =
        HttpResponse::build(actix_web::http::StatusCode::from_u16(response.status).unwrap_or(
            actix_web::http::StatusCode::OK,
        ));
    for (name, value) in &response.headers {
        builder.insert_header((name.as_str(), value.as_str()));
    }
    Ok(builder.body(response.body))
}

pub fn configure_catchall(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/{tail:.*}").to(handle));
}
