//! Registration and dashboard endpoints (§4.H).

use std::collections::HashMap;

use actix_web::{web, HttpResponse, Result};
use serde_json::json;

use crate::models::error::ErrorKind;
use crate::models::log_entry::{LogCategory, LogContext, LogLevel};
use crate::models::service::RegisterRequest;
use crate::state::AppState;
use crate::utils::validation::validate_registration;

/// `POST /register` — validates the body, replaces the named service's
/// routes atomically, and returns the stored record.
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
) -> Result<HttpResponse> {
    let validated = validate_registration(&body).map_err(|err| {
        let (category, level) = match err.kind() {
            ErrorKind::Internal => (LogCategory::Error, LogLevel::Error),
            _ => (LogCategory::Reject, LogLevel::Warn),
        };
        let (summary, details) = err.summary_details();
        state.log_ring.push(
            level,
            category,
            format!("registration rejected: {summary}: {details}"),
            LogContext::default(),
        );
        err
    })?;
    let routes_created = validated.endpoints.len();

    state.registry.upsert(validated.name.clone(), validated.internal_url, validated.endpoints);
    let service = state.registry.get(&validated.name).expect("just inserted");

    state.log_ring.push(
        LogLevel::Info,
        LogCategory::Register,
        format!("service '{}' registered with {} endpoint(s)", validated.name, routes_created),
        LogContext { service: Some(validated.name.clone()), ..Default::default() },
    );

    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "message": format!("Service '{}' registered", validated.name),
        "service": service,
        "routes_created": routes_created,
    })))
}

/// `GET /` — a snapshot of the registry and recent log ring, for the
/// administrator-facing dashboard.
pub async fn dashboard(state: web::Data<AppState>) -> Result<HttpResponse> {
    let services: HashMap<String, _> =
        state.registry.snapshot().into_iter().map(|record| (record.name.clone(), record)).collect();
    let service_count = services.len();

    let mut logs = state.log_ring.snapshot();
    logs.reverse();

    Ok(HttpResponse::Ok().json(json!({
        "hub_status": "running",
        "mode": "service_registration",
        "services": services,
        "service_count": service_count,
        "logs": logs,
    })))
}

pub fn configure_admin(cfg: &mut web::ServiceConfig) {
    cfg.route("/register", web::post().to(register)).route("/", web::get().to(dashboard));
}
