//! kairos-hub gateway server
//!
//! Binary entry point: wires together configuration, logging, the
//! registry/sweeper/HTTP client, and the Actix HTTP server.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use actix_web::{web, App, HttpServer};
use chrono::Duration;
use kairos_hub::config::Settings;
use kairos_hub::logs::{configure_logger, LogRing};
use kairos_hub::routes::{configure_admin, configure_catchall, configure_health};
use kairos_hub::services::clock::SystemClock;
use kairos_hub::services::http_client::ReqwestHttpClient;
use kairos_hub::services::registry::Registry;
use kairos_hub::services::sweeper;
use kairos_hub::state::AppState;
use log::{error, info};
use tokio::signal;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    configure_logger();

    let settings = Settings::from_env();
    info!("starting kairos-hub v{}", env!("CARGO_PKG_VERSION"));

    let clock = Arc::new(SystemClock);
    let registry = Arc::new(Registry::new(clock.clone()));
    let log_ring = Arc::new(LogRing::new(settings.log_ring_capacity));
    let http_client: Arc<dyn kairos_hub::services::http_client::HttpClient> =
        Arc::new(ReqwestHttpClient::new(settings.max_body_bytes));

    let state = AppState {
        registry: registry.clone(),
        log_ring: log_ring.clone(),
        http_client,
        clock: clock.clone(),
    };

    let sweeper_handle = tokio::spawn(sweeper::run(
        registry,
        clock,
        log_ring,
        StdDuration::from_secs(settings.sweep_interval_seconds),
        Duration::seconds(settings.stale_seconds as i64),
        Duration::seconds(settings.evict_seconds as i64),
    ));

    let host = settings.host.clone();
    let port = settings.port;
    info!("binding {}:{}", host, port);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .app_data(web::PayloadConfig::new(settings.max_body_bytes))
            .app_data(web::JsonConfig::default().limit(settings.max_body_bytes))
            .configure(configure_health)
            .configure(configure_admin)
            .configure(configure_catchall)
    })
    .bind((host.as_str(), port))?
    .run();

    tokio::select! {
        result = server => {
            match result {
                Ok(_) => info!("server stopped gracefully"),
                Err(e) => error!("server error: {e}"),
            }
        }
        _ = signal::ctrl_c() => {
            info!("received shutdown signal, stopping server...");
        }
    }

    sweeper_handle.abort();
    Ok(())
}
