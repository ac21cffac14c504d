//! Shared application state handed to every Actix handler via `web::Data`.

use std::sync::Arc;

use crate::logs::LogRing;
use crate::services::clock::Clock;
use crate::services::http_client::HttpClient;
use crate::services::registry::Registry;

/// Everything a request handler needs, cloned cheaply via `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<Registry>,
    pub log_ring: Arc<LogRing>,
    pub http_client: Arc<dyn HttpClient>,
    pub clock: Arc<dyn Clock>,
}
