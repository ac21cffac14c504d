//! # kairos-hub
//!
//! A dynamic reverse-proxy API gateway for internal microservices.
//! Services self-register over HTTP, declaring the endpoints they expose;
//! the gateway resolves inbound requests against that registry and
//! forwards them upstream, returning the response verbatim. A
//! heartbeat-driven liveness model marks services stale and eventually
//! evicts their routes when re-registration stops.
//!
//! ## Request Flow
//!
//! ```text
//! Client ──▶ catch-all resource ──▶ Dispatcher ──▶ Registry lookup
//!                                        │
//!                                        ▼
//!                                     Proxy ──▶ Upstream service
//! ```
//!
//! ## Module Organization
//!
//! - **[`config`]** - Environment-variable-driven runtime configuration
//! - **[`models`]** - Data models, registration DTOs, and the error taxonomy
//! - **[`services`]** - Registry, dispatcher, proxy, sweeper, clock, HTTP client
//! - **[`routes`]** - Admin, health, and catch-all HTTP handlers
//! - **[`utils`]** - Validation and URL-composition helpers
//! - **[`logs`]** - Console logger and the dashboard's in-memory log ring
//! - **[`state`]** - Shared application state handed to every handler
//!
//! ## Environment Variables
//!
//! - `GATEWAY_PORT`, `GATEWAY_HOST`: bind address (default `0.0.0.0:8080`)
//! - `GATEWAY_STALE_SECONDS`, `GATEWAY_EVICT_SECONDS`: liveness thresholds
//! - `GATEWAY_SWEEP_INTERVAL_SECONDS`: sweeper tick cadence
//! - `GATEWAY_LOG_RING_CAPACITY`: dashboard log ring capacity
//! - `GATEWAY_MAX_BODY_BYTES`: upstream response size cap
//! - `NO_COLOR`: disable colored console log output

pub mod config;
pub mod logs;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
