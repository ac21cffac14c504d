//! Data models and domain types for the kairos-hub gateway.
//!
//! This module contains the core data structures shared across the registry,
//! dispatcher, and proxy: the wire-level registration request/response
//! bodies, the in-memory service/endpoint records, and the gateway's
//! error taxonomy.
//!
//! # Module Organization
//!
//! - [`error`] - Gateway-specific error types with HTTP response mapping
//! - [`service`] - Service/endpoint records and registration DTOs
//! - [`log_entry`] - Structured log entries held by the in-memory log ring

pub mod error;
pub mod log_entry;
pub mod service;
