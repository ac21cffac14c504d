//! Logging: the console structured logger and the in-memory dashboard ring.

pub mod logger;
pub mod ring;

pub use logger::configure_logger;
pub use ring::LogRing;
