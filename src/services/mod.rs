//! Core gateway services: registry, dispatcher, proxy, sweeper, and the
//! clock/HTTP-client abstractions they're built on.

pub mod clock;
pub mod dispatcher;
pub mod http_client;
pub mod proxy;
pub mod registry;
pub mod sweeper;

pub use registry::Registry;
