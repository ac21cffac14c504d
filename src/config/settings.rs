//! Runtime configuration, loaded entirely from environment variables.
//!
//! Unlike a file-backed settings loader, there is nothing to watch or
//! reload here: every value is read once at startup and the process is
//! restarted to pick up a change.

use std::env;

/// Default bind port.
pub const DEFAULT_PORT: u16 = 8080;
/// Default bind host.
pub const DEFAULT_HOST: &str = "0.0.0.0";
/// Default age, in seconds, after which an un-heartbeated service is marked stale.
pub const DEFAULT_STALE_SECONDS: u64 = 900;
/// Default age, in seconds, after which a stale service is evicted entirely.
pub const DEFAULT_EVICT_SECONDS: u64 = 3600;
/// Default interval, in seconds, between sweeper passes.
pub const DEFAULT_SWEEP_INTERVAL_SECONDS: u64 = 60;
/// Default capacity of the in-memory log ring.
pub const DEFAULT_LOG_RING_CAPACITY: usize = 500;
/// Default maximum upstream response body size, in bytes, before it's
/// treated as malformed.
pub const DEFAULT_MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Gateway runtime configuration.
#[derive(Debug, Clone)]
pub struct Settings {
    pub port: u16,
    pub host: String,
    pub stale_seconds: u64,
    pub evict_seconds: u64,
    pub sweep_interval_seconds: u64,
    pub log_ring_capacity: usize,
    pub max_body_bytes: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            host: DEFAULT_HOST.to_string(),
            stale_seconds: DEFAULT_STALE_SECONDS,
            evict_seconds: DEFAULT_EVICT_SECONDS,
            sweep_interval_seconds: DEFAULT_SWEEP_INTERVAL_SECONDS,
            log_ring_capacity: DEFAULT_LOG_RING_CAPACITY,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            log::warn!("ignoring invalid {key}={raw:?}, using default");
            default
        }),
        Err(_) => default,
    }
}

impl Settings {
    /// Builds configuration from the process environment, falling back to
    /// defaults for anything unset or unparseable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            port: parse_env("GATEWAY_PORT", defaults.port),
            host: env::var("GATEWAY_HOST").unwrap_or(defaults.host),
            stale_seconds: parse_env("GATEWAY_STALE_SECONDS", defaults.stale_seconds),
            evict_seconds: parse_env("GATEWAY_EVICT_SECONDS", defaults.evict_seconds),
            sweep_interval_seconds: parse_env(
                "GATEWAY_SWEEP_INTERVAL_SECONDS",
                defaults.sweep_interval_seconds,
            ),
            log_ring_capacity: parse_env("GATEWAY_LOG_RING_CAPACITY", defaults.log_ring_capacity),
            max_body_bytes: parse_env("GATEWAY_MAX_BODY_BYTES", defaults.max_body_bytes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let settings = Settings::default();
        assert_eq!(settings.port, 8080);
        assert_eq!(settings.stale_seconds, 900);
        assert_eq!(settings.evict_seconds, 3600);
        assert_eq!(settings.sweep_interval_seconds, 60);
        assert_eq!(settings.log_ring_capacity, 500);
        assert_eq!(settings.max_body_bytes, 2 * 1024 * 1024);
    }

    #[test]
    fn parse_env_falls_back_on_garbage() {
        let value: u16 = parse_env("__NONEXISTENT_GATEWAY_VAR__", 42);
        assert_eq!(value, 42);
    }
}
