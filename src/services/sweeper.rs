//! Background sweeper: periodically marks stale services and evicts
//! long-dead ones (§4.G).

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::Duration;
use log::info;
use tokio::time::interval;

use crate::logs::LogRing;
use crate::models::log_entry::{LogCategory, LogContext, LogLevel};
use crate::services::clock::Clock;
use crate::services::registry::Registry;

/// Runs the sweep loop until the process exits. Intended to be
/// `tokio::spawn`ed once at startup.
pub async fn run(
    registry: Arc<Registry>,
    clock: Arc<dyn Clock>,
    log_ring: Arc<LogRing>,
    sweep_interval: StdDuration,
    stale_after: Duration,
    evict_after: Duration,
) {
    let mut ticker = interval(sweep_interval);
    loop {
        ticker.tick().await;
        sweep_once(&registry, clock.as_ref(), &log_ring, stale_after, evict_after);
    }
}

/// One sweep pass: mark-stale then evict, in that order, so a service that
/// crosses both thresholds between sweeps is staled and evicted in the
/// same pass rather than lingering an extra cycle.
pub fn sweep_once(
    registry: &Registry,
    clock: &dyn Clock,
    log_ring: &LogRing,
    stale_after: Duration,
    evict_after: Duration,
) {
    let now = clock.now();

    let staled = registry.mark_stale_older_than(now - stale_after);
    for name in &staled {
        info!("service '{name}' marked stale");
        log_ring.push(
            LogLevel::Warn,
            LogCategory::Sweep,
            format!("service '{name}' marked stale"),
            LogContext { service: Some(name.clone()), ..Default::default() },
        );
    }

    let evicted = registry.evict_older_than(now - evict_after);
    for name in &evicted {
        info!("service '{name}' evicted");
        log_ring.push(
            LogLevel::Warn,
            LogCategory::Sweep,
            format!("service '{name}' evicted"),
            LogContext { service: Some(name.clone()), ..Default::default() },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::service::{EndpointDescriptor, HttpMethod};
    use crate::services::clock::ManualClock;
    use chrono::Utc;

    #[test]
    fn sweep_transitions_through_stale_to_evicted() {
        let start = Utc::now();
        let clock = ManualClock::new(start);
        let registry = Registry::new(Arc::new(ManualClock::new(start)));
        let log_ring = LogRing::new(10);

        registry.upsert(
            "echo".to_string(),
            "http://x:1".to_string(),
            vec![EndpointDescriptor {
                path: "/ping".to_string(),
                method: HttpMethod::Get,
                timeout_seconds: 30,
                description: None,
                input_schema: None,
            }],
        );

        clock.advance(Duration::seconds(900));
        sweep_once(&registry, &clock, &log_ring, Duration::seconds(899), Duration::seconds(3599));
        assert_eq!(registry.get("echo").unwrap().status, crate::models::service::ServiceStatus::Stale);

        clock.advance(Duration::seconds(3600));
        sweep_once(&registry, &clock, &log_ring, Duration::seconds(899), Duration::seconds(3599));
        assert!(registry.get("echo").is_none());

        assert!(log_ring.len() >= 2);
    }
}
