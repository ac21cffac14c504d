//! Service registry: lifecycle, heartbeat/stale/evict state machine, and
//! route ownership (§4.D).
//!
//! The map is guarded by a single `RwLock`; no lock is ever held across an
//! `.await` on an outbound HTTP call, so a slow upstream forward can never
//! block a concurrent registration or sweep.

use std::sync::{Arc, RwLock};

use ahash::HashMap as AHashMap;
use chrono::{DateTime, Utc};

use crate::models::service::{EndpointDescriptor, HttpMethod, ServiceRecord, ServiceStatus};
use crate::services::clock::Clock;

/// Thread-safe, shared service registry.
pub struct Registry {
    clock: Arc<dyn Clock>,
    services: RwLock<AHashMap<String, ServiceRecord>>,
}

impl Registry {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock, services: RwLock::new(AHashMap::default()) }
    }

    /// Inserts a new service or atomically replaces an existing one with the
    /// same name. The entire endpoint list is replaced as a unit — partial
    /// merges are never performed. Re-registration resets status to
    /// `Active` and refreshes `last_heartbeat`, but preserves `first_seen`.
    pub fn upsert(&self, name: String, internal_url: String, endpoints: Vec<EndpointDescriptor>) {
        let now = self.clock.now();
        let mut services = self.services.write().expect("registry lock poisoned");

        let first_seen = services.get(&name).map(|existing| existing.first_seen).unwrap_or(now);

        services.insert(
            name.clone(),
            ServiceRecord {
                name,
                internal_url,
                endpoints,
                first_seen,
                last_heartbeat: now,
                status: ServiceStatus::Active,
            },
        );
    }

    /// Looks up `(service, method, endpoint_path)`, an O(1) keyed lookup by
    /// service name followed by a scan of that service's (small) endpoint
    /// list. Both active and stale services are resolvable; only eviction
    /// removes a route.
    pub fn find_route(
        &self,
        service: &str,
        method: HttpMethod,
        path: &str,
    ) -> Option<(ServiceRecord, EndpointDescriptor)> {
        let services = self.services.read().expect("registry lock poisoned");
        let record = services.get(service)?;
        let endpoint = record.endpoints.iter().find(|e| e.method == method && e.path == path)?;
        Some((record.clone(), endpoint.clone()))
    }

    /// Returns a snapshot of every registered service, for the dashboard.
    pub fn snapshot(&self) -> Vec<ServiceRecord> {
        let services = self.services.read().expect("registry lock poisoned");
        services.values().cloned().collect()
    }

    pub fn get(&self, name: &str) -> Option<ServiceRecord> {
        self.services.read().expect("registry lock poisoned").get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.services.read().expect("registry lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Marks every `Active` service whose `last_heartbeat` is older than
    /// `threshold` as `Stale`. Returns the names transitioned.
    pub fn mark_stale_older_than(&self, threshold: DateTime<Utc>) -> Vec<String> {
        let mut services = self.services.write().expect("registry lock poisoned");
        let mut transitioned = Vec::new();
        for (name, record) in services.iter_mut() {
            if record.status == ServiceStatus::Active && record.last_heartbeat < threshold {
                record.status = ServiceStatus::Stale;
                transitioned.push(name.clone());
            }
        }
        transitioned
    }

    /// Evicts every service whose `last_heartbeat` is older than
    /// `threshold`, regardless of current status, removing its routes
    /// entirely. Returns the names evicted.
    pub fn evict_older_than(&self, threshold: DateTime<Utc>) -> Vec<String> {
        let mut services = self.services.write().expect("registry lock poisoned");
        let to_evict: Vec<String> = services
            .iter()
            .filter(|(_, record)| record.last_heartbeat < threshold)
            .map(|(name, _)| name.clone())
            .collect();
        for name in &to_evict {
            services.remove(name);
        }
        to_evict
    }
}
