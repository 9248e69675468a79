use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceHealth {
    pub started_at: String,
    pub uptime_seconds: u64,
    pub requests_served: u64,
    pub requests_failed: u64,
    pub store_backend: String,
    pub record_location: String,
    pub memory_usage_mb: f32,
}

#[derive(Clone)]
pub struct HealthTracker {
    start_time: Instant,
    started_at: OffsetDateTime,
    requests: Arc<AtomicU64>,
    failures: Arc<AtomicU64>,
}

impl HealthTracker {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            started_at: OffsetDateTime::now_utc(),
            requests: Arc::new(AtomicU64::new(0)),
            failures: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn record_request(&self, failed: bool) {
        self.requests.fetch_add(1, Ordering::Relaxed);
        if failed {
            self.failures.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn get_health(&self, store_backend: &str, record_location: &str) -> ServiceHealth {
        ServiceHealth {
            started_at: self.started_at.format(&Rfc3339).unwrap_or_default(),
            uptime_seconds: self.start_time.elapsed().as_secs(),
            requests_served: self.requests.load(Ordering::Relaxed),
            requests_failed: self.failures.load(Ordering::Relaxed),
            store_backend: store_backend.to_string(),
            record_location: record_location.to_string(),
            memory_usage_mb: get_memory_usage_mb(),
        }
    }
}

impl Default for HealthTracker {
    fn default() -> Self {
        Self::new()
    }
}

fn get_memory_usage_mb() -> f32 {
    #[cfg(target_os = "linux")]
    {
        if let Ok(status) = std::fs::read_to_string("/proc/self/status") {
            let rss_kb = status
                .lines()
                .find(|line| line.starts_with("VmRSS:"))
                .and_then(|line| line.split_whitespace().nth(1))
                .and_then(|kb| kb.parse::<u64>().ok());
            if let Some(kb) = rss_kb {
                return kb as f32 / 1024.0;
            }
        }
    }

    // unknown on this platform
    0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let tracker = HealthTracker::new();
        let shared = tracker.clone();
        tracker.record_request(false);
        shared.record_request(true);
        let health = tracker.get_health("memory", "ip-config.json");
        assert_eq!(health.requests_served, 2);
        assert_eq!(health.requests_failed, 1);
        assert_eq!(health.store_backend, "memory");
        assert!(!health.started_at.is_empty());
    }
}
